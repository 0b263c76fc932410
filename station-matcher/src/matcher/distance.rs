//! Great-circle distance.

use crate::domain::{Coordinates, GeoPoint};

/// Mean Earth radius used for all distances, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two coordinate pairs, in kilometres.
///
/// Coordinates are not range-checked. Out-of-range input still produces a
/// finite, non-negative number; it just doesn't mean anything.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = ((d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance between two points in kilometres.
///
/// # Examples
///
/// ```
/// use station_matcher::domain::GeoPoint;
/// use station_matcher::matcher::distance;
///
/// let a = GeoPoint::parse("DT_0007", "목포", 34.7797222, 126.375556).unwrap();
/// let b = GeoPoint::parse("530350", "목포", 34.77805556, 126.3925).unwrap();
///
/// let km = distance(&a, &b);
/// assert!(km > 1.0 && km < 2.0);
/// assert_eq!(km, distance(&b, &a));
/// ```
pub fn distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    haversine_km(a.coords(), b.coords())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::parse("P", "p", lat, lon).unwrap()
    }

    #[test]
    fn identity_is_zero() {
        let p = point(37.451944, 126.592222);
        assert_eq!(distance(&p, &p), 0.0);
    }

    #[test]
    fn coincident_points_with_different_ids() {
        let a = GeoPoint::parse("SO_0536", "덕적도", 37.227778, 126.157778).unwrap();
        let b = GeoPoint::parse("DT_0065", "덕적도", 37.227778, 126.157778).unwrap();
        assert_eq!(distance(&a, &b), 0.0);
    }

    #[test]
    fn incheon_gauge_to_incheon_marine_post() {
        let gauge = point(37.451944, 126.592222);
        let post = point(37.0917, 125.4289);
        let km = distance(&gauge, &post);
        assert!((km - 110.46).abs() < 1.0, "got {km}");
    }

    #[test]
    fn one_degree_of_latitude() {
        let km = distance(&point(0.0, 0.0), &point(1.0, 0.0));
        // R * pi / 180
        assert!((km - 111.195).abs() < 0.01, "got {km}");
    }

    #[test]
    fn antipodal_points() {
        let km = distance(&point(0.0, 0.0), &point(0.0, 180.0));
        assert!((km - EARTH_RADIUS_KM * std::f64::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn dateline_wraps() {
        let km = distance(&point(0.0, 179.5), &point(0.0, -179.5));
        assert!((km - 111.195).abs() < 0.01, "got {km}");
    }

    #[test]
    fn out_of_range_input_still_finite() {
        let km = haversine_km(Coordinates::new(123.0, 400.0), Coordinates::new(-300.0, 10.0));
        assert!(km.is_finite());
        assert!(km >= 0.0);
    }
}
