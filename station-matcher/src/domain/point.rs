//! Geographic point types.

use std::fmt;

use serde::Serialize;

use super::error::DomainError;
use super::station::StationId;

/// A latitude/longitude pair in decimal degrees.
///
/// No range check is applied here: distance code works on raw coordinates,
/// and out-of-range values simply give a meaningless distance. Use
/// [`GeoPoint::new`] to get validated coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Create a coordinate pair.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns true if latitude is in [-90, 90] and longitude in [-180, 180].
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }

    /// Check both ranges, reporting the first violation.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(DomainError::LatitudeOutOfRange(self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(DomainError::LongitudeOutOfRange(self.lon));
        }
        Ok(())
    }
}

impl From<(f64, f64)> for Coordinates {
    fn from(pair: (f64, f64)) -> Self {
        Self {
            lat: pair.0,
            lon: pair.1,
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// A named station location.
///
/// Construction through [`GeoPoint::new`] guarantees the coordinates are in
/// range. Points are immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    id: StationId,
    name: String,
    coords: Coordinates,
}

impl GeoPoint {
    /// Create a point, validating latitude and longitude.
    ///
    /// # Examples
    ///
    /// ```
    /// use station_matcher::domain::{GeoPoint, StationId};
    ///
    /// let id = StationId::parse("DT_0001").unwrap();
    /// let incheon = GeoPoint::new(id.clone(), "인천", 37.451944, 126.592222).unwrap();
    /// assert_eq!(incheon.name(), "인천");
    ///
    /// assert!(GeoPoint::new(id, "nowhere", 91.0, 0.0).is_err());
    /// ```
    pub fn new(
        id: StationId,
        name: impl Into<String>,
        lat: f64,
        lon: f64,
    ) -> Result<Self, DomainError> {
        let coords = Coordinates::new(lat, lon);
        coords.validate()?;
        Ok(Self {
            id,
            name: name.into(),
            coords,
        })
    }

    /// Parse the id and build a point in one step.
    pub fn parse(id: &str, name: impl Into<String>, lat: f64, lon: f64) -> Result<Self, DomainError> {
        let id = StationId::parse(id)?;
        Self::new(id, name, lat, lon)
    }

    pub fn id(&self) -> &StationId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coords(&self) -> Coordinates {
        self.coords
    }

    pub fn lat(&self) -> f64 {
        self.coords.lat
    }

    pub fn lon(&self) -> f64 {
        self.coords.lon
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every in-range pair builds a point with the same coordinates
        #[test]
        fn in_range_accepted(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) {
            let p = GeoPoint::parse("P", "p", lat, lon).unwrap();
            prop_assert_eq!(p.coords(), Coordinates::new(lat, lon));
        }

        /// Latitudes beyond the poles are always rejected
        #[test]
        fn polar_overflow_rejected(lat in 90.000001f64..1000.0, lon in -180.0f64..=180.0) {
            prop_assert!(GeoPoint::parse("P", "p", lat, lon).is_err());
            prop_assert!(GeoPoint::parse("P", "p", -lat, lon).is_err());
        }
    }
}
