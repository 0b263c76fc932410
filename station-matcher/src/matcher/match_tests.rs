//! Scenario tests for matching against real station coordinates.
//!
//! Coordinates are the published positions of Korean tide gauges and
//! marine observation posts.

use super::*;
use crate::domain::{Capabilities, GeoPoint, capability};

fn point(id: &str, name: &str, lat: f64, lon: f64) -> GeoPoint {
    GeoPoint::parse(id, name, lat, lon).unwrap()
}

fn tide_gauges() -> Vec<GeoPoint> {
    vec![
        point("DT_0007", "목포", 34.7797222222222, 126.375556),
        point("DT_0016", "여수", 34.747222, 127.765556),
        point("DT_0013", "울릉도", 37.491389, 130.913611),
        point("SO_0536", "덕적도", 37.227778, 126.157778),
        point("DT_0001", "인천", 37.451944, 126.592222),
        point("DT_0028", "진도", 34.377778, 126.308611),
        point("SO_0537", "벽파진", 34.539444, 126.346111),
        point("DT_0005", "부산", 35.096389, 129.035278),
    ]
}

fn marine_posts() -> CandidateSet {
    let wave: Capabilities = [capability::WATER_TEMPERATURE, capability::WAVE_HEIGHT]
        .into_iter()
        .collect();
    vec![
        (point("530350", "목포", 34.77805556, 126.3925), wave.clone()),
        (point("550070", "여수", 34.74416667, 127.76805555), wave.clone()),
        (point("21229", "울릉도", 37.4554, 131.1144), wave.clone()),
        (point("22101", "덕적도", 37.2361, 126.0188), wave),
    ]
    .into_iter()
    .collect()
}

fn ids<'a>(result: &'a MatchResult<'_>) -> Vec<&'a str> {
    result
        .matches()
        .iter()
        .map(|m| m.candidate.id().as_str())
        .collect()
}

#[test]
fn incheon_gauge_distance_to_incheon_post() {
    let gauge = point("DT_0001", "인천", 37.451944, 126.592222);
    let post = point("22185", "인천", 37.0917, 125.4289);

    let km = distance(&gauge, &post);
    assert!((km - 110.46).abs() < 1.0, "got {km}");
    assert_eq!(Proximity::classify(km), Proximity::Far);
}

#[test]
fn incheon_post_ranks_nearby_gauges() {
    let post = point("22185", "인천", 37.0917, 125.4289);
    let gauges: CandidateSet = vec![
        point("DT_0064", "교동대교", 37.789611, 126.339611),
        point("DT_0001", "인천", 37.451944, 126.592222),
        point("SO_0563", "울도", 37.035556, 125.995),
        point("DT_0038", "굴업도", 37.194444, 125.995),
        point("DT_0045", "격렬비열도", 36.624369, 125.561964),
        point("DT_0065", "덕적도", 37.226333, 126.156556),
        point("SO_0536", "덕적도", 37.227778, 126.157778),
        point("DT_0052", "인천송도", 37.3380555555556, 126.586111111111),
        point("DT_0008", "안산", 37.192222, 126.647222),
    ]
    .into_iter()
    .map(|p| (p, Capabilities::new()))
    .collect();

    let ranking = rank(&post, &gauges);
    let order: Vec<&str> = ranking
        .entries()
        .iter()
        .map(|m| m.candidate.id().as_str())
        .collect();
    assert_eq!(
        order,
        vec![
            "SO_0563", "DT_0038", "DT_0045", "DT_0065", "SO_0536", "DT_0052", "DT_0008",
            "DT_0001", "DT_0064"
        ]
    );
    assert!((ranking.nearest().unwrap().distance_km - 50.62).abs() < 0.01);
    assert!((ranking.farthest().unwrap().distance_km - 111.74).abs() < 0.01);
}

#[test]
fn each_gauge_matches_its_namesake_post() {
    let gauges = tide_gauges();
    let posts = marine_posts();

    let matched = match_all(&gauges, &posts, 5);
    assert_eq!(matched.len(), gauges.len());

    let nearest = |code: &str| {
        let id = crate::domain::StationId::parse(code).unwrap();
        matched
            .get(&id)
            .and_then(|r| r.nearest())
            .map(|m| m.candidate.id().as_str())
    };

    assert_eq!(nearest("DT_0007"), Some("530350"));
    assert_eq!(nearest("DT_0016"), Some("550070"));
    assert_eq!(nearest("DT_0013"), Some("21229"));
    assert_eq!(nearest("SO_0536"), Some("22101"));
}

#[test]
fn top_three_of_four_drops_farthest() {
    let mokpo_post = point("530350", "목포", 34.77805556, 126.3925);
    let gauges: CandidateSet = vec![
        point("DT_0016", "여수", 34.747222, 127.765556),
        point("DT_0007", "목포", 34.7797222222222, 126.375556),
        point("DT_0028", "진도", 34.377778, 126.308611),
        point("SO_0537", "벽파진", 34.539444, 126.346111),
    ]
    .into_iter()
    .map(|p| (p, Capabilities::new()))
    .collect();

    let result = match_point(&mokpo_post, &gauges, 3);
    assert_eq!(result.len(), 3);
    assert_eq!(ids(&result), vec!["DT_0007", "SO_0537", "DT_0028"]);
    assert!(!ids(&result).contains(&"DT_0016"));

    for w in result.matches().windows(2) {
        assert!(w[0].distance_km <= w[1].distance_km);
    }
}

#[test]
fn empty_candidate_set_yields_empty_results() {
    let gauges = tide_gauges();
    let empty = CandidateSet::new();

    let matched = match_all(&gauges, &empty, MatchConfig::default().top_n);
    assert_eq!(matched.len(), gauges.len());
    assert!(matched.iter().all(|r| r.is_empty()));
}

#[test]
fn merged_capabilities_travel_with_matches() {
    let mut posts = marine_posts();
    let wind: Capabilities = [
        capability::AIR_TEMPERATURE,
        capability::WIND_DIRECTION,
        capability::WIND_SPEED,
    ]
    .into_iter()
    .collect();
    posts.insert(point("22101", "덕적도(B)", 0.0, 0.0), wind);

    let gauge = point("SO_0536", "덕적도", 37.227778, 126.157778);
    let result = match_point(&gauge, &posts, 1);
    let best = result.nearest().unwrap();

    assert_eq!(best.candidate.id().as_str(), "22101");
    assert_eq!(best.candidate.point.name(), "덕적도");
    assert_eq!(best.candidate.capabilities.join(","), "at,swh,wd,ws,wt");
    assert!((best.distance_km - 12.34).abs() < 0.01);
}
