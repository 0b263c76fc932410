//! Display classification of match distances.
//!
//! These bands only label results for humans reading a report. Nothing in
//! the matcher filters on them.

use std::fmt;

use serde::Serialize;

/// How close a matched candidate is, in coarse bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Proximity {
    /// Under 5 km: effectively the same site.
    SameSite,
    /// 5 km up to 20 km.
    Adjacent,
    /// 20 km up to 50 km.
    Moderate,
    /// 50 km or more.
    Far,
}

impl Proximity {
    /// Classify a distance in kilometres.
    pub fn classify(distance_km: f64) -> Self {
        if distance_km < 5.0 {
            Proximity::SameSite
        } else if distance_km < 20.0 {
            Proximity::Adjacent
        } else if distance_km < 50.0 {
            Proximity::Moderate
        } else {
            Proximity::Far
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Proximity::SameSite => "same site",
            Proximity::Adjacent => "adjacent",
            Proximity::Moderate => "moderate",
            Proximity::Far => "far",
        }
    }
}

impl fmt::Display for Proximity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
