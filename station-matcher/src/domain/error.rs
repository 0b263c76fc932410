//! Domain error types.
//!
//! These errors represent validation failures when building domain values
//! from raw input. They are distinct from file and format errors.

use super::station::InvalidStationId;

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Station identifier failed validation
    #[error(transparent)]
    InvalidId(#[from] InvalidStationId),

    /// Latitude outside [-90, 90] (or NaN)
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    /// Longitude outside [-180, 180] (or NaN)
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}
