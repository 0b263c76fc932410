//! Domain types for station matching.
//!
//! This module contains the validated value types shared by the loaders,
//! the matcher and the sinks. Types enforce their invariants at
//! construction time, so code that receives them can trust their validity.

pub mod capability;
mod error;
mod point;
mod station;

pub use capability::Capabilities;
pub use error::DomainError;
pub use point::{Coordinates, GeoPoint};
pub use station::{InvalidStationId, StationId};
