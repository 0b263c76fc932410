//! Station identifier type.

use std::fmt;

use serde::Serialize;

/// Error returned when parsing an invalid station identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station id: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// A station identifier such as a tide gauge code (`DT_0001`) or an
/// observation post number (`22185`).
///
/// Identifiers are stored trimmed and are never empty. No other format is
/// imposed, since every source uses its own convention.
///
/// # Examples
///
/// ```
/// use station_matcher::domain::StationId;
///
/// let id = StationId::parse(" DT_0001 ").unwrap();
/// assert_eq!(id.as_str(), "DT_0001");
///
/// assert!(StationId::parse("").is_err());
/// assert!(StationId::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    /// Parse a station identifier, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidStationId {
                reason: "must not be empty",
            });
        }

        if trimmed.chars().any(char::is_control) {
            return Err(InvalidStationId {
                reason: "must not contain control characters",
            });
        }

        Ok(StationId(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Parsing is idempotent on its own output
        #[test]
        fn reparse_is_identity(s in "[A-Z0-9_]{1,12}") {
            let id = StationId::parse(&s).unwrap();
            let again = StationId::parse(id.as_str()).unwrap();
            prop_assert_eq!(id, again);
        }

        /// Surrounding whitespace never changes the identifier
        #[test]
        fn padding_ignored(s in "[A-Z0-9_]{1,12}", left in " {0,3}", right in " {0,3}") {
            let padded = format!("{left}{s}{right}");
            let id = StationId::parse(&padded).unwrap();
            prop_assert_eq!(id.as_str(), s.as_str());
        }

        /// Whitespace-only strings are always rejected
        #[test]
        fn blank_rejected(s in "[ \t]{0,8}") {
            prop_assert!(StationId::parse(&s).is_err());
        }
    }
}
