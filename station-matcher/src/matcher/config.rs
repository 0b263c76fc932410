//! Matching configuration.

use serde::Deserialize;

/// Default number of nearest candidates kept per source point.
pub const DEFAULT_TOP_N: usize = 10;

/// Configuration parameters for a matching run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Maximum number of candidates to keep per source point.
    pub top_n: usize,
}

impl MatchConfig {
    /// Create a new configuration with the given `top_n`.
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        assert_eq!(MatchConfig::default().top_n, 10);
    }

    #[test]
    fn custom_config() {
        assert_eq!(MatchConfig::new(5).top_n, 5);
    }

    #[test]
    fn deserialize_missing_field_uses_default() {
        let config: MatchConfig = toml::from_str("").unwrap();
        assert_eq!(config, MatchConfig::default());

        let config: MatchConfig = toml::from_str("top_n = 3").unwrap();
        assert_eq!(config.top_n, 3);
    }
}
