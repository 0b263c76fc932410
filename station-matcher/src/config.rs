//! Run configuration.
//!
//! A run is described by a TOML file:
//!
//! ```toml
//! top_n = 5
//!
//! [source]
//! path = "tide_station_list.csv"
//! columns = "tide"
//!
//! [[candidates]]
//! label = "a"
//! path = "marine_a.csv"
//! columns = "observation"
//! provides = ["wt", "swh"]
//!
//! [output]
//! path = "station_matching.json"
//! format = "json"
//! ```
//!
//! Optional `[regions]` and `[overlap]` sections add region resolution and
//! a region code overlap report. Relative paths are resolved against the
//! directory holding the file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::Capabilities;
use crate::matcher::MatchConfig;
use crate::regions::DEFAULT_SIMILARITY_THRESHOLD;
use crate::sources::ColumnSpec;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "STATION_MATCH_CONFIG";
/// Environment variable overriding `top_n`.
pub const TOP_N_ENV: &str = "STATION_MATCH_TOP_N";
/// Config file used when neither an argument nor the environment names one.
pub const DEFAULT_CONFIG_FILE: &str = "station_match.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .path.display())]
    MissingFile { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Input file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    #[default]
    Csv,
    Xml,
}

/// Output layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Report keyed by source id with the top-N candidates from all sets.
    #[default]
    Json,
    /// Source rows with the nearest candidate of each set appended.
    Csv,
}

/// The points to find neighbours for.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub format: InputFormat,
    #[serde(default)]
    pub columns: ColumnSpec,
    /// Prefix applied to every column name when reading.
    #[serde(default)]
    pub prefix: Option<String>,
}

/// One candidate file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CandidateConfig {
    /// Names this set's columns in CSV output.
    pub label: String,
    pub path: PathBuf,
    #[serde(default)]
    pub format: InputFormat,
    #[serde(default)]
    pub columns: ColumnSpec,
    #[serde(default)]
    pub prefix: Option<String>,
    /// Capability tags every station in this file gets.
    #[serde(default)]
    pub provides: Vec<String>,
}

impl CandidateConfig {
    pub fn capabilities(&self) -> Capabilities {
        self.provides.iter().map(String::as_str).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutputConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub format: OutputFormat,
}

/// Forecast region resolution settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegionsConfig {
    /// CSV with `REG_ID` and `REG_NAME` columns.
    pub taxonomy: PathBuf,
    /// JSON object mapping place names to region names.
    #[serde(default)]
    pub mapping: Option<PathBuf>,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Region name or code used when nothing else matches.
    #[serde(default)]
    pub default: Option<String>,
    /// Source column holding the name to resolve. Defaults to the station name.
    #[serde(default)]
    pub name_field: Option<String>,
}

/// One forecast product's raw lines, compared by region code.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OverlapSetConfig {
    pub name: String,
    pub path: PathBuf,
}

/// Region code overlap between forecast products.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OverlapConfig {
    /// Where the JSON overlap report goes.
    pub output: PathBuf,
    #[serde(default)]
    pub sets: Vec<OverlapSetConfig>,
}

fn default_threshold() -> f64 {
    DEFAULT_SIMILARITY_THRESHOLD
}

/// Everything needed for one run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunConfig {
    #[serde(flatten)]
    pub matching: MatchConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub candidates: Vec<CandidateConfig>,
    pub output: OutputConfig,
    #[serde(default)]
    pub regions: Option<RegionsConfig>,
    #[serde(default)]
    pub overlap: Option<OverlapConfig>,
}

impl RunConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, resolving relative paths against its directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::MissingFile {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        let mut config = Self::from_toml(&text)?;
        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        Ok(config)
    }

    /// Load the config chosen by the first argument or the environment,
    /// then apply environment overrides.
    pub fn from_env(mut args: impl Iterator<Item = String>) -> Result<Self, ConfigError> {
        let path = config_path(args.next(), std::env::var(CONFIG_ENV).ok());
        tracing::info!(config = %path.display(), "loading run config");
        Self::load(&path)?.with_top_n_override(std::env::var(TOP_N_ENV).ok().as_deref())
    }

    /// Replace `top_n` with a value given as text, if any.
    pub fn with_top_n_override(mut self, value: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(raw) = value {
            let top_n = raw.trim().parse::<usize>().map_err(|e| ConfigError::Invalid {
                field: "top_n",
                reason: format!("{raw:?}: {e}"),
            })?;
            self.matching.top_n = top_n;
            self.validate()?;
        }
        Ok(self)
    }

    pub fn top_n(&self) -> usize {
        self.matching.top_n
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.matching.top_n == 0 {
            return Err(ConfigError::Invalid {
                field: "top_n",
                reason: "must be at least 1".to_string(),
            });
        }

        let mut labels = HashSet::new();
        for candidate in &self.candidates {
            if candidate.label.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field: "candidates.label",
                    reason: "must not be empty".to_string(),
                });
            }
            if !labels.insert(candidate.label.as_str()) {
                return Err(ConfigError::Invalid {
                    field: "candidates.label",
                    reason: format!("{:?} used twice", candidate.label),
                });
            }
        }

        if let Some(regions) = &self.regions {
            if !(0.0..=1.0).contains(&regions.threshold) {
                return Err(ConfigError::Invalid {
                    field: "regions.threshold",
                    reason: format!("{} is outside 0..=1", regions.threshold),
                });
            }
        }

        if let Some(overlap) = &self.overlap {
            if overlap.sets.len() < 2 {
                return Err(ConfigError::Invalid {
                    field: "overlap.sets",
                    reason: "at least two sets are needed".to_string(),
                });
            }
            let mut names = HashSet::new();
            for set in &overlap.sets {
                if set.name.trim().is_empty() || !names.insert(set.name.as_str()) {
                    return Err(ConfigError::Invalid {
                        field: "overlap.sets.name",
                        reason: format!("{:?} is empty or used twice", set.name),
                    });
                }
            }
        }

        Ok(())
    }

    fn rebase(&mut self, base: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        join(&mut self.source.path);
        for candidate in &mut self.candidates {
            join(&mut candidate.path);
        }
        join(&mut self.output.path);
        if let Some(regions) = &mut self.regions {
            join(&mut regions.taxonomy);
            if let Some(mapping) = &mut regions.mapping {
                join(mapping);
            }
        }
        if let Some(overlap) = &mut self.overlap {
            join(&mut overlap.output);
            for set in &mut overlap.sets {
                join(&mut set.path);
            }
        }
    }
}

/// Pick the config file: argument, then environment, then the default name.
pub fn config_path(arg: Option<String>, env: Option<String>) -> PathBuf {
    arg.or(env)
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}
