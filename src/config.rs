//! Evaluation configuration loaded from TOML with environment overrides.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::options::ExecOptions;

/// Environment variable overriding [`EvalConfig::max_depth`].
pub const MAX_DEPTH_ENV: &str = "SOMBRA_SPARQL_MAX_DEPTH";

/// Settings that shape operator-tree evaluation.
///
/// ```toml
/// [evaluation]
/// max_depth = 64
/// strict_filter_errors = false
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EvalConfig {
    /// Optional operator nesting limit; unbounded when absent.
    #[serde(default)]
    pub max_depth: Option<usize>,
    /// Propagate non-type evaluation failures out of Filter.
    #[serde(default)]
    pub strict_filter_errors: bool,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct RawConfig {
    #[serde(default)]
    evaluation: EvalConfig,
}

impl EvalConfig {
    /// Parses the `[evaluation]` table of a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            toml::from_str(contents).map_err(|source| ConfigError::Parse { source })?;
        Ok(raw.evaluation)
    }

    /// Loads configuration from `path` and applies environment overrides.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = if path.exists() {
            let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml_str(&contents)?
        } else {
            Self::default()
        };
        config.with_env_overrides()
    }

    /// Applies [`MAX_DEPTH_ENV`] when set.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Some(value) = std::env::var_os(MAX_DEPTH_ENV) {
            let value = value.to_string_lossy().into_owned();
            let depth = value
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidEnv {
                    var: MAX_DEPTH_ENV,
                    value: value.clone(),
                })?;
            self.max_depth = Some(depth);
        }
        Ok(self)
    }

    /// Root execution options for this configuration.
    pub fn exec_options(&self) -> ExecOptions {
        ExecOptions {
            depth: 0,
            max_depth: self.max_depth,
            strict_filter_errors: self.strict_filter_errors,
        }
    }
}

/// Failures raised while loading [`EvalConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("failed to read evaluation config {path}: {source}")]
    Read {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The configuration is not valid TOML for this schema.
    #[error("failed to parse evaluation config: {source}")]
    Parse {
        /// Underlying TOML error.
        source: toml::de::Error,
    },
    /// An environment override could not be parsed.
    #[error("environment variable {var} has invalid value '{value}'")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_evaluation_table() -> Result<(), ConfigError> {
        let config = EvalConfig::from_toml_str(
            "[evaluation]\nmax_depth = 16\nstrict_filter_errors = true\n",
        )?;
        assert_eq!(config.max_depth, Some(16));
        assert!(config.strict_filter_errors);
        let options = config.exec_options();
        assert_eq!(options.depth, 0);
        assert_eq!(options.max_depth, Some(16));
        Ok(())
    }

    #[test]
    fn empty_document_uses_defaults() -> Result<(), ConfigError> {
        assert_eq!(EvalConfig::from_toml_str("")?, EvalConfig::default());
        Ok(())
    }

    #[test]
    fn rejects_wrong_types() {
        let err = EvalConfig::from_toml_str("[evaluation]\nmax_depth = \"deep\"\n");
        assert!(matches!(err, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn load_reads_file() -> Result<(), ConfigError> {
        let dir = tempdir().map_err(|source| ConfigError::Read {
            path: PathBuf::from("tempdir"),
            source,
        })?;
        let path = dir.path().join("sparql.toml");
        fs::write(&path, "[evaluation]\nstrict_filter_errors = true\n").map_err(|source| {
            ConfigError::Read {
                path: path.clone(),
                source,
            }
        })?;
        let config = EvalConfig::load(&path)?;
        assert!(config.strict_filter_errors);
        Ok(())
    }
}
