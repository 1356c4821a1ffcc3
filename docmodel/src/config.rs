use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {config_path}: {source}")]
    Read {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file at {config_path}: {source}")]
    Parse {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Settings shared by every document converted in one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Heading level for headers found inside documentation comments.
    pub level: usize,
    /// Import path prefix removed from cross-package link paths.
    pub module_root: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            level: 1,
            module_root: String::new(),
        }
    }
}

impl Config {
    pub fn new(level: usize, module_root: impl Into<String>) -> Self {
        Config {
            level,
            module_root: module_root.into(),
        }
    }

    pub fn from_toml(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config_path = config_path.as_ref();
        let content =
            std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            config_path: config_path.to_path_buf(),
            source,
        })
    }

    /// Module root derived from the `module` directive of a go.mod file:
    /// the module path with a trailing `/`.
    pub fn module_from_go_mod(contents: &str) -> Option<String> {
        contents.lines().find_map(|line| {
            let rest = line.trim().strip_prefix("module")?;
            if !rest.starts_with(char::is_whitespace) {
                return None;
            }
            let path = rest.split("//").next()?.trim().trim_matches('"');
            (!path.is_empty()).then(|| format!("{}/", path.trim_end_matches('/')))
        })
    }
}
