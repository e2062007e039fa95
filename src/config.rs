use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Contents of the configuration file.  Unknown tables and keys are ignored.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub(crate) struct Config {
    /// Color overrides, keyed by role name
    pub(crate) colors: BTreeMap<String, String>,
    pub(crate) holidays: HolidayConfig,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub(crate) struct HolidayConfig {
    pub(crate) country: Option<String>,
    pub(crate) dir: Option<PathBuf>,
    pub(crate) verbose: bool,
}

impl Config {
    pub(crate) fn load(path: &Path) -> Result<Config, ConfigError> {
        let src = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        toml::from_str(&src).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Load the configuration file from the default location, returning the
    /// default configuration if there is no such file
    pub(crate) fn load_default() -> Result<Config, ConfigError> {
        let Some(path) = default_config_path() else {
            log::debug!("Could not determine configuration directory");
            return Ok(Config::default());
        };
        if path.exists() {
            log::debug!("Loading configuration from {}", path.display());
            Config::load(&path)
        } else {
            Ok(Config::default())
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "calour")
}

pub(crate) fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Directory searched for `<country>.ics` holiday feeds when none is
/// configured
pub(crate) fn default_holidays_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().join("holidays"))
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read configuration file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse configuration file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
