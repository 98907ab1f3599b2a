//! Optional YAML file supplying defaults for flags the user leaves unset.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::client::{CliError, CliResult};

/// Location of the config file under the user's home directory.
const DEFAULT_RELATIVE_PATH: [&str; 2] = [".conveyor", "config.yml"];

/// Values read from the config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ConfigFile {
    pub(crate) api: ApiSection,
    pub(crate) log: LogSection,
    pub(crate) output: Option<String>,
    pub(crate) org: Option<String>,
    pub(crate) repo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ApiSection {
    pub(crate) addr: Option<String>,
    pub(crate) token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LogSection {
    pub(crate) level: Option<String>,
    pub(crate) format: Option<String>,
}

pub(crate) fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| DEFAULT_RELATIVE_PATH.iter().fold(home, |p, s| p.join(s)))
}

impl ConfigFile {
    /// Load `explicit` when given, otherwise the default location.
    ///
    /// Only an explicitly named file has to exist.
    pub(crate) fn load(explicit: Option<&Path>) -> CliResult<Self> {
        match explicit {
            Some(path) => Self::read(path),
            None => match default_path() {
                Some(path) if path.is_file() => Self::read(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn read(path: &Path) -> CliResult<Self> {
        let text = fs::read_to_string(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => {
                CliError::config(format!("config file {} does not exist", path.display()))
            }
            _ => CliError::config(format!(
                "failed to read config file {}: {err}",
                path.display()
            )),
        })?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&text).map_err(|err| {
            CliError::config(format!(
                "failed to parse config file {}: {err}",
                path.display()
            ))
        })
    }
}
