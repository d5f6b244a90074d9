//! Client configuration.
//!
//! Values are layered: built-in defaults, then `~/.flashcoin/config.toml`,
//! then whatever the caller overrides (the CLI feeds its flags and the
//! `FLASHCOIN_*` environment variables in through [`Overrides`]).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bridge::DEFAULT_PROVIDER_URL;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot determine the home directory; set HOME (Unix) or USERPROFILE (Windows)")]
    NoHomeDir,

    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("cannot serialise config: {0}")]
    Serialise(#[from] toml::ser::Error),

    #[error("missing {0}; set it in the config file, the environment, or on the command line")]
    Missing(&'static str),
}

/// Shape of `config.toml`. Every key is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_url: Option<String>,
}

/// Values supplied from outside the file (flags / environment).
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub contract_address: Option<String>,
    pub owner_address: Option<String>,
    pub provider_url: Option<String>,
}

/// Fully resolved configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// FlashCoin contract address.
    pub contract_address: String,
    /// Address allowed to see the mint form. Empty means nobody.
    pub owner_address: String,
    /// Wallet bridge JSON-RPC endpoint.
    pub provider_url: String,
}

/// Returns the canonical path `~/.flashcoin/config.toml`.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".flashcoin").join("config.toml"))
}

impl FileConfig {
    /// Load `path`; a missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_owned(),
                    source,
                })
            }
        };
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self)?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| ConfigError::Write {
                path: dir.to_owned(),
                source,
            })?;
        }
        std::fs::write(path, text).map_err(|source| ConfigError::Write {
            path: path.to_owned(),
            source,
        })
    }
}

impl Config {
    /// Merge file values under the overrides and fill defaults.
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self, ConfigError> {
        let pick = |over: Option<String>, file: Option<String>| {
            over.or(file)
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty())
        };

        let contract_address = pick(overrides.contract_address, file.contract_address)
            .ok_or(ConfigError::Missing("contract address"))?;
        let owner_address = pick(overrides.owner_address, file.owner_address).unwrap_or_default();
        let provider_url = pick(overrides.provider_url, file.provider_url)
            .unwrap_or_else(|| DEFAULT_PROVIDER_URL.to_owned());

        Ok(Self {
            contract_address,
            owner_address,
            provider_url,
        })
    }

    /// Load from `path` (or the default location) and apply `overrides`.
    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_owned(),
            None => config_path()?,
        };
        Self::resolve(FileConfig::load(&path)?, overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = FileConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, FileConfig::default());
    }

    #[test]
    fn overrides_win_over_file() {
        let file = FileConfig {
            contract_address: Some("TFileContract".into()),
            owner_address: Some("TFileOwner".into()),
            provider_url: None,
        };
        let over = Overrides {
            contract_address: Some("TFlagContract".into()),
            ..Default::default()
        };
        let cfg = Config::resolve(file, over).unwrap();
        assert_eq!(cfg.contract_address, "TFlagContract");
        assert_eq!(cfg.owner_address, "TFileOwner");
        assert_eq!(cfg.provider_url, DEFAULT_PROVIDER_URL);
    }

    #[test]
    fn contract_address_is_required() {
        let over = Overrides {
            contract_address: Some("   ".into()),
            ..Default::default()
        };
        assert!(matches!(
            Config::resolve(FileConfig::default(), over),
            Err(ConfigError::Missing("contract address"))
        ));
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let file = FileConfig {
            contract_address: Some("TContract".into()),
            owner_address: Some("TOwner".into()),
            provider_url: Some("http://10.0.0.2:8545".into()),
        };
        file.save(&path).unwrap();

        let cfg = Config::load(Some(&path), Overrides::default()).unwrap();
        assert_eq!(cfg.contract_address, "TContract");
        assert_eq!(cfg.owner_address, "TOwner");
        assert_eq!(cfg.provider_url, "http://10.0.0.2:8545");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "contract_adress = \"typo\"\n").unwrap();
        assert!(matches!(
            FileConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
