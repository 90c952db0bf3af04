//! Service location and request settings.
//!
//! Values are layered: command-line flag, then environment variable, then the
//! TOML config file, then the built-in default.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub const BACKEND_URL_ENV: &str = "PDFDECK_BACKEND_URL";
pub const TIMEOUT_ENV: &str = "PDFDECK_TIMEOUT";

/// Resolved settings for talking to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL for both endpoints and for every server-relative asset path.
    pub backend_url: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// One optional layer of settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Layer {
    #[serde(default)]
    pub backend_url: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Layer {
    /// Read the `PDFDECK_*` environment variables. Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self {
            backend_url: std::env::var(BACKEND_URL_ENV).ok(),
            request_timeout_secs: std::env::var(TIMEOUT_ENV)
                .ok()
                .and_then(|v| v.trim().parse().ok()),
        }
    }

    /// Load a TOML config file. A file that does not exist yields `None`.
    pub fn from_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        let layer = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        log::debug!("loaded config from {}", path.display());
        Ok(Some(layer))
    }
}

impl Config {
    /// Merge layers, highest precedence first. Blank URLs and zero timeouts
    /// do not count as set.
    pub fn resolve(layers: &[Layer]) -> Self {
        let defaults = Self::default();
        let backend_url = layers
            .iter()
            .filter_map(|l| l.backend_url.as_deref())
            .map(str::trim)
            .find(|url| !url.is_empty())
            .map(str::to_string)
            .unwrap_or(defaults.backend_url);
        let request_timeout_secs = layers
            .iter()
            .filter_map(|l| l.request_timeout_secs)
            .find(|&secs| secs > 0)
            .unwrap_or(defaults.request_timeout_secs);
        Self {
            backend_url,
            request_timeout_secs,
        }
    }

    /// Resolve `cli` over the environment over the config file at
    /// `config_path` (or the default location) over the defaults.
    pub fn load(cli: Layer, config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = config_path.map(Path::to_path_buf).or_else(default_config_path);
        let file = match path {
            Some(path) => Layer::from_file(&path)?,
            None => None,
        };
        let mut layers = vec![cli, Layer::from_env()];
        layers.extend(file);
        Ok(Self::resolve(&layers))
    }
}

/// `$XDG_CONFIG_HOME/pdfdeck/config.toml` or the platform equivalent.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pdfdeck").join("config.toml"))
}
