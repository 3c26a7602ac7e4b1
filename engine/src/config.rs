//! Configuration for the service endpoint.
//!
//! Loaded from `~/.labelens/config.toml`; the `LABELENS_API_URL` environment
//! variable overrides the file. Without either, the front end warns and every
//! request will fail to connect.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

/// Environment override for the service base URL.
pub const API_URL_ENV: &str = "LABELENS_API_URL";

#[derive(Debug, Default, Deserialize)]
pub struct LabelensConfig {
    pub api: Option<ApiSection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiSection {
    /// Base URL of the analysis service, e.g. `http://localhost:5000`.
    pub base_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid service URL {raw:?}: {source}")]
    InvalidUrl {
        raw: String,
        source: url::ParseError,
    },
}

impl LabelensConfig {
    /// Load the config file if one exists. `Ok(None)` when there is no file
    /// or no home directory to look in.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = Self::path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".labelens").join("config.toml"))
    }

    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.api.as_ref().and_then(|api| api.base_url.as_deref())
    }
}

/// Resolve the service base URL: environment override first, then the config
/// file. `Ok(None)` when neither names one.
pub fn resolve_base_url(config: Option<&LabelensConfig>) -> Result<Option<Url>, ConfigError> {
    let raw = match std::env::var(API_URL_ENV) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => config
            .and_then(LabelensConfig::base_url)
            .map(ToString::to_string),
    };

    match raw {
        Some(raw) => {
            let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl {
                raw: raw.clone(),
                source,
            })?;
            Ok(Some(url))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::LabelensConfig;
    use std::io::Write as _;

    #[test]
    fn parses_api_section() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).expect("create config");
        writeln!(file, "[api]\nbase_url = \"http://localhost:5000\"").expect("write config");

        let config = LabelensConfig::load_from(&path).expect("config parses");
        assert_eq!(config.base_url(), Some("http://localhost:5000"));
    }

    #[test]
    fn missing_section_means_no_url() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").expect("write config");

        let config = LabelensConfig::load_from(&path).expect("config parses");
        assert_eq!(config.base_url(), None);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbase_url").expect("write config");

        assert!(LabelensConfig::load_from(&path).is_err());
    }
}
