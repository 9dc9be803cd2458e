//! # Runtime Configuration Module
//!
//! Router defaults loaded from environment variables and/or a YAML file.
//!
//! ## Environment Variables
//!
//! ### `QUICKROUTER_ROOT`
//!
//! Root prefix the router answers for. Default: `/`.
//!
//! ### `QUICKROUTER_ALWAYS_JSON`
//!
//! Force every handler result through JSON serialization. Accepts `true`/`false`/`1`/`0`.
//! Default: `false`.
//!
//! ## YAML File
//!
//! ```yaml
//! router:
//!   root: /Api
//!   always_json: true
//! ```
//!
//! Environment variables override values read from the file when both are used
//! ([`RouterConfig::merge_env`]).

use crate::error::RouterError;
use serde::Deserialize;
use std::env;
use std::path::Path;

/// Router configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterConfig {
    /// Root prefix all routes are relative to
    pub root: String,
    /// Router-wide JSON output policy
    pub always_json: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            root: "/".to_string(),
            always_json: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    router: RouterConfig,
}

impl RouterConfig {
    /// Load configuration from environment variables, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Fails when `QUICKROUTER_ALWAYS_JSON` is set to something that is not a boolean.
    pub fn from_env() -> Result<Self, RouterError> {
        Self::default().merge_env()
    }

    /// Parse the `router` section of a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Config`] for malformed YAML or unknown keys.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RouterError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let file: ConfigFile =
            serde_yaml::from_str(yaml).map_err(|e| RouterError::Config(e.to_string()))?;
        Ok(file.router)
    }

    /// Read and parse a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Config`] when the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, RouterError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RouterError::Config(format!("{}: {e}", path.display())))?;
        Self::from_yaml_str(&content)
    }

    /// Overlay environment variables on top of `self`.
    ///
    /// # Errors
    ///
    /// Fails when `QUICKROUTER_ALWAYS_JSON` is not a boolean.
    pub fn merge_env(mut self) -> Result<Self, RouterError> {
        if let Ok(root) = env::var("QUICKROUTER_ROOT") {
            self.root = root;
        }
        if let Ok(raw) = env::var("QUICKROUTER_ALWAYS_JSON") {
            self.always_json = parse_bool(&raw).ok_or_else(|| {
                RouterError::Config(format!("QUICKROUTER_ALWAYS_JSON: expected a boolean, got {raw:?}"))
            })?;
        }
        Ok(self)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RouterConfig::default();
        assert_eq!(config.root, "/");
        assert!(!config.always_json);
    }

    #[test]
    fn test_yaml_config() {
        let config = RouterConfig::from_yaml_str("router:\n  root: /Api\n  always_json: true\n")
            .unwrap();
        assert_eq!(config.root, "/Api");
        assert!(config.always_json);
    }

    #[test]
    fn test_yaml_partial_config_uses_defaults() {
        let config = RouterConfig::from_yaml_str("router:\n  always_json: true\n").unwrap();
        assert_eq!(config.root, "/");
        assert!(config.always_json);
        assert_eq!(RouterConfig::from_yaml_str("").unwrap(), RouterConfig::default());
    }

    #[test]
    fn test_yaml_unknown_key_rejected() {
        let err = RouterConfig::from_yaml_str("router:\n  prefix: /Api\n").unwrap_err();
        assert!(matches!(err, RouterError::Config(_)));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
