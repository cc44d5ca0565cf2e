//! Engine configuration
//!
//! [`RegistryConfig`] selects which optional operation sets are merged into
//! a registry at construction time. [`Config`] is the top-level file format
//! read by adapters.
//!
//! ```toml
//! [registry]
//! geometry = true
//! side_effects = false
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding [`RegistryConfig::geometry`]
pub const GEOMETRY_ENV: &str = "OVR_GEOMETRY";

/// Registry construction options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Merge the geometry operations (WKT, GeoJSON, centroid, country)
    pub geometry: bool,
    /// Run side-effect hooks (e.g. opening a browser) on forward application
    pub side_effects: bool,
}

impl RegistryConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With geometry operations
    #[inline]
    #[must_use]
    pub fn with_geometry(mut self, geometry: bool) -> Self {
        self.geometry = geometry;
        self
    }

    /// With side effects
    #[inline]
    #[must_use]
    pub fn with_side_effects(mut self, side_effects: bool) -> Self {
        self.side_effects = side_effects;
        self
    }

    /// Apply overrides from the process environment
    ///
    /// # Errors
    /// Returns [`ConfigError::Env`] if a variable has an unexpected value
    pub fn from_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(std::env::var(GEOMETRY_ENV).ok().as_deref())
    }

    fn with_overrides(mut self, geometry: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(value) = geometry {
            self.geometry = parse_flag(GEOMETRY_ENV, value)?;
        }
        Ok(self)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            geometry: true,
            side_effects: true,
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub registry: RegistryConfig,
}

impl Config {
    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] if the text is not a valid config
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if it is not a valid config
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "config loaded");
        Self::from_toml_str(&text)
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Env {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_enable_everything() {
        let config = RegistryConfig::default();
        assert!(config.geometry);
        assert!(config.side_effects);
    }

    #[test]
    fn builder_methods() {
        let config = RegistryConfig::new().with_geometry(false).with_side_effects(false);
        assert!(!config.geometry);
        assert!(!config.side_effects);
    }

    #[test]
    fn parse_partial_toml() {
        let config = Config::from_toml_str("[registry]\ngeometry = false\n").unwrap();
        assert!(!config.registry.geometry);
        assert!(config.registry.side_effects);

        let empty = Config::from_toml_str("").unwrap();
        assert_eq!(empty, Config::default());
    }

    #[test]
    fn parse_invalid_toml() {
        let err = Config::from_toml_str("[registry]\ngeometry = \"maybe\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[registry]\nside_effects = false").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert!(!config.registry.side_effects);

        let missing = Config::load("/nonexistent/ovr.toml").unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }

    #[test]
    fn overrides() {
        let config = RegistryConfig::default().with_overrides(Some("0")).unwrap();
        assert!(!config.geometry);
        let config = RegistryConfig::default().with_overrides(None).unwrap();
        assert!(config.geometry);
        assert!(RegistryConfig::default().with_overrides(Some("maybe")).is_err());
    }
}
