//! Configuration system
//!
//! File-backed configuration in TOML or RON, selected by extension. The
//! viewer ships defaults that work without any config file present.

use std::path::PathBuf;

pub use serde::{Deserialize, Serialize};

/// Configuration trait for file-backed settings types
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Viewer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Directory scanned for model files
    pub models_dir: PathBuf,
    /// World Y coordinate of the floor plane
    pub floor_level: f32,
    /// Whether the per-tick animation pass runs
    pub animation_enabled: bool,
    /// Whether the per-tick physics pass runs
    pub physics_enabled: bool,
    /// Seconds a scene generation request may take before timing out
    pub generate_timeout_secs: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("models"),
            floor_level: -2.0,
            animation_enabled: true,
            physics_enabled: true,
            generate_timeout_secs: 30,
        }
    }
}

impl Config for ViewerConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_relative_eq!(config.floor_level, -2.0);
        assert!(config.animation_enabled);
        assert!(config.physics_enabled);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ViewerConfig = toml::from_str("floor_level = 0.0").unwrap();
        assert_relative_eq!(config.floor_level, 0.0);
        assert_eq!(config.models_dir, PathBuf::from("models"));
        assert!(config.physics_enabled);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = std::env::temp_dir().join("sceneview_config_test.toml");
        let path_str = path.to_str().unwrap();

        let config = ViewerConfig {
            floor_level: 1.5,
            physics_enabled: false,
            ..Default::default()
        };
        config.save_to_file(path_str).unwrap();

        let loaded = ViewerConfig::load_from_file(path_str).unwrap();
        assert_relative_eq!(loaded.floor_level, 1.5);
        assert!(!loaded.physics_enabled);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_unsupported_extension() {
        let config = ViewerConfig::default();
        let err = config.save_to_file("config.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }
}
