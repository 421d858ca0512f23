//! `tilekit.toml` settings
//!
//! ```toml
//! scale_factor = 4.0
//!
//! [schema.classes.tree]
//! properties = [
//!   { name = "breakable", type = "bool", required = true },
//! ]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tilekit_schema::{validate_schema, PropertySchema, SchemaError};
use tracing::debug;

/// Config file looked up in the working directory when none is given
pub const CONFIG_FILE: &str = "tilekit.toml";

/// Factor applied to hitboxes when the config does not set one
pub const DEFAULT_SCALE_FACTOR: f32 = 4.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("scale_factor must be positive, got {0}")]
    InvalidScale(f32),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Tool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Multiplier for object hitboxes (the game draws sprites at 4x)
    pub scale_factor: f32,
    /// Wang set used when a command does not name one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wangset: Option<String>,
    /// Expected properties per tile class
    pub schema: PropertySchema,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            wangset: None,
            schema: PropertySchema::builtin(),
        }
    }
}

impl Config {
    /// Parse and check a config from TOML text
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content, path)?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, else `tilekit.toml` in `dir` when present, else defaults
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let default_path = dir.join(CONFIG_FILE);
        if default_path.is_file() {
            Self::load(&default_path)
        } else {
            debug!("no {} found, using defaults", CONFIG_FILE);
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_scale(self.scale_factor)?;
        validate_schema(&self.schema)?;
        Ok(())
    }

    /// The scale to use: `requested` when given, else the configured one
    pub fn scale(&self, requested: Option<f32>) -> Result<f32, ConfigError> {
        match requested {
            Some(scale) => check_scale(scale),
            None => Ok(self.scale_factor),
        }
    }
}

fn check_scale(scale: f32) -> Result<f32, ConfigError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(ConfigError::InvalidScale(scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilekit_schema::PropType;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.scale_factor, 4.0);
        assert!(config.schema.get_class("tree").is_some());
        assert!(config.validate().is_ok());

        let parsed = Config::from_toml("", Path::new("empty.toml")).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_parse_full_config() {
        let content = r#"
scale_factor = 2.5
wangset = "Unbenannter Satz"

[schema.classes.rock]
properties = [
  { name = "hardness", type = "int", required = true, min = 1, max = 3 },
]
"#;
        let config = Config::from_toml(content, Path::new("tilekit.toml")).unwrap();
        assert_eq!(config.scale_factor, 2.5);
        assert_eq!(config.wangset.as_deref(), Some("Unbenannter Satz"));

        let rock = config.schema.get_class("rock").unwrap();
        assert_eq!(rock.properties[0].prop_type, PropType::Int);
        assert_eq!(rock.properties[0].max, Some(3.0));
        // An explicit schema replaces the built-in one
        assert!(config.schema.get_class("tree").is_none());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Config::from_toml("scale_factor = 0.0", Path::new("x.toml")),
            Err(ConfigError::InvalidScale(_))
        ));
        assert!(matches!(
            Config::from_toml("scale_factor = \"big\"", Path::new("x.toml")),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            Config::from_toml(
                "[schema.classes.x]\nproperties = [{ name = \"k\", type = \"enum\" }]",
                Path::new("x.toml")
            ),
            Err(ConfigError::Schema(_))
        ));
    }

    #[test]
    fn test_scale_override() {
        let config = Config::default();
        assert_eq!(config.scale(None).unwrap(), DEFAULT_SCALE_FACTOR);
        assert_eq!(config.scale(Some(2.0)).unwrap(), 2.0);
        for bad in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(config.scale(Some(bad)), Err(ConfigError::InvalidScale(_))));
        }
    }

    #[test]
    fn test_discover() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::discover(None, dir.path()).unwrap(), Config::default());

        std::fs::write(dir.path().join(CONFIG_FILE), "scale_factor = 3.0").unwrap();
        assert_eq!(Config::discover(None, dir.path()).unwrap().scale_factor, 3.0);

        let other = dir.path().join("other.toml");
        std::fs::write(&other, "scale_factor = 1.0").unwrap();
        assert_eq!(
            Config::discover(Some(&other), dir.path()).unwrap().scale_factor,
            1.0
        );

        assert!(matches!(
            Config::discover(Some(&dir.path().join("missing.toml")), dir.path()),
            Err(ConfigError::Io { .. })
        ));
    }
}
