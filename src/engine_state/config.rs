//! World streaming configuration, loaded from JSON.
//!
//! Every field is optional in the file; missing fields take their defaults.
//!
//! ```json
//! { "draw_radius": 8, "seed": 42, "worker_count": 4 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{error::ConfigError, voxels::terrain::DEFAULT_WATER_LEVEL};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct WorldConfig {
    /// Chunks within this many columns of the viewer are meshed and drawn.
    pub draw_radius: i32,
    /// Terrain seed.
    pub seed: u32,
    /// Worker threads for generation and meshing; `None` uses every hardware thread.
    pub worker_count: Option<usize>,
    /// World height below which empty terrain fills with water.
    pub water_level: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            draw_radius: 16,
            seed: 1234,
            worker_count: None,
            water_level: DEFAULT_WATER_LEVEL,
        }
    }
}

impl WorldConfig {
    /// Chunks within this radius have their blocks generated, one ring beyond the
    /// draw radius so every drawn chunk has its neighbours.
    pub fn create_radius(&self) -> i32 {
        self.draw_radius + 1
    }

    /// Chunks beyond this radius are evicted.
    pub fn outer_radius(&self) -> i32 {
        self.create_radius() + 1
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.draw_radius < 0 {
            return Err(ConfigError::Invalid(format!(
                "draw_radius must not be negative, got {}",
                self.draw_radius
            )));
        }
        if self.worker_count == Some(0) {
            return Err(ConfigError::Invalid("worker_count must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = WorldConfig::from_json_str(r#"{ "draw_radius": 2 }"#).unwrap();
        assert_eq!(config.draw_radius, 2);
        assert_eq!(config.seed, 1234);
        assert_eq!(config.worker_count, None);
        assert_eq!(config.water_level, 219);
        assert_eq!(config.create_radius(), 3);
        assert_eq!(config.outer_radius(), 4);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            WorldConfig::from_json_str(r#"{ "draw_radius": -1 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            WorldConfig::from_json_str(r#"{ "worker_count": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(WorldConfig::from_json_str("{ draw"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let error = WorldConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(error.to_string().contains("/definitely/not/here.json"));
    }
}
