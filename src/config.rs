//! Graph configuration
//!
//! Sizes of the best-effort caches and the isomorphism refinement depth.
//! Loadable from YAML or JSON; every field has a default.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Capacity of the process-wide URI node cache (0 disables)
    pub node_cache_capacity: usize,
    /// Slots in the process-wide triple cache (0 disables)
    pub triple_cache_slots: usize,
    /// Slots in each graph's point-lookup cache (0 disables)
    pub lookup_cache_slots: usize,
    /// Hash refinement rounds the isomorphism engine runs before guessing
    pub max_hash_depth: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            node_cache_capacity: 5000,
            triple_cache_slots: 1000,
            lookup_cache_slots: 256,
            max_hash_depth: 3,
        }
    }
}

impl GraphConfig {
    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            other => Err(ConfigError::Invalid(format!(
                "unsupported config file extension: {:?}",
                other
            ))),
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_hash_depth == 0 {
            return Err(ConfigError::Invalid("max_hash_depth must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = GraphConfig::default();
        assert_eq!(config.node_cache_capacity, 5000);
        assert_eq!(config.max_hash_depth, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = GraphConfig::from_yaml_str("lookup_cache_slots: 0\nmax_hash_depth: 5\n").unwrap();
        assert_eq!(config.lookup_cache_slots, 0);
        assert_eq!(config.max_hash_depth, 5);
        assert_eq!(config.triple_cache_slots, 1000);
    }

    #[test]
    fn test_json_and_validation() {
        let config = GraphConfig::from_json_str(r#"{"node_cache_capacity": 10}"#).unwrap();
        assert_eq!(config.node_cache_capacity, 10);

        let err = GraphConfig::from_json_str(r#"{"max_hash_depth": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(matches!(
            GraphConfig::from_yaml_str("max_hash_depth: [1"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "triple_cache_slots: 64").unwrap();
        assert_eq!(GraphConfig::from_file(&path).unwrap().triple_cache_slots, 64);

        let other = dir.path().join("graph.toml");
        std::fs::write(&other, "").unwrap();
        assert!(matches!(GraphConfig::from_file(&other), Err(ConfigError::Invalid(_))));
        assert!(matches!(
            GraphConfig::from_file(dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
