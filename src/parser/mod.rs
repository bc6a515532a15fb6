//! Registry parser (verb module)
//!
//! Transforms YAML registry configuration into a `Registry`.

use std::path::Path;
use crate::error::ParseError;
use crate::registry::{Registry, RegistryConfig};

/// Parse a registry from a YAML file
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Registry, ParseError> {
    let path_str = path.as_ref().display().to_string();
    let contents = std::fs::read_to_string(&path).map_err(|e| ParseError::Io {
        path: path_str,
        source: e,
    })?;
    parse_str(&contents)
}

/// Parse a registry from a YAML string
pub fn parse_str(yaml: &str) -> Result<Registry, ParseError> {
    let config: RegistryConfig = serde_yaml::from_str(yaml)?;
    Registry::from_config(config)
}
