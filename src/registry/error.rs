//! Registry lookup errors

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// Name is not a known dimension, measure or derived field
    NotFound(String),
    /// Name is known but does not denote a dimension
    NotADimension(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::NotFound(name) => write!(f, "Field '{}' not found", name),
            RegistryError::NotADimension(name) => {
                write!(f, "Field '{}' is not a dimension (expected one of date, channel, country, os)", name)
            }
        }
    }
}

impl std::error::Error for RegistryError {}
