//! Error types for adstats

use std::fmt;

/// Errors that can occur while loading a registry configuration
#[derive(Debug)]
pub enum ParseError {
    /// IO error reading file
    Io {
        path: String,
        source: std::io::Error,
    },
    /// YAML deserialization error
    Yaml {
        source: serde_yaml::Error,
    },
    /// Well-formed YAML describing an unusable registry
    Invalid {
        message: String,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Io { path, source } => {
                write!(f, "Failed to read '{}': {}", path, source)
            }
            ParseError::Yaml { source } => {
                write!(f, "Invalid YAML: {}", source)
            }
            ParseError::Invalid { message } => {
                write!(f, "Invalid registry: {}", message)
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io { source, .. } => Some(source),
            ParseError::Yaml { source } => Some(source),
            ParseError::Invalid { .. } => None,
        }
    }
}

impl From<serde_yaml::Error> for ParseError {
    fn from(err: serde_yaml::Error) -> Self {
        ParseError::Yaml { source: err }
    }
}
