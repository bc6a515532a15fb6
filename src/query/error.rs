//! Request parsing errors

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum RequestError {
    /// A request parameter could not be parsed
    InvalidFilterValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl RequestError {
    pub fn invalid(field: &str, value: &str, reason: impl Into<String>) -> Self {
        RequestError::InvalidFilterValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvalidFilterValue { field, value, reason } => {
                write!(f, "Invalid value '{}' for '{}': {}", value, field, reason)
            }
        }
    }
}

impl std::error::Error for RequestError {}
