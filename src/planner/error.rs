//! Planner errors

use std::fmt;
use crate::registry::RegistryError;

/// Which part of the request named a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    GroupBy,
    Sort,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::GroupBy => write!(f, "groupby"),
            Clause::Sort => write!(f, "sort"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlanError {
    /// A sort or group-by name did not resolve against the registry
    UnknownField {
        clause: Clause,
        source: RegistryError,
    },
}

impl PlanError {
    pub fn unknown_field(clause: Clause, source: RegistryError) -> Self {
        PlanError::UnknownField { clause, source }
    }

    /// The offending name
    pub fn field(&self) -> &str {
        match self {
            PlanError::UnknownField { source, .. } => match source {
                RegistryError::NotFound(name) | RegistryError::NotADimension(name) => name,
            },
        }
    }
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::UnknownField { clause, source } => {
                write!(f, "Unknown field in {}: {}", clause, source)
            }
        }
    }
}

impl std::error::Error for PlanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlanError::UnknownField { source, .. } => Some(source),
        }
    }
}
