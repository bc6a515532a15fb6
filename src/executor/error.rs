//! Executor errors

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ExecuteError {
    /// No session could be acquired from the storage engine
    StorageUnavailable(String),
    /// The storage engine rejected or failed to run the query
    QueryExecutionFailed(String),
    /// A result tuple did not fit the output record
    RowMapping {
        row: usize,
        column: String,
        reason: String,
    },
}

impl fmt::Display for ExecuteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecuteError::StorageUnavailable(msg) => write!(f, "Storage unavailable: {}", msg),
            ExecuteError::QueryExecutionFailed(msg) => write!(f, "Query execution failed: {}", msg),
            ExecuteError::RowMapping { row, column, reason } => {
                write!(f, "Cannot map result row {} column '{}': {}", row, column, reason)
            }
        }
    }
}

impl std::error::Error for ExecuteError {}
