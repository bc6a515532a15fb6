//! SQL emitter (verb module)
//!
//! Transforms a QueryPlan into SQL text for SQL-speaking storage engines.

mod error;
mod sql;

pub use error::EmitError;
pub use sql::emit_sql;
