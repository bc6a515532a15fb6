//! Dimension/measure registry (noun module)
//!
//! Single source of truth for logical field names, their physical columns and
//! the canonical dimension order.

mod catalog;
mod error;
mod field;
mod types;

pub use catalog::{ColumnRef, FieldConfig, Registry, RegistryConfig, DEFAULT_TABLE, MONEY_TYPE};
pub use error::RegistryError;
pub use field::{Dimension, Field, Measure, UnknownFieldName};
pub use types::{DataType, ParseDataTypeError};
