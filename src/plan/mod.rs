//! Query plan types (noun module)
//!
//! A `QueryPlan` fully describes projection, filters, grouping and ordering of
//! one statistics query. Building it never touches storage.

mod expr;
mod query;

pub use expr::{Expr, Column, Literal, BinaryOperator};
pub use query::{QueryPlan, QueryMode, RowLevelPlan, AggregatePlan, ProjectExpr, SortKey, SortDirection, ParseSortDirectionError};
