//! Query planner (verb module)
//!
//! Transforms filters, group-by names and a sort field into a `QueryPlan`.

mod build;
mod error;

pub use build::{build_query, plan_stats_query, CPI_ALIAS};
pub use error::{PlanError, Clause};
