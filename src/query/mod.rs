//! Query request types (noun module)
//!
//! `StatsRequest` is the raw inbound shape; `StatsQuery` is its typed form
//! consumed by the planner.

mod error;
mod request;
mod types;

pub use error::RequestError;
pub use request::{StatsRequest, DATE_FORMAT};
pub use types::{StatisticsFilter, SortSpec, StatsQuery};
