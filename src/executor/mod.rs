//! Plan execution (verb module)
//!
//! Runs a `QueryPlan` against a storage engine and maps the raw tuples to
//! `StatRecord`s. `StatsStore` is the engine seam; `MemoryStore` is the
//! bundled in-process engine.

mod error;
mod eval;
mod mapper;
mod memory;
mod store;
mod value;

pub use error::ExecuteError;
pub use mapper::map_rows;
pub use memory::MemoryStore;
pub use store::{execute_plan, RawRow, StatsSession, StatsStore};
pub use value::Value;
