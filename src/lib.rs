//! adstats - Campaign statistics query builder
//!
//! This library provides:
//! - A field registry mapping logical names to physical columns
//! - Registry parsing from YAML
//! - Request parsing (filters, group-by, sort)
//! - Row-level and aggregate query planning with a uniform output schema
//! - SQL emission
//! - Plan execution against a pluggable storage engine
//!
//! # Architecture
//!
//! **Noun modules** (data structures):
//! - `registry/` - dimensions, measures and their physical columns
//! - `query/` - request types (StatsRequest, StatsQuery, StatisticsFilter)
//! - `plan/` - logical plan types (QueryPlan, Expr, Column)
//! - `record` - fact rows and output records
//!
//! **Verb modules** (transformations):
//! - `parser/` - YAML → Registry
//! - `planner/` - Registry + StatsQuery → QueryPlan
//! - `emitter/` - QueryPlan → SQL
//! - `executor/` - QueryPlan + StatsStore → StatRecords
//! - `service` - StatsRequest → StatRecords
//!
//! # Example
//!
//! ```ignore
//! use adstats::{parser, MemoryStore, StatsRequest, StatsService};
//!
//! let registry = parser::parse_file("registry.yaml")?;
//! let store = MemoryStore::from_stats(&registry, &stats);
//! let service = StatsService::new(registry, store);
//! let request = StatsRequest { groupby: Some(vec!["channel".into()]), ..Default::default() };
//! let records = service.query(&request)?;
//! ```

pub mod registry;
pub mod query;
pub mod plan;
pub mod planner;
pub mod emitter;
pub mod executor;
pub mod record;
pub mod service;
pub mod parser;
pub mod error;

// Re-export commonly used types
pub use registry::{Registry, RegistryError, Dimension, Measure, Field, DataType};
pub use query::{StatsRequest, StatsQuery, StatisticsFilter, SortSpec, RequestError};
pub use plan::{QueryPlan, QueryMode, Expr, Column, SortDirection};
pub use planner::{build_query, plan_stats_query, PlanError};
pub use emitter::{emit_sql, EmitError};
pub use executor::{execute_plan, ExecuteError, MemoryStore, StatsSession, StatsStore};
pub use record::{CampaignStat, StatRecord};
pub use service::{StatsError, StatsService};
pub use error::ParseError;
