//! Statistics service
//!
//! Ties request parsing, planning and execution together behind one entry
//! point per request.

use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};
use crate::emitter::{emit_sql, EmitError};
use crate::executor::{execute_plan, ExecuteError, StatsStore};
use crate::planner::{plan_stats_query, PlanError};
use crate::query::{RequestError, StatsQuery, StatsRequest};
use crate::record::StatRecord;
use crate::registry::Registry;

/// Any failure on the way from request to records
#[derive(Debug)]
pub enum StatsError {
    Request(RequestError),
    Plan(PlanError),
    Emit(EmitError),
    Execute(ExecuteError),
}

impl StatsError {
    /// True when the caller sent something invalid, false for backend faults
    pub fn is_client_error(&self) -> bool {
        matches!(self, StatsError::Request(_) | StatsError::Plan(_))
    }
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsError::Request(e) => write!(f, "{}", e),
            StatsError::Plan(e) => write!(f, "{}", e),
            StatsError::Emit(e) => write!(f, "{}", e),
            StatsError::Execute(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for StatsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StatsError::Request(e) => Some(e),
            StatsError::Plan(e) => Some(e),
            StatsError::Emit(e) => Some(e),
            StatsError::Execute(e) => Some(e),
        }
    }
}

impl From<RequestError> for StatsError {
    fn from(e: RequestError) -> Self {
        StatsError::Request(e)
    }
}

impl From<PlanError> for StatsError {
    fn from(e: PlanError) -> Self {
        StatsError::Plan(e)
    }
}

impl From<EmitError> for StatsError {
    fn from(e: EmitError) -> Self {
        StatsError::Emit(e)
    }
}

impl From<ExecuteError> for StatsError {
    fn from(e: ExecuteError) -> Self {
        StatsError::Execute(e)
    }
}

/// Answers statistics requests against one registry and one store
pub struct StatsService<S> {
    registry: Arc<Registry>,
    store: S,
}

impl<S: StatsStore> StatsService<S> {
    pub fn new(registry: impl Into<Arc<Registry>>, store: S) -> Self {
        Self { registry: registry.into(), store }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Parse, plan and run a raw request
    pub fn query(&self, request: &StatsRequest) -> Result<Vec<StatRecord>, StatsError> {
        let query = request.parse()?;
        self.run(&query)
    }

    /// Plan and run an already parsed query
    pub fn run(&self, query: &StatsQuery) -> Result<Vec<StatRecord>, StatsError> {
        let plan = plan_stats_query(&self.registry, query)?;
        debug!(table = %plan.table(), "running statistics query");
        let records = execute_plan(&self.store, &plan)?;
        info!(
            mode = ?plan.mode(),
            group_by = ?query.group_by,
            records = records.len(),
            "statistics query completed"
        );
        Ok(records)
    }

    /// SQL text the request would run on a SQL-speaking store
    pub fn explain(&self, request: &StatsRequest) -> Result<String, StatsError> {
        let query = request.parse()?;
        let plan = plan_stats_query(&self.registry, &query)?;
        Ok(emit_sql(&plan)?)
    }
}
