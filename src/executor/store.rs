//! Storage engine seam

use tracing::debug;
use crate::plan::QueryPlan;
use crate::record::StatRecord;
use super::error::ExecuteError;
use super::mapper::map_rows;
use super::value::Value;

/// One result tuple, cells in projection order
pub type RawRow = Vec<Value>;

/// A connection-scoped handle on the storage engine.
///
/// Dropping the session releases it.
pub trait StatsSession {
    /// Run a plan and return its tuples in projection order
    fn execute(&mut self, plan: &QueryPlan) -> Result<Vec<RawRow>, ExecuteError>;
}

/// A storage engine able to run statistics plans
pub trait StatsStore {
    /// Acquire a session for the duration of one query
    fn session(&self) -> Result<Box<dyn StatsSession + '_>, ExecuteError>;
}

/// Run a plan in a fresh session and map its tuples to output records.
///
/// The session lives only for this call. Any failure yields no records.
pub fn execute_plan<S>(store: &S, plan: &QueryPlan) -> Result<Vec<StatRecord>, ExecuteError>
where
    S: StatsStore + ?Sized,
{
    let rows = {
        let mut session = store.session()?;
        session.execute(plan)?
    };
    debug!(rows = rows.len(), mode = ?plan.mode(), "plan executed");
    map_rows(plan, rows)
}
