//! In-memory storage engine
//!
//! Holds the fact table as tuples keyed by physical column name and runs
//! `QueryPlan`s directly: filter, group, project, order.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};
use tracing::{debug, warn};
use crate::plan::{QueryPlan, SortDirection, SortKey};
use crate::record::CampaignStat;
use crate::registry::{Dimension, Measure, Registry};
use super::error::ExecuteError;
use super::eval::{eval, is_true, Layout, Scope};
use super::store::{RawRow, StatsSession, StatsStore};
use super::value::Value;

/// An in-process fact table
#[derive(Debug)]
pub struct MemoryStore {
    table: String,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    open_sessions: AtomicUsize,
    available: AtomicBool,
}

impl MemoryStore {
    /// Empty table with the given physical columns
    pub fn new(table: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            table: table.into(),
            columns,
            rows: Vec::new(),
            open_sessions: AtomicUsize::new(0),
            available: AtomicBool::new(true),
        }
    }

    /// Table laid out as the registry describes, filled with `stats`
    pub fn from_stats(registry: &Registry, stats: &[CampaignStat]) -> Self {
        let columns = registry.columns().map(|c| c.column.clone()).collect();
        let mut store = Self::new(registry.table(), columns);
        store.rows = stats.iter().map(stat_to_row).collect();
        store
    }

    /// Append a raw tuple in column order
    pub fn insert_row(&mut self, row: Vec<Value>) -> Result<(), ExecuteError> {
        if row.len() != self.columns.len() {
            return Err(ExecuteError::QueryExecutionFailed(format!(
                "INSERT has {} values but table '{}' has {} columns",
                row.len(),
                self.table,
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sessions currently held by callers
    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(AtomicOrdering::SeqCst)
    }

    /// Simulate the backend going away or coming back
    pub fn set_available(&self, available: bool) {
        self.available.store(available, AtomicOrdering::SeqCst);
    }

    fn run(&self, plan: &QueryPlan) -> Result<Vec<RawRow>, ExecuteError> {
        if plan.table() != self.table {
            return Err(ExecuteError::QueryExecutionFailed(format!(
                "relation '{}' does not exist",
                plan.table()
            )));
        }

        let layout = Layout::new(&self.table, &self.columns);

        let mut matching: Vec<&[Value]> = Vec::new();
        for row in &self.rows {
            let keep = match plan.filter() {
                Some(predicate) => is_true(&eval(predicate, &layout, &Scope::Row(row))?),
                None => true,
            };
            if keep {
                matching.push(row);
            }
        }

        let mut output = match plan {
            QueryPlan::RowLevel(_) => matching
                .iter()
                .map(|row| project(plan, &layout, &Scope::Row(row)))
                .collect::<Result<Vec<_>, _>>()?,
            QueryPlan::Aggregate(_) => {
                let groups = group_rows(plan, &layout, &matching)?;
                groups
                    .iter()
                    .map(|rows| project(plan, &layout, &Scope::Group(rows)))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        if let Some(key) = plan.sort() {
            sort_rows(plan, key, &mut output)?;
        }

        debug!(
            table = %self.table,
            scanned = self.rows.len(),
            matched = matching.len(),
            returned = output.len(),
            "memory store executed plan"
        );
        Ok(output)
    }
}

impl StatsStore for MemoryStore {
    fn session(&self) -> Result<Box<dyn StatsSession + '_>, ExecuteError> {
        if !self.available.load(AtomicOrdering::SeqCst) {
            warn!(table = %self.table, "memory store is unavailable");
            return Err(ExecuteError::StorageUnavailable(format!(
                "store for '{}' is not accepting sessions",
                self.table
            )));
        }
        self.open_sessions.fetch_add(1, AtomicOrdering::SeqCst);
        Ok(Box::new(MemorySession { store: self }))
    }
}

struct MemorySession<'a> {
    store: &'a MemoryStore,
}

impl StatsSession for MemorySession<'_> {
    fn execute(&mut self, plan: &QueryPlan) -> Result<Vec<RawRow>, ExecuteError> {
        self.store.run(plan)
    }
}

impl Drop for MemorySession<'_> {
    fn drop(&mut self) {
        self.store.open_sessions.fetch_sub(1, AtomicOrdering::SeqCst);
    }
}

fn stat_to_row(stat: &CampaignStat) -> Vec<Value> {
    let mut row: Vec<Value> = Dimension::ALL
        .iter()
        .map(|d| match d {
            Dimension::Date => Value::Date(stat.date),
            Dimension::Channel => Value::from(stat.channel.as_str()),
            Dimension::Country => Value::from(stat.country.as_str()),
            Dimension::Os => Value::from(stat.os.as_str()),
        })
        .collect();
    row.extend(Measure::ALL.iter().map(|m| match m {
        Measure::Impressions => Value::Int(stat.impressions),
        Measure::Clicks => Value::Int(stat.clicks),
        Measure::Installs => Value::Int(stat.installs),
        Measure::Spend => Value::Decimal(stat.spend),
        Measure::Revenue => Value::Decimal(stat.revenue),
    }));
    row
}

fn project(plan: &QueryPlan, layout: &Layout<'_>, scope: &Scope<'_>) -> Result<RawRow, ExecuteError> {
    plan.projection()
        .iter()
        .map(|p| eval(&p.expr, layout, scope))
        .collect()
}

/// Partition rows by their GROUP BY values, in order of first appearance
fn group_rows<'r>(
    plan: &QueryPlan,
    layout: &Layout<'_>,
    rows: &[&'r [Value]],
) -> Result<Vec<Vec<&'r [Value]>>, ExecuteError> {
    let keys: Vec<usize> = plan.group_by()
        .iter()
        .map(|c| layout.position(c))
        .collect::<Result<_, _>>()?;

    let mut index: HashMap<Vec<Value>, usize> = HashMap::new();
    let mut groups: Vec<Vec<&'r [Value]>> = Vec::new();
    for row in rows {
        let key: Vec<Value> = keys.iter().map(|&k| row[k].clone()).collect();
        match index.get(&key) {
            Some(&g) => groups[g].push(*row),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![*row]);
            }
        }
    }
    Ok(groups)
}

/// Stable sort on an output column. NULLs sort last ascending and first
/// descending.
fn sort_rows(plan: &QueryPlan, key: &SortKey, rows: &mut [RawRow]) -> Result<(), ExecuteError> {
    let pos = plan.output_columns()
        .iter()
        .position(|c| *c == key.column)
        .ok_or_else(|| {
            ExecuteError::QueryExecutionFailed(format!("ORDER BY column '{}' is not in the output", key.column))
        })?;

    rows.sort_by(|a, b| {
        let ord = match (&a[pos], &b[pos]) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Greater,
            (_, Value::Null) => Ordering::Less,
            (x, y) => x.partial_cmp_sql(y).unwrap_or(Ordering::Equal),
        };
        match key.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    Ok(())
}
