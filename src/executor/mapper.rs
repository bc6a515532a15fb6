//! Raw tuple to `StatRecord` mapping
//!
//! Cells are read by position. Both plan modes produce the same ten output
//! columns, so a single mapping serves both.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use crate::plan::QueryPlan;
use crate::planner::CPI_ALIAS;
use crate::record::StatRecord;
use crate::registry::Dimension;
use super::error::ExecuteError;
use super::store::RawRow;
use super::value::Value;

const DATE: usize = 0;
const CHANNEL: usize = 1;
const COUNTRY: usize = 2;
const OS: usize = 3;
const IMPRESSIONS: usize = 4;
const CLICKS: usize = 5;
const INSTALLS: usize = 6;
const SPEND: usize = 7;
const REVENUE: usize = 8;
const CPI: usize = 9;

/// Output column names in tuple order
const OUTPUT_COLUMNS: [&str; 10] = [
    "date",
    "channel",
    "country",
    "os",
    "impressions",
    "clicks",
    "installs",
    "spend",
    "revenue",
    CPI_ALIAS,
];

/// Map every tuple of a plan's result to a record.
///
/// Row-level results must carry every dimension. Aggregate results must
/// carry exactly the grouped dimensions and NULL elsewhere.
pub fn map_rows(plan: &QueryPlan, rows: Vec<RawRow>) -> Result<Vec<StatRecord>, ExecuteError> {
    if plan.output_columns() != OUTPUT_COLUMNS {
        return Err(ExecuteError::QueryExecutionFailed(format!(
            "unexpected result columns: {}",
            plan.output_columns().join(", ")
        )));
    }

    let real = plan.real_dimensions();
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| map_row(i, &row, &real))
        .collect()
}

fn map_row(index: usize, row: &[Value], real: &[Dimension]) -> Result<StatRecord, ExecuteError> {
    let cell = RowCells { index, row };
    if row.len() != CPI + 1 {
        return Err(cell.error("*", format!("expected {} cells, got {}", CPI + 1, row.len())));
    }

    for d in Dimension::ALL {
        let value = &row[d as usize];
        if real.contains(&d) {
            if value.is_null() {
                return Err(cell.error(d.name(), "grouped dimension is NULL"));
            }
        } else if !value.is_null() {
            return Err(cell.error(d.name(), "ungrouped dimension must be NULL"));
        }
    }

    Ok(StatRecord {
        date: cell.date(DATE)?,
        channel: cell.text(CHANNEL)?,
        country: cell.text(COUNTRY)?,
        os: cell.text(OS)?,
        impressions: cell.int(IMPRESSIONS)?,
        clicks: cell.int(CLICKS)?,
        installs: cell.int(INSTALLS)?,
        spend: cell.money(SPEND)?,
        revenue: cell.money(REVENUE)?,
        cpi: cell.ratio(CPI)?,
    })
}

struct RowCells<'a> {
    index: usize,
    row: &'a [Value],
}

impl RowCells<'_> {
    fn error(&self, column: &str, reason: impl Into<String>) -> ExecuteError {
        ExecuteError::RowMapping {
            row: self.index,
            column: column.to_string(),
            reason: reason.into(),
        }
    }

    fn name(pos: usize) -> &'static str {
        OUTPUT_COLUMNS[pos]
    }

    fn mismatch(&self, pos: usize, wanted: &str) -> ExecuteError {
        self.error(
            Self::name(pos),
            format!("expected {}, got {}", wanted, self.row[pos].type_name()),
        )
    }

    fn date(&self, pos: usize) -> Result<Option<NaiveDate>, ExecuteError> {
        match &self.row[pos] {
            Value::Null => Ok(None),
            Value::Date(d) => Ok(Some(*d)),
            _ => Err(self.mismatch(pos, "date")),
        }
    }

    fn text(&self, pos: usize) -> Result<Option<String>, ExecuteError> {
        match &self.row[pos] {
            Value::Null => Ok(None),
            Value::Text(s) => Ok(Some(s.clone())),
            _ => Err(self.mismatch(pos, "text")),
        }
    }

    fn int(&self, pos: usize) -> Result<i64, ExecuteError> {
        match &self.row[pos] {
            Value::Int(i) => Ok(*i),
            Value::Null => Err(self.error(Self::name(pos), "measure is NULL")),
            _ => Err(self.mismatch(pos, "integer")),
        }
    }

    fn money(&self, pos: usize) -> Result<Decimal, ExecuteError> {
        match &self.row[pos] {
            Value::Null => Err(self.error(Self::name(pos), "measure is NULL")),
            v => v.as_decimal().ok_or_else(|| self.mismatch(pos, "decimal")),
        }
    }

    fn ratio(&self, pos: usize) -> Result<Option<Decimal>, ExecuteError> {
        match &self.row[pos] {
            Value::Null => Ok(None),
            v => v.as_decimal().map(Some).ok_or_else(|| self.mismatch(pos, "decimal")),
        }
    }
}
