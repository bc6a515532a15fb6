//! The two query plan shapes: row-level projection and aligned aggregate

use std::fmt;
use std::str::FromStr;
use crate::registry::Dimension;
use super::expr::{Column, Expr};

/// Which shape a plan has
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// One output row per stored record
    RowLevel,
    /// One output row per distinct combination of the grouped dimensions
    Aggregate,
}

/// An executable description of one statistics query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryPlan {
    RowLevel(RowLevelPlan),
    Aggregate(AggregatePlan),
}

/// Plain projection of stored records
#[derive(Debug, Clone, PartialEq)]
pub struct RowLevelPlan {
    /// Fact table
    pub table: String,
    /// Output columns: four dimensions, five measures, cpi
    pub projection: Vec<ProjectExpr>,
    /// WHERE predicate
    pub filter: Option<Expr>,
    pub sort: Option<SortKey>,
}

/// Grouped roll-up with null-aligned dimension columns
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatePlan {
    /// Fact table
    pub table: String,
    /// Output columns: four dimensions (real or typed NULL), five sums, cpi
    pub projection: Vec<ProjectExpr>,
    /// WHERE predicate, applied before grouping
    pub filter: Option<Expr>,
    /// GROUP BY columns, canonical order
    pub group_by: Vec<Column>,
    /// Dimensions behind `group_by`, same order
    pub grouped: Vec<Dimension>,
    pub sort: Option<SortKey>,
}

/// A projected expression with its output alias
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectExpr {
    /// The expression to compute
    pub expr: Expr,
    /// Output column name
    pub alias: String,
}

impl ProjectExpr {
    pub fn new(expr: Expr, alias: impl Into<String>) -> Self {
        Self {
            expr,
            alias: alias.into(),
        }
    }
}

/// A sort key with direction
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    /// Output column alias to sort by
    pub column: String,
    /// Sort direction
    pub direction: SortDirection,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "asc"),
            SortDirection::Descending => write!(f, "desc"),
        }
    }
}

/// Error when parsing a sort direction string
#[derive(Debug, Clone)]
pub struct ParseSortDirectionError {
    pub input: String,
}

impl fmt::Display for ParseSortDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown sort direction '{}'. Valid options: asc, desc", self.input)
    }
}

impl std::error::Error for ParseSortDirectionError {}

impl FromStr for SortDirection {
    type Err = ParseSortDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(ParseSortDirectionError { input: s.to_string() }),
        }
    }
}

impl QueryPlan {
    pub fn mode(&self) -> QueryMode {
        match self {
            QueryPlan::RowLevel(_) => QueryMode::RowLevel,
            QueryPlan::Aggregate(_) => QueryMode::Aggregate,
        }
    }

    pub fn table(&self) -> &str {
        match self {
            QueryPlan::RowLevel(p) => &p.table,
            QueryPlan::Aggregate(p) => &p.table,
        }
    }

    pub fn projection(&self) -> &[ProjectExpr] {
        match self {
            QueryPlan::RowLevel(p) => &p.projection,
            QueryPlan::Aggregate(p) => &p.projection,
        }
    }

    pub fn filter(&self) -> Option<&Expr> {
        match self {
            QueryPlan::RowLevel(p) => p.filter.as_ref(),
            QueryPlan::Aggregate(p) => p.filter.as_ref(),
        }
    }

    pub fn sort(&self) -> Option<&SortKey> {
        match self {
            QueryPlan::RowLevel(p) => p.sort.as_ref(),
            QueryPlan::Aggregate(p) => p.sort.as_ref(),
        }
    }

    /// GROUP BY columns; empty for row-level plans
    pub fn group_by(&self) -> &[Column] {
        match self {
            QueryPlan::RowLevel(_) => &[],
            QueryPlan::Aggregate(p) => &p.group_by,
        }
    }

    /// Dimensions that carry real values in the output
    pub fn real_dimensions(&self) -> Vec<Dimension> {
        match self {
            QueryPlan::RowLevel(_) => Dimension::ALL.to_vec(),
            QueryPlan::Aggregate(p) => p.grouped.clone(),
        }
    }

    /// Output column names in projection order
    pub fn output_columns(&self) -> Vec<&str> {
        self.projection().iter().map(|p| p.alias.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort_direction() {
        assert_eq!("asc".parse::<SortDirection>().unwrap(), SortDirection::Ascending);
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Descending);
        assert_eq!("descending".parse::<SortDirection>().unwrap(), SortDirection::Descending);
        assert!("up".parse::<SortDirection>().is_err());
        assert_eq!(SortDirection::default(), SortDirection::Ascending);
    }

    #[test]
    fn test_row_level_accessors() {
        let plan = QueryPlan::RowLevel(RowLevelPlan {
            table: "campaign_stat".to_string(),
            projection: vec![ProjectExpr::new(Expr::Column(Column::new("campaign_stat", "os")), "os")],
            filter: None,
            sort: None,
        });
        assert_eq!(plan.mode(), QueryMode::RowLevel);
        assert!(plan.group_by().is_empty());
        assert_eq!(plan.output_columns(), vec!["os"]);
        assert_eq!(plan.real_dimensions().len(), 4);
    }
}
