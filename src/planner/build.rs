//! Query plan construction
//!
//! Two shapes come out of here:
//! - row-level: every stored record projected as is, plus cpi
//! - aggregate: one row per group, with every ungrouped dimension emitted as a
//!   typed NULL so both shapes share one output schema

use tracing::debug;
use crate::plan::{
    AggregatePlan, BinaryOperator, Column, Expr, Literal, ProjectExpr, QueryPlan,
    RowLevelPlan, SortKey,
};
use crate::query::{SortSpec, StatisticsFilter, StatsQuery};
use crate::registry::{Dimension, Field, Measure, Registry};
use super::error::{Clause, PlanError};

/// Output alias of the derived cost-per-install column
pub const CPI_ALIAS: &str = Field::CPI_NAME;

/// Build a plan for a parsed statistics query
pub fn plan_stats_query(registry: &Registry, query: &StatsQuery) -> Result<QueryPlan, PlanError> {
    build_query(registry, &query.filter, &query.group_by, query.sort.as_ref())
}

/// Build a plan from filters, group-by names and an optional sort.
///
/// An empty `group_by` yields a row-level plan. Otherwise every dimension in
/// canonical order is either selected and grouped (if named) or replaced by a
/// NULL carrying its name, and measures are summed.
pub fn build_query(
    registry: &Registry,
    filter: &StatisticsFilter,
    group_by: &[String],
    sort: Option<&SortSpec>,
) -> Result<QueryPlan, PlanError> {
    let grouped = resolve_group_by(registry, group_by)?;
    let sort = sort.map(|s| build_sort_key(registry, s)).transpose()?;
    let filter = build_filter(registry, filter);
    let table = registry.table().to_string();

    let plan = if grouped.is_empty() {
        QueryPlan::RowLevel(RowLevelPlan {
            table,
            projection: row_level_projection(registry),
            filter,
            sort,
        })
    } else {
        let group_by_columns: Vec<Column> = grouped
            .iter()
            .map(|d| Column::from(registry.dimension_column(*d)))
            .collect();
        QueryPlan::Aggregate(AggregatePlan {
            table,
            projection: aggregate_projection(registry, &grouped),
            filter,
            group_by: group_by_columns,
            grouped,
            sort,
        })
    };

    debug!(
        mode = ?plan.mode(),
        grouped = ?plan.group_by().iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        sort = ?plan.sort().map(|s| (s.column.as_str(), s.direction)),
        filtered = plan.filter().is_some(),
        "built statistics query plan"
    );

    Ok(plan)
}

/// Resolve group-by names to dimensions, returned in canonical order with
/// duplicates collapsed.
fn resolve_group_by(registry: &Registry, names: &[String]) -> Result<Vec<Dimension>, PlanError> {
    let requested: Vec<Dimension> = names
        .iter()
        .map(|name| {
            registry
                .resolve_dimension(name)
                .map_err(|e| PlanError::unknown_field(Clause::GroupBy, e))
        })
        .collect::<Result<_, _>>()?;

    Ok(Dimension::ALL
        .into_iter()
        .filter(|d| requested.contains(d))
        .collect())
}

fn build_sort_key(registry: &Registry, sort: &SortSpec) -> Result<SortKey, PlanError> {
    let field = registry
        .resolve(&sort.field)
        .map_err(|e| PlanError::unknown_field(Clause::Sort, e))?;
    Ok(SortKey {
        column: field.name().to_string(),
        direction: sort.direction,
    })
}

/// AND of all present predicates; `None` when nothing filters
fn build_filter(registry: &Registry, filter: &StatisticsFilter) -> Option<Expr> {
    let date = Expr::column(registry.dimension_column(Dimension::Date));
    let mut predicates = Vec::new();

    if let Some(from) = filter.date_from {
        predicates.push(Expr::compare(
            date.clone(),
            BinaryOperator::GtEq,
            Expr::Literal(Literal::Date(from)),
        ));
    }
    if let Some(to) = filter.date_to {
        predicates.push(Expr::compare(
            date,
            BinaryOperator::Lt,
            Expr::Literal(Literal::Date(to)),
        ));
    }

    let sets = [
        (Dimension::Channel, &filter.channels),
        (Dimension::Country, &filter.countries),
        (Dimension::Os, &filter.os),
    ];
    for (dimension, values) in sets {
        if let Some(pred) = build_in_list(registry, dimension, values.as_deref()) {
            predicates.push(pred);
        }
    }

    match predicates.len() {
        0 => None,
        1 => predicates.pop(),
        _ => Some(Expr::And(predicates)),
    }
}

fn build_in_list(registry: &Registry, dimension: Dimension, values: Option<&[String]>) -> Option<Expr> {
    let values = values.filter(|v| !v.is_empty())?;

    let mut distinct: Vec<&String> = Vec::with_capacity(values.len());
    for v in values {
        if !distinct.contains(&v) {
            distinct.push(v);
        }
    }

    Some(Expr::In {
        expr: Box::new(Expr::column(registry.dimension_column(dimension))),
        values: distinct
            .into_iter()
            .map(|v| Expr::Literal(Literal::String(v.clone())))
            .collect(),
    })
}

fn row_level_projection(registry: &Registry) -> Vec<ProjectExpr> {
    let mut projection: Vec<ProjectExpr> = Dimension::ALL
        .iter()
        .map(|d| ProjectExpr::new(Expr::column(registry.dimension_column(*d)), d.name()))
        .collect();

    projection.extend(
        Measure::ALL
            .iter()
            .map(|m| ProjectExpr::new(Expr::column(registry.measure_column(*m)), m.name())),
    );

    let spend = Expr::column(registry.measure_column(Measure::Spend));
    let installs = Expr::column(registry.measure_column(Measure::Installs));
    projection.push(ProjectExpr::new(cpi_expr(spend, installs), CPI_ALIAS));

    projection
}

fn aggregate_projection(registry: &Registry, grouped: &[Dimension]) -> Vec<ProjectExpr> {
    let mut projection: Vec<ProjectExpr> = Dimension::ALL
        .iter()
        .map(|d| {
            let column = registry.dimension_column(*d);
            let expr = if grouped.contains(d) {
                Expr::column(column)
            } else {
                Expr::Literal(Literal::Null(column.data_type))
            };
            ProjectExpr::new(expr, d.name())
        })
        .collect();

    projection.extend(Measure::ALL.iter().map(|m| {
        ProjectExpr::new(Expr::sum(Expr::column(registry.measure_column(*m))), m.name())
    }));

    // Ratio of the sums, not an average of per-row ratios
    let spend = Expr::sum(Expr::column(registry.measure_column(Measure::Spend)));
    let installs = Expr::sum(Expr::column(registry.measure_column(Measure::Installs)));
    projection.push(ProjectExpr::new(cpi_expr(spend, installs), CPI_ALIAS));

    projection
}

/// `spend / NULLIF(installs, 0)`: zero installs gives NULL instead of an error
fn cpi_expr(spend: Expr, installs: Expr) -> Expr {
    Expr::divide(spend, Expr::null_if(installs, Expr::Literal(Literal::Int(0))))
}
