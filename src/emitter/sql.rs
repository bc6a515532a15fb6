//! SQL emitter
//!
//! Renders a `QueryPlan` as a single ANSI SQL statement.

use crate::plan::{Column, Expr, Literal, ProjectExpr, QueryPlan, SortDirection, SortKey};
use crate::registry::DataType;
use super::error::EmitError;

/// Emit a multi-line SQL statement for a plan.
///
/// Output columns are aliased to their logical names, so the result set has
/// the same column names whatever the physical layout.
pub fn emit_sql(plan: &QueryPlan) -> Result<String, EmitError> {
    let projection = plan.projection();
    if projection.is_empty() {
        return Err(EmitError::InvalidPlan("projection is empty".to_string()));
    }

    let mut sql = format!(
        "SELECT {}\nFROM {}",
        emit_projection(projection)?,
        plan.table(),
    );

    if let Some(filter) = plan.filter() {
        if filter.is_aggregate() {
            return Err(EmitError::InvalidPlan(
                "aggregate functions are not allowed in WHERE".to_string(),
            ));
        }
        sql.push_str(&format!("\nWHERE {}", emit_expr(filter)?));
    }

    let group_by = plan.group_by();
    if !group_by.is_empty() {
        let cols: Vec<String> = group_by.iter().map(emit_column).collect();
        sql.push_str(&format!("\nGROUP BY {}", cols.join(", ")));
    }

    if let Some(sort) = plan.sort() {
        sql.push_str(&format!("\nORDER BY {}", emit_sort_key(sort)));
    }

    Ok(sql)
}

fn emit_projection(projection: &[ProjectExpr]) -> Result<String, EmitError> {
    let items: Vec<String> = projection
        .iter()
        .map(|pe| Ok(format!("{} AS \"{}\"", emit_expr(&pe.expr)?, pe.alias)))
        .collect::<Result<Vec<_>, EmitError>>()?;
    Ok(items.join(", "))
}

fn emit_sort_key(key: &SortKey) -> String {
    let dir = match key.direction {
        SortDirection::Ascending => "ASC",
        SortDirection::Descending => "DESC",
    };
    format!("\"{}\" {}", key.column, dir)
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

fn emit_expr(expr: &Expr) -> Result<String, EmitError> {
    match expr {
        Expr::Column(col) => Ok(emit_column(col)),
        Expr::Literal(lit) => Ok(emit_literal(lit)),
        Expr::BinaryOp { left, op, right } => {
            let l = emit_expr(left)?;
            let r = emit_expr(right)?;
            Ok(format!("{} {} {}", l, op.as_str(), r))
        }
        Expr::And(exprs) => {
            if exprs.is_empty() {
                return Ok("TRUE".to_string());
            }
            let parts: Vec<String> = exprs.iter().map(emit_expr).collect::<Result<Vec<_>, _>>()?;
            Ok(format!("({})", parts.join(" AND ")))
        }
        Expr::In { expr, values } => {
            if values.is_empty() {
                return Err(EmitError::UnsupportedExpression("IN with an empty value list".to_string()));
            }
            let needle = emit_expr(expr)?;
            let vals: Vec<String> = values.iter().map(emit_expr).collect::<Result<Vec<_>, _>>()?;
            Ok(format!("{} IN ({})", needle, vals.join(", ")))
        }
        Expr::Sum(inner) => {
            if inner.is_aggregate() {
                return Err(EmitError::UnsupportedExpression("nested aggregate".to_string()));
            }
            Ok(format!("SUM({})", emit_expr(inner)?))
        }
        // Monetary operands are DECIMAL, so the quotient stays exact
        Expr::Divide(a, b) => Ok(format!("({} / {})", emit_expr(a)?, emit_expr(b)?)),
        Expr::NullIf(a, b) => Ok(format!("NULLIF({}, {})", emit_expr(a)?, emit_expr(b)?)),
    }
}

fn emit_column(col: &Column) -> String {
    col.qualified_name()
}

fn emit_literal(lit: &Literal) -> String {
    match lit {
        Literal::Null(data_type) => format!("CAST(NULL AS {})", sql_type_name(data_type)),
        Literal::Int(i) => i.to_string(),
        Literal::String(s) => format!("'{}'", s.replace('\'', "''")),
        Literal::Date(d) => format!("DATE '{}'", d.format("%Y-%m-%d")),
    }
}

fn sql_type_name(data_type: &DataType) -> String {
    match data_type {
        DataType::I32 => "INTEGER".to_string(),
        DataType::I64 => "BIGINT".to_string(),
        DataType::String => "VARCHAR".to_string(),
        DataType::Date => "DATE".to_string(),
        DataType::Decimal { precision, scale } => format!("DECIMAL({}, {})", precision, scale),
    }
}
