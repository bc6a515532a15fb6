//! Expression evaluation for the in-memory engine
//!
//! NULL follows SQL rules: comparisons with NULL yield NULL, WHERE keeps only
//! rows whose predicate is TRUE, SUM skips NULLs.

use std::cmp::Ordering;
use std::collections::HashMap;
use crate::plan::{BinaryOperator, Column, Expr};
use super::error::ExecuteError;
use super::value::Value;

/// Column name to position within a stored tuple
pub(crate) struct Layout<'a> {
    pub table: &'a str,
    pub positions: HashMap<&'a str, usize>,
}

impl<'a> Layout<'a> {
    pub fn new(table: &'a str, columns: &'a [String]) -> Self {
        let positions = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();
        Self { table, positions }
    }

    pub fn position(&self, col: &Column) -> Result<usize, ExecuteError> {
        if !col.table.is_empty() && col.table != self.table {
            return Err(ExecuteError::QueryExecutionFailed(format!(
                "missing FROM-clause entry for table '{}'",
                col.table
            )));
        }
        self.positions.get(col.name.as_str()).copied().ok_or_else(|| {
            ExecuteError::QueryExecutionFailed(format!(
                "column '{}' does not exist",
                col.qualified_name()
            ))
        })
    }
}

/// What an expression is evaluated against
pub(crate) enum Scope<'r> {
    /// A single stored tuple
    Row(&'r [Value]),
    /// All tuples of one group; bare columns read the first tuple
    Group(&'r [&'r [Value]]),
}

pub(crate) fn eval(expr: &Expr, layout: &Layout<'_>, scope: &Scope<'_>) -> Result<Value, ExecuteError> {
    match expr {
        Expr::Column(col) => {
            let pos = layout.position(col)?;
            let row = match scope {
                Scope::Row(row) => Some(*row),
                Scope::Group(rows) => rows.first().copied(),
            };
            Ok(row.map(|r| r[pos].clone()).unwrap_or(Value::Null))
        }
        Expr::Literal(lit) => Ok(Value::from(lit)),
        Expr::BinaryOp { left, op, right } => {
            let l = eval(left, layout, scope)?;
            let r = eval(right, layout, scope)?;
            compare(&l, *op, &r)
        }
        Expr::In { expr, values } => {
            let needle = eval(expr, layout, scope)?;
            if needle.is_null() {
                return Ok(Value::Null);
            }
            for v in values {
                let candidate = eval(v, layout, scope)?;
                if compare(&needle, BinaryOperator::Eq, &candidate)? == Value::Bool(true) {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
        Expr::And(exprs) => {
            let mut saw_null = false;
            for e in exprs {
                match eval(e, layout, scope)? {
                    Value::Bool(true) => {}
                    Value::Bool(false) => return Ok(Value::Bool(false)),
                    Value::Null => saw_null = true,
                    other => {
                        return Err(ExecuteError::QueryExecutionFailed(format!(
                            "argument of AND must be boolean, not {}",
                            other.type_name()
                        )))
                    }
                }
            }
            Ok(if saw_null { Value::Null } else { Value::Bool(true) })
        }
        Expr::Sum(inner) => {
            let Scope::Group(rows) = scope else {
                return Err(ExecuteError::QueryExecutionFailed(
                    "aggregate function used outside of a grouped query".to_string(),
                ));
            };
            let mut total = Value::Null;
            for row in rows.iter() {
                let v = eval(inner, layout, &Scope::Row(*row))?;
                total = add(total, v)?;
            }
            Ok(total)
        }
        Expr::Divide(a, b) => {
            let a = eval(a, layout, scope)?;
            let b = eval(b, layout, scope)?;
            divide(&a, &b)
        }
        Expr::NullIf(a, b) => {
            let a = eval(a, layout, scope)?;
            let b = eval(b, layout, scope)?;
            Ok(if compare(&a, BinaryOperator::Eq, &b)? == Value::Bool(true) {
                Value::Null
            } else {
                a
            })
        }
    }
}

/// True only for a TRUE predicate result
pub(crate) fn is_true(v: &Value) -> bool {
    matches!(v, Value::Bool(true))
}

fn compare(l: &Value, op: BinaryOperator, r: &Value) -> Result<Value, ExecuteError> {
    if l.is_null() || r.is_null() {
        return Ok(Value::Null);
    }
    let ord = l.partial_cmp_sql(r).ok_or_else(|| {
        ExecuteError::QueryExecutionFailed(format!(
            "operator does not exist: {} {} {}",
            l.type_name(),
            op.as_str(),
            r.type_name()
        ))
    })?;
    let result = match op {
        BinaryOperator::Eq => ord == Ordering::Equal,
        BinaryOperator::NotEq => ord != Ordering::Equal,
        BinaryOperator::Lt => ord == Ordering::Less,
        BinaryOperator::LtEq => ord != Ordering::Greater,
        BinaryOperator::Gt => ord == Ordering::Greater,
        BinaryOperator::GtEq => ord != Ordering::Less,
    };
    Ok(Value::Bool(result))
}

/// Running SUM step: NULL inputs are skipped
fn add(acc: Value, v: Value) -> Result<Value, ExecuteError> {
    let overflow = || ExecuteError::QueryExecutionFailed("numeric overflow in SUM".to_string());
    match (acc, v) {
        (acc, Value::Null) => Ok(acc),
        (Value::Null, v @ (Value::Int(_) | Value::Decimal(_))) => Ok(v),
        (Value::Int(a), Value::Int(b)) => a.checked_add(b).map(Value::Int).ok_or_else(overflow),
        (a, b) => match (a.as_decimal(), b.as_decimal()) {
            (Some(x), Some(y)) => x.checked_add(y).map(Value::Decimal).ok_or_else(overflow),
            _ => Err(ExecuteError::QueryExecutionFailed(format!(
                "function sum({}) does not exist",
                b.type_name()
            ))),
        },
    }
}

/// Exact decimal division; NULL propagates, zero divisors are an error
fn divide(a: &Value, b: &Value) -> Result<Value, ExecuteError> {
    if a.is_null() || b.is_null() {
        return Ok(Value::Null);
    }
    let (Some(x), Some(y)) = (a.as_decimal(), b.as_decimal()) else {
        return Err(ExecuteError::QueryExecutionFailed(format!(
            "operator does not exist: {} / {}",
            a.type_name(),
            b.type_name()
        )));
    };
    if y.is_zero() {
        return Err(ExecuteError::QueryExecutionFailed("division by zero".to_string()));
    }
    x.checked_div(y)
        .map(Value::Decimal)
        .ok_or_else(|| ExecuteError::QueryExecutionFailed("numeric overflow in division".to_string()))
}
