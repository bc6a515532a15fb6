//! Expression types for query plans

use chrono::NaiveDate;
use crate::registry::{ColumnRef, DataType};

/// A column reference
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Table name or alias
    pub table: String,
    /// Column name
    pub name: String,
}

impl Column {
    pub fn new(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            name: name.into(),
        }
    }

    /// Create an unqualified column reference (no table prefix)
    pub fn unqualified(name: impl Into<String>) -> Self {
        Self {
            table: String::new(),
            name: name.into(),
        }
    }

    /// Fully qualified name: table.column
    pub fn qualified_name(&self) -> String {
        if self.table.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.table, self.name)
        }
    }
}

impl From<&ColumnRef> for Column {
    fn from(col: &ColumnRef) -> Self {
        Column::new(&col.table, &col.column)
    }
}

/// Scalar and aggregate expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference
    Column(Column),
    /// Literal value
    Literal(Literal),
    /// Binary comparison (e.g., a >= b)
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },
    /// IN expression (column IN (values))
    In {
        expr: Box<Expr>,
        values: Vec<Expr>,
    },
    /// AND of multiple expressions
    And(Vec<Expr>),
    /// SUM over the rows of a group
    Sum(Box<Expr>),
    /// Division: a / b
    Divide(Box<Expr>, Box<Expr>),
    /// NULLIF(a, b): NULL when a = b, otherwise a
    NullIf(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn column(col: &ColumnRef) -> Self {
        Expr::Column(Column::from(col))
    }

    pub fn compare(left: Expr, op: BinaryOperator, right: Expr) -> Self {
        Expr::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn sum(inner: Expr) -> Self {
        Expr::Sum(Box::new(inner))
    }

    pub fn divide(numerator: Expr, denominator: Expr) -> Self {
        Expr::Divide(Box::new(numerator), Box::new(denominator))
    }

    pub fn null_if(value: Expr, sentinel: Expr) -> Self {
        Expr::NullIf(Box::new(value), Box::new(sentinel))
    }

    /// True if the expression contains an aggregate function
    pub fn is_aggregate(&self) -> bool {
        match self {
            Expr::Sum(_) => true,
            Expr::Column(_) | Expr::Literal(_) => false,
            Expr::BinaryOp { left, right, .. } => left.is_aggregate() || right.is_aggregate(),
            Expr::In { expr, values } => expr.is_aggregate() || values.iter().any(Expr::is_aggregate),
            Expr::And(exprs) => exprs.iter().any(Expr::is_aggregate),
            Expr::Divide(a, b) | Expr::NullIf(a, b) => a.is_aggregate() || b.is_aggregate(),
        }
    }
}

/// Literal values
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Typed NULL, so that aligned columns keep their type
    Null(DataType),
    Int(i64),
    String(String),
    Date(NaiveDate),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryOperator {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl BinaryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::Eq => "=",
            BinaryOperator::NotEq => "!=",
            BinaryOperator::Lt => "<",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::GtEq => ">=",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name() {
        assert_eq!(Column::new("campaign_stat", "os").qualified_name(), "campaign_stat.os");
        assert_eq!(Column::unqualified("os").qualified_name(), "os");
    }

    #[test]
    fn test_is_aggregate() {
        let spend = Expr::Column(Column::new("t", "spend"));
        let installs = Expr::Column(Column::new("t", "installs"));
        assert!(!Expr::divide(spend.clone(), installs.clone()).is_aggregate());
        assert!(Expr::divide(
            Expr::sum(spend),
            Expr::null_if(Expr::sum(installs), Expr::Literal(Literal::Int(0))),
        )
        .is_aggregate());
    }
}
