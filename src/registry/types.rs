//! Data type definitions for registry columns

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Storage types a registry column can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// 32-bit signed integer
    I32,
    /// 64-bit signed integer
    I64,
    /// Variable-length string
    String,
    /// Calendar date
    Date,
    /// Fixed-point decimal with precision and scale
    Decimal { precision: u8, scale: u8 },
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::I32 => write!(f, "i32"),
            DataType::I64 => write!(f, "i64"),
            DataType::String => write!(f, "string"),
            DataType::Date => write!(f, "date"),
            DataType::Decimal { precision, scale } => write!(f, "decimal({}, {})", precision, scale),
        }
    }
}

/// Error when parsing a data type string
#[derive(Debug, Clone)]
pub struct ParseDataTypeError {
    pub input: String,
    pub message: String,
}

impl fmt::Display for ParseDataTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid data type '{}': {}", self.input, self.message)
    }
}

impl std::error::Error for ParseDataTypeError {}

impl FromStr for DataType {
    type Err = ParseDataTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();

        if lower.starts_with("decimal(") && lower.ends_with(')') {
            return parse_decimal(&lower);
        }

        match lower.as_str() {
            "i32" | "int" | "integer" => Ok(DataType::I32),
            "i64" | "long" | "bigint" => Ok(DataType::I64),
            "string" | "text" | "varchar" => Ok(DataType::String),
            "date" => Ok(DataType::Date),
            _ => Err(ParseDataTypeError {
                input: s.to_string(),
                message: "unknown type".to_string(),
            }),
        }
    }
}

fn parse_decimal(s: &str) -> Result<DataType, ParseDataTypeError> {
    // "decimal(12, 2)" -> "12, 2"
    let inner = &s[8..s.len() - 1];
    let parts: Vec<&str> = inner.split(',').map(|p| p.trim()).collect();

    if parts.len() != 2 {
        return Err(ParseDataTypeError {
            input: s.to_string(),
            message: "decimal requires precision and scale, e.g., decimal(12, 2)".to_string(),
        });
    }

    let precision: u8 = parts[0].parse().map_err(|_| ParseDataTypeError {
        input: s.to_string(),
        message: "invalid precision".to_string(),
    })?;

    let scale: u8 = parts[1].parse().map_err(|_| ParseDataTypeError {
        input: s.to_string(),
        message: "invalid scale".to_string(),
    })?;

    if precision == 0 || precision > 38 {
        return Err(ParseDataTypeError {
            input: s.to_string(),
            message: "precision must be between 1 and 38".to_string(),
        });
    }

    if scale > precision {
        return Err(ParseDataTypeError {
            input: s.to_string(),
            message: "scale cannot exceed precision".to_string(),
        });
    }

    Ok(DataType::Decimal { precision, scale })
}

impl<'de> Deserialize<'de> for DataType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DataType::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl Serialize for DataType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl DataType {
    /// Check if this is an integer type
    pub fn is_integer(&self) -> bool {
        matches!(self, DataType::I32 | DataType::I64)
    }

    /// Check if this is a fixed-point decimal
    pub fn is_decimal(&self) -> bool {
        matches!(self, DataType::Decimal { .. })
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_decimal()
    }
}
