//! The registry: logical field names to physical storage columns

use std::collections::{HashMap, HashSet};
use serde::Deserialize;
use crate::error::ParseError;
use super::error::RegistryError;
use super::field::{Dimension, Field, Measure};
use super::types::DataType;

/// Default fact table name
pub const DEFAULT_TABLE: &str = "campaign_stat";

/// Default representation of monetary columns
pub const MONEY_TYPE: DataType = DataType::Decimal { precision: 18, scale: 2 };

/// A physical column reference
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    /// Table the column lives in
    pub table: String,
    /// Physical column name
    pub column: String,
    pub data_type: DataType,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>, data_type: DataType) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            data_type,
        }
    }
}

/// Registry configuration as written in YAML
///
/// ```yaml
/// table: analytics.campaign_stat
/// fields:
///   - name: date
///     column: stat_date
///   - name: spend
///     type: decimal(12, 4)
/// ```
///
/// Fields not listed map to a column of the same name with the default type.
#[derive(Debug, Deserialize)]
pub struct RegistryConfig {
    pub table: String,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

/// Mapping for a single logical field
#[derive(Debug, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    /// Physical column, defaults to `name`
    pub column: Option<String>,
    #[serde(rename = "type")]
    pub data_type: Option<DataType>,
}

/// Immutable mapping from logical names to physical columns.
///
/// Built once at startup and handed to the planner and storage engines.
#[derive(Debug, Clone)]
pub struct Registry {
    table: String,
    /// Indexed by `Dimension as usize`, which follows the canonical order
    dimensions: [ColumnRef; 4],
    /// Indexed by `Measure as usize`
    measures: [ColumnRef; 5],
}

impl Registry {
    /// The built-in mapping: every field stored under its own name in
    /// `campaign_stat`.
    pub fn campaign_stats() -> Self {
        Self::with_table(DEFAULT_TABLE)
    }

    fn with_table(table: &str) -> Self {
        let dimensions = Dimension::ALL
            .map(|d| ColumnRef::new(table, d.name(), default_dimension_type(d)));
        let measures = Measure::ALL
            .map(|m| ColumnRef::new(table, m.name(), default_measure_type(m)));
        Self {
            table: table.to_string(),
            dimensions,
            measures,
        }
    }

    /// Build a registry from a parsed configuration
    pub fn from_config(config: RegistryConfig) -> Result<Self, ParseError> {
        if config.table.trim().is_empty() {
            return Err(ParseError::Invalid {
                message: "table name must not be empty".to_string(),
            });
        }

        let mut registry = Self::with_table(&config.table);
        let mut seen: HashSet<Field> = HashSet::new();

        for fc in config.fields {
            let field: Field = fc.name.parse().map_err(|_| ParseError::Invalid {
                message: format!("unknown field '{}'", fc.name),
            })?;
            if !seen.insert(field) {
                return Err(ParseError::Invalid {
                    message: format!("field '{}' is mapped more than once", fc.name),
                });
            }

            let slot = match field {
                Field::Dimension(d) => &mut registry.dimensions[d as usize],
                Field::Measure(m) => &mut registry.measures[m as usize],
                Field::Cpi => {
                    return Err(ParseError::Invalid {
                        message: "'cpi' is derived at query time and cannot be mapped to a column".to_string(),
                    });
                }
            };

            if let Some(column) = fc.column {
                slot.column = column;
            }
            if let Some(data_type) = fc.data_type {
                check_type(field, data_type)?;
                slot.data_type = data_type;
            }
        }

        registry.check_distinct_columns()?;
        Ok(registry)
    }

    /// Every stored field must own its physical column
    fn check_distinct_columns(&self) -> Result<(), ParseError> {
        let mut owners: HashMap<&str, Field> = HashMap::new();
        for field in Field::stored() {
            let Some(column) = self.column(field) else {
                continue;
            };
            if let Some(other) = owners.insert(column.column.as_str(), field) {
                return Err(ParseError::Invalid {
                    message: format!(
                        "column '{}' is mapped by both '{}' and '{}'",
                        column.column, other, field
                    ),
                });
            }
        }
        Ok(())
    }

    /// Fact table name
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Resolve a logical name to a field
    pub fn resolve(&self, name: &str) -> Result<Field, RegistryError> {
        name.parse::<Field>()
            .map_err(|_| RegistryError::NotFound(name.to_string()))
    }

    /// Resolve a logical name that must denote a dimension
    pub fn resolve_dimension(&self, name: &str) -> Result<Dimension, RegistryError> {
        self.resolve(name)?
            .as_dimension()
            .ok_or_else(|| RegistryError::NotADimension(name.to_string()))
    }

    /// Dimension names in canonical order
    pub fn dimension_names(&self) -> [&'static str; 4] {
        Dimension::ALL.map(|d| d.name())
    }

    pub fn dimension_column(&self, dimension: Dimension) -> &ColumnRef {
        &self.dimensions[dimension as usize]
    }

    pub fn measure_column(&self, measure: Measure) -> &ColumnRef {
        &self.measures[measure as usize]
    }

    /// Physical column for a field; `None` for derived fields
    pub fn column(&self, field: Field) -> Option<&ColumnRef> {
        match field {
            Field::Dimension(d) => Some(self.dimension_column(d)),
            Field::Measure(m) => Some(self.measure_column(m)),
            Field::Cpi => None,
        }
    }

    /// All stored columns: dimensions in canonical order, then measures
    pub fn columns(&self) -> impl Iterator<Item = &ColumnRef> {
        self.dimensions.iter().chain(self.measures.iter())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::campaign_stats()
    }
}

fn default_dimension_type(dimension: Dimension) -> DataType {
    match dimension {
        Dimension::Date => DataType::Date,
        _ => DataType::String,
    }
}

fn default_measure_type(measure: Measure) -> DataType {
    if measure.is_monetary() {
        MONEY_TYPE
    } else {
        DataType::I64
    }
}

/// Column types must keep the shape of the output record
fn check_type(field: Field, data_type: DataType) -> Result<(), ParseError> {
    let ok = match field {
        Field::Dimension(Dimension::Date) => data_type == DataType::Date,
        Field::Dimension(_) => data_type == DataType::String,
        Field::Measure(m) if m.is_monetary() => data_type.is_decimal(),
        Field::Measure(_) => data_type.is_integer(),
        Field::Cpi => false,
    };
    if ok {
        Ok(())
    } else {
        Err(ParseError::Invalid {
            message: format!("type '{}' is not valid for field '{}'", data_type, field),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let registry = Registry::campaign_stats();
        assert_eq!(registry.table(), "campaign_stat");
        assert_eq!(registry.dimension_names(), ["date", "channel", "country", "os"]);

        let date = registry.dimension_column(Dimension::Date);
        assert_eq!(date.column, "date");
        assert_eq!(date.data_type, DataType::Date);

        let spend = registry.measure_column(Measure::Spend);
        assert_eq!(spend.table, "campaign_stat");
        assert!(spend.data_type.is_decimal());
        assert_eq!(registry.measure_column(Measure::Clicks).data_type, DataType::I64);
    }

    #[test]
    fn test_resolve() {
        let registry = Registry::default();
        assert_eq!(registry.resolve("installs").unwrap(), Field::Measure(Measure::Installs));
        assert_eq!(registry.resolve("cpi").unwrap(), Field::Cpi);
        assert!(matches!(
            registry.resolve("ctr"),
            Err(RegistryError::NotFound(name)) if name == "ctr"
        ));
    }

    #[test]
    fn test_resolve_dimension() {
        let registry = Registry::default();
        assert_eq!(registry.resolve_dimension("country").unwrap(), Dimension::Country);
        assert!(matches!(
            registry.resolve_dimension("spend"),
            Err(RegistryError::NotADimension(_))
        ));
        assert!(matches!(
            registry.resolve_dimension("region"),
            Err(RegistryError::NotFound(_))
        ));
    }

    #[test]
    fn test_columns_order() {
        let registry = Registry::default();
        let names: Vec<&str> = registry.columns().map(|c| c.column.as_str()).collect();
        assert_eq!(
            names,
            vec!["date", "channel", "country", "os", "impressions", "clicks", "installs", "spend", "revenue"]
        );
        assert!(registry.column(Field::Cpi).is_none());
    }

    #[test]
    fn test_from_config_overrides() {
        let config = RegistryConfig {
            table: "analytics.stats".to_string(),
            fields: vec![
                FieldConfig {
                    name: "date".to_string(),
                    column: Some("stat_date".to_string()),
                    data_type: None,
                },
                FieldConfig {
                    name: "revenue".to_string(),
                    column: None,
                    data_type: Some(DataType::Decimal { precision: 12, scale: 4 }),
                },
            ],
        };
        let registry = Registry::from_config(config).unwrap();
        assert_eq!(registry.dimension_column(Dimension::Date).column, "stat_date");
        assert_eq!(registry.dimension_column(Dimension::Os).column, "os");
        assert_eq!(registry.dimension_column(Dimension::Os).table, "analytics.stats");
        assert_eq!(
            registry.measure_column(Measure::Revenue).data_type,
            DataType::Decimal { precision: 12, scale: 4 }
        );
    }

    #[test]
    fn test_from_config_rejects_cpi_and_duplicates() {
        let cpi = RegistryConfig {
            table: "t".to_string(),
            fields: vec![FieldConfig { name: "cpi".to_string(), column: None, data_type: None }],
        };
        assert!(Registry::from_config(cpi).is_err());

        let dup = RegistryConfig {
            table: "t".to_string(),
            fields: vec![
                FieldConfig { name: "os".to_string(), column: None, data_type: None },
                FieldConfig { name: "os".to_string(), column: Some("platform".to_string()), data_type: None },
            ],
        };
        assert!(Registry::from_config(dup).is_err());
    }

    #[test]
    fn test_from_config_rejects_bad_types() {
        let config = RegistryConfig {
            table: "t".to_string(),
            fields: vec![FieldConfig {
                name: "installs".to_string(),
                column: None,
                data_type: Some(DataType::String),
            }],
        };
        let err = Registry::from_config(config).unwrap_err();
        assert!(err.to_string().contains("installs"));
    }

    #[test]
    fn test_from_config_rejects_shared_column() {
        let config = RegistryConfig {
            table: "campaign_stat".to_string(),
            fields: vec![FieldConfig {
                name: "country".to_string(),
                column: Some("channel".to_string()),
                data_type: None,
            }],
        };
        let err = Registry::from_config(config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid registry: column 'channel' is mapped by both 'channel' and 'country'"
        );

        let swapped = RegistryConfig {
            table: "campaign_stat".to_string(),
            fields: vec![
                FieldConfig { name: "country".to_string(), column: Some("channel".to_string()), data_type: None },
                FieldConfig { name: "channel".to_string(), column: Some("country".to_string()), data_type: None },
            ],
        };
        let registry = Registry::from_config(swapped).unwrap();
        assert_eq!(registry.dimension_column(Dimension::Country).column, "channel");
    }
}
