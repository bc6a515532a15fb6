use chrono::NaiveDate;
use crate::plan::SortDirection;

/// Row filters. Every field is optional; a missing or empty set places no
/// constraint on its dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatisticsFilter {
    /// Inclusive lower bound
    pub date_from: Option<NaiveDate>,
    /// Exclusive upper bound
    pub date_to: Option<NaiveDate>,
    pub channels: Option<Vec<String>>,
    pub countries: Option<Vec<String>>,
    pub os: Option<Vec<String>>,
}

/// Sort key name plus direction
#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    /// Field name, resolved against the registry at build time
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Descending)
    }
}

/// A fully parsed statistics query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsQuery {
    pub filter: StatisticsFilter,
    /// Dimension names to group by; empty means row-level
    pub group_by: Vec<String>,
    pub sort: Option<SortSpec>,
}
