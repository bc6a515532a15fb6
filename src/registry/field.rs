//! Logical field names of the campaign statistics fact table

use std::fmt;
use std::str::FromStr;

/// A categorical attribute usable for filtering and grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    Date,
    Channel,
    Country,
    Os,
}

impl Dimension {
    /// Canonical dimension order. Aligned output columns are always laid out
    /// in this order, whatever subset was grouped on.
    pub const ALL: [Dimension; 4] = [
        Dimension::Date,
        Dimension::Channel,
        Dimension::Country,
        Dimension::Os,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Date => "date",
            Dimension::Channel => "channel",
            Dimension::Country => "country",
            Dimension::Os => "os",
        }
    }
}

/// An additive numeric attribute of a fact record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Measure {
    Impressions,
    Clicks,
    Installs,
    Spend,
    Revenue,
}

impl Measure {
    pub const ALL: [Measure; 5] = [
        Measure::Impressions,
        Measure::Clicks,
        Measure::Installs,
        Measure::Spend,
        Measure::Revenue,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Measure::Impressions => "impressions",
            Measure::Clicks => "clicks",
            Measure::Installs => "installs",
            Measure::Spend => "spend",
            Measure::Revenue => "revenue",
        }
    }

    /// Monetary measures are fixed-point decimals, the rest are counters
    pub fn is_monetary(&self) -> bool {
        matches!(self, Measure::Spend | Measure::Revenue)
    }
}

/// Any name a request may refer to: a dimension, a measure or the derived CPI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Dimension(Dimension),
    Measure(Measure),
    /// Cost per install, `spend / installs`, never stored
    Cpi,
}

impl Field {
    pub const CPI_NAME: &'static str = "cpi";

    pub fn name(&self) -> &'static str {
        match self {
            Field::Dimension(d) => d.name(),
            Field::Measure(m) => m.name(),
            Field::Cpi => Self::CPI_NAME,
        }
    }

    /// Fields backed by a stored column: dimensions, then measures
    pub fn stored() -> impl Iterator<Item = Field> {
        Dimension::ALL
            .into_iter()
            .map(Field::Dimension)
            .chain(Measure::ALL.into_iter().map(Field::Measure))
    }

    pub fn as_dimension(&self) -> Option<Dimension> {
        match self {
            Field::Dimension(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error when a string is not a known field name
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownFieldName(pub String);

impl fmt::Display for UnknownFieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown field '{}'", self.0)
    }
}

impl std::error::Error for UnknownFieldName {}

impl FromStr for Field {
    type Err = UnknownFieldName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::CPI_NAME {
            return Ok(Field::Cpi);
        }
        if let Some(d) = Dimension::ALL.iter().find(|d| d.name() == s) {
            return Ok(Field::Dimension(*d));
        }
        if let Some(m) = Measure::ALL.iter().find(|m| m.name() == s) {
            return Ok(Field::Measure(*m));
        }
        Err(UnknownFieldName(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fields() {
        assert_eq!("date".parse::<Field>().unwrap(), Field::Dimension(Dimension::Date));
        assert_eq!("os".parse::<Field>().unwrap(), Field::Dimension(Dimension::Os));
        assert_eq!("spend".parse::<Field>().unwrap(), Field::Measure(Measure::Spend));
        assert_eq!("cpi".parse::<Field>().unwrap(), Field::Cpi);
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("Channel".parse::<Field>().is_err());
        assert!("-impressions".parse::<Field>().is_err());
    }

    #[test]
    fn test_canonical_order() {
        let names: Vec<&str> = Dimension::ALL.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["date", "channel", "country", "os"]);
    }

    #[test]
    fn test_name_roundtrip() {
        for d in Dimension::ALL {
            assert_eq!(d.name().parse::<Field>().unwrap(), Field::Dimension(d));
        }
        for m in Measure::ALL {
            assert_eq!(m.to_string().parse::<Field>().unwrap(), Field::Measure(m));
        }
    }

    #[test]
    fn test_stored_fields() {
        let stored: Vec<Field> = Field::stored().collect();
        assert_eq!(stored.len(), 9);
        assert_eq!(stored[0], Field::Dimension(Dimension::Date));
        assert_eq!(stored[4], Field::Measure(Measure::Impressions));
        assert!(!stored.contains(&Field::Cpi));
        assert_eq!(Field::Cpi.as_dimension(), None);
        assert_eq!(stored[3].as_dimension(), Some(Dimension::Os));
    }
}
