use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::plan::SortDirection;
use super::error::RequestError;
use super::types::{SortSpec, StatisticsFilter, StatsQuery};

/// Date format of `date_from` / `date_to`, e.g. `31-01-2024`
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Inbound statistics request, as received from query-string parameters
///
/// `sort` takes a field name; a leading `-` asks for descending order.
/// Without the prefix, `ordering` (`asc` / `desc`) picks the direction and
/// defaults to ascending.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StatsRequest {
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
    #[serde(default)]
    pub channels: Option<Vec<String>>,
    #[serde(default)]
    pub countries: Option<Vec<String>>,
    #[serde(default)]
    pub os: Option<Vec<String>>,
    #[serde(default)]
    pub groupby: Option<Vec<String>>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub ordering: Option<String>,
}

impl StatsRequest {
    /// Parse raw parameters into a typed query.
    ///
    /// Field names are not checked here; the planner resolves them against
    /// the registry.
    pub fn parse(&self) -> Result<StatsQuery, RequestError> {
        let filter = StatisticsFilter {
            date_from: parse_date("date_from", self.date_from.as_deref())?,
            date_to: parse_date("date_to", self.date_to.as_deref())?,
            channels: non_empty(self.channels.as_ref()),
            countries: non_empty(self.countries.as_ref()),
            os: non_empty(self.os.as_ref()),
        };

        let group_by = self.groupby
            .iter()
            .flatten()
            .map(|g| g.trim())
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect();

        let sort = parse_sort(self.sort.as_deref(), self.ordering.as_deref())?;

        Ok(StatsQuery { filter, group_by, sort })
    }
}

fn parse_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, RequestError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(Some)
        .map_err(|e| RequestError::invalid(field, raw, format!("expected DD-MM-YYYY ({})", e)))
}

fn non_empty(values: Option<&Vec<String>>) -> Option<Vec<String>> {
    let values: Vec<String> = values?
        .iter()
        .filter(|v| !v.is_empty())
        .cloned()
        .collect();
    if values.is_empty() { None } else { Some(values) }
}

fn parse_sort(sort: Option<&str>, ordering: Option<&str>) -> Result<Option<SortSpec>, RequestError> {
    let Some(raw) = sort.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let explicit = match ordering.map(str::trim).filter(|s| !s.is_empty()) {
        Some(o) => Some(
            o.parse::<SortDirection>()
                .map_err(|e| RequestError::invalid("ordering", o, e.to_string()))?,
        ),
        None => None,
    };

    match raw.strip_prefix('-') {
        Some(field) => {
            if field.is_empty() {
                return Err(RequestError::invalid("sort", raw, "missing field name after '-'"));
            }
            if explicit == Some(SortDirection::Ascending) {
                return Err(RequestError::invalid(
                    "sort",
                    raw,
                    "'-' prefix requests descending order but ordering=asc was given",
                ));
            }
            Ok(Some(SortSpec::descending(field)))
        }
        None => Ok(Some(SortSpec::new(raw, explicit.unwrap_or_default()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_empty_request() {
        let query = StatsRequest::default().parse().unwrap();
        assert_eq!(query, StatsQuery::default());
    }

    #[test]
    fn test_parse_dates() {
        let request = StatsRequest {
            date_from: Some("01-01-2024".to_string()),
            date_to: Some("31-01-2024".to_string()),
            ..Default::default()
        };
        let query = request.parse().unwrap();
        assert_eq!(query.filter.date_from, Some(date(2024, 1, 1)));
        assert_eq!(query.filter.date_to, Some(date(2024, 1, 31)));
    }

    #[test]
    fn test_parse_blank_date_is_absent() {
        let request = StatsRequest {
            date_from: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(request.parse().unwrap().filter.date_from, None);
    }

    #[test]
    fn test_parse_bad_date() {
        let request = StatsRequest {
            date_to: Some("2024-01-31".to_string()),
            ..Default::default()
        };
        let err = request.parse().unwrap_err();
        assert!(matches!(
            &err,
            RequestError::InvalidFilterValue { field, value, .. } if field == "date_to" && value == "2024-01-31"
        ));
    }

    #[test]
    fn test_parse_impossible_date() {
        let request = StatsRequest {
            date_from: Some("31-02-2024".to_string()),
            ..Default::default()
        };
        assert!(request.parse().is_err());
    }

    #[test]
    fn test_parse_sets() {
        let request = StatsRequest {
            channels: Some(vec!["adcolony".to_string(), "".to_string()]),
            countries: Some(vec![]),
            os: Some(vec!["ios".to_string()]),
            ..Default::default()
        };
        let query = request.parse().unwrap();
        assert_eq!(query.filter.channels, Some(vec!["adcolony".to_string()]));
        assert_eq!(query.filter.countries, None);
        assert_eq!(query.filter.os, Some(vec!["ios".to_string()]));
    }

    #[test]
    fn test_parse_groupby_keeps_order() {
        let request = StatsRequest {
            groupby: Some(vec!["os".to_string(), " channel ".to_string(), "".to_string()]),
            ..Default::default()
        };
        assert_eq!(request.parse().unwrap().group_by, vec!["os", "channel"]);
    }

    #[test]
    fn test_parse_sort_prefix() {
        let request = StatsRequest {
            sort: Some("-impressions".to_string()),
            ..Default::default()
        };
        assert_eq!(request.parse().unwrap().sort, Some(SortSpec::descending("impressions")));

        let request = StatsRequest {
            sort: Some("clicks".to_string()),
            ..Default::default()
        };
        assert_eq!(request.parse().unwrap().sort, Some(SortSpec::ascending("clicks")));
    }

    #[test]
    fn test_parse_sort_with_ordering() {
        let request = StatsRequest {
            sort: Some("spend".to_string()),
            ordering: Some("desc".to_string()),
            ..Default::default()
        };
        assert_eq!(request.parse().unwrap().sort, Some(SortSpec::descending("spend")));

        let request = StatsRequest {
            sort: Some("spend".to_string()),
            ordering: Some("sideways".to_string()),
            ..Default::default()
        };
        assert!(request.parse().is_err());
    }

    #[test]
    fn test_parse_sort_conflicts() {
        let request = StatsRequest {
            sort: Some("-spend".to_string()),
            ordering: Some("asc".to_string()),
            ..Default::default()
        };
        assert!(request.parse().is_err());

        let request = StatsRequest {
            sort: Some("-".to_string()),
            ..Default::default()
        };
        assert!(request.parse().is_err());
    }

    #[test]
    fn test_ordering_without_sort_is_ignored() {
        let request = StatsRequest {
            ordering: Some("desc".to_string()),
            ..Default::default()
        };
        assert_eq!(request.parse().unwrap().sort, None);
    }

    #[test]
    fn test_deserialize_json() {
        let request: StatsRequest = serde_json::from_str(
            r#"{"date_from": "01-06-2017", "groupby": ["channel", "country"], "sort": "-clicks"}"#,
        )
        .unwrap();
        let query = request.parse().unwrap();
        assert_eq!(query.filter.date_from, Some(date(2017, 6, 1)));
        assert_eq!(query.group_by, vec!["channel", "country"]);
        assert_eq!(query.sort, Some(SortSpec::descending("clicks")));
    }
}
