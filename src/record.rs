//! Fact and output record types

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One stored row of per-day campaign performance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignStat {
    pub date: NaiveDate,
    pub channel: String,
    pub country: String,
    pub os: String,
    pub impressions: i64,
    pub clicks: i64,
    pub installs: i64,
    pub spend: Decimal,
    pub revenue: Decimal,
}

/// Uniform output row of both query modes.
///
/// Dimension slots are `None` when the query grouped on other dimensions.
/// `cpi` is `None` when installs sum to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRecord {
    pub date: Option<NaiveDate>,
    pub channel: Option<String>,
    pub country: Option<String>,
    pub os: Option<String>,
    pub impressions: i64,
    pub clicks: i64,
    pub installs: i64,
    pub spend: Decimal,
    pub revenue: Decimal,
    pub cpi: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_serialize_aligned_record() {
        let record = StatRecord {
            date: None,
            channel: Some("fb".to_string()),
            country: None,
            os: None,
            impressions: 1000,
            clicks: 100,
            installs: 15,
            spend: dec!(150.00),
            revenue: dec!(200.50),
            cpi: Some(dec!(10)),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["date"], serde_json::Value::Null);
        assert_eq!(json["channel"], "fb");
        assert_eq!(json["installs"], 15);
        assert_eq!(json["spend"], "150.00");
        assert_eq!(json["cpi"], "10");

        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 10);
    }

    #[test]
    fn test_deserialize_campaign_stat() {
        let stat: CampaignStat = serde_json::from_str(
            r#"{"date": "2017-05-17", "channel": "adcolony", "country": "US", "os": "android",
                "impressions": 19887, "clicks": 494, "installs": 76, "spend": "148.2", "revenue": "149.04"}"#,
        )
        .unwrap();
        assert_eq!(stat.date, NaiveDate::from_ymd_opt(2017, 5, 17).unwrap());
        assert_eq!(stat.spend, dec!(148.2));
    }
}
