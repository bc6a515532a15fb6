//! Shared test utilities for integration tests

#![allow(dead_code)]

use adstats::{parser, CampaignStat, MemoryStore, Registry, StatRecord, StatsRequest, StatsService};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Load a registry fixture from the tests/test_data directory
pub fn load_registry(name: &str) -> Registry {
    let path = format!("tests/test_data/{}", name);
    parser::parse_file(&path)
        .unwrap_or_else(|e| panic!("Failed to load test data {}: {}", name, e))
}

/// Load the campaign rows fixture
pub fn load_stats() -> Vec<CampaignStat> {
    let path = "tests/test_data/stats.yaml";
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e));
    serde_yaml::from_str(&text)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path, e))
}

/// Service over the default registry, loaded with `stats`
pub fn service_with(stats: &[CampaignStat]) -> StatsService<MemoryStore> {
    service_on(Registry::default(), stats)
}

/// Service over `registry`, loaded with `stats`
pub fn service_on(registry: Registry, stats: &[CampaignStat]) -> StatsService<MemoryStore> {
    let store = MemoryStore::from_stats(&registry, stats);
    StatsService::new(registry, store)
}

/// Run a request and panic on failure
pub fn run(service: &StatsService<MemoryStore>, request: &StatsRequest) -> Vec<StatRecord> {
    service
        .query(request)
        .unwrap_or_else(|e| panic!("Query failed: {}", e))
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn stat(day: NaiveDate, channel: &str, country: &str, os: &str, installs: i64, spend: Decimal) -> CampaignStat {
    CampaignStat {
        date: day,
        channel: channel.to_string(),
        country: country.to_string(),
        os: os.to_string(),
        impressions: 100,
        clicks: 10,
        installs,
        spend,
        revenue: Decimal::ZERO,
    }
}

pub fn strings(values: &[&str]) -> Option<Vec<String>> {
    Some(values.iter().map(|s| s.to_string()).collect())
}

/// Dimension slots of a record as (name, is_present) in canonical order
pub fn dimension_presence(record: &StatRecord) -> [(&'static str, bool); 4] {
    [
        ("date", record.date.is_some()),
        ("channel", record.channel.is_some()),
        ("country", record.country.is_some()),
        ("os", record.os.is_some()),
    ]
}
