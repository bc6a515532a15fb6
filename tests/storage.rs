//! Integration tests for storage failures and session handling

mod common;

use adstats::executor::Value;
use adstats::{ExecuteError, MemoryStore, Registry, StatsError, StatsRequest, StatsService};
use common::{load_stats, run, service_with, strings};

fn physical_columns(registry: &Registry) -> Vec<String> {
    registry.columns().map(|c| c.column.clone()).collect()
}

#[test]
fn test_unavailable_store_returns_no_records() {
    let service = service_with(&load_stats());
    service.store().set_available(false);

    let result = service.query(&StatsRequest::default());

    assert!(matches!(
        result,
        Err(StatsError::Execute(ExecuteError::StorageUnavailable(_)))
    ));
    assert_eq!(service.store().open_sessions(), 0);

    service.store().set_available(true);
    assert_eq!(run(&service, &StatsRequest::default()).len(), load_stats().len());
}

#[test]
fn test_session_released_after_success() {
    let service = service_with(&load_stats());

    run(&service, &StatsRequest { groupby: strings(&["os"]), ..Default::default() });
    run(&service, &StatsRequest::default());

    assert_eq!(service.store().open_sessions(), 0);
}

#[test]
fn test_session_released_after_execution_failure() {
    let registry = Registry::default();
    let store = MemoryStore::new("some_other_table", physical_columns(&registry));
    let service = StatsService::new(registry, store);

    let err = service.query(&StatsRequest::default()).unwrap_err();

    assert!(matches!(err, StatsError::Execute(ExecuteError::QueryExecutionFailed(_))));
    assert!(!err.is_client_error());
    assert_eq!(service.store().open_sessions(), 0);
}

#[test]
fn test_session_released_after_mapping_failure() {
    let registry = Registry::default();
    let mut store = MemoryStore::new(registry.table(), physical_columns(&registry));
    store
        .insert_row(vec![
            Value::Date(common::date(2024, 1, 1)),
            Value::Null,
            Value::from("US"),
            Value::from("ios"),
            Value::Int(1),
            Value::Int(1),
            Value::Int(1),
            Value::Int(1),
            Value::Int(1),
        ])
        .unwrap();
    let service = StatsService::new(registry, store);

    let err = service.query(&StatsRequest::default()).unwrap_err();

    match err {
        StatsError::Execute(ExecuteError::RowMapping { row, ref column, .. }) => {
            assert_eq!(row, 0);
            assert_eq!(column, "channel");
        }
        other => panic!("expected RowMapping, got {:?}", other),
    }
    assert_eq!(service.store().open_sessions(), 0);
}

#[test]
fn test_null_dimension_groups_are_rejected() {
    let registry = Registry::default();
    let mut store = MemoryStore::new(registry.table(), physical_columns(&registry));
    for channel in [Value::from("fb"), Value::Null] {
        store
            .insert_row(vec![
                Value::Date(common::date(2024, 1, 1)),
                channel,
                Value::from("US"),
                Value::from("ios"),
                Value::Int(1),
                Value::Int(1),
                Value::Int(1),
                Value::Int(1),
                Value::Int(1),
            ])
            .unwrap();
    }
    let service = StatsService::new(registry, store);

    let ok = service.query(&StatsRequest { groupby: strings(&["country"]), ..Default::default() });
    assert_eq!(ok.unwrap().len(), 1);

    let err = service
        .query(&StatsRequest { groupby: strings(&["channel"]), ..Default::default() })
        .unwrap_err();
    assert!(matches!(err, StatsError::Execute(ExecuteError::RowMapping { .. })));
}
