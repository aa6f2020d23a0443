//! Dashboard service behaviour over mocked data sources and cache stores.

mod support;

use std::sync::Arc;

use chrono::{Duration, Utc};
use spendview_core::{DashboardService, DataOrigin, SnapshotCache};
use spendview_domain::{
    FilterSpec, ProviderDataset, Selection, SortColumn, SortDirection, SortSpec, SpendViewError,
};
use support::{coffee_and_hotel, MockCacheStore, ScriptedSource};

fn service(source: ScriptedSource, store: MockCacheStore) -> DashboardService {
    DashboardService::new(Arc::new(source), SnapshotCache::new(Arc::new(store)))
}

#[tokio::test]
async fn live_view_normalizes_and_sorts_newest_first() {
    let store = MockCacheStore::default();
    let service = service(ScriptedSource::new(vec![Ok(coffee_and_hotel())]), store.clone());

    let view = service.view(&FilterSpec::default(), &SortSpec::default()).await.unwrap();

    assert_eq!(view.origin, DataOrigin::Live);
    let ids: Vec<&str> = view.rows.iter().map(|row| row.id.as_str()).collect();
    assert_eq!(ids, ["r1", "t1"]);
    assert_eq!(view.rows[1].amount, 45.67);
    assert_eq!(view.rows[0].amount, 1250.0);
    assert!(view.rows[1].has_receipt);
    assert_eq!(view.summary.receipt_count, 1);
    assert_eq!(view.summary.reimbursement_count, 1);
    assert_eq!(view.options.departments, ["Engineering"]);
    assert!(store.payload().is_some(), "successful fetch is cached");
}

#[tokio::test]
async fn failed_fetch_falls_back_to_cached_snapshot() {
    let store = MockCacheStore::default();
    SnapshotCache::new(Arc::new(store.clone())).save(&coffee_and_hotel());

    let service = service(
        ScriptedSource::new(vec![Err(SpendViewError::Network("connection reset".into()))]),
        store,
    );
    let view =
        service.refreshed_view(&FilterSpec::default(), &SortSpec::default()).await.unwrap();

    assert_eq!(view.origin, DataOrigin::Cache);
    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.warnings.len(), 1);
    assert!(view.warnings[0].contains("UpstreamUnavailable"));
}

#[tokio::test]
async fn failed_fetch_without_cache_surfaces_the_error() {
    let service = service(
        ScriptedSource::new(vec![Err(SpendViewError::UpstreamAuth { status: 401, body: "bad".into() })]),
        MockCacheStore::default(),
    );

    let err = service.refresh().await.unwrap_err();
    assert!(matches!(err, SpendViewError::UpstreamAuth { status: 401, .. }));
}

#[tokio::test]
async fn stale_snapshot_is_not_used() {
    let store = MockCacheStore::default();
    SnapshotCache::new(Arc::new(store.clone()))
        .save_at(&coffee_and_hotel(), Utc::now() - Duration::hours(25));

    let service = service(ScriptedSource::new(vec![Err(SpendViewError::Network("down".into()))]), store);
    assert!(service.refresh().await.is_err());
}

#[tokio::test]
async fn cache_write_failure_does_not_fail_the_fetch() {
    let service = service(
        ScriptedSource::new(vec![Ok(coffee_and_hotel())]),
        MockCacheStore::default().failing_writes(),
    );

    let dataset = service.fetch_live().await.unwrap();
    assert_eq!(dataset.transactions.len(), 1);
    assert!(service.cache().load().is_none());
}

#[tokio::test]
async fn corrupted_snapshot_is_cleared_on_load() {
    let store = MockCacheStore::with_payload("{not json");
    let cache = SnapshotCache::new(Arc::new(store.clone()));

    assert!(cache.load().is_none());
    assert!(store.payload().is_none());
}

#[tokio::test]
async fn export_follows_filters_and_sort() {
    let service = service(ScriptedSource::new(vec![Ok(coffee_and_hotel())]), MockCacheStore::default());
    let filters = FilterSpec {
        transaction_type: Selection::any_of(["card_transaction", "reimbursement"]),
        ..Default::default()
    };

    let csv = service
        .export_csv(&filters, &SortSpec::new(SortColumn::Amount, SortDirection::Asc))
        .await
        .unwrap();

    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("Coffee Shop"));
    assert!(lines[2].contains("Hotel"));
    assert!(lines[2].contains(r#""Reimbursement""#));
}

#[tokio::test]
async fn department_filter_narrows_the_view() {
    let service = service(ScriptedSource::new(vec![Ok(coffee_and_hotel())]), MockCacheStore::default());
    let filters = FilterSpec { department: Selection::any_of(["Engineering"]), ..Default::default() };

    let view = service.view(&filters, &SortSpec::default()).await.unwrap();
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].id, "t1");
    assert_eq!(view.options.departments, ["Engineering"]);
}

#[tokio::test]
async fn filter_changes_and_export_reuse_the_loaded_dataset() {
    let source = ScriptedSource::new(vec![
        Ok(coffee_and_hotel()),
        Ok(ProviderDataset::default()),
        Ok(ProviderDataset::default()),
    ]);
    let service = service(source.clone(), MockCacheStore::default());
    let engineering =
        FilterSpec { department: Selection::any_of(["Engineering"]), ..Default::default() };

    let first = service.view(&FilterSpec::default(), &SortSpec::default()).await.unwrap();
    let narrowed = service.view(&engineering, &SortSpec::default()).await.unwrap();
    let csv = service.export_csv(&FilterSpec::default(), &SortSpec::default()).await.unwrap();

    assert_eq!(source.calls_remaining(), 2, "only the first view reaches the provider");
    assert_eq!(first.origin, DataOrigin::Live);
    assert_eq!(narrowed.origin, DataOrigin::Cache);
    assert_eq!(narrowed.rows.len(), 1);
    assert_eq!(csv.lines().count(), 3);
}

#[tokio::test]
async fn explicit_refresh_replaces_the_cached_dataset() {
    let store = MockCacheStore::default();
    SnapshotCache::new(Arc::new(store.clone())).save(&coffee_and_hotel());

    let source = ScriptedSource::new(vec![Ok(ProviderDataset::default())]);
    let service = service(source.clone(), store);

    let cached = service.view(&FilterSpec::default(), &SortSpec::default()).await.unwrap();
    assert_eq!(cached.rows.len(), 2);
    assert_eq!(source.calls_remaining(), 1);

    let fresh =
        service.refreshed_view(&FilterSpec::default(), &SortSpec::default()).await.unwrap();
    assert_eq!(fresh.origin, DataOrigin::Live);
    assert!(fresh.rows.is_empty());

    let after = service.view(&FilterSpec::default(), &SortSpec::default()).await.unwrap();
    assert!(after.rows.is_empty(), "views follow the refreshed snapshot");
}

#[test]
fn future_dated_snapshot_is_not_loaded() {
    let cache = SnapshotCache::new(Arc::new(MockCacheStore::default()));
    cache.save_at(&coffee_and_hotel(), Utc::now() + Duration::days(3650));

    assert!(cache.load().is_none());
}
