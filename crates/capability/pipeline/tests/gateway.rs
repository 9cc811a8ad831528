use async_trait::async_trait;
use domain::{EventKind, Reading, ReadingSink, RegisterValue};
use plcgw_pipeline::{DestinationReport, GatewayConfig, PersistenceGateway, SaveOutcome};
use plcgw_storage::{InMemoryReadingStore, ReadingStore, StorageError, StorageErrorKind};
use plcgw_telemetry::{RecordingEventSink, TelemetryMetrics};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn reading(plc_id: u32) -> Reading {
    let mut values = BTreeMap::new();
    values.insert("grammage_actual".to_string(), RegisterValue::Float(80.0));
    Reading::new(plc_id, format!("line-{plc_id}"), 1_000, values)
}

struct Fixture {
    gateway: PersistenceGateway,
    local: Arc<InMemoryReadingStore>,
    cloud: Arc<InMemoryReadingStore>,
    events: Arc<RecordingEventSink>,
    metrics: Arc<TelemetryMetrics>,
}

fn fixture() -> Fixture {
    let local = Arc::new(InMemoryReadingStore::new());
    let cloud = Arc::new(InMemoryReadingStore::new());
    let events = Arc::new(RecordingEventSink::new());
    let metrics = Arc::new(TelemetryMetrics::new());
    let gateway = PersistenceGateway::builder()
        .destination("local", local.clone())
        .destination("cloud", cloud.clone())
        .events(events.clone())
        .metrics(metrics.clone())
        .build();
    Fixture {
        gateway,
        local,
        cloud,
        events,
        metrics,
    }
}

fn outcome(reports: &[DestinationReport], destination: &str) -> SaveOutcome {
    reports
        .iter()
        .find(|r| r.destination == destination)
        .map(|r| r.outcome)
        .unwrap()
}

#[tokio::test]
async fn save_writes_every_destination() {
    let f = fixture();
    let reports = f.gateway.save(&reading(1)).await;

    assert_eq!(outcome(&reports, "local"), SaveOutcome::Written);
    assert_eq!(outcome(&reports, "cloud"), SaveOutcome::Written);
    assert_eq!(f.local.len(), 1);
    assert_eq!(f.cloud.len(), 1);
    assert_eq!(f.metrics.snapshot().destination_writes_ok, 2);
}

#[tokio::test(start_paused = true)]
async fn unavailable_destination_is_skipped_within_retry_interval() {
    let f = fixture();
    f.cloud.set_failure(Some(StorageErrorKind::Connectivity));

    let first = f.gateway.save(&reading(1)).await;
    assert_eq!(
        outcome(&first, "cloud"),
        SaveOutcome::Failed(StorageErrorKind::Connectivity)
    );
    assert_eq!(outcome(&first, "local"), SaveOutcome::Written);
    assert_eq!(f.events.count(EventKind::DatabaseError), 1);

    tokio::time::advance(Duration::from_secs(30)).await;
    let second = f.gateway.save(&reading(1)).await;
    assert_eq!(outcome(&second, "cloud"), SaveOutcome::Skipped);
    assert_eq!(outcome(&second, "local"), SaveOutcome::Written);
    assert_eq!(f.cloud.write_calls(), 1);
    assert_eq!(f.cloud.probe_calls(), 0);
    assert_eq!(f.local.len(), 2);
    assert_eq!(f.events.count(EventKind::DatabaseError), 1);
    assert_eq!(f.metrics.snapshot().destination_writes_skipped, 1);
}

#[tokio::test(start_paused = true)]
async fn destination_is_retried_after_retry_interval() {
    let f = fixture();
    f.cloud.set_failure(Some(StorageErrorKind::Connectivity));
    f.gateway.save(&reading(1)).await;

    tokio::time::advance(Duration::from_secs(61)).await;
    let still_down = f.gateway.save(&reading(1)).await;
    assert_eq!(
        outcome(&still_down, "cloud"),
        SaveOutcome::Failed(StorageErrorKind::Connectivity)
    );
    assert_eq!(f.cloud.probe_calls(), 1);
    assert_eq!(f.cloud.write_calls(), 1);
    assert_eq!(f.events.count(EventKind::DatabaseError), 2);

    f.cloud.set_failure(None);
    tokio::time::advance(Duration::from_secs(61)).await;
    let recovered = f.gateway.save(&reading(2)).await;
    assert_eq!(outcome(&recovered, "cloud"), SaveOutcome::Written);
    assert_eq!(f.cloud.probe_calls(), 2);
    assert_eq!(f.cloud.len(), 1);
    assert_eq!(f.events.count(EventKind::DatabaseRecovered), 1);

    let statuses = f.gateway.statuses().await;
    assert!(statuses.iter().all(|s| s.available));
}

#[tokio::test]
async fn query_errors_do_not_trip_the_breaker() {
    let f = fixture();
    f.local.set_failure(Some(StorageErrorKind::Query));

    let first = f.gateway.save(&reading(1)).await;
    assert_eq!(
        outcome(&first, "local"),
        SaveOutcome::Failed(StorageErrorKind::Query)
    );
    let second = f.gateway.save(&reading(1)).await;
    assert_eq!(
        outcome(&second, "local"),
        SaveOutcome::Failed(StorageErrorKind::Query)
    );

    assert_eq!(f.local.write_calls(), 2);
    assert_eq!(f.local.probe_calls(), 0);
    assert_eq!(f.events.count(EventKind::DatabaseError), 0);
    assert_eq!(f.cloud.len(), 2);
}

#[tokio::test]
async fn verify_all_seeds_health() {
    let f = fixture();
    f.local.set_failure(Some(StorageErrorKind::Connectivity));

    let statuses = f.gateway.verify_all().await;
    let local = statuses.iter().find(|s| s.destination == "local").unwrap();
    let cloud = statuses.iter().find(|s| s.destination == "cloud").unwrap();
    assert!(!local.available);
    assert!(cloud.available);
    assert_eq!(f.events.count(EventKind::DatabaseError), 1);

    // 启动探测失败后立即写入，处于重试间隔内
    let reports = f.gateway.save(&reading(1)).await;
    assert_eq!(outcome(&reports, "local"), SaveOutcome::Skipped);
    assert_eq!(f.local.write_calls(), 0);
}

struct SlowStore {
    writes: AtomicUsize,
}

#[async_trait]
impl ReadingStore for SlowStore {
    async fn probe(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn write_reading(&self, _reading: &Reading) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }

    async fn close(&self) {}
}

#[tokio::test(start_paused = true)]
async fn write_timeout_counts_as_connectivity_failure() {
    let slow = Arc::new(SlowStore {
        writes: AtomicUsize::new(0),
    });
    let events = Arc::new(RecordingEventSink::new());
    let gateway = PersistenceGateway::builder()
        .destination("cloud", slow.clone())
        .events(events.clone())
        .config(GatewayConfig {
            retry_interval: Duration::from_secs(60),
            write_timeout: Duration::from_secs(10),
        })
        .build();

    let reports = gateway.save(&reading(1)).await;
    assert_eq!(
        outcome(&reports, "cloud"),
        SaveOutcome::Failed(StorageErrorKind::Connectivity)
    );
    assert_eq!(slow.writes.load(Ordering::SeqCst), 1);
    assert_eq!(events.count(EventKind::DatabaseError), 1);
}

#[tokio::test]
async fn close_waits_for_submitted_readings() {
    let f = fixture();
    for plc_id in 1..=3 {
        f.gateway.submit(Arc::new(reading(plc_id)));
    }
    f.gateway.close().await;

    assert_eq!(f.local.len(), 3);
    assert_eq!(f.cloud.len(), 3);
    assert!(f.local.is_closed());
    assert!(f.cloud.is_closed());

    f.gateway.submit(Arc::new(reading(4)));
    tokio::task::yield_now().await;
    assert_eq!(f.local.len(), 3);
}
