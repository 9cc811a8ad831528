//! 持久化网关：local / cloud 双目的地，各自独立熔断。
//!
//! 每条读数对每个启用的目的地最多写一次，失败不排队不重试；
//! 只重试目的地的可用性。

use async_trait::async_trait;
use domain::{DomainEvent, EventKind, EventSink, Notifier, Reading, ReadingSink, SharedReading};
use futures::future::join_all;
use plcgw_storage::{ReadingStore, StorageError, StorageErrorKind};
use plcgw_telemetry::TelemetryMetrics;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// 目的地不可用后的重试间隔。
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(60);

/// 单次探测或写入的上限，超时按连接类故障处理。
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// 网关参数。
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub retry_interval: Duration,
    pub write_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            retry_interval: DEFAULT_RETRY_INTERVAL,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }
}

/// 目的地健康状态，只由网关在持有该目的地锁时修改。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestinationHealth {
    pub available: bool,
    pub last_attempt_at: Option<Instant>,
}

impl Default for DestinationHealth {
    fn default() -> Self {
        Self {
            available: true,
            last_attempt_at: None,
        }
    }
}

/// 单个目的地的写入结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Written,
    /// 处于重试间隔内，未尝试
    Skipped,
    Failed(StorageErrorKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationReport {
    pub destination: String,
    pub outcome: SaveOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationStatus {
    pub destination: String,
    pub available: bool,
}

struct Destination {
    name: String,
    store: Arc<dyn ReadingStore>,
    health: Mutex<DestinationHealth>,
}

struct GatewayInner {
    destinations: Vec<Destination>,
    config: GatewayConfig,
    events: Arc<dyn EventSink>,
    notifier: Arc<dyn Notifier>,
    metrics: Arc<TelemetryMetrics>,
    tasks: std::sync::Mutex<JoinSet<()>>,
    closed: AtomicBool,
}

/// 持久化网关入口。
#[derive(Clone)]
pub struct PersistenceGateway {
    inner: Arc<GatewayInner>,
}

/// 网关构造器。
pub struct PersistenceGatewayBuilder {
    destinations: Vec<Destination>,
    config: GatewayConfig,
    events: Arc<dyn EventSink>,
    notifier: Arc<dyn Notifier>,
    metrics: Arc<TelemetryMetrics>,
}

impl PersistenceGatewayBuilder {
    pub fn destination(mut self, name: impl Into<String>, store: Arc<dyn ReadingStore>) -> Self {
        self.destinations.push(Destination {
            name: name.into(),
            store,
            health: Mutex::new(DestinationHealth::default()),
        });
        self
    }

    pub fn config(mut self, config: GatewayConfig) -> Self {
        self.config = config;
        self
    }

    pub fn events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn metrics(mut self, metrics: Arc<TelemetryMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn build(self) -> PersistenceGateway {
        PersistenceGateway {
            inner: Arc::new(GatewayInner {
                destinations: self.destinations,
                config: self.config,
                events: self.events,
                notifier: self.notifier,
                metrics: self.metrics,
                tasks: std::sync::Mutex::new(JoinSet::new()),
                closed: AtomicBool::new(false),
            }),
        }
    }
}

impl PersistenceGateway {
    pub fn builder() -> PersistenceGatewayBuilder {
        PersistenceGatewayBuilder {
            destinations: Vec::new(),
            config: GatewayConfig::default(),
            events: Arc::new(domain::NoopEventSink),
            notifier: Arc::new(domain::NoopNotifier),
            metrics: Arc::new(TelemetryMetrics::new()),
        }
    }

    pub fn destination_names(&self) -> Vec<String> {
        self.inner
            .destinations
            .iter()
            .map(|d| d.name.clone())
            .collect()
    }

    /// 各目的地当前可用性。
    pub async fn statuses(&self) -> Vec<DestinationStatus> {
        let mut statuses = Vec::with_capacity(self.inner.destinations.len());
        for destination in &self.inner.destinations {
            let health = destination.health.lock().await;
            statuses.push(DestinationStatus {
                destination: destination.name.clone(),
                available: health.available,
            });
        }
        statuses
    }

    /// 启动时逐个探测，设置初始健康状态。
    pub async fn verify_all(&self) -> Vec<DestinationStatus> {
        let checks = self.inner.destinations.iter().map(|destination| async move {
            let mut health = destination.health.lock().await;
            let available = match self.probe(destination).await {
                Ok(()) => {
                    info!(target: "plcgw.pipeline", destination = %destination.name, "destination reachable");
                    health.available = true;
                    true
                }
                Err(err) if err.is_connectivity() => {
                    self.mark_unavailable(destination, &mut health, &err);
                    self.inner.notifier.warn(&format!(
                        "{} database unreachable, will retry",
                        destination.name
                    ));
                    false
                }
                Err(err) => {
                    warn!(target: "plcgw.pipeline", destination = %destination.name, error = %err, "probe query failed");
                    health.available
                }
            };
            DestinationStatus {
                destination: destination.name.clone(),
                available,
            }
        });
        join_all(checks).await
    }

    /// 向所有目的地并发写入一条读数。
    pub async fn save(&self, reading: &Reading) -> Vec<DestinationReport> {
        let attempts = self
            .inner
            .destinations
            .iter()
            .map(|destination| async move {
                let outcome = self.save_to(destination, reading).await;
                DestinationReport {
                    destination: destination.name.clone(),
                    outcome,
                }
            });
        join_all(attempts).await
    }

    async fn save_to(&self, destination: &Destination, reading: &Reading) -> SaveOutcome {
        let mut health = destination.health.lock().await;
        let metrics = &self.inner.metrics;

        if !health.available {
            let waiting = health
                .last_attempt_at
                .is_some_and(|at| at.elapsed() < self.inner.config.retry_interval);
            if waiting {
                metrics.record_destination_write_skipped();
                return SaveOutcome::Skipped;
            }

            match self.probe(destination).await {
                Ok(()) => {
                    health.available = true;
                    info!(target: "plcgw.pipeline", destination = %destination.name, "destination recovered");
                    self.inner.events.record(DomainEvent::new(
                        EventKind::DatabaseRecovered,
                        format!("{} database recovered", destination.name),
                    ));
                    self.inner
                        .notifier
                        .success(&format!("{} database connection restored", destination.name));
                }
                Err(err) => {
                    metrics.record_destination_write_failed();
                    if err.is_connectivity() {
                        self.mark_unavailable(destination, &mut health, &err);
                    } else {
                        health.last_attempt_at = Some(Instant::now());
                        warn!(target: "plcgw.pipeline", destination = %destination.name, error = %err, "probe query failed");
                    }
                    return SaveOutcome::Failed(err.kind());
                }
            }
        }

        let write = tokio::time::timeout(
            self.inner.config.write_timeout,
            destination.store.write_reading(reading),
        )
        .await
        .unwrap_or_else(|_| Err(StorageError::connectivity("write timed out")));

        match write {
            Ok(()) => {
                health.available = true;
                metrics.record_destination_write_ok();
                debug!(
                    target: "plcgw.pipeline",
                    destination = %destination.name,
                    plc = %reading.plc_name(),
                    "reading saved"
                );
                SaveOutcome::Written
            }
            Err(err) if err.is_connectivity() => {
                metrics.record_destination_write_failed();
                self.mark_unavailable(destination, &mut health, &err);
                SaveOutcome::Failed(StorageErrorKind::Connectivity)
            }
            Err(err) => {
                metrics.record_destination_write_failed();
                warn!(
                    target: "plcgw.pipeline",
                    destination = %destination.name,
                    plc = %reading.plc_name(),
                    error = %err,
                    "write rejected"
                );
                SaveOutcome::Failed(StorageErrorKind::Query)
            }
        }
    }

    async fn probe(&self, destination: &Destination) -> Result<(), StorageError> {
        tokio::time::timeout(self.inner.config.write_timeout, destination.store.probe())
            .await
            .unwrap_or_else(|_| Err(StorageError::connectivity("probe timed out")))
    }

    fn mark_unavailable(
        &self,
        destination: &Destination,
        health: &mut DestinationHealth,
        err: &StorageError,
    ) {
        health.available = false;
        health.last_attempt_at = Some(Instant::now());
        warn!(
            target: "plcgw.pipeline",
            destination = %destination.name,
            error = %err,
            retry_in = ?self.inner.config.retry_interval,
            "destination unavailable"
        );
        self.inner.events.record(DomainEvent::new(
            EventKind::DatabaseError,
            format!("{} database error: {}", destination.name, err.message()),
        ));
    }

    fn lock_tasks(&self) -> std::sync::MutexGuard<'_, JoinSet<()>> {
        match self.inner.tasks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl ReadingSink for PersistenceGateway {
    fn submit(&self, reading: SharedReading) {
        if self.inner.closed.load(Ordering::SeqCst) {
            debug!(target: "plcgw.pipeline", plc = %reading.plc_name(), "gateway closed, reading dropped");
            return;
        }
        let gateway = self.clone();
        let mut tasks = self.lock_tasks();
        while tasks.try_join_next().is_some() {}
        tasks.spawn(async move {
            gateway.save(&reading).await;
        });
    }

    async fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        let mut tasks = std::mem::take(&mut *self.lock_tasks());
        while tasks.join_next().await.is_some() {}
        for destination in &self.inner.destinations {
            destination.store.close().await;
        }
        info!(target: "plcgw.pipeline", "persistence gateway closed");
    }
}
