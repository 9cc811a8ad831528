use crate::error::PollingError;
use domain::{ConnectionStatus, Notifier, ReadingSink};
use plcgw_protocol::{PlcConnection, ProtocolError, StatusHandle};
use plcgw_telemetry::{MetricsSnapshot, TelemetryMetrics, new_pass_id};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

/// 编排参数
#[derive(Debug, Clone)]
pub struct PollingConfig {
    /// 两次 pass 之间的间隔
    pub read_interval: Duration,
    /// 批量连接重试间隔，也是读失败后发起重连前的等待
    pub reconnect_interval: Duration,
    /// 批量连接阶段每个 PLC 的最大尝试次数
    pub max_retries: u32,
}

/// 一次 pass 的结果。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// pass 开始时已连接的 PLC 数
    pub connected: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// 未连接而跳过的 PLC 数
    pub skipped: usize,
}

struct PlcSlot {
    name: String,
    connection: Arc<Mutex<PlcConnection>>,
    status: StatusHandle,
    reconnect_pending: Arc<AtomicBool>,
}

/// PLC 轮询编排器。
pub struct PollingOrchestrator {
    slots: Vec<PlcSlot>,
    config: PollingConfig,
    sink: Arc<dyn ReadingSink>,
    notifier: Arc<dyn Notifier>,
    metrics: Arc<TelemetryMetrics>,
    cancel: CancellationToken,
    pass_lock: Mutex<()>,
    reconnects: std::sync::Mutex<JoinSet<()>>,
}

impl PollingOrchestrator {
    pub fn new(
        config: PollingConfig,
        connections: Vec<PlcConnection>,
        sink: Arc<dyn ReadingSink>,
        notifier: Arc<dyn Notifier>,
        metrics: Arc<TelemetryMetrics>,
        cancel: CancellationToken,
    ) -> Self {
        let slots = connections
            .into_iter()
            .map(|connection| PlcSlot {
                name: connection.endpoint().name.clone(),
                status: connection.status_handle(),
                connection: Arc::new(Mutex::new(connection)),
                reconnect_pending: Arc::new(AtomicBool::new(false)),
            })
            .collect();

        Self {
            slots,
            config,
            sink,
            notifier,
            metrics,
            cancel,
            pass_lock: Mutex::new(()),
            reconnects: std::sync::Mutex::new(JoinSet::new()),
        }
    }

    pub fn statuses(&self) -> Vec<ConnectionStatus> {
        self.slots.iter().map(|slot| slot.status.snapshot()).collect()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// 批量连接，返回成功连接的 PLC 数。部分成功是正常结果。
    pub async fn connect_all(&self) -> usize {
        let retries = self.config.max_retries.max(1);
        let mut attempts = JoinSet::new();

        for slot in &self.slots {
            let connection = Arc::clone(&slot.connection);
            let name = slot.name.clone();
            let cancel = self.cancel.clone();
            let notifier = Arc::clone(&self.notifier);
            let interval = self.config.reconnect_interval;

            attempts.spawn(
                async move {
                    let mut connection = connection.lock().await;
                    for attempt in 1..=retries {
                        match connection.connect(&cancel).await {
                            Ok(()) => return true,
                            Err(err) if err.is_cancelled() => return false,
                            Err(err) => {
                                notifier.warn(&format!(
                                    "{name}: connect attempt {attempt}/{retries} failed: {}",
                                    err.reason()
                                ));
                            }
                        }
                        if attempt < retries {
                            tokio::select! {
                                biased;
                                _ = cancel.cancelled() => return false,
                                _ = tokio::time::sleep(interval) => {}
                            }
                        }
                    }
                    notifier.error(&format!("{name}: unreachable after {retries} attempts"));
                    false
                }
                .in_current_span(),
            );
        }

        let mut connected = 0;
        while let Some(joined) = attempts.join_next().await {
            match joined {
                Ok(true) => connected += 1,
                Ok(false) => {}
                Err(err) => warn!(target: "plcgw.polling", error = %err, "connect task aborted"),
            }
        }

        if self.cancel.is_cancelled() {
            debug!(target: "plcgw.polling", connected, "bulk connect interrupted by cancellation");
            return connected;
        }

        let total = self.slots.len();
        let message = format!("{connected}/{total} PLCs connected");
        if connected == total {
            self.notifier.success(&message);
        } else if connected == 0 {
            self.notifier.error(&message);
        } else {
            self.notifier.warn(&message);
        }
        connected
    }

    /// 批量连接后循环执行 pass，直到收到取消信号。
    pub async fn run(&self) -> Result<(), PollingError> {
        if self.slots.is_empty() {
            return Err(PollingError::NoConnections);
        }

        info!(target: "plcgw.polling", plcs = self.slots.len(), "polling started");
        self.connect_all().await;

        while !self.cancel.is_cancelled() {
            self.read_pass().await;
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(self.config.read_interval) => {}
            }
        }

        debug!(target: "plcgw.polling", "cancellation observed, leaving read loop");
        self.shutdown().await;
        Ok(())
    }

    /// 读取所有已连接的 PLC。同一时刻最多一个 pass。
    pub async fn read_pass(&self) -> PassSummary {
        let span = info_span!(target: "plcgw.polling", "pass", pass_id = %new_pass_id());
        self.read_pass_inner().instrument(span).await
    }

    async fn read_pass_inner(&self) -> PassSummary {
        let _pass = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return PassSummary::default(),
            guard = self.pass_lock.lock() => guard,
        };

        self.metrics.record_pass();
        let mut summary = PassSummary::default();
        let mut reads = JoinSet::new();

        for (index, slot) in self.slots.iter().enumerate() {
            if !slot.status.is_connected() {
                summary.skipped += 1;
                debug!(target: "plcgw.polling", plc = %slot.name, "read skipped, not connected");
                self.schedule_reconnect(slot);
                continue;
            }

            summary.connected += 1;
            let connection = Arc::clone(&slot.connection);
            let cancel = self.cancel.clone();
            reads.spawn(
                async move {
                    let mut connection = connection.lock().await;
                    let result = connection.read_cycle(&cancel).await;
                    (index, result, connection.last_fallbacks())
                }
                .in_current_span(),
            );
        }

        while let Some(joined) = reads.join_next().await {
            let (index, result, fallbacks) = match joined {
                Ok(outcome) => outcome,
                Err(err) => {
                    summary.failed += 1;
                    warn!(target: "plcgw.polling", error = %err, "read task aborted");
                    continue;
                }
            };
            let slot = &self.slots[index];

            match result {
                Ok(reading) => {
                    summary.succeeded += 1;
                    self.metrics.record_reading_ok(fallbacks as u64);
                    self.sink.submit(Arc::new(reading));
                }
                Err(ProtocolError::Cancelled) => {
                    debug!(target: "plcgw.polling", plc = %slot.name, "read cancelled");
                }
                Err(err) => {
                    summary.failed += 1;
                    self.metrics.record_reading_failed();
                    self.notifier
                        .error(&format!("{}: read failed: {}", slot.name, err.reason()));
                    self.schedule_reconnect(slot);
                }
            }
        }

        if !self.cancel.is_cancelled() {
            self.report(&summary);
        }
        summary
    }

    fn report(&self, summary: &PassSummary) {
        let message = format!(
            "pass complete: {}/{} PLCs read",
            summary.succeeded, summary.connected
        );
        if summary.connected == 0 {
            // 无已连接 PLC，重连在后台进行
            self.notifier.warn(&message);
        } else if summary.succeeded == summary.connected {
            self.notifier.success(&message);
        } else if summary.succeeded > 0 {
            self.notifier.warn(&message);
        } else {
            self.notifier.error(&message);
        }
    }

    /// 经过 `reconnect_interval` 后若仍未连接则重连。
    fn schedule_reconnect(&self, slot: &PlcSlot) {
        if self.cancel.is_cancelled() || slot.reconnect_pending.swap(true, Ordering::SeqCst) {
            return;
        }

        let connection = Arc::clone(&slot.connection);
        let status = slot.status.clone();
        let pending = Arc::clone(&slot.reconnect_pending);
        let name = slot.name.clone();
        let cancel = self.cancel.clone();
        let notifier = Arc::clone(&self.notifier);
        let metrics = Arc::clone(&self.metrics);
        let delay = self.config.reconnect_interval;

        debug!(target: "plcgw.polling", plc = %name, ?delay, "reconnect scheduled");
        let mut tasks = self.lock_reconnects();
        while tasks.try_join_next().is_some() {}
        tasks.spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    pending.store(false, Ordering::SeqCst);
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }

            if !status.is_connected() {
                metrics.record_reconnect_attempt();
                let result = {
                    let mut connection = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            pending.store(false, Ordering::SeqCst);
                            return;
                        }
                        guard = connection.lock() => guard,
                    };
                    connection.reconnect(&cancel).await
                };
                match result {
                    Ok(()) => notifier.success(&format!("{name}: reconnected")),
                    Err(err) if err.is_cancelled() => {}
                    Err(err) => {
                        notifier.warn(&format!("{name}: reconnect failed: {}", err.reason()))
                    }
                }
            }
            pending.store(false, Ordering::SeqCst);
        });
    }

    /// 停止重连任务，断开全部连接，关闭下游。
    async fn shutdown(&self) {
        let mut reconnects = std::mem::take(&mut *self.lock_reconnects());
        reconnects.shutdown().await;

        for slot in &self.slots {
            slot.connection.lock().await.disconnect();
        }

        self.sink.close().await;
        info!(target: "plcgw.polling", "polling stopped");
    }

    fn lock_reconnects(&self) -> std::sync::MutexGuard<'_, JoinSet<()>> {
        match self.reconnects.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
