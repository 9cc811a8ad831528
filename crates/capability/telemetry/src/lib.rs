//! 追踪、领域事件输出与运行计数。

mod events;

pub use events::{RecordingEventSink, RecordingNotifier, TracingEventSink, TracingNotifier};

use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 运行计数快照。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub passes: u64,
    pub readings_ok: u64,
    pub readings_failed: u64,
    pub register_fallbacks: u64,
    pub reconnect_attempts: u64,
    pub destination_writes_ok: u64,
    pub destination_writes_failed: u64,
    pub destination_writes_skipped: u64,
}

/// 运行计数，由编排器与持久化网关共享同一实例。
#[derive(Debug, Default)]
pub struct TelemetryMetrics {
    passes: AtomicU64,
    readings_ok: AtomicU64,
    readings_failed: AtomicU64,
    register_fallbacks: AtomicU64,
    reconnect_attempts: AtomicU64,
    destination_writes_ok: AtomicU64,
    destination_writes_failed: AtomicU64,
    destination_writes_skipped: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            passes: self.passes.load(Ordering::Relaxed),
            readings_ok: self.readings_ok.load(Ordering::Relaxed),
            readings_failed: self.readings_failed.load(Ordering::Relaxed),
            register_fallbacks: self.register_fallbacks.load(Ordering::Relaxed),
            reconnect_attempts: self.reconnect_attempts.load(Ordering::Relaxed),
            destination_writes_ok: self.destination_writes_ok.load(Ordering::Relaxed),
            destination_writes_failed: self.destination_writes_failed.load(Ordering::Relaxed),
            destination_writes_skipped: self.destination_writes_skipped.load(Ordering::Relaxed),
        }
    }

    /// 记录一次读周期（pass）。
    pub fn record_pass(&self) {
        self.passes.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录成功读数及其中回退为缺省值的寄存器数。
    pub fn record_reading_ok(&self, fallbacks: u64) {
        self.readings_ok.fetch_add(1, Ordering::Relaxed);
        self.register_fallbacks
            .fetch_add(fallbacks, Ordering::Relaxed);
    }

    pub fn record_reading_failed(&self) {
        self.readings_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reconnect_attempt(&self) {
        self.reconnect_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_destination_write_ok(&self) {
        self.destination_writes_ok.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_destination_write_failed(&self) {
        self.destination_writes_failed
            .fetch_add(1, Ordering::Relaxed);
    }

    /// 目的地处于熔断等待期，本次未尝试。
    pub fn record_destination_write_skipped(&self) {
        self.destination_writes_skipped
            .fetch_add(1, Ordering::Relaxed);
    }
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 pass_id。
pub fn new_pass_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
