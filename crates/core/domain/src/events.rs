//! 领域事件与外部协作者接口。
//!
//! 核心组件只依赖这里的窄接口，日志格式化与输出由外部实现（见 `plcgw-telemetry`）。

use crate::data::SharedReading;
use async_trait::async_trait;

/// 领域事件类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ServiceStarted,
    ServiceStopped,
    PlcConnected,
    PlcDisconnected,
    PlcNoResponse,
    PlcReconnected,
    DatabaseError,
    DatabaseRecovered,
}

/// 事件严重级别。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl EventKind {
    pub fn severity(self) -> Severity {
        match self {
            EventKind::PlcNoResponse | EventKind::DatabaseError => Severity::Error,
            EventKind::PlcDisconnected => Severity::Warn,
            _ => Severity::Info,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::ServiceStarted => "service_started",
            EventKind::ServiceStopped => "service_stopped",
            EventKind::PlcConnected => "plc_connected",
            EventKind::PlcDisconnected => "plc_disconnected",
            EventKind::PlcNoResponse => "plc_no_response",
            EventKind::PlcReconnected => "plc_reconnected",
            EventKind::DatabaseError => "database_error",
            EventKind::DatabaseRecovered => "database_recovered",
        }
    }
}

/// 结构化领域事件。
#[derive(Debug, Clone, PartialEq)]
pub struct DomainEvent {
    pub kind: EventKind,
    pub message: String,
    pub plc_id: Option<u32>,
    pub at_ms: i64,
}

impl DomainEvent {
    pub fn new(kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            plc_id: None,
            at_ms: crate::data::now_epoch_ms(),
        }
    }

    pub fn for_plc(kind: EventKind, plc_id: u32, message: impl Into<String>) -> Self {
        Self {
            plc_id: Some(plc_id),
            ..Self::new(kind, message)
        }
    }
}

/// 领域事件接收器。
pub trait EventSink: Send + Sync {
    fn record(&self, event: DomainEvent);
}

/// 面向运维人员的消息输出。
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);
    fn success(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// 读数下游（持久化网关），`submit` 不等待写入完成。
#[async_trait]
pub trait ReadingSink: Send + Sync {
    fn submit(&self, reading: SharedReading);

    /// 停止接收新读数并等待在途写入结束。
    async fn close(&self);
}

/// 空事件接收器（用于接线与测试）。
#[derive(Debug, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn record(&self, _event: DomainEvent) {}
}

/// 空消息输出（用于接线与测试）。
#[derive(Debug, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn info(&self, _message: &str) {}
    fn success(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}
