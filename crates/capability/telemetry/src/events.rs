//! `EventSink` / `Notifier` 的 tracing 实现与测试用记录器。

use domain::{DomainEvent, EventKind, EventSink, Notifier, Severity};
use std::sync::Mutex;
use tracing::{error, info, warn};

/// 领域事件写入 tracing（target `plcgw.events`），级别按事件严重级别。
#[derive(Debug, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn record(&self, event: DomainEvent) {
        let kind = event.kind.as_str();
        let plc_id = event.plc_id;
        match event.kind.severity() {
            Severity::Info => {
                info!(target: "plcgw.events", kind, ?plc_id, at_ms = event.at_ms, "{}", event.message)
            }
            Severity::Warn => {
                warn!(target: "plcgw.events", kind, ?plc_id, at_ms = event.at_ms, "{}", event.message)
            }
            Severity::Error => {
                error!(target: "plcgw.events", kind, ?plc_id, at_ms = event.at_ms, "{}", event.message)
            }
        }
    }
}

/// 运维消息写入 tracing（target `plcgw.console`）。
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn info(&self, message: &str) {
        info!(target: "plcgw.console", "{message}");
    }

    fn success(&self, message: &str) {
        info!(target: "plcgw.console", outcome = "success", "{message}");
    }

    fn warn(&self, message: &str) {
        warn!(target: "plcgw.console", "{message}");
    }

    fn error(&self, message: &str) {
        error!(target: "plcgw.console", "{message}");
    }
}

/// 在内存中记录全部事件。
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.events().into_iter().map(|event| event.kind).collect()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.kinds().into_iter().filter(|k| *k == kind).count()
    }
}

impl EventSink for RecordingEventSink {
    fn record(&self, event: DomainEvent) {
        let mut guard = match self.events.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push(event);
    }
}

/// 在内存中记录运维消息，`(级别, 内容)`。
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(&'static str, String)> {
        match self.messages.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// 指定级别的消息内容。
    pub fn at_level(&self, level: &str) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }

    fn push(&self, level: &'static str, message: &str) {
        let mut guard = match self.messages.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push((level, message.to_string()));
    }
}

impl Notifier for RecordingNotifier {
    fn info(&self, message: &str) {
        self.push("info", message);
    }

    fn success(&self, message: &str) {
        self.push("success", message);
    }

    fn warn(&self, message: &str) {
        self.push("warn", message);
    }

    fn error(&self, message: &str) {
        self.push("error", message);
    }
}
