//! 采集网关共享领域模型。

pub mod data;
pub mod events;
pub mod status;

pub use data::{
    MemorySpace, Reading, RegisterDescriptor, RegisterKind, RegisterValue, SharedReading,
    now_epoch_ms,
};
pub use events::{
    DomainEvent, EventKind, EventSink, NoopEventSink, NoopNotifier, Notifier, ReadingSink,
    Severity,
};
pub use status::{ConnectionState, ConnectionStatus};
