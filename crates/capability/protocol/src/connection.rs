//! 单个 PLC 连接的状态机与读周期
//!
//! 状态：`Disconnected → Connecting → Connected`，任何失败回到 `Disconnected`。
//! 同一连接上同一时刻只允许一个操作（`&mut self` 保证），状态快照通过
//! [`StatusHandle`] 对外只读共享。

use crate::codec;
use crate::error::ProtocolError;
use crate::register_map::RegisterMap;
use crate::types::{ConnectionConfig, PlcEndpoint};
use domain::{
    ConnectionState, ConnectionStatus, DomainEvent, EventKind, EventSink, Reading,
    RegisterDescriptor, RegisterValue, now_epoch_ms,
};
use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, RwLock};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// 单次读取的接收缓冲区大小。
pub const READ_BUFFER_LEN: usize = 8192;

/// 连接状态的只读共享句柄。
#[derive(Debug, Clone)]
pub struct StatusHandle {
    inner: Arc<RwLock<ConnectionStatus>>,
}

impl StatusHandle {
    fn new(status: ConnectionStatus) -> Self {
        Self {
            inner: Arc::new(RwLock::new(status)),
        }
    }

    pub fn snapshot(&self) -> ConnectionStatus {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.snapshot().connected
    }

    fn update(&self, apply: impl FnOnce(&mut ConnectionStatus)) {
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        apply(&mut guard);
    }
}

/// 单个 PLC 连接。
pub struct PlcConnection {
    endpoint: PlcEndpoint,
    registers: Arc<RegisterMap>,
    config: ConnectionConfig,
    stream: Option<TcpStream>,
    state: ConnectionState,
    status: StatusHandle,
    events: Arc<dyn EventSink>,
    buffer: Box<[u8]>,
    last_fallbacks: usize,
}

impl PlcConnection {
    pub fn new(
        endpoint: PlcEndpoint,
        registers: Arc<RegisterMap>,
        config: ConnectionConfig,
        events: Arc<dyn EventSink>,
    ) -> Self {
        let status = StatusHandle::new(ConnectionStatus::new(endpoint.id, endpoint.name.clone()));
        Self {
            endpoint,
            registers,
            config,
            stream: None,
            state: ConnectionState::Disconnected,
            status,
            events,
            buffer: vec![0u8; READ_BUFFER_LEN].into_boxed_slice(),
            last_fallbacks: 0,
        }
    }

    pub fn endpoint(&self) -> &PlcEndpoint {
        &self.endpoint
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status.snapshot()
    }

    pub fn status_handle(&self) -> StatusHandle {
        self.status.clone()
    }

    /// 最近一次成功读周期中回退为缺省值的寄存器数。
    pub fn last_fallbacks(&self) -> usize {
        self.last_fallbacks
    }

    /// 建立连接。成功后重连计数清零。
    pub async fn connect(&mut self, cancel: &CancellationToken) -> Result<(), ProtocolError> {
        self.establish(cancel).await?;
        self.status.update(|s| s.reconnect_attempts = 0);
        Ok(())
    }

    /// 断开后等待固定间隔再连接。每次调用计数加一，连接成功后清零。
    pub async fn reconnect(&mut self, cancel: &CancellationToken) -> Result<(), ProtocolError> {
        self.status
            .update(|s| s.reconnect_attempts = s.reconnect_attempts.saturating_add(1));
        info!(
            target: "plcgw.protocol",
            plc = %self.endpoint.name,
            attempts = self.status.snapshot().reconnect_attempts,
            "reconnecting"
        );

        self.disconnect();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ProtocolError::Cancelled),
            _ = tokio::time::sleep(self.config.reconnect_grace) => {}
        }

        self.connect(cancel).await?;
        self.events.record(DomainEvent::for_plc(
            EventKind::PlcReconnected,
            self.endpoint.id,
            format!("{} reconnected", self.endpoint.name),
        ));
        Ok(())
    }

    /// 关闭连接，可重复调用；只有真实的状态变化才产生事件。
    pub fn disconnect(&mut self) {
        let had_stream = self.stream.take().is_some();
        if !had_stream && self.state == ConnectionState::Disconnected {
            return;
        }

        self.transition(ConnectionState::Disconnected);
        self.status.update(|s| s.status_message = "disconnected".to_string());
        info!(target: "plcgw.protocol", plc = %self.endpoint.name, "disconnected");
        self.events.record(DomainEvent::for_plc(
            EventKind::PlcDisconnected,
            self.endpoint.id,
            format!("{} disconnected", self.endpoint.name),
        ));
    }

    /// 按寄存器表顺序逐个读取，返回一条完整读数。
    ///
    /// 单寄存器超时或短响应时该字段取缺省值；连接级故障中止本周期并断开连接。
    /// 全部寄存器都超时按连接失效处理。
    pub async fn read_cycle(&mut self, cancel: &CancellationToken) -> Result<Reading, ProtocolError> {
        if self.state != ConnectionState::Connected || self.stream.is_none() {
            return Err(ProtocolError::NotConnected(self.endpoint.name.clone()));
        }

        let registers = Arc::clone(&self.registers);
        let timestamp_ms = now_epoch_ms();
        let mut values = BTreeMap::new();
        let mut timeouts = 0usize;
        let mut fallbacks = 0usize;

        for descriptor in registers.registers() {
            let value = match self.read_register(descriptor, cancel).await {
                Ok(Some(value)) => value,
                Ok(None) => {
                    fallbacks += 1;
                    RegisterValue::zero(descriptor.kind)
                }
                Err(ProtocolError::Cancelled) => return Err(ProtocolError::Cancelled),
                Err(err) if err.is_connection_fault() => {
                    self.fail(&err);
                    return Err(err);
                }
                Err(err) => {
                    if matches!(err, ProtocolError::Timeout(_)) {
                        timeouts += 1;
                    }
                    fallbacks += 1;
                    debug!(
                        target: "plcgw.protocol",
                        plc = %self.endpoint.name,
                        register = descriptor.name,
                        address = descriptor.address,
                        error = %err,
                        "register read failed, using default"
                    );
                    RegisterValue::zero(descriptor.kind)
                }
            };
            values.insert(descriptor.name.to_string(), value);
        }

        if !registers.is_empty() && timeouts == registers.len() {
            let err = ProtocolError::Timeout(format!("all {timeouts} registers timed out"));
            self.fail(&err);
            return Err(err);
        }

        self.last_fallbacks = fallbacks;
        let read_at = now_epoch_ms();
        self.status.update(|s| {
            s.last_read_at_ms = Some(read_at);
            s.status_message = "read ok".to_string();
        });
        debug!(
            target: "plcgw.protocol",
            plc = %self.endpoint.name,
            fields = values.len(),
            fallbacks,
            "read cycle complete"
        );

        Ok(Reading::new(
            self.endpoint.id,
            self.endpoint.name.clone(),
            timestamp_ms,
            values,
        ))
    }

    async fn establish(&mut self, cancel: &CancellationToken) -> Result<(), ProtocolError> {
        self.stream = None;
        self.transition(ConnectionState::Connecting);
        self.status.update(|s| s.status_message = "connecting".to_string());

        let addr = self.endpoint.address();
        let timeout = self.config.timeout;
        info!(target: "plcgw.protocol", plc = %self.endpoint.name, %addr, "connecting");

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ProtocolError::Cancelled),
            attempt = tokio::time::timeout(timeout, TcpStream::connect(addr.as_str())) => match attempt {
                Ok(Ok(stream)) => Ok(stream),
                Ok(Err(err)) => Err(ProtocolError::from_connect_error(err)),
                Err(_) => Err(ProtocolError::Timeout(format!("connect to {addr} exceeded {timeout:?}"))),
            },
        };

        match result {
            Ok(stream) => {
                if let Err(err) = stream.set_nodelay(true) {
                    debug!(target: "plcgw.protocol", error = %err, "set_nodelay failed");
                }
                self.stream = Some(stream);
                self.transition(ConnectionState::Connected);
                let now = now_epoch_ms();
                self.status.update(|s| {
                    s.last_connected_at_ms = Some(now);
                    s.status_message = "connected".to_string();
                });
                info!(target: "plcgw.protocol", plc = %self.endpoint.name, %addr, "connected");
                self.events.record(DomainEvent::for_plc(
                    EventKind::PlcConnected,
                    self.endpoint.id,
                    format!("{} connected at {addr}", self.endpoint.name),
                ));
                Ok(())
            }
            Err(ProtocolError::Cancelled) => {
                self.transition(ConnectionState::Disconnected);
                self.status.update(|s| s.status_message = "cancelled".to_string());
                Err(ProtocolError::Cancelled)
            }
            Err(err) => {
                self.transition(ConnectionState::Disconnected);
                let reason = err.reason();
                self.status.update(|s| s.status_message = reason.clone());
                warn!(
                    target: "plcgw.protocol",
                    plc = %self.endpoint.name,
                    %addr,
                    error = %err,
                    "connect failed"
                );
                self.events.record(DomainEvent::for_plc(
                    EventKind::PlcDisconnected,
                    self.endpoint.id,
                    format!("{} connect failed: {reason}", self.endpoint.name),
                ));
                Err(err)
            }
        }
    }

    async fn read_register(
        &mut self,
        descriptor: &RegisterDescriptor,
        cancel: &CancellationToken,
    ) -> Result<Option<RegisterValue>, ProtocolError> {
        let request = codec::build_request(descriptor.address, descriptor.word_count, descriptor.memory)?;
        let timeout = self.config.timeout;

        let Some(stream) = self.stream.as_mut() else {
            return Err(ProtocolError::NotConnected(self.endpoint.name.clone()));
        };
        let buffer = &mut self.buffer;

        // 协议没有请求编号，上一个超时请求的迟到响应在发送前丢弃
        discard_stale(stream, buffer)?;

        let exchange = async move {
            stream.write_all(&request).await?;
            stream.read(buffer).await
        };

        let received = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ProtocolError::Cancelled),
            result = tokio::time::timeout(timeout, exchange) => match result {
                Ok(Ok(0)) => return Err(ProtocolError::ConnectionClosed),
                Ok(Ok(n)) => n,
                Ok(Err(err)) => return Err(ProtocolError::from_connect_error(err)),
                Err(_) => {
                    return Err(ProtocolError::Timeout(format!(
                        "register {} at {} exceeded {timeout:?}",
                        descriptor.name, descriptor.address
                    )));
                }
            },
        };

        let words = codec::parse_words(&self.buffer[..received], descriptor.word_count)?;
        Ok(codec::decode_value(descriptor, &words))
    }

    fn fail(&mut self, err: &ProtocolError) {
        warn!(
            target: "plcgw.protocol",
            plc = %self.endpoint.name,
            error = %err,
            "read cycle aborted"
        );
        self.events.record(DomainEvent::for_plc(
            EventKind::PlcNoResponse,
            self.endpoint.id,
            format!("{} not responding: {}", self.endpoint.name, err.reason()),
        ));
        self.disconnect();
        let reason = err.reason();
        self.status.update(|s| s.status_message = reason);
    }

    fn transition(&mut self, state: ConnectionState) {
        self.state = state;
        self.status.update(|s| s.set_state(state));
    }
}

fn discard_stale(stream: &TcpStream, buffer: &mut [u8]) -> Result<(), ProtocolError> {
    loop {
        match stream.try_read(buffer) {
            Ok(0) => return Err(ProtocolError::ConnectionClosed),
            Ok(_) => continue,
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(()),
            Err(err) => return Err(ProtocolError::from_connect_error(err)),
        }
    }
}
