//! 协议相关类型定义

use std::time::Duration;

/// 重连前的固定等待。
pub const DEFAULT_RECONNECT_GRACE: Duration = Duration::from_secs(1);

/// 单个 PLC 的网络端点。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlcEndpoint {
    pub id: u32,
    pub name: String,
    pub host: String,
    pub port: u16,
}

impl PlcEndpoint {
    pub fn new(id: u32, name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            id,
            name: name.into(),
            host: host.into(),
            port,
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 连接参数
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// 连接与单次寄存器读写的超时
    pub timeout: Duration,
    /// `reconnect` 在断开与重新连接之间的等待
    pub reconnect_grace: Duration,
}

impl ConnectionConfig {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            reconnect_grace: DEFAULT_RECONNECT_GRACE,
        }
    }
}
