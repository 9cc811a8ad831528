//! 协议错误类型定义

use std::io;

/// 协议通信错误
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// 连接或读取超出预算
    #[error("timeout: {0}")]
    Timeout(String),

    /// 连接被拒绝、不可达、被重置
    #[error("connectivity fault: {0}")]
    Connectivity(String),

    /// 对端关闭连接
    #[error("connection closed by peer")]
    ConnectionClosed,

    /// 响应短于固定响应头
    #[error("incomplete response: {len} bytes")]
    IncompleteResponse { len: usize },

    /// 地址超出 24 位
    #[error("register address out of range: {0:#x}")]
    AddressOutOfRange(u32),

    /// 未连接时调用读周期（调用方错误，不重试）
    #[error("not connected: {0}")]
    NotConnected(String),

    /// IO 错误
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// 收到停机信号
    #[error("cancelled")]
    Cancelled,
}

impl ProtocolError {
    /// 按 IO 错误类型归类为网络故障或一般 IO 错误。
    pub fn from_connect_error(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => Self::Connectivity("connection refused".to_string()),
            io::ErrorKind::HostUnreachable => Self::Connectivity("host unreachable".to_string()),
            io::ErrorKind::NetworkUnreachable => {
                Self::Connectivity("network unreachable".to_string())
            }
            io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted => {
                Self::Connectivity("connection reset".to_string())
            }
            io::ErrorKind::TimedOut => Self::Timeout("socket timed out".to_string()),
            _ => Self::Io(err),
        }
    }

    /// 是否为连接级故障（中止读周期并交给编排器重连）。
    ///
    /// 单寄存器超时与短响应属于寄存器级软失败。
    pub fn is_connection_fault(&self) -> bool {
        matches!(
            self,
            ProtocolError::Connectivity(_)
                | ProtocolError::ConnectionClosed
                | ProtocolError::Io(_)
                | ProtocolError::NotConnected(_)
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ProtocolError::Cancelled)
    }

    /// 面向运维的简短原因。
    pub fn reason(&self) -> String {
        match self {
            ProtocolError::Timeout(_) => "connection timeout".to_string(),
            ProtocolError::Connectivity(reason) => reason.clone(),
            ProtocolError::Io(err) => format!("socket error: {}", err.kind()),
            other => other.to_string(),
        }
    }
}
