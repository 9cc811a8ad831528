//! 存储层错误类型
//!
//! 只区分两类：
//! - 连接类（不可达、连接池超时、TLS/协议错误）：触发目的地熔断
//! - 查询类（SQL 执行失败、数据错误）：只影响本次写入

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    Connectivity,
    Query,
}

impl fmt::Display for StorageErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageErrorKind::Connectivity => write!(f, "connectivity"),
            StorageErrorKind::Query => write!(f, "query"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct StorageError {
    kind: StorageErrorKind,
    message: String,
}

impl StorageError {
    pub fn new(kind: StorageErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::new(StorageErrorKind::Connectivity, message)
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::new(StorageErrorKind::Query, message)
    }

    pub fn kind(&self) -> StorageErrorKind {
        self.kind
    }

    pub fn is_connectivity(&self) -> bool {
        self.kind == StorageErrorKind::Connectivity
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        let kind = match &err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StorageErrorKind::Connectivity,
            sqlx::Error::Database(db) => db
                .code()
                .map(|code| classify_sqlstate(&code))
                .unwrap_or(StorageErrorKind::Query),
            _ => StorageErrorKind::Query,
        };
        Self::new(kind, err.to_string())
    }
}

/// 按 SQLSTATE 归类服务端错误。
///
/// 08 连接异常、28 认证失败、53300 连接数耗尽、57P01..57P03 服务端关闭或不可用。
pub fn classify_sqlstate(code: &str) -> StorageErrorKind {
    if code.starts_with("08") || code.starts_with("28") {
        return StorageErrorKind::Connectivity;
    }
    match code {
        "53300" | "57P01" | "57P02" | "57P03" => StorageErrorKind::Connectivity,
        _ => StorageErrorKind::Query,
    }
}
