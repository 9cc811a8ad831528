//! 数据库连接管理
//!
//! 连接池惰性建立：启动时目的地不可达只是健康状态，不阻止服务启动。
//! 连接字符串格式错误在构造时即返回错误。

use crate::error::StorageError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

/// 每个目的地的最大连接数。
pub const MAX_CONNECTIONS: u32 = 4;

/// 获取连接的默认等待上限。
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// 建立惰性 Postgres 连接池
pub fn connect_lazy_pool(database_url: &str) -> Result<PgPool, StorageError> {
    connect_lazy_pool_with(database_url, DEFAULT_ACQUIRE_TIMEOUT)
}

pub fn connect_lazy_pool_with(
    database_url: &str,
    acquire_timeout: Duration,
) -> Result<PgPool, StorageError> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(acquire_timeout)
        .connect_lazy(database_url)?;
    Ok(pool)
}
