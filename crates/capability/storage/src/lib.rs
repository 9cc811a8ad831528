//! # 读数存储模块
//!
//! 每个持久化目的地（local / cloud）实现一个 [`ReadingStore`]：
//!
//! - [`traits`]：`ReadingStore` 接口（探测、写入、关闭）
//! - [`error`]：`StorageError`，区分连接类与查询类故障
//! - [`models`]：`plc_reading` 行模型与 JSON 字段值
//! - [`connection`]：惰性 Postgres 连接池
//! - [`postgres`]：`PgReadingStore`（生产环境）
//! - [`in_memory`]：`InMemoryReadingStore`（测试，可注入故障）
//!
//! 只有连接类错误会让持久化网关把目的地标记为不可用。

pub mod connection;
pub mod error;
pub mod in_memory;
pub mod models;
pub mod postgres;
pub mod traits;

pub use connection::*;
pub use error::*;
pub use in_memory::InMemoryReadingStore;
pub use models::*;
pub use postgres::PgReadingStore;
pub use traits::*;
