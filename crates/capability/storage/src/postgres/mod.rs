//! PostgreSQL 存储实现
//!
//! 表结构见 `migrations/0001_plc_reading.sql`。所有 SQL 使用参数绑定。

pub mod reading;

pub use reading::*;
