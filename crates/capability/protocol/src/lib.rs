//! # PLC 协议能力模块
//!
//! 控制器使用私有的请求/响应二进制协议，一问一答，不带请求编号：
//!
//! - [`codec`]：38 字节请求帧构造、响应 word 解析与类型解码（纯函数）
//! - [`register_map`]：字段名 → 地址/长度/类型的静态寄存器表
//! - [`connection`]：单个 PLC 的连接状态机与读周期
//!
//! ## 读周期
//!
//! ```text
//! PlcConnection::read_cycle
//!       │  按 RegisterMap 顺序，每个寄存器：
//!       ├── 写入请求帧
//!       ├── 单次读取（超时）
//!       └── 解码；失败取缺省值
//!       │
//!       ▼
//! Reading（所有字段齐全）
//! ```
//!
//! 连接级故障（拒绝、重置、对端关闭）中止周期并断开连接；
//! 单个寄存器超时或短响应只影响该字段。

pub mod codec;
pub mod connection;
mod error;
pub mod register_map;
mod types;

pub use connection::{PlcConnection, StatusHandle};
pub use error::ProtocolError;
pub use register_map::RegisterMap;
pub use types::*;
