//! 内存存储实现
//!
//! 用于本地测试：记录写入的读数与调用次数，可注入连接类或查询类故障。

pub mod reading;

pub use reading::*;
