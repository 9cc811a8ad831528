//! # 轮询编排模块
//!
//! ```text
//! connect_all（每个 PLC 独立并发，最多 max_retries 次）
//!       │
//!       ▼
//! loop {
//!     pass_lock
//!       ├── 每个已连接 PLC 一个读任务，全部完成后释放
//!       ├── 成功读数 → ReadingSink::submit（不等待写入）
//!       └── 失败 / 未连接 → 后台重连（每个 PLC 最多一个待执行）
//!     sleep(read_interval)
//! }
//!       │ 取消
//!       ▼
//! shutdown：停止重连任务 → 断开全部连接 → 关闭 ReadingSink
//! ```

mod error;
mod orchestrator;

pub use error::PollingError;
pub use orchestrator::{PassSummary, PollingConfig, PollingOrchestrator};
