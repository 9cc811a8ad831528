/// 编排器错误。停机信号不是错误，`run` 正常返回。
#[derive(Debug, thiserror::Error)]
pub enum PollingError {
    #[error("no PLC connections configured")]
    NoConnections,
}
