//! 存储接口 Trait 定义

use crate::error::StorageError;
use async_trait::async_trait;
use domain::Reading;

/// 单个持久化目的地。
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// 连通性探测
    async fn probe(&self) -> Result<(), StorageError>;

    /// 写入一条读数
    async fn write_reading(&self, reading: &Reading) -> Result<(), StorageError>;

    /// 释放连接等资源
    async fn close(&self);
}
