use crate::error::{StorageError, StorageErrorKind};
use crate::traits::ReadingStore;
use domain::Reading;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

/// 读数内存存储
#[derive(Debug, Default)]
pub struct InMemoryReadingStore {
    readings: RwLock<Vec<Reading>>,
    failure: RwLock<Option<StorageErrorKind>>,
    probe_calls: AtomicUsize,
    write_calls: AtomicUsize,
    closed: AtomicBool,
}

impl InMemoryReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 之后的探测与写入都以该类错误失败；`None` 恢复正常。
    pub fn set_failure(&self, failure: Option<StorageErrorKind>) {
        if let Ok(mut guard) = self.failure.write() {
            *guard = failure;
        }
    }

    pub fn readings(&self) -> Vec<Reading> {
        self.readings.read().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.readings.read().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn probe_calls(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn injected(&self) -> Result<(), StorageError> {
        let failure = self.failure.read().map(|f| *f).unwrap_or(None);
        match failure {
            Some(kind) => Err(StorageError::new(kind, "injected failure")),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl ReadingStore for InMemoryReadingStore {
    async fn probe(&self) -> Result<(), StorageError> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        self.injected()
    }

    async fn write_reading(&self, reading: &Reading) -> Result<(), StorageError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.injected()?;
        let mut readings = self
            .readings
            .write()
            .map_err(|_| StorageError::query("lock failed"))?;
        readings.push(reading.clone());
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
