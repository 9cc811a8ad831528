//! Postgres 读数写入实现

use crate::error::StorageError;
use crate::models::ReadingRow;
use crate::traits::ReadingStore;
use domain::Reading;
use sqlx::PgPool;

pub struct PgReadingStore {
    pub pool: PgPool,
}

impl PgReadingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 惰性建立连接池，不访问数据库。
    pub fn connect_lazy(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_lazy_pool(database_url)?;
        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl ReadingStore for PgReadingStore {
    async fn probe(&self) -> Result<(), StorageError> {
        sqlx::query("select 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn write_reading(&self, reading: &Reading) -> Result<(), StorageError> {
        let row = ReadingRow::from_reading(reading);
        sqlx::query(
            "insert into plc_reading (plc_id, plc_name, read_at, payload) \
             values ($1, $2, to_timestamp($3 / 1000.0), $4::jsonb)",
        )
        .bind(row.plc_id)
        .bind(&row.plc_name)
        .bind(row.read_at_ms as f64)
        .bind(row.payload.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
