use crate::domain::{models::ledger::LedgerEntry, ports::LedgerRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresLedgerRepo {
    pool: PgPool,
}

impl PostgresLedgerRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerRepository for PostgresLedgerRepo {
    async fn insert(&self, entry: &LedgerEntry) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO ledger_entries (id, subject_id, counterparty_id, amount, direction, status, external_reference, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
        )
            .bind(&entry.id).bind(&entry.subject_id).bind(&entry.counterparty_id).bind(entry.amount)
            .bind(entry.direction.as_str()).bind(entry.status.as_str()).bind(&entry.external_reference).bind(entry.created_at)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<LedgerEntry>, AppError> {
        sqlx::query_as::<_, LedgerEntry>("SELECT * FROM ledger_entries WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn settle(&self, id: &str, external_reference: Option<&str>) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE ledger_entries SET status = 'SETTLED', external_reference = $1 WHERE id = $2 AND status = 'PENDING'")
            .bind(external_reference).bind(id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn fail(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE ledger_entries SET status = 'FAILED' WHERE id = $1 AND status = 'PENDING'")
            .bind(id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn reverse(&self, original_id: &str, compensation: &LedgerEntry) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let result = sqlx::query("UPDATE ledger_entries SET status = 'REVERSED' WHERE id = $1 AND status != 'REVERSED'").bind(original_id).execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::InvalidTransition("entry is already reversed".to_string())); }
        sqlx::query(
            "INSERT INTO ledger_entries (id, subject_id, counterparty_id, amount, direction, status, external_reference, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
        )
            .bind(&compensation.id).bind(&compensation.subject_id).bind(&compensation.counterparty_id).bind(compensation.amount)
            .bind(compensation.direction.as_str()).bind(compensation.status.as_str()).bind(&compensation.external_reference).bind(compensation.created_at)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn list_by_subject(&self, subject_id: &str) -> Result<Vec<LedgerEntry>, AppError> {
        sqlx::query_as::<_, LedgerEntry>("SELECT * FROM ledger_entries WHERE subject_id = $1 ORDER BY created_at ASC").bind(subject_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
