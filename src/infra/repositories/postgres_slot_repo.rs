use crate::domain::{models::slot::Slot, ports::SlotRepository};
use crate::domain::services::calendar::plan_reconcile;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

pub struct PostgresSlotRepo {
    pool: PgPool,
}

impl PostgresSlotRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SlotRepository for PostgresSlotRepo {
    async fn insert_batch(&self, professional_id: &str, slots: &[Slot]) -> Result<(), AppError> {
        if slots.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        // Row lock on the professional serializes the overlap re-check and
        // the inserts against rival batches.
        sqlx::query("SELECT id FROM professionals WHERE id = $1 FOR UPDATE").bind(professional_id).fetch_optional(&mut *tx).await.map_err(AppError::Database)?;
        for slot in slots {
            let row = sqlx::query("SELECT COUNT(*) as count FROM slots WHERE professional_id = $1 AND start_at < $2 AND end_at > $3")
                .bind(professional_id).bind(slot.end_at).bind(slot.start_at)
                .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
            if row.get::<i64, _>("count") > 0 {
                return Err(AppError::Overlap(format!("slot {} - {} overlaps an existing slot", slot.start_at, slot.end_at)));
            }
            sqlx::query("INSERT INTO slots (id, professional_id, start_at, end_at, status, created_at) VALUES ($1, $2, $3, $4, $5, $6)")
                .bind(&slot.id).bind(&slot.professional_id).bind(slot.start_at).bind(slot.end_at).bind(slot.status.as_str()).bind(slot.created_at)
                .execute(&mut *tx).await.map_err(|e| AppError::from_db(e, "A slot already starts at this time"))?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Slot>, AppError> {
        sqlx::query_as::<_, Slot>("SELECT * FROM slots WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_schedule(&self, professional_id: &str, start_at: DateTime<Utc>) -> Result<Option<Slot>, AppError> {
        sqlx::query_as::<_, Slot>("SELECT * FROM slots WHERE professional_id = $1 AND start_at = $2").bind(professional_id).bind(start_at).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_in_range(&self, professional_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Slot>, AppError> {
        sqlx::query_as::<_, Slot>("SELECT * FROM slots WHERE professional_id = $1 AND start_at < $2 AND end_at > $3 ORDER BY start_at ASC").bind(professional_id).bind(end).bind(start).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn reconcile_day(&self, professional_id: &str, day_start: DateTime<Utc>, day_end: DateTime<Utc>, desired: &[Slot]) -> Result<Vec<Slot>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        sqlx::query("SELECT id FROM professionals WHERE id = $1 FOR UPDATE").bind(professional_id).fetch_optional(&mut *tx).await.map_err(AppError::Database)?;

        let current = sqlx::query_as::<_, Slot>("SELECT * FROM slots WHERE professional_id = $1 AND start_at < $2 AND end_at > $3")
            .bind(professional_id).bind(day_end).bind(day_start)
            .fetch_all(&mut *tx).await.map_err(AppError::Database)?;

        let plan = plan_reconcile(&current, desired);
        for id in &plan.delete_ids {
            sqlx::query("DELETE FROM slots WHERE id = $1 AND status = 'FREE'").bind(id).execute(&mut *tx).await.map_err(AppError::Database)?;
        }
        for slot in &plan.insert {
            sqlx::query("INSERT INTO slots (id, professional_id, start_at, end_at, status, created_at) VALUES ($1, $2, $3, $4, $5, $6)")
                .bind(&slot.id).bind(&slot.professional_id).bind(slot.start_at).bind(slot.end_at).bind(slot.status.as_str()).bind(slot.created_at)
                .execute(&mut *tx).await.map_err(|e| AppError::from_db(e, "A slot already starts at this time"))?;
        }

        let day = sqlx::query_as::<_, Slot>("SELECT * FROM slots WHERE professional_id = $1 AND start_at < $2 AND end_at > $3 ORDER BY start_at ASC")
            .bind(professional_id).bind(day_end).bind(day_start)
            .fetch_all(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(day)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM slots WHERE id = $1 AND status = 'FREE'").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::Conflict("Slot is no longer free".to_string())); }
        Ok(())
    }
}
