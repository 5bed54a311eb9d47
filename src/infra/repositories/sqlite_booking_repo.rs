use crate::domain::{
    models::{booking::Booking, ledger::LedgerEntry, slot::SlotStatus},
    ports::BookingRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create_pending(&self, booking: &Booking) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let result = sqlx::query("UPDATE slots SET status = 'RESERVED' WHERE id = ? AND status = 'FREE'").bind(&booking.slot_id).execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::Conflict("slot is not available".to_string())); }
        sqlx::query(
            "INSERT INTO bookings (id, professional_id, client_id, slot_id, room_id, start_at, end_at, status, payment_method, payment_status, value, cancel_reason, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
            .bind(&booking.id).bind(&booking.professional_id).bind(&booking.client_id).bind(&booking.slot_id)
            .bind(&booking.room_id).bind(booking.start_at).bind(booking.end_at).bind(booking.status.as_str())
            .bind(booking.payment_method.as_str()).bind(booking.payment_status.as_str()).bind(booking.value)
            .bind(&booking.cancel_reason).bind(booking.created_at)
            .execute(&mut *tx).await.map_err(|e| AppError::from_db(e, "slot already has an active booking"))?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_professional(&self, professional_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE professional_id = ? ORDER BY start_at ASC").bind(professional_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_client(&self, client_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE client_id = ? ORDER BY start_at ASC").bind(client_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn approve(&self, booking: &Booking) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let result = sqlx::query("UPDATE bookings SET status = 'CONFIRMED', room_id = ?, value = ? WHERE id = ? AND status = 'PENDING'")
            .bind(&booking.room_id).bind(booking.value).bind(&booking.id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::InvalidTransition("booking is no longer pending".to_string())); }
        let result = sqlx::query("UPDATE slots SET status = 'OCCUPIED' WHERE id = ? AND status = 'RESERVED'").bind(&booking.slot_id).execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::Conflict("slot is not in the expected state".to_string())); }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn cancel(&self, booking: &Booking, release_to: SlotStatus) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let result = sqlx::query("UPDATE bookings SET status = 'CANCELED', cancel_reason = ? WHERE id = ? AND status IN ('PENDING', 'CONFIRMED')")
            .bind(&booking.cancel_reason).bind(&booking.id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::InvalidTransition("booking can no longer be canceled".to_string())); }
        sqlx::query("UPDATE slots SET status = ? WHERE id = ?").bind(release_to.as_str()).bind(&booking.slot_id).execute(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn conclude(&self, booking: &Booking, entry: &LedgerEntry) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let result = sqlx::query("UPDATE bookings SET status = 'CONCLUDED', value = ?, payment_status = ? WHERE id = ? AND status = 'CONFIRMED'")
            .bind(booking.value).bind(booking.payment_status.as_str()).bind(&booking.id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::InvalidTransition("booking is not confirmed".to_string())); }
        let result = sqlx::query("UPDATE slots SET status = 'FINISHED' WHERE id = ? AND status = 'OCCUPIED'").bind(&booking.slot_id).execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::Conflict("slot is not in the expected state".to_string())); }
        sqlx::query(
            "INSERT INTO ledger_entries (id, subject_id, counterparty_id, amount, direction, status, external_reference, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )
            .bind(&entry.id).bind(&entry.subject_id).bind(&entry.counterparty_id).bind(entry.amount)
            .bind(entry.direction.as_str()).bind(entry.status.as_str()).bind(&entry.external_reference).bind(entry.created_at)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
