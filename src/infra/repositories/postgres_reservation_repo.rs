use crate::domain::{
    models::{ledger::LedgerEntry, room_reservation::{ReservationStatus, RoomReservation}},
    ports::ReservationRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Row};

pub struct PostgresReservationRepo {
    pool: PgPool,
}

impl PostgresReservationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationRepository for PostgresReservationRepo {
    async fn create_batch(&self, entry: &LedgerEntry, reservations: &[RoomReservation]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        if let Some(first) = reservations.first() {
            // Row lock on the room serializes the overlap re-check and the
            // inserts against rival batches.
            sqlx::query("SELECT id FROM rooms WHERE id = $1 FOR UPDATE").bind(&first.room_id).fetch_optional(&mut *tx).await.map_err(AppError::Database)?;
        }
        sqlx::query("INSERT INTO ledger_entries (id, subject_id, counterparty_id, amount, direction, status, external_reference, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)")
            .bind(&entry.id).bind(&entry.subject_id).bind(&entry.counterparty_id).bind(entry.amount).bind(entry.direction.as_str()).bind(entry.status.as_str()).bind(&entry.external_reference).bind(entry.created_at)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        for reservation in reservations {
            let row = sqlx::query("SELECT COUNT(*) as count FROM room_reservations WHERE room_id = $1 AND status != 'REJECTED' AND start_at < $2 AND end_at > $3")
                .bind(&reservation.room_id).bind(reservation.end_at).bind(reservation.start_at)
                .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
            if row.get::<i64, _>("count") > 0 {
                return Err(AppError::RoomConflict(format!("range {} - {} is no longer available", reservation.start_at, reservation.end_at)));
            }
            sqlx::query("INSERT INTO room_reservations (id, room_id, professional_id, start_at, end_at, status, value, paid, ledger_id, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)")
                .bind(&reservation.id).bind(&reservation.room_id).bind(&reservation.professional_id).bind(reservation.start_at).bind(reservation.end_at).bind(reservation.status.as_str()).bind(reservation.value).bind(reservation.paid).bind(&reservation.ledger_id).bind(reservation.created_at)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<RoomReservation>, AppError> {
        sqlx::query_as::<_, RoomReservation>("SELECT * FROM room_reservations WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_active_by_room(&self, room_id: &str) -> Result<Vec<RoomReservation>, AppError> {
        sqlx::query_as::<_, RoomReservation>("SELECT * FROM room_reservations WHERE room_id = $1 AND status != 'REJECTED' ORDER BY start_at ASC").bind(room_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn set_status(&self, id: &str, from: ReservationStatus, to: ReservationStatus) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE room_reservations SET status = $1 WHERE id = $2 AND status = $3")
            .bind(to.as_str()).bind(id).bind(from.as_str())
            .execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::InvalidTransition("reservation was already decided".to_string())); }
        Ok(())
    }

    async fn mark_paid(&self, reservation_id: &str, ledger_id: &str, external_reference: Option<&str>) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let result = sqlx::query("UPDATE room_reservations SET paid = TRUE WHERE id = $1 AND status = 'APPROVED' AND paid = FALSE").bind(reservation_id).execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::Conflict("reservation is not payable".to_string())); }
        // The entry is shared across the batch: the first paid sibling
        // settles it, later ones leave it untouched.
        sqlx::query("UPDATE ledger_entries SET status = 'SETTLED', external_reference = $1 WHERE id = $2 AND status = 'PENDING'")
            .bind(external_reference).bind(ledger_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
