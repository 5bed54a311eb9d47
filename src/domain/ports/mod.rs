use crate::domain::models::{
    booking::{Booking, PaymentMethod},
    directory::{Professional, Room},
    ledger::LedgerEntry,
    notice::ScheduleNotice,
    room_reservation::{ReservationStatus, RoomReservation},
    slot::{Slot, SlotStatus},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// Inserts a generated batch in one transaction, re-checking overlap
    /// against the professional's existing slots. No partial insert.
    async fn insert_batch(&self, professional_id: &str, slots: &[Slot]) -> Result<(), AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Slot>, AppError>;
    async fn find_by_schedule(
        &self,
        professional_id: &str,
        start_at: DateTime<Utc>,
    ) -> Result<Option<Slot>, AppError>;
    async fn list_in_range(
        &self,
        professional_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Slot>, AppError>;
    /// Replaces a day's FREE slots with the desired set in one transaction.
    /// Non-FREE slots are preserved; desired rows covered by an existing or
    /// preserved slot are skipped. Returns the day as it stands after.
    async fn reconcile_day(
        &self,
        professional_id: &str,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
        desired: &[Slot],
    ) -> Result<Vec<Slot>, AppError>;
    /// Deletes a slot only while it is still FREE.
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Flips the slot FREE -> RESERVED and inserts the pending booking in one
    /// transaction. The loser of a concurrent race on the slot gets Conflict.
    async fn create_pending(&self, booking: &Booking) -> Result<(), AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_professional(&self, professional_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn list_by_client(&self, client_id: &str) -> Result<Vec<Booking>, AppError>;
    /// Booking PENDING -> CONFIRMED plus slot RESERVED -> OCCUPIED, one
    /// transaction, both guarded.
    async fn approve(&self, booking: &Booking) -> Result<(), AppError>;
    /// Booking -> CANCELED plus slot released to `release_to`, one
    /// transaction. The slot write is unconditional.
    async fn cancel(&self, booking: &Booking, release_to: SlotStatus) -> Result<(), AppError>;
    /// Booking CONFIRMED -> CONCLUDED, slot OCCUPIED -> FINISHED and the
    /// ledger entry insert, all in one transaction.
    async fn conclude(&self, booking: &Booking, entry: &LedgerEntry) -> Result<(), AppError>;
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Inserts the shared ledger entry and every reservation of the batch in
    /// one transaction, re-checking room overlap under the room lock.
    async fn create_batch(
        &self,
        entry: &LedgerEntry,
        reservations: &[RoomReservation],
    ) -> Result<(), AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<RoomReservation>, AppError>;
    /// Reservations counting toward room occupancy, i.e. status != REJECTED.
    async fn list_active_by_room(&self, room_id: &str) -> Result<Vec<RoomReservation>, AppError>;
    async fn set_status(
        &self,
        id: &str,
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> Result<(), AppError>;
    /// Marks the reservation paid and settles the shared ledger entry
    /// (no-op when a sibling already settled it), one transaction.
    async fn mark_paid(
        &self,
        reservation_id: &str,
        ledger_id: &str,
        external_reference: Option<&str>,
    ) -> Result<(), AppError>;
}

#[async_trait]
pub trait LedgerRepository: Send + Sync {
    async fn insert(&self, entry: &LedgerEntry) -> Result<(), AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<LedgerEntry>, AppError>;
    /// Guarded PENDING -> SETTLED. Returns false when the guard missed.
    async fn settle(&self, id: &str, external_reference: Option<&str>) -> Result<bool, AppError>;
    /// Guarded PENDING -> FAILED. Returns false when the guard missed.
    async fn fail(&self, id: &str) -> Result<bool, AppError>;
    /// Inserts the compensating entry and flags the original REVERSED in one
    /// transaction.
    async fn reverse(&self, original_id: &str, compensation: &LedgerEntry)
        -> Result<(), AppError>;
    async fn list_by_subject(&self, subject_id: &str) -> Result<Vec<LedgerEntry>, AppError>;
}

#[async_trait]
pub trait ProfessionalDirectory: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Professional>, AppError>;
}

#[async_trait]
pub trait RoomDirectory: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Room>, AppError>;
}

#[derive(Debug, Clone)]
pub struct ChargeOutcome {
    pub external_reference: String,
    /// False when the charge was accepted but settles asynchronously, e.g. a
    /// PIX charge awaiting confirmation.
    pub settled: bool,
}

#[async_trait]
pub trait SettlementGateway: Send + Sync {
    async fn charge(
        &self,
        amount: i64,
        method: PaymentMethod,
        payer_ref: &str,
    ) -> Result<ChargeOutcome, AppError>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn dispatch(&self, notice: &ScheduleNotice) -> Result<(), AppError>;
}
