use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::models::booking::PaymentMethod;
use crate::domain::models::ledger::{EntryDirection, LedgerEntry};
use crate::domain::models::notice::ScheduleNotice;
use crate::domain::models::room_reservation::{
    ReservationDecision, ReservationStatus, RoomReservation,
};
use crate::domain::ports::{
    Notifier, ProfessionalDirectory, ReservationRepository, RoomDirectory, SettlementGateway,
};
use crate::domain::services::interval;
use crate::error::AppError;

/// Batch room rentals: all ranges of a batch land together under one ledger
/// entry, or none of them land at all.
pub struct RoomService {
    reservations: Arc<dyn ReservationRepository>,
    rooms: Arc<dyn RoomDirectory>,
    professionals: Arc<dyn ProfessionalDirectory>,
    gateway: Arc<dyn SettlementGateway>,
    notifier: Arc<dyn Notifier>,
}

impl RoomService {
    pub fn new(
        reservations: Arc<dyn ReservationRepository>,
        rooms: Arc<dyn RoomDirectory>,
        professionals: Arc<dyn ProfessionalDirectory>,
        gateway: Arc<dyn SettlementGateway>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            reservations,
            rooms,
            professionals,
            gateway,
            notifier,
        }
    }

    /// Reserves every range of the batch against the room, or nothing. The
    /// first range conflicting with a non-REJECTED reservation, or with an
    /// earlier range of the same batch, aborts the whole call.
    pub async fn reserve_batch(
        &self,
        room_id: &str,
        professional_id: &str,
        ranges: &[(DateTime<Utc>, DateTime<Utc>)],
    ) -> Result<LedgerEntry, AppError> {
        let room = self
            .rooms
            .find_by_id(room_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("room {} not found", room_id)))?;
        self.professionals
            .find_by_id(professional_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("professional {} not found", professional_id))
            })?;

        if ranges.is_empty() {
            return Err(AppError::Validation(
                "a reservation batch cannot be empty".to_string(),
            ));
        }
        for (start, end) in ranges {
            if start >= end {
                return Err(AppError::InvalidRange(format!(
                    "range {} - {} is inverted",
                    start, end
                )));
            }
        }

        let active = self.reservations.list_active_by_room(room_id).await?;
        for (i, (start, end)) in ranges.iter().enumerate() {
            if let Some(clash) = active
                .iter()
                .find(|r| interval::overlaps(*start, *end, r.start_at, r.end_at))
            {
                return Err(AppError::RoomConflict(format!(
                    "range {} - {} conflicts with reservation {}",
                    start, end, clash.id
                )));
            }
            if let Some((os, oe)) = ranges[..i]
                .iter()
                .find(|(os, oe)| interval::overlaps(*start, *end, *os, *oe))
            {
                return Err(AppError::RoomConflict(format!(
                    "range {} - {} conflicts with range {} - {} in the same batch",
                    start, end, os, oe
                )));
            }
        }

        let total: i64 = ranges.iter().map(|(s, e)| room.rental_value(*s, *e)).sum();
        let entry = LedgerEntry::new(
            professional_id.to_string(),
            room_id.to_string(),
            total,
            EntryDirection::In,
        );
        let rows: Vec<RoomReservation> = ranges
            .iter()
            .map(|(start, end)| {
                RoomReservation::new(
                    room_id.to_string(),
                    professional_id.to_string(),
                    *start,
                    *end,
                    room.rental_value(*start, *end),
                    entry.id.clone(),
                )
            })
            .collect();

        self.reservations.create_batch(&entry, &rows).await?;
        info!(
            "Reserved {} ranges of room {} under ledger entry {}",
            rows.len(),
            room_id,
            entry.id
        );
        Ok(entry)
    }

    /// Approves or rejects a pending reservation. Decisions are terminal.
    pub async fn set_status(
        &self,
        reservation_id: &str,
        decision: ReservationDecision,
    ) -> Result<RoomReservation, AppError> {
        let mut reservation = self.load(reservation_id).await?;

        let next = reservation.status.next(decision).ok_or_else(|| {
            AppError::InvalidTransition(format!(
                "cannot decide a {} reservation",
                reservation.status.as_str()
            ))
        })?;

        self.reservations
            .set_status(reservation_id, reservation.status, next)
            .await?;
        reservation.status = next;
        info!("Reservation {} {}", reservation.id, next.as_str());

        self.notify(ScheduleNotice::ReservationDecided {
            reservation_id: reservation.id.clone(),
            professional_id: reservation.professional_id.clone(),
            approved: next == ReservationStatus::Approved,
        })
        .await;

        Ok(reservation)
    }

    /// Pays one approved reservation. The shared ledger entry settles with
    /// the first successful payment of the batch; on gateway failure nothing
    /// changes.
    pub async fn pay(
        &self,
        reservation_id: &str,
        method: PaymentMethod,
    ) -> Result<RoomReservation, AppError> {
        let mut reservation = self.load(reservation_id).await?;

        if reservation.status != ReservationStatus::Approved {
            return Err(AppError::InvalidTransition(
                "only approved reservations can be paid".to_string(),
            ));
        }
        if reservation.paid {
            return Err(AppError::Conflict(
                "reservation is already paid".to_string(),
            ));
        }

        let external_reference = if method.requires_gateway() {
            let outcome = self
                .gateway
                .charge(reservation.value, method, &reservation.professional_id)
                .await?;
            Some(outcome.external_reference)
        } else {
            None
        };

        self.reservations
            .mark_paid(
                &reservation.id,
                &reservation.ledger_id,
                external_reference.as_deref(),
            )
            .await?;
        reservation.paid = true;
        info!("Reservation {} paid", reservation.id);

        Ok(reservation)
    }

    async fn load(&self, reservation_id: &str) -> Result<RoomReservation, AppError> {
        self.reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("reservation {} not found", reservation_id))
            })
    }

    async fn notify(&self, notice: ScheduleNotice) {
        if let Err(e) = self.notifier.dispatch(&notice).await {
            warn!("Notice dispatch failed: {}", e);
        }
    }
}
