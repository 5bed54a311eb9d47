use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::domain::models::booking::{
    ApproveBooking, Booking, BookingEvent, CancelActor, CancelBooking, ConcludeBooking,
    CreateBooking, PaymentStatus,
};
use crate::domain::models::ledger::{EntryDirection, EntryStatus, LedgerEntry};
use crate::domain::models::notice::ScheduleNotice;
use crate::domain::models::slot::SlotStatus;
use crate::domain::ports::{
    BookingRepository, Notifier, ProfessionalDirectory, RoomDirectory, SettlementGateway,
    SlotRepository,
};
use crate::domain::services::interval::{self, ScheduleRules};
use crate::error::AppError;

/// Owns the appointment life cycle: PENDING -> CONFIRMED -> CONCLUDED, with
/// PENDING|CONFIRMED -> CANCELED. Every transition writes the booking and its
/// slot in one repository transaction.
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    slots: Arc<dyn SlotRepository>,
    professionals: Arc<dyn ProfessionalDirectory>,
    rooms: Arc<dyn RoomDirectory>,
    gateway: Arc<dyn SettlementGateway>,
    notifier: Arc<dyn Notifier>,
    rules: ScheduleRules,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        slots: Arc<dyn SlotRepository>,
        professionals: Arc<dyn ProfessionalDirectory>,
        rooms: Arc<dyn RoomDirectory>,
        gateway: Arc<dyn SettlementGateway>,
        notifier: Arc<dyn Notifier>,
        rules: ScheduleRules,
    ) -> Self {
        Self {
            bookings,
            slots,
            professionals,
            rooms,
            gateway,
            notifier,
            rules,
        }
    }

    /// Books the FREE slot at exactly `start_at`. Preconditions are checked
    /// in order: lead time, slot existence, slot availability; the first
    /// failure wins. The loser of a concurrent race on the same slot gets a
    /// Conflict from the guarded slot flip.
    pub async fn create(&self, params: CreateBooking) -> Result<Booking, AppError> {
        self.professionals
            .find_by_id(&params.professional_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("professional {} not found", params.professional_id))
            })?;

        let now = Utc::now();
        if params.start_at <= now
            || !interval::has_minimum_lead_time(params.start_at, now, &self.rules)
        {
            return Err(AppError::LeadTime(format!(
                "bookings require at least {}h notice",
                self.rules.min_lead_hours
            )));
        }

        let slot = self
            .slots
            .find_by_schedule(&params.professional_id, params.start_at)
            .await?
            .ok_or_else(|| AppError::NotFound("no slot at the requested time".to_string()))?;

        if slot.status != SlotStatus::Free {
            return Err(AppError::Conflict("slot is not available".to_string()));
        }

        let booking = Booking::new(&params, &slot);
        self.bookings.create_pending(&booking).await?;
        info!("Booking {} created for slot {}", booking.id, slot.id);

        self.notify(ScheduleNotice::BookingCreated {
            booking_id: booking.id.clone(),
            professional_id: booking.professional_id.clone(),
            client_id: booking.client_id.clone(),
            start_at: booking.start_at,
        })
        .await;

        Ok(booking)
    }

    /// Confirms a pending booking, assigning the consultation room and the
    /// agreed value. Professional-only.
    pub async fn approve(&self, params: ApproveBooking) -> Result<Booking, AppError> {
        let mut booking = self.load(&params.booking_id).await?;

        if booking.professional_id != params.professional_id {
            return Err(AppError::Forbidden(
                "only the assigned professional can approve a booking".to_string(),
            ));
        }

        let next = booking.status.next(BookingEvent::Approve).ok_or_else(|| {
            AppError::InvalidTransition(format!(
                "cannot approve a {} booking",
                booking.status.as_str()
            ))
        })?;

        if let Some(room_id) = &params.room_id {
            self.rooms
                .find_by_id(room_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("room {} not found", room_id)))?;
        }

        booking.status = next;
        booking.room_id = params.room_id.clone();
        booking.value = Some(params.value);
        self.bookings.approve(&booking).await?;
        info!("Booking {} confirmed", booking.id);

        self.notify(ScheduleNotice::BookingConfirmed {
            booking_id: booking.id.clone(),
            client_id: booking.client_id.clone(),
            start_at: booking.start_at,
        })
        .await;

        Ok(booking)
    }

    /// Cancels a pending or confirmed booking. Clients must respect the
    /// minimum lead time and release the slot back to FREE; professionals
    /// cancel at any time but must justify, and the slot is BLOCKED because
    /// the professional declared themself unavailable.
    pub async fn cancel(&self, params: CancelBooking) -> Result<Booking, AppError> {
        let mut booking = self.load(&params.booking_id).await?;

        let next = booking.status.next(BookingEvent::Cancel).ok_or_else(|| {
            AppError::InvalidTransition(format!(
                "cannot cancel a {} booking",
                booking.status.as_str()
            ))
        })?;

        let (release_to, by_professional) = match &params.actor {
            CancelActor::Client { client_id } => {
                if &booking.client_id != client_id {
                    return Err(AppError::Forbidden(
                        "only the booking's client can cancel it".to_string(),
                    ));
                }
                if !interval::has_minimum_lead_time(booking.start_at, Utc::now(), &self.rules) {
                    return Err(AppError::LeadTime(format!(
                        "client cancellations require at least {}h notice",
                        self.rules.min_lead_hours
                    )));
                }
                (SlotStatus::Free, false)
            }
            CancelActor::Professional {
                professional_id,
                justification,
            } => {
                if &booking.professional_id != professional_id {
                    return Err(AppError::Forbidden(
                        "only the assigned professional can cancel a booking".to_string(),
                    ));
                }
                if justification.trim().is_empty() {
                    return Err(AppError::Validation(
                        "a justification is required to cancel".to_string(),
                    ));
                }
                booking.cancel_reason = Some(justification.clone());
                (SlotStatus::Blocked, true)
            }
        };

        booking.status = next;
        self.bookings.cancel(&booking, release_to).await?;
        info!(
            "Booking {} canceled by {}",
            booking.id,
            if by_professional { "professional" } else { "client" }
        );

        self.notify(ScheduleNotice::BookingCanceled {
            booking_id: booking.id.clone(),
            client_id: booking.client_id.clone(),
            by_professional,
            reason: booking.cancel_reason.clone(),
        })
        .await;

        Ok(booking)
    }

    /// Concludes a confirmed appointment. Card and PIX are charged through
    /// the gateway immediately before the storage transaction; the booking,
    /// its slot and the ledger entry then commit as one unit. A booking is
    /// never CONCLUDED without its ledger entry, and never the other way
    /// around.
    pub async fn conclude(&self, params: ConcludeBooking) -> Result<Booking, AppError> {
        let mut booking = self.load(&params.booking_id).await?;

        if booking.professional_id != params.professional_id {
            return Err(AppError::Forbidden(
                "only the assigned professional can conclude a booking".to_string(),
            ));
        }

        let next = booking.status.next(BookingEvent::Conclude).ok_or_else(|| {
            AppError::InvalidTransition(format!(
                "cannot conclude a {} booking",
                booking.status.as_str()
            ))
        })?;

        let mut entry = LedgerEntry::new(
            booking.client_id.clone(),
            booking.professional_id.clone(),
            params.value,
            EntryDirection::In,
        );

        if booking.payment_method.requires_gateway() {
            let outcome = self
                .gateway
                .charge(params.value, booking.payment_method, &booking.client_id)
                .await?;
            entry.external_reference = Some(outcome.external_reference);
            if outcome.settled {
                entry.status = EntryStatus::Settled;
            }
        } else {
            entry.status = EntryStatus::Settled;
        }

        booking.status = next;
        booking.value = Some(params.value);
        booking.payment_status = match entry.status {
            EntryStatus::Settled => PaymentStatus::Settled,
            _ => PaymentStatus::Pending,
        };

        if let Err(e) = self.bookings.conclude(&booking, &entry).await {
            return Err(match e {
                AppError::Database(db) => {
                    error!("Conclude transaction failed after charge: {:?}", db);
                    AppError::Settlement(
                        "settlement could not be recorded; nothing was concluded".to_string(),
                    )
                }
                other => other,
            });
        }
        info!("Booking {} concluded, ledger entry {}", booking.id, entry.id);

        self.notify(ScheduleNotice::BookingConcluded {
            booking_id: booking.id.clone(),
            client_id: booking.client_id.clone(),
            value: params.value,
        })
        .await;

        Ok(booking)
    }

    pub async fn list_by_professional(
        &self,
        professional_id: &str,
    ) -> Result<Vec<Booking>, AppError> {
        self.bookings.list_by_professional(professional_id).await
    }

    pub async fn list_by_client(&self, client_id: &str) -> Result<Vec<Booking>, AppError> {
        self.bookings.list_by_client(client_id).await
    }

    async fn load(&self, booking_id: &str) -> Result<Booking, AppError> {
        self.bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("booking {} not found", booking_id)))
    }

    async fn notify(&self, notice: ScheduleNotice) {
        if let Err(e) = self.notifier.dispatch(&notice).await {
            warn!("Notice dispatch failed: {}", e);
        }
    }
}
