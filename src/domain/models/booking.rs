use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::slot::Slot;
use super::StatusParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Canceled,
    Concluded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingEvent {
    Approve,
    Cancel,
    Conclude,
}

impl BookingStatus {
    /// Transition table for the booking life cycle. `None` marks an
    /// illegal transition; CANCELED and CONCLUDED are terminal.
    pub fn next(self, event: BookingEvent) -> Option<BookingStatus> {
        match (self, event) {
            (BookingStatus::Pending, BookingEvent::Approve) => Some(BookingStatus::Confirmed),
            (BookingStatus::Pending, BookingEvent::Cancel) => Some(BookingStatus::Canceled),
            (BookingStatus::Confirmed, BookingEvent::Cancel) => Some(BookingStatus::Canceled),
            (BookingStatus::Confirmed, BookingEvent::Conclude) => Some(BookingStatus::Concluded),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Canceled => "CANCELED",
            BookingStatus::Concluded => "CONCLUDED",
        }
    }
}

impl TryFrom<String> for BookingStatus {
    type Error = StatusParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "PENDING" => Ok(BookingStatus::Pending),
            "CONFIRMED" => Ok(BookingStatus::Confirmed),
            "CANCELED" => Ok(BookingStatus::Canceled),
            "CONCLUDED" => Ok(BookingStatus::Concluded),
            _ => Err(StatusParseError { kind: "booking", value }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Card,
    Pix,
    Cash,
}

impl PaymentMethod {
    /// Cash is settled in person; only card and PIX go through the gateway.
    pub fn requires_gateway(&self) -> bool {
        !matches!(self, PaymentMethod::Cash)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "CARD",
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Cash => "CASH",
        }
    }
}

impl TryFrom<String> for PaymentMethod {
    type Error = StatusParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "CARD" => Ok(PaymentMethod::Card),
            "PIX" => Ok(PaymentMethod::Pix),
            "CASH" => Ok(PaymentMethod::Cash),
            _ => Err(StatusParseError { kind: "payment method", value }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Settled,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Settled => "SETTLED",
            PaymentStatus::Failed => "FAILED",
        }
    }
}

impl TryFrom<String> for PaymentStatus {
    type Error = StatusParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "PENDING" => Ok(PaymentStatus::Pending),
            "SETTLED" => Ok(PaymentStatus::Settled),
            "FAILED" => Ok(PaymentStatus::Failed),
            _ => Err(StatusParseError { kind: "payment", value }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub professional_id: String,
    pub client_id: String,
    pub slot_id: String,
    pub room_id: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    #[sqlx(try_from = "String")]
    pub payment_method: PaymentMethod,
    #[sqlx(try_from = "String")]
    pub payment_status: PaymentStatus,
    pub value: Option<i64>,
    pub cancel_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// A fresh booking holds the slot it was created against; the window is
    /// copied from the slot, not from the caller.
    pub fn new(params: &CreateBooking, slot: &Slot) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            professional_id: params.professional_id.clone(),
            client_id: params.client_id.clone(),
            slot_id: slot.id.clone(),
            room_id: None,
            start_at: slot.start_at,
            end_at: slot.end_at,
            status: BookingStatus::Pending,
            payment_method: params.payment_method,
            payment_status: PaymentStatus::Pending,
            value: None,
            cancel_reason: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub professional_id: String,
    pub client_id: String,
    pub start_at: DateTime<Utc>,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone)]
pub struct ApproveBooking {
    pub booking_id: String,
    pub professional_id: String,
    pub room_id: Option<String>,
    pub value: i64,
}

/// Cancellation is role-scoped: each actor carries exactly the fields its
/// rules need, so a client request cannot smuggle professional-only data.
#[derive(Debug, Clone)]
pub enum CancelActor {
    Client { client_id: String },
    Professional { professional_id: String, justification: String },
}

#[derive(Debug, Clone)]
pub struct CancelBooking {
    pub booking_id: String,
    pub actor: CancelActor,
}

#[derive(Debug, Clone)]
pub struct ConcludeBooking {
    pub booking_id: String,
    pub professional_id: String,
    pub value: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_transitions() {
        assert_eq!(
            BookingStatus::Pending.next(BookingEvent::Approve),
            Some(BookingStatus::Confirmed)
        );
        assert_eq!(
            BookingStatus::Pending.next(BookingEvent::Cancel),
            Some(BookingStatus::Canceled)
        );
        assert_eq!(BookingStatus::Pending.next(BookingEvent::Conclude), None);
    }

    #[test]
    fn test_confirmed_transitions() {
        assert_eq!(BookingStatus::Confirmed.next(BookingEvent::Approve), None);
        assert_eq!(
            BookingStatus::Confirmed.next(BookingEvent::Cancel),
            Some(BookingStatus::Canceled)
        );
        assert_eq!(
            BookingStatus::Confirmed.next(BookingEvent::Conclude),
            Some(BookingStatus::Concluded)
        );
    }

    #[test]
    fn test_terminal_statuses_accept_nothing() {
        for event in [BookingEvent::Approve, BookingEvent::Cancel, BookingEvent::Conclude] {
            assert_eq!(BookingStatus::Canceled.next(event), None);
            assert_eq!(BookingStatus::Concluded.next(event), None);
        }
    }

    #[test]
    fn test_only_cash_skips_the_gateway() {
        assert!(PaymentMethod::Card.requires_gateway());
        assert!(PaymentMethod::Pix.requires_gateway());
        assert!(!PaymentMethod::Cash.requires_gateway());
    }
}
