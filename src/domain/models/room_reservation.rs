use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::StatusParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationDecision {
    Approve,
    Reject,
}

impl ReservationStatus {
    /// Only pending reservations can be decided; decisions are terminal.
    pub fn next(self, decision: ReservationDecision) -> Option<ReservationStatus> {
        match (self, decision) {
            (ReservationStatus::Pending, ReservationDecision::Approve) => {
                Some(ReservationStatus::Approved)
            }
            (ReservationStatus::Pending, ReservationDecision::Reject) => {
                Some(ReservationStatus::Rejected)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "PENDING",
            ReservationStatus::Approved => "APPROVED",
            ReservationStatus::Rejected => "REJECTED",
        }
    }
}

impl TryFrom<String> for ReservationStatus {
    type Error = StatusParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "PENDING" => Ok(ReservationStatus::Pending),
            "APPROVED" => Ok(ReservationStatus::Approved),
            "REJECTED" => Ok(ReservationStatus::Rejected),
            _ => Err(StatusParseError { kind: "reservation", value }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct RoomReservation {
    pub id: String,
    pub room_id: String,
    pub professional_id: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub status: ReservationStatus,
    pub value: i64,
    pub paid: bool,
    pub ledger_id: String,
    pub created_at: DateTime<Utc>,
}

impl RoomReservation {
    pub fn new(
        room_id: String,
        professional_id: String,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        value: i64,
        ledger_id: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            room_id,
            professional_id,
            start_at,
            end_at,
            status: ReservationStatus::Pending,
            value,
            paid: false,
            ledger_id,
            created_at: Utc::now(),
        }
    }
}
