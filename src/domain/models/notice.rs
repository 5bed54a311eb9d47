use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fan-out payloads posted to the notification service after a state
/// change commits. Delivery is fire-and-forget; the services log and
/// swallow dispatch failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleNotice {
    BookingCreated {
        booking_id: String,
        professional_id: String,
        client_id: String,
        start_at: DateTime<Utc>,
    },
    BookingConfirmed {
        booking_id: String,
        client_id: String,
        start_at: DateTime<Utc>,
    },
    BookingCanceled {
        booking_id: String,
        client_id: String,
        by_professional: bool,
        reason: Option<String>,
    },
    BookingConcluded {
        booking_id: String,
        client_id: String,
        value: i64,
    },
    ReservationDecided {
        reservation_id: String,
        professional_id: String,
        approved: bool,
    },
}
