use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::StatusParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    Free,
    Reserved,
    Occupied,
    Blocked,
    Finished,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Free => "FREE",
            SlotStatus::Reserved => "RESERVED",
            SlotStatus::Occupied => "OCCUPIED",
            SlotStatus::Blocked => "BLOCKED",
            SlotStatus::Finished => "FINISHED",
        }
    }
}

impl TryFrom<String> for SlotStatus {
    type Error = StatusParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "FREE" => Ok(SlotStatus::Free),
            "RESERVED" => Ok(SlotStatus::Reserved),
            "OCCUPIED" => Ok(SlotStatus::Occupied),
            "BLOCKED" => Ok(SlotStatus::Blocked),
            "FINISHED" => Ok(SlotStatus::Finished),
            _ => Err(StatusParseError { kind: "slot", value }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Slot {
    pub id: String,
    pub professional_id: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub status: SlotStatus,
    pub created_at: DateTime<Utc>,
}

impl Slot {
    pub fn new(professional_id: String, start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            professional_id,
            start_at,
            end_at,
            status: SlotStatus::Free,
            created_at: Utc::now(),
        }
    }
}
