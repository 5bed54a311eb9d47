use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::StatusParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryDirection {
    In,
    Out,
}

impl EntryDirection {
    pub fn opposite(&self) -> EntryDirection {
        match self {
            EntryDirection::In => EntryDirection::Out,
            EntryDirection::Out => EntryDirection::In,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryDirection::In => "IN",
            EntryDirection::Out => "OUT",
        }
    }
}

impl TryFrom<String> for EntryDirection {
    type Error = StatusParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "IN" => Ok(EntryDirection::In),
            "OUT" => Ok(EntryDirection::Out),
            _ => Err(StatusParseError { kind: "direction", value }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    Pending,
    Settled,
    Failed,
    Reversed,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Pending => "PENDING",
            EntryStatus::Settled => "SETTLED",
            EntryStatus::Failed => "FAILED",
            EntryStatus::Reversed => "REVERSED",
        }
    }
}

impl TryFrom<String> for EntryStatus {
    type Error = StatusParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "PENDING" => Ok(EntryStatus::Pending),
            "SETTLED" => Ok(EntryStatus::Settled),
            "FAILED" => Ok(EntryStatus::Failed),
            "REVERSED" => Ok(EntryStatus::Reversed),
            _ => Err(StatusParseError { kind: "entry", value }),
        }
    }
}

/// One money movement. Rows are append-only: corrections happen through
/// compensating entries, never by editing amount or direction in place.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct LedgerEntry {
    pub id: String,
    pub subject_id: String,
    pub counterparty_id: String,
    pub amount: i64,
    #[sqlx(try_from = "String")]
    pub direction: EntryDirection,
    #[sqlx(try_from = "String")]
    pub status: EntryStatus,
    pub external_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn new(
        subject_id: String,
        counterparty_id: String,
        amount: i64,
        direction: EntryDirection,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            subject_id,
            counterparty_id,
            amount,
            direction,
            status: EntryStatus::Pending,
            external_reference: None,
            created_at: Utc::now(),
        }
    }

    /// The entry that undoes this one: same parties and amount, opposite
    /// direction, settled on creation.
    pub fn compensating(&self) -> LedgerEntry {
        LedgerEntry {
            id: Uuid::new_v4().to_string(),
            subject_id: self.subject_id.clone(),
            counterparty_id: self.counterparty_id.clone(),
            amount: self.amount,
            direction: self.direction.opposite(),
            status: EntryStatus::Settled,
            external_reference: None,
            created_at: Utc::now(),
        }
    }
}
