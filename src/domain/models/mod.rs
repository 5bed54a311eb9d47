pub mod booking;
pub mod directory;
pub mod ledger;
pub mod notice;
pub mod room_reservation;
pub mod slot;

use thiserror::Error;

/// Raised when a status column holds a value outside the model's state set.
#[derive(Error, Debug)]
#[error("unknown {kind} status: {value}")]
pub struct StatusParseError {
    pub kind: &'static str,
    pub value: String,
}
