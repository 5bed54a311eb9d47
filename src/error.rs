use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Invalid range: {0}")]
    InvalidRange(String),
    #[error("Overlapping slots: {0}")]
    Overlap(String),
    #[error("Room conflict: {0}")]
    RoomConflict(String),
    #[error("Lead time not met: {0}")]
    LeadTime(String),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
    #[error("Settlement failed: {0}")]
    Settlement(String),
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl AppError {
    /// Maps unique-constraint violations raised by the storage backstops
    /// to a domain conflict; everything else stays a database error.
    pub fn from_db(e: sqlx::Error, conflict_msg: &str) -> Self {
        if let Some(db_err) = e.as_database_error() {
            let code = db_err.code().unwrap_or_default();

            // 2067 = SQLite Unique Constraint
            // 1555 = SQLite Primary Key Constraint
            // 23505 = PostgreSQL Unique Violation
            if code == "2067" || code == "1555" || code == "23505" {
                return AppError::Conflict(conflict_msg.to_string());
            }
        }

        error!("Database error: {:?}", e);
        AppError::Database(e)
    }
}
