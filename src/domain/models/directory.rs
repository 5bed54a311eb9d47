use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Read models over the profile service's data. This core never writes them.

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Professional {
    pub id: String,
    pub name: String,
    pub specialty: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub hourly_rate: i64,
    pub created_at: DateTime<Utc>,
}

impl Room {
    /// Rental price in cents for a period, prorated by the minute.
    pub fn rental_value(&self, start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> i64 {
        let minutes = (end_at - start_at).num_minutes();
        self.hourly_rate * minutes / 60
    }
}
