use crate::domain::{
    models::directory::{Professional, Room},
    ports::{ProfessionalDirectory, RoomDirectory},
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

/// Read-only lookups against the directory tables mirrored from the profile
/// service.
pub struct SqliteDirectoryRepo {
    pool: SqlitePool,
}

impl SqliteDirectoryRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfessionalDirectory for SqliteDirectoryRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<Professional>, AppError> {
        sqlx::query_as::<_, Professional>("SELECT * FROM professionals WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
}

#[async_trait]
impl RoomDirectory for SqliteDirectoryRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<Room>, AppError> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
}
