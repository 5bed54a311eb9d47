use crate::domain::{
    models::directory::{Professional, Room},
    ports::{ProfessionalDirectory, RoomDirectory},
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

/// Read-only lookups against the directory tables mirrored from the profile
/// service.
pub struct PostgresDirectoryRepo {
    pool: PgPool,
}

impl PostgresDirectoryRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfessionalDirectory for PostgresDirectoryRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<Professional>, AppError> {
        sqlx::query_as::<_, Professional>("SELECT * FROM professionals WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
}

#[async_trait]
impl RoomDirectory for PostgresDirectoryRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<Room>, AppError> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
}
