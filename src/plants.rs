use async_trait::async_trait;
use sqlx::PgPool;

use crate::model::Plant;

const SELECT_ALL_PLANTS: &str = "SELECT * FROM plants";

/// Read access to stored plants.
#[async_trait]
pub trait PlantRepository: Send + Sync + 'static {
    /// Every stored plant, in whatever order the store returns them.
    async fn list_all(&self) -> Result<Vec<Plant>, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct PgPlantRepository {
    pool: PgPool,
}

impl PgPlantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PlantRepository for PgPlantRepository {
    async fn list_all(&self) -> Result<Vec<Plant>, sqlx::Error> {
        list_all(&self.pool).await
    }
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Plant>, sqlx::Error> {
    sqlx::query_as::<_, Plant>(SELECT_ALL_PLANTS)
        .fetch_all(pool)
        .await
}
