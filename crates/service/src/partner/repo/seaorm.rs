use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::partner::domain::{Partner, Point};
use crate::partner::repository::PartnerRepository;

/// PostGIS-backed repository; every call borrows a pooled connection for its duration.
pub struct SeaOrmPartnerRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmPartnerRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl PartnerRepository for SeaOrmPartnerRepository {
    async fn insert(&self, partner: &Partner) -> Result<(), ServiceError> {
        models::partner::insert(&self.db, partner).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Partner>, ServiceError> {
        Ok(models::partner::find_by_id(&self.db, id).await?)
    }

    async fn find_nearest_covering(&self, location: &Point) -> Result<Option<Partner>, ServiceError> {
        Ok(models::partner::find_nearest_covering(&self.db, location).await?)
    }
}
