use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{Partner, Point};
use crate::errors::ServiceError;

/// Repository abstraction for partner persistence.
#[async_trait]
pub trait PartnerRepository: Send + Sync {
    /// Store a new partner. A duplicate `document` must fail with [`ServiceError::Conflict`]
    /// and leave nothing behind.
    async fn insert(&self, partner: &Partner) -> Result<(), ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Partner>, ServiceError>;
    /// Partner whose coverage area contains `location` and whose address is nearest to it.
    /// Equal distances resolve to the lowest id.
    async fn find_nearest_covering(&self, location: &Point) -> Result<Option<Partner>, ServiceError>;
}

/// In-memory repository for tests, doc examples and database-less runs.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    #[derive(Default)]
    pub struct InMemoryPartnerRepository {
        partners: RwLock<HashMap<Uuid, Partner>>, // key: partner id
    }

    impl InMemoryPartnerRepository {
        pub fn new() -> Self { Self::default() }

        pub async fn len(&self) -> usize { self.partners.read().await.len() }

        pub async fn is_empty(&self) -> bool { self.partners.read().await.is_empty() }
    }

    #[async_trait]
    impl PartnerRepository for InMemoryPartnerRepository {
        async fn insert(&self, partner: &Partner) -> Result<(), ServiceError> {
            // uniqueness check and insert under the same write lock
            let mut partners = self.partners.write().await;
            if partners.values().any(|p| p.document == partner.document) {
                return Err(ServiceError::Conflict("document already exists".into()));
            }
            if partners.contains_key(&partner.id) {
                return Err(ServiceError::Conflict("id already exists".into()));
            }
            partners.insert(partner.id, partner.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Partner>, ServiceError> {
            Ok(self.partners.read().await.get(&id).cloned())
        }

        async fn find_nearest_covering(&self, location: &Point) -> Result<Option<Partner>, ServiceError> {
            let partners = self.partners.read().await;
            let nearest = partners
                .values()
                .filter(|p| p.coverage_area.contains(location))
                .map(|p| (p.address.haversine_distance(location), p))
                .min_by(|(da, a), (db, b)| da.total_cmp(db).then_with(|| a.id.cmp(&b.id)))
                .map(|(_, p)| p.clone());
            Ok(nearest)
        }
    }
}
