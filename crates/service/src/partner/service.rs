use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{CreatePartnerInput, MultiPolygon, Partner, Point};
use super::repository::PartnerRepository;
use crate::errors::ServiceError;

/// Partner directory business service, independent of web framework and storage.
pub struct PartnerService<R: PartnerRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: PartnerRepository + ?Sized> PartnerService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Validate and store a new partner, returning it with its generated id.
    ///
    /// # Examples
    /// ```
    /// use service::partner::{repository::memory::InMemoryPartnerRepository, CreatePartnerInput, PartnerService};
    /// use serde_json::json;
    /// use std::sync::Arc;
    /// let svc = PartnerService::new(Arc::new(InMemoryPartnerRepository::new()));
    /// let input = CreatePartnerInput {
    ///     trading_name: "Adega Osasco".into(),
    ///     owner_name: "Ze da Ambev".into(),
    ///     document: "02.453.716/000170".into(),
    ///     coverage_area: json!({"type": "MultiPolygon", "coordinates": [[[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]]]}),
    ///     address: json!({"type": "Point", "coordinates": [0.5, 0.5]}),
    /// };
    /// let partner = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(partner.trading_name, "Adega Osasco");
    /// ```
    #[instrument(skip(self, input), fields(document = %input.document))]
    pub async fn create(&self, input: CreatePartnerInput) -> Result<Partner, ServiceError> {
        models::partner::validate_fields(&input.trading_name, &input.owner_name, &input.document)?;
        let coverage_area = MultiPolygon::from_geojson_value("coverageArea", input.coverage_area)?;
        let address = Point::from_geojson_value("address", input.address)?;

        let partner = Partner {
            id: Uuid::new_v4(),
            trading_name: input.trading_name,
            owner_name: input.owner_name,
            document: input.document,
            coverage_area,
            address,
        };
        self.repo.insert(&partner).await?;
        info!(partner_id = %partner.id, document = %partner.document, "partner_created");
        Ok(partner)
    }

    /// Look up a partner by id. Identifiers that are not UUIDs cannot exist and report `NotFound`.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Partner, ServiceError> {
        let Ok(id) = Uuid::parse_str(id) else {
            debug!("unparsable partner id");
            return Err(ServiceError::not_found("partner"));
        };
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("partner"))
    }

    /// Nearest partner (by address) among those whose coverage area contains the location.
    ///
    /// # Examples
    /// ```
    /// use service::partner::{repository::memory::InMemoryPartnerRepository, PartnerService};
    /// use service::errors::ServiceError;
    /// use std::sync::Arc;
    /// let svc = PartnerService::new(Arc::new(InMemoryPartnerRepository::new()));
    /// let res = tokio_test::block_on(svc.find_by_location(-23.5, -46.6));
    /// assert!(matches!(res, Err(ServiceError::NotFound(_))));
    /// ```
    #[instrument(skip(self))]
    pub async fn find_by_location(&self, lat: f64, long: f64) -> Result<Partner, ServiceError> {
        let location = Point::new(long, lat).map_err(|e| match ServiceError::from(e) {
            ServiceError::Validation(msg) => ServiceError::Validation(format!("invalid search location: {msg}")),
            other => other,
        })?;
        let found = self
            .repo
            .find_nearest_covering(&location)
            .await?
            .ok_or_else(|| ServiceError::NotFound("no partner covers this location".into()))?;
        debug!(partner_id = %found.id, "partner_found_for_location");
        Ok(found)
    }
}
