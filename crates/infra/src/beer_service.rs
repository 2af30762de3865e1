//! Catalog use cases (application-level orchestration).
//!
//! ```text
//! BeerInput
//!   ↓
//! 1. Load the current record (NotFound first, before anything else)
//!   ↓
//! 2. Validate the input (all field violations at once)
//!   ↓
//! 3. Check the caller's expected version, merge fields
//!   ↓
//! 4. Persist (store re-checks the version atomically)
//! ```
//!
//! The service holds the repository as a trait object, so the HTTP layer and
//! tests can run against the in-memory store and production against Postgres.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument};

use taproom_core::{AuditContext, BeerId, DomainError, ExpectedVersion};
use taproom_inventory::{Beer, BeerInput};

use crate::repository::{BeerRepository, RepositoryError};

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Deterministic business failure (validation, not found, conflict, stock).
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// Backend failure; details are for logs, not for callers.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => ServiceError::Domain(DomainError::not_found("record not found")),
            RepositoryError::DuplicateUpc(upc) => ServiceError::Domain(DomainError::conflict(format!(
                "Beer with UPC {upc} already exists"
            ))),
            RepositoryError::Concurrency(msg) => ServiceError::Domain(DomainError::Conflict(msg)),
            RepositoryError::Storage(msg) => ServiceError::Storage(msg),
        }
    }
}

fn beer_not_found(id: BeerId) -> ServiceError {
    ServiceError::Domain(DomainError::not_found(format!("Beer not found with id: {id}")))
}

/// Map a repository `NotFound` to the id-specific message; pass everything else through.
fn not_found_as(id: BeerId) -> impl FnOnce(RepositoryError) -> ServiceError {
    move |e| match e {
        RepositoryError::NotFound => beer_not_found(id),
        other => other.into(),
    }
}

/// Beer catalog service: list, get, create, update, delete.
#[derive(Clone)]
pub struct BeerService {
    repo: Arc<dyn BeerRepository>,
}

impl core::fmt::Debug for BeerService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BeerService").finish_non_exhaustive()
    }
}

impl BeerService {
    pub fn new(repo: Arc<dyn BeerRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self), err)]
    pub async fn list(&self) -> Result<Vec<Beer>, ServiceError> {
        debug!("fetching all beers");
        Ok(self.repo.find_all().await?)
    }

    #[instrument(skip(self), fields(beer_id = %id), err)]
    pub async fn get(&self, id: BeerId) -> Result<Beer, ServiceError> {
        debug!("fetching beer");
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| beer_not_found(id))
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_upc(&self, upc: &str) -> Result<Beer, ServiceError> {
        self.repo.find_by_upc(upc).await?.ok_or_else(|| {
            ServiceError::Domain(DomainError::not_found(format!("Beer not found with upc: {upc}")))
        })
    }

    /// Validate and persist a new beer. Store-owned fields are never taken from input.
    #[instrument(skip(self, input, audit), fields(actor = audit.actor()), err)]
    pub async fn create(&self, input: BeerInput, audit: &AuditContext) -> Result<Beer, ServiceError> {
        let details = input.validate().map_err(DomainError::from)?;
        debug!(name = %details.name, upc = %details.upc, "saving new beer");
        Ok(self.repo.insert(details, audit).await?)
    }

    /// Overwrite the business fields of an existing beer.
    ///
    /// `expected` is the version the caller last saw; `Any` skips the early check,
    /// but the store write still fails on a concurrent modification.
    #[instrument(skip(self, input, audit), fields(beer_id = %id, actor = audit.actor()), err)]
    pub async fn update(
        &self,
        id: BeerId,
        input: BeerInput,
        expected: ExpectedVersion,
        audit: &AuditContext,
    ) -> Result<Beer, ServiceError> {
        debug!("updating beer");
        let mut beer = self.get(id).await?;

        let details = input.validate().map_err(DomainError::from)?;
        expected.check(beer.version)?;
        beer.apply_update(details);

        self.repo
            .update(&beer, audit)
            .await
            .map_err(not_found_as(id))
    }

    #[instrument(skip(self), fields(beer_id = %id), err)]
    pub async fn delete(&self, id: BeerId) -> Result<(), ServiceError> {
        debug!("deleting beer");
        self.repo.delete(id).await.map_err(not_found_as(id))?;
        debug!("deleted beer");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryBeerRepository;
    use async_trait::async_trait;
    use core::str::FromStr;
    use rust_decimal::Decimal;
    use taproom_inventory::BeerDetails;

    fn service() -> BeerService {
        BeerService::new(Arc::new(InMemoryBeerRepository::new()))
    }

    fn test_input() -> BeerInput {
        BeerInput {
            name: Some("Test Beer".to_string()),
            style: Some("IPA".to_string()),
            upc: Some("123456789".to_string()),
            quantity_on_hand: Some(100),
            price: Some(Decimal::from_str("9.99").unwrap()),
        }
    }

    fn updated_input() -> BeerInput {
        BeerInput {
            name: Some("Updated Test Beer".to_string()),
            price: Some(Decimal::from_str("12.99").unwrap()),
            ..test_input()
        }
    }

    fn expect_domain(err: ServiceError) -> DomainError {
        match err {
            ServiceError::Domain(e) => e,
            other => panic!("expected domain error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips_business_fields() {
        let svc = service();
        let created = svc.create(test_input(), &AuditContext::system()).await.unwrap();
        let fetched = svc.get(created.id).await.unwrap();

        assert_eq!(fetched.name, "Test Beer");
        assert_eq!(fetched.style, "IPA");
        assert_eq!(fetched.upc.as_str(), "123456789");
        assert_eq!(fetched.quantity_on_hand, 100);
        assert_eq!(fetched.price.amount(), Decimal::from_str("9.99").unwrap());
        assert_eq!(fetched.version, 0);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn list_returns_every_beer() {
        let svc = service();
        svc.create(test_input(), &AuditContext::system()).await.unwrap();
        svc.create(
            BeerInput {
                upc: Some("0987654321".to_string()),
                ..test_input()
            },
            &AuditContext::system(),
        )
        .await
        .unwrap();

        assert_eq!(svc.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn create_rejects_invalid_input_with_all_violations() {
        let svc = service();
        let err = svc
            .create(
                BeerInput {
                    name: Some("X".to_string()),
                    price: None,
                    ..test_input()
                },
                &AuditContext::system(),
            )
            .await
            .unwrap_err();

        match expect_domain(err) {
            DomainError::Validation(v) => {
                assert!(v.has_field("beerName"));
                assert!(v.has_field("price"));
            }
            other => panic!("expected validation, got {other:?}"),
        }
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_upc_is_a_conflict() {
        let svc = service();
        svc.create(test_input(), &AuditContext::system()).await.unwrap();
        let err = svc.create(test_input(), &AuditContext::system()).await.unwrap_err();
        assert_eq!(
            expect_domain(err),
            DomainError::conflict("Beer with UPC 123456789 already exists")
        );
    }

    #[tokio::test]
    async fn update_keeps_id_and_created_at_but_refreshes_updated_at() {
        let svc = service();
        let created = svc.create(test_input(), &AuditContext::system()).await.unwrap();

        let updated = svc
            .update(created.id, updated_input(), ExpectedVersion::Any, &AuditContext::new("carol"))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.name, "Updated Test Beer");
        assert_eq!(updated.price.amount(), Decimal::from_str("12.99").unwrap());
        assert_eq!(updated.version, created.version + 1);
        assert_eq!(updated.updated_by, "carol");
    }

    #[tokio::test]
    async fn update_ignores_a_different_upc() {
        let svc = service();
        let created = svc.create(test_input(), &AuditContext::system()).await.unwrap();

        let updated = svc
            .update(
                created.id,
                BeerInput {
                    upc: Some("111111111".to_string()),
                    ..updated_input()
                },
                ExpectedVersion::Any,
                &AuditContext::system(),
            )
            .await
            .unwrap();

        assert_eq!(updated.upc.as_str(), "123456789");
        assert_eq!(updated.name, "Updated Test Beer");
        assert!(svc.get_by_upc("111111111").await.is_err());
    }

    #[tokio::test]
    async fn update_with_stale_version_is_a_conflict() {
        let svc = service();
        let created = svc.create(test_input(), &AuditContext::system()).await.unwrap();
        svc.update(created.id, updated_input(), ExpectedVersion::Exact(0), &AuditContext::system())
            .await
            .unwrap();

        let err = svc
            .update(created.id, test_input(), ExpectedVersion::Exact(0), &AuditContext::system())
            .await
            .unwrap_err();
        assert!(matches!(expect_domain(err), DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn missing_id_is_not_found_for_get_update_and_delete() {
        let svc = service();
        let missing = BeerId::new();
        let message = format!("Beer not found with id: {missing}");

        let err = expect_domain(svc.get(missing).await.unwrap_err());
        assert_eq!(err, DomainError::not_found(message.clone()));

        // Even an invalid payload reports the missing record first.
        let err = svc
            .update(missing, BeerInput::default(), ExpectedVersion::Any, &AuditContext::system())
            .await
            .unwrap_err();
        assert_eq!(expect_domain(err), DomainError::not_found(message.clone()));

        let err = expect_domain(svc.delete(missing).await.unwrap_err());
        assert_eq!(err, DomainError::not_found(message));
    }

    #[tokio::test]
    async fn delete_is_not_idempotent() {
        let svc = service();
        let created = svc.create(test_input(), &AuditContext::system()).await.unwrap();

        svc.delete(created.id).await.unwrap();
        let err = expect_domain(svc.delete(created.id).await.unwrap_err());
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn get_by_upc_finds_the_alternate_key() {
        let svc = service();
        let created = svc.create(test_input(), &AuditContext::system()).await.unwrap();

        assert_eq!(svc.get_by_upc("123456789").await.unwrap().id, created.id);
        assert!(expect_domain(svc.get_by_upc("000000000").await.unwrap_err()).is_not_found());
    }

    struct BrokenRepository;

    #[async_trait]
    impl BeerRepository for BrokenRepository {
        async fn find_all(&self) -> Result<Vec<Beer>, RepositoryError> {
            Err(RepositoryError::Storage("connection refused".to_string()))
        }
        async fn find_by_id(&self, _id: BeerId) -> Result<Option<Beer>, RepositoryError> {
            Err(RepositoryError::Storage("connection refused".to_string()))
        }
        async fn find_by_upc(&self, _upc: &str) -> Result<Option<Beer>, RepositoryError> {
            Err(RepositoryError::Storage("connection refused".to_string()))
        }
        async fn insert(&self, _d: BeerDetails, _a: &AuditContext) -> Result<Beer, RepositoryError> {
            Err(RepositoryError::Storage("connection refused".to_string()))
        }
        async fn update(&self, _b: &Beer, _a: &AuditContext) -> Result<Beer, RepositoryError> {
            Err(RepositoryError::Storage("connection refused".to_string()))
        }
        async fn delete(&self, _id: BeerId) -> Result<(), RepositoryError> {
            Err(RepositoryError::Storage("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn backend_failures_surface_as_storage_errors() {
        let svc = BeerService::new(Arc::new(BrokenRepository));
        assert!(matches!(svc.list().await.unwrap_err(), ServiceError::Storage(_)));
        assert!(matches!(svc.get(BeerId::new()).await.unwrap_err(), ServiceError::Storage(_)));
        assert!(matches!(svc.delete(BeerId::new()).await.unwrap_err(), ServiceError::Storage(_)));
    }
}
