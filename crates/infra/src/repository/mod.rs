//! Beer persistence: storage trait plus in-memory and Postgres implementations.

use async_trait::async_trait;
use thiserror::Error;

use taproom_core::{AuditContext, BeerId};
use taproom_inventory::{Beer, BeerDetails};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryBeerRepository;
pub use postgres::PostgresBeerRepository;

/// Storage-level failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// No row with the requested identifier.
    #[error("not found")]
    NotFound,

    /// The UPC unique constraint rejected the write.
    #[error("duplicate upc: {0}")]
    DuplicateUpc(String),

    /// Stored version moved on since the record was loaded.
    #[error("concurrency conflict: {0}")]
    Concurrency(String),

    /// Anything else the backend reported (connection, decoding, constraints).
    #[error("storage error: {0}")]
    Storage(String),
}

/// Persistence port for the beer catalog.
///
/// Stores own `id`, timestamps, `version` and the audit columns. Writes are
/// stamped with the actor from the supplied [`AuditContext`].
#[async_trait]
pub trait BeerRepository: Send + Sync {
    /// All beers, oldest first.
    async fn find_all(&self) -> Result<Vec<Beer>, RepositoryError>;

    async fn find_by_id(&self, id: BeerId) -> Result<Option<Beer>, RepositoryError>;

    async fn find_by_upc(&self, upc: &str) -> Result<Option<Beer>, RepositoryError>;

    /// Persist a new beer at version 0.
    async fn insert(&self, details: BeerDetails, audit: &AuditContext) -> Result<Beer, RepositoryError>;

    /// Persist the business fields of `beer`.
    ///
    /// Succeeds only if the stored version still equals `beer.version`; the
    /// returned record carries the bumped version and a fresh `updated_at`.
    async fn update(&self, beer: &Beer, audit: &AuditContext) -> Result<Beer, RepositoryError>;

    /// Remove a beer. `NotFound` if there is nothing to remove.
    async fn delete(&self, id: BeerId) -> Result<(), RepositoryError>;
}
