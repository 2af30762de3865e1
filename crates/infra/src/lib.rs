//! Infrastructure layer: configuration, beer stores, catalog service.

pub mod beer_service;
pub mod config;
pub mod repository;

pub use beer_service::{BeerService, ServiceError};
pub use config::{AppConfig, ConfigError, StorageConfig};
pub use repository::{BeerRepository, InMemoryBeerRepository, PostgresBeerRepository, RepositoryError};
