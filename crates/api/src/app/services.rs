//! Infrastructure wiring: pick a beer store from config, build the services.

use std::sync::Arc;

use anyhow::Context;

use taproom_infra::{
    AppConfig, BeerRepository, BeerService, InMemoryBeerRepository, PostgresBeerRepository, StorageConfig,
};

/// Services shared by every handler (via `Extension<Arc<AppServices>>`).
#[derive(Debug, Clone)]
pub struct AppServices {
    pub beers: BeerService,
}

impl AppServices {
    pub fn new(repo: Arc<dyn BeerRepository>) -> Self {
        Self {
            beers: BeerService::new(repo),
        }
    }
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    match &config.storage {
        StorageConfig::InMemory => {
            tracing::info!("using in-memory beer store");
            Ok(build_in_memory_services())
        }
        StorageConfig::Postgres { database_url } => {
            tracing::info!("using postgres beer store");
            build_persistent_services(database_url).await
        }
    }
}

pub fn build_in_memory_services() -> AppServices {
    AppServices::new(Arc::new(InMemoryBeerRepository::new()))
}

async fn build_persistent_services(database_url: &str) -> anyhow::Result<AppServices> {
    let repo = PostgresBeerRepository::connect(database_url)
        .await
        .context("failed to connect to Postgres")?;
    Ok(AppServices::new(Arc::new(repo)))
}
