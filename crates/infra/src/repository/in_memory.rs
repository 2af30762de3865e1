use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use taproom_core::{AuditContext, BeerId};
use taproom_inventory::{Beer, BeerDetails};

use super::{BeerRepository, RepositoryError};

/// In-memory beer store.
///
/// Intended for tests/dev. Enforces the same UPC uniqueness and version checks
/// as the Postgres store.
#[derive(Debug, Default)]
pub struct InMemoryBeerRepository {
    beers: RwLock<HashMap<BeerId, Beer>>,
}

impl InMemoryBeerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> RepositoryError {
        RepositoryError::Storage("lock poisoned".to_string())
    }
}

/// `updated_at` must move forward on every write, even within one clock tick.
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[async_trait]
impl BeerRepository for InMemoryBeerRepository {
    async fn find_all(&self) -> Result<Vec<Beer>, RepositoryError> {
        let map = self.beers.read().map_err(|_| Self::poisoned())?;
        let mut all: Vec<Beer> = map.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn find_by_id(&self, id: BeerId) -> Result<Option<Beer>, RepositoryError> {
        let map = self.beers.read().map_err(|_| Self::poisoned())?;
        Ok(map.get(&id).cloned())
    }

    async fn find_by_upc(&self, upc: &str) -> Result<Option<Beer>, RepositoryError> {
        let map = self.beers.read().map_err(|_| Self::poisoned())?;
        Ok(map.values().find(|b| b.upc.as_str() == upc).cloned())
    }

    async fn insert(&self, details: BeerDetails, audit: &AuditContext) -> Result<Beer, RepositoryError> {
        let mut map = self.beers.write().map_err(|_| Self::poisoned())?;

        if map.values().any(|b| b.upc == details.upc) {
            return Err(RepositoryError::DuplicateUpc(details.upc.to_string()));
        }

        let now = Utc::now();
        let beer = Beer {
            id: BeerId::new(),
            name: details.name,
            style: details.style,
            upc: details.upc,
            quantity_on_hand: details.quantity_on_hand,
            price: details.price,
            created_at: now,
            updated_at: now,
            version: 0,
            created_by: audit.actor().to_string(),
            updated_by: audit.actor().to_string(),
        };
        map.insert(beer.id, beer.clone());
        Ok(beer)
    }

    async fn update(&self, beer: &Beer, audit: &AuditContext) -> Result<Beer, RepositoryError> {
        let mut map = self.beers.write().map_err(|_| Self::poisoned())?;

        let stored = map.get_mut(&beer.id).ok_or(RepositoryError::NotFound)?;
        if stored.version != beer.version {
            return Err(RepositoryError::Concurrency(format!(
                "beer {} is at version {}, write was based on {}",
                beer.id, stored.version, beer.version
            )));
        }

        stored.name = beer.name.clone();
        stored.style = beer.style.clone();
        stored.quantity_on_hand = beer.quantity_on_hand;
        stored.price = beer.price;
        stored.updated_at = next_timestamp(stored.updated_at);
        stored.updated_by = audit.actor().to_string();
        stored.version += 1;

        Ok(stored.clone())
    }

    async fn delete(&self, id: BeerId) -> Result<(), RepositoryError> {
        let mut map = self.beers.write().map_err(|_| Self::poisoned())?;
        map.remove(&id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;
    use rust_decimal::Decimal;
    use taproom_inventory::BeerInput;

    fn details(name: &str, upc: &str) -> BeerDetails {
        BeerInput {
            name: Some(name.to_string()),
            style: Some("Lager".to_string()),
            upc: Some(upc.to_string()),
            quantity_on_hand: Some(50),
            price: Some(Decimal::from_str("9.99").unwrap()),
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_id_version_and_audit() {
        let repo = InMemoryBeerRepository::new();
        let beer = repo
            .insert(details("Find Me", "0987654321"), &AuditContext::new("alice"))
            .await
            .unwrap();

        assert_eq!(beer.version, 0);
        assert_eq!(beer.created_by, "alice");
        assert_eq!(beer.created_at, beer.updated_at);

        let found = repo.find_by_id(beer.id).await.unwrap().unwrap();
        assert_eq!(found, beer);
        let by_upc = repo.find_by_upc("0987654321").await.unwrap().unwrap();
        assert_eq!(by_upc.id, beer.id);
    }

    #[tokio::test]
    async fn duplicate_upc_is_rejected() {
        let repo = InMemoryBeerRepository::new();
        let audit = AuditContext::system();
        repo.insert(details("First", "1122334455"), &audit).await.unwrap();

        let err = repo
            .insert(details("Second", "1122334455"), &audit)
            .await
            .unwrap_err();
        assert_eq!(err, RepositoryError::DuplicateUpc("1122334455".to_string()));
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_bumps_version_and_timestamp() {
        let repo = InMemoryBeerRepository::new();
        let mut beer = repo
            .insert(details("Original", "5544332211"), &AuditContext::system())
            .await
            .unwrap();

        beer.name = "Updated".to_string();
        let updated = repo.update(&beer, &AuditContext::new("bob")).await.unwrap();

        assert_eq!(updated.name, "Updated");
        assert_eq!(updated.version, 1);
        assert!(updated.updated_at > updated.created_at);
        assert_eq!(updated.created_at, beer.created_at);
        assert_eq!(updated.created_by, "system");
        assert_eq!(updated.updated_by, "bob");
    }

    #[tokio::test]
    async fn stale_write_is_a_concurrency_error() {
        let repo = InMemoryBeerRepository::new();
        let audit = AuditContext::system();
        let beer = repo.insert(details("Racer", "6677889900"), &audit).await.unwrap();

        let mut first = beer.clone();
        first.quantity_on_hand = 10;
        repo.update(&first, &audit).await.unwrap();

        let mut second = beer;
        second.quantity_on_hand = 20;
        let err = repo.update(&second, &audit).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Concurrency(_)));

        let stored = repo.find_all().await.unwrap();
        assert_eq!(stored[0].quantity_on_hand, 10);
    }

    #[tokio::test]
    async fn delete_twice_reports_not_found() {
        let repo = InMemoryBeerRepository::new();
        let beer = repo
            .insert(details("To Delete", "1231231234"), &AuditContext::system())
            .await
            .unwrap();

        repo.delete(beer.id).await.unwrap();
        assert_eq!(repo.find_by_id(beer.id).await.unwrap(), None);
        assert_eq!(repo.delete(beer.id).await.unwrap_err(), RepositoryError::NotFound);
    }

    #[tokio::test]
    async fn find_all_is_ordered_by_creation() {
        let repo = InMemoryBeerRepository::new();
        let audit = AuditContext::system();
        let a = repo.insert(details("Alpha", "1000000001"), &audit).await.unwrap();
        let b = repo.insert(details("Bravo", "1000000002"), &audit).await.unwrap();

        let ids: Vec<_> = repo.find_all().await.unwrap().into_iter().map(|x| x.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }
}
