//! Postgres-backed beer store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | RepositoryError |
//! |------------|----------------------|-----------------|
//! | Database (unique violation on `upc`) | `23505` | `DuplicateUpc` |
//! | Database (other) | Any other | `Storage` |
//! | Pool / IO / decode | N/A | `Storage` |
//!
//! Version conflicts are detected by `UPDATE ... WHERE id = $1 AND version = $2`
//! affecting zero rows while the row still exists.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Row};
use std::sync::Arc;
use tracing::instrument;

use taproom_core::{AuditContext, BeerId};
use taproom_inventory::{Beer, BeerDetails, Price, Upc};

use super::{BeerRepository, RepositoryError};

/// Idempotent schema bootstrap for the `beers` table.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS beers (
    id UUID PRIMARY KEY,
    version BIGINT NOT NULL DEFAULT 0,
    beer_name VARCHAR(50) NOT NULL,
    beer_style VARCHAR(50) NOT NULL,
    upc VARCHAR(20) NOT NULL,
    quantity_on_hand INTEGER NOT NULL CHECK (quantity_on_hand >= 0),
    price NUMERIC(7, 2) NOT NULL CHECK (price > 0),
    created_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    update_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    created_by VARCHAR(100) NOT NULL,
    last_modified_by VARCHAR(100) NOT NULL,
    CONSTRAINT beers_upc_key UNIQUE (upc)
)
"#;

const SELECT_COLUMNS: &str = r#"
    SELECT
        id,
        version,
        beer_name,
        beer_style,
        upc,
        quantity_on_hand,
        price,
        created_date,
        update_date,
        created_by,
        last_modified_by
    FROM beers
"#;

/// Postgres-backed beer repository.
///
/// Uses the SQLx connection pool, which is `Send + Sync`; every statement is a
/// single round trip so no explicit transactions are needed.
#[derive(Debug, Clone)]
pub struct PostgresBeerRepository {
    pool: Arc<PgPool>,
}

impl PostgresBeerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect and make sure the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self, RepositoryError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let repo = Self::new(pool);
        repo.ensure_schema().await?;
        Ok(repo)
    }

    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }

    async fn exists(&self, id: BeerId) -> Result<bool, RepositoryError> {
        let row = sqlx::query("SELECT 1 FROM beers WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("exists", e))?;
        Ok(row.is_some())
    }
}

#[async_trait]
impl BeerRepository for PostgresBeerRepository {
    #[instrument(skip(self), err)]
    async fn find_all(&self) -> Result<Vec<Beer>, RepositoryError> {
        let rows = sqlx::query(&format!("{SELECT_COLUMNS} ORDER BY created_date ASC, id ASC"))
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_all", e))?;

        rows.iter()
            .map(|row| {
                BeerRow::from_row(row)
                    .map(Beer::from)
                    .map_err(|e| map_sqlx_error("decode_beer", e))
            })
            .collect()
    }

    #[instrument(skip(self), fields(beer_id = %id), err)]
    async fn find_by_id(&self, id: BeerId) -> Result<Option<Beer>, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;

        decode_optional(row)
    }

    #[instrument(skip(self), err)]
    async fn find_by_upc(&self, upc: &str) -> Result<Option<Beer>, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE upc = $1"))
            .bind(upc)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_upc", e))?;

        decode_optional(row)
    }

    #[instrument(skip(self, details, audit), fields(upc = %details.upc, actor = audit.actor()), err)]
    async fn insert(&self, details: BeerDetails, audit: &AuditContext) -> Result<Beer, RepositoryError> {
        let id = BeerId::new();
        let row = sqlx::query(
            r#"
            INSERT INTO beers (
                id,
                version,
                beer_name,
                beer_style,
                upc,
                quantity_on_hand,
                price,
                created_by,
                last_modified_by
            )
            VALUES ($1, 0, $2, $3, $4, $5, $6, $7, $7)
            RETURNING
                id, version, beer_name, beer_style, upc, quantity_on_hand, price,
                created_date, update_date, created_by, last_modified_by
            "#,
        )
        .bind(id.as_uuid())
        .bind(&details.name)
        .bind(&details.style)
        .bind(details.upc.as_str())
        .bind(details.quantity_on_hand)
        .bind(details.price.amount())
        .bind(audit.actor())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepositoryError::DuplicateUpc(details.upc.to_string())
            } else {
                map_sqlx_error("insert", e)
            }
        })?;

        BeerRow::from_row(&row)
            .map(Beer::from)
            .map_err(|e| map_sqlx_error("decode_beer", e))
    }

    #[instrument(skip(self, beer, audit), fields(beer_id = %beer.id, version = beer.version, actor = audit.actor()), err)]
    async fn update(&self, beer: &Beer, audit: &AuditContext) -> Result<Beer, RepositoryError> {
        let row = sqlx::query(
            r#"
            UPDATE beers SET
                beer_name = $3,
                beer_style = $4,
                quantity_on_hand = $5,
                price = $6,
                last_modified_by = $7,
                update_date = GREATEST(NOW(), update_date + INTERVAL '1 microsecond'),
                version = version + 1
            WHERE id = $1 AND version = $2
            RETURNING
                id, version, beer_name, beer_style, upc, quantity_on_hand, price,
                created_date, update_date, created_by, last_modified_by
            "#,
        )
        .bind(beer.id.as_uuid())
        .bind(beer.version)
        .bind(&beer.name)
        .bind(&beer.style)
        .bind(beer.quantity_on_hand)
        .bind(beer.price.amount())
        .bind(audit.actor())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        match row {
            Some(row) => BeerRow::from_row(&row)
                .map(Beer::from)
                .map_err(|e| map_sqlx_error("decode_beer", e)),
            None if self.exists(beer.id).await? => Err(RepositoryError::Concurrency(format!(
                "beer {} was modified concurrently (write based on version {})",
                beer.id, beer.version
            ))),
            None => Err(RepositoryError::NotFound),
        }
    }

    #[instrument(skip(self), fields(beer_id = %id), err)]
    async fn delete(&self, id: BeerId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM beers WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

fn decode_optional(row: Option<sqlx::postgres::PgRow>) -> Result<Option<Beer>, RepositoryError> {
    row.map(|r| {
        BeerRow::from_row(&r)
            .map(Beer::from)
            .map_err(|e| map_sqlx_error("decode_beer", e))
    })
    .transpose()
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            RepositoryError::Storage(format!("database error in {}: {}", operation, db_err.message()))
        }
        other => RepositoryError::Storage(format!("{} failed: {}", operation, other)),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}

// SQLx row types

#[derive(Debug)]
struct BeerRow {
    id: uuid::Uuid,
    version: i64,
    beer_name: String,
    beer_style: String,
    upc: String,
    quantity_on_hand: i32,
    price: Decimal,
    created_date: DateTime<Utc>,
    update_date: DateTime<Utc>,
    created_by: String,
    last_modified_by: String,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for BeerRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(BeerRow {
            id: row.try_get("id")?,
            version: row.try_get("version")?,
            beer_name: row.try_get("beer_name")?,
            beer_style: row.try_get("beer_style")?,
            upc: row.try_get("upc")?,
            quantity_on_hand: row.try_get("quantity_on_hand")?,
            price: row.try_get("price")?,
            created_date: row.try_get("created_date")?,
            update_date: row.try_get("update_date")?,
            created_by: row.try_get("created_by")?,
            last_modified_by: row.try_get("last_modified_by")?,
        })
    }
}

impl From<BeerRow> for Beer {
    fn from(row: BeerRow) -> Self {
        Beer {
            id: BeerId::from_uuid(row.id),
            name: row.beer_name,
            style: row.beer_style,
            upc: Upc::from_trusted(row.upc),
            quantity_on_hand: row.quantity_on_hand,
            price: Price::from_trusted(row.price.normalize()),
            created_at: row.created_date,
            updated_at: row.update_date,
            version: row.version,
            created_by: row.created_by,
            updated_by: row.last_modified_by,
        }
    }
}
