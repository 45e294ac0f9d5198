use std::future::Future;
use std::time::Duration;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::{debug, info};
use shared::models::Restaurant;
use crate::{
    config::StoreConfig,
    store::{StoreError, VoteStore},
};

const MAX_CONNECTIONS: u32 = 10;

struct Statements {
    create: String,
    read: String,
    write: String,
    increment: String,
}

impl Statements {
    fn for_table(table: &str) -> Self {
        let table = quote_ident(table);
        Self {
            create: format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    restaurant TEXT PRIMARY KEY,
                    votes BIGINT NOT NULL DEFAULT 0 CHECK (votes >= 0)
                )"
            ),
            read: format!("SELECT votes FROM {table} WHERE restaurant = $1"),
            write: format!(
                "INSERT INTO {table} (restaurant, votes) VALUES ($1, $2)
                 ON CONFLICT (restaurant) DO UPDATE SET votes = EXCLUDED.votes"
            ),
            increment: format!(
                "INSERT INTO {table} AS t (restaurant, votes) VALUES ($1, 1)
                 ON CONFLICT (restaurant) DO UPDATE SET votes = t.votes + 1
                 RETURNING votes"
            ),
        }
    }
}

pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name)
}

pub struct PgVoteStore {
    pool: PgPool,
    statements: Statements,
    region: String,
    timeout: Duration,
}

impl PgVoteStore {
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let url = config
            .database_url
            .as_deref()
            .ok_or_else(|| StoreError::Unavailable("no database url configured".into()))?;

        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(config.timeout)
            .connect(url)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        info!("Connected to vote table '{}' in {}", config.table, config.region);
        Ok(Self::from_pool(pool, config))
    }

    pub fn from_pool(pool: PgPool, config: &StoreConfig) -> Self {
        Self {
            pool,
            statements: Statements::for_table(&config.table),
            region: config.region.clone(),
            timeout: config.timeout,
        }
    }

    pub async fn ensure_table(&self) -> Result<(), StoreError> {
        self.bounded(
            sqlx::query(&self.statements.create).execute(&self.pool),
            StoreError::Write,
        )
        .await?;
        Ok(())
    }

    pub(crate) async fn bounded<T, Fut>(&self, call: Fut, kind: fn(String) -> StoreError) -> Result<T, StoreError>
    where
        Fut: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.map_err(|e| classify(e, kind)),
            Err(_) => Err(StoreError::Unavailable(format!(
                "no response from {} within {}ms",
                self.region,
                self.timeout.as_millis()
            ))),
        }
    }
}

pub(crate) fn classify(err: sqlx::Error, kind: fn(String) -> StoreError) -> StoreError {
    let connection_lost = matches!(
        err,
        sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed
    );

    if connection_lost {
        StoreError::Unavailable(err.to_string())
    } else {
        kind(err.to_string())
    }
}

pub(crate) fn to_count(restaurant: Restaurant, stored: i64) -> Result<u64, StoreError> {
    u64::try_from(stored)
        .map_err(|_| StoreError::Read(format!("negative vote count {} for {}", stored, restaurant)))
}

#[rocket::async_trait]
impl VoteStore for PgVoteStore {
    async fn read_vote(&self, restaurant: Restaurant) -> Result<u64, StoreError> {
        let stored = self
            .bounded(
                sqlx::query_scalar::<_, i64>(&self.statements.read)
                    .bind(restaurant.key())
                    .fetch_optional(&self.pool),
                StoreError::Read,
            )
            .await?;

        debug!("Read {:?} votes for {}", stored, restaurant);
        stored.map_or(Ok(0), |votes| to_count(restaurant, votes))
    }

    async fn write_vote(&self, restaurant: Restaurant, votes: u64) -> Result<(), StoreError> {
        let votes = i64::try_from(votes)
            .map_err(|_| StoreError::Write(format!("vote count {} out of range", votes)))?;

        self.bounded(
            sqlx::query(&self.statements.write)
                .bind(restaurant.key())
                .bind(votes)
                .execute(&self.pool),
            StoreError::Write,
        )
        .await?;

        debug!("Wrote {} votes for {}", votes, restaurant);
        Ok(())
    }

    async fn increment_vote(&self, restaurant: Restaurant) -> Result<u64, StoreError> {
        let votes = self
            .bounded(
                sqlx::query_scalar::<_, i64>(&self.statements.increment)
                    .bind(restaurant.key())
                    .fetch_one(&self.pool),
                StoreError::Write,
            )
            .await?;

        to_count(restaurant, votes)
    }
}
