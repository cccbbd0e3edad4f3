// src/db.rs
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Pool, Postgres};
use tracing::info;

use crate::error::StoreError;
use crate::models::{Poll, VoteRecord};
use crate::store::{PollStore, VoteStore};

pub async fn create_pool(database_url: &str) -> Result<Pool<Postgres>, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Creates the two collections and their indexes if they are missing. The
/// unique index on `(poll_id, voter_id)` is the authoritative one-vote guard.
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS polls (
            id          TEXT PRIMARY KEY,
            creator_id  TEXT NOT NULL,
            question    TEXT NOT NULL,
            options     TEXT[] NOT NULL,
            active      BOOLEAN NOT NULL,
            created_at  TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS vote_records (
            id        TEXT PRIMARY KEY,
            poll_id   TEXT NOT NULL,
            voter_id  TEXT NOT NULL,
            option    TEXT NOT NULL,
            voted_at  TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS vote_records_poll_voter
         ON vote_records (poll_id, voter_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS vote_records_poll ON vote_records (poll_id)")
        .execute(pool)
        .await?;

    info!("database schema ready");
    Ok(())
}

/// Postgres-backed store. Every call is bounded by `timeout`; expiry surfaces
/// as [`StoreError::Unavailable`] so the command fails instead of hanging.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgStore {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(res) => res.map_err(StoreError::from),
            Err(_) => Err(StoreError::Unavailable("store call timed out".to_string())),
        }
    }
}

#[async_trait]
impl PollStore for PgStore {
    async fn insert_poll(&self, poll: &Poll) -> Result<(), StoreError> {
        self.bounded(async {
            sqlx::query(
                "INSERT INTO polls (id, creator_id, question, options, active, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(&poll.id)
            .bind(&poll.creator_id)
            .bind(&poll.question)
            .bind(&poll.options)
            .bind(poll.active)
            .bind(poll.created_at)
            .execute(&self.pool)
            .await
            .map(|_| ())
        })
        .await
    }

    async fn get_poll(&self, poll_id: &str) -> Result<Option<Poll>, StoreError> {
        self.bounded(
            sqlx::query_as::<_, Poll>(
                "SELECT id, creator_id, question, options, active, created_at
                 FROM polls WHERE id = $1",
            )
            .bind(poll_id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn set_poll_active(&self, poll_id: &str, active: bool) -> Result<(), StoreError> {
        self.bounded(async {
            sqlx::query("UPDATE polls SET active = $2 WHERE id = $1")
                .bind(poll_id)
                .bind(active)
                .execute(&self.pool)
                .await
                .map(|_| ())
        })
        .await
    }

    async fn delete_poll(&self, poll_id: &str) -> Result<(), StoreError> {
        // One transaction, ballots first: an interrupted delete leaves an
        // orphaned poll (safely retryable), never orphaned ballots.
        self.bounded(async {
            let mut tx = self.pool.begin().await?;
            sqlx::query("DELETE FROM vote_records WHERE poll_id = $1")
                .bind(poll_id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM polls WHERE id = $1")
                .bind(poll_id)
                .execute(&mut *tx)
                .await?;
            tx.commit().await
        })
        .await
    }
}

#[async_trait]
impl VoteStore for PgStore {
    async fn insert_vote(&self, record: &VoteRecord) -> Result<(), StoreError> {
        self.bounded(async {
            sqlx::query(
                "INSERT INTO vote_records (id, poll_id, voter_id, option, voted_at)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(&record.id)
            .bind(&record.poll_id)
            .bind(&record.voter_id)
            .bind(&record.option)
            .bind(record.voted_at)
            .execute(&self.pool)
            .await
            .map(|_| ())
        })
        .await
    }

    async fn find_vote(
        &self,
        poll_id: &str,
        voter_id: &str,
    ) -> Result<Option<VoteRecord>, StoreError> {
        self.bounded(
            sqlx::query_as::<_, VoteRecord>(
                "SELECT id, poll_id, voter_id, option, voted_at
                 FROM vote_records WHERE poll_id = $1 AND voter_id = $2",
            )
            .bind(poll_id)
            .bind(voter_id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn votes_for_poll(&self, poll_id: &str) -> Result<Vec<VoteRecord>, StoreError> {
        self.bounded(
            sqlx::query_as::<_, VoteRecord>(
                "SELECT id, poll_id, voter_id, option, voted_at
                 FROM vote_records WHERE poll_id = $1",
            )
            .bind(poll_id)
            .fetch_all(&self.pool),
        )
        .await
    }

    async fn delete_votes_for_poll(&self, poll_id: &str) -> Result<u64, StoreError> {
        self.bounded(async {
            sqlx::query("DELETE FROM vote_records WHERE poll_id = $1")
                .bind(poll_id)
                .execute(&self.pool)
                .await
                .map(|res| res.rows_affected())
        })
        .await
    }
}
