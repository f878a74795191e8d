use crate::models::MatchRecord;
use crate::services::matching::{MatchingError, MatchingService};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid stored score: {0}")]
    InvalidScore(i16),
}

/// PostgreSQL client for confirmed matches
///
/// Holds the `match_records` table only. Class requests and tutors stay
/// in the user directory.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Insert a match record, or return the one already stored for the pair
    ///
    /// The no-op `DO UPDATE` makes `RETURNING` yield the existing row on
    /// conflict.
    pub async fn insert_match(
        &self,
        class_id: &str,
        tutor_id: &str,
        score: u8,
    ) -> Result<MatchRecord, PostgresError> {
        let query = r#"
            INSERT INTO match_records (id, class_id, tutor_id, score, confirmed_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (class_id, tutor_id)
            DO UPDATE SET class_id = match_records.class_id
            RETURNING id, class_id, tutor_id, score, confirmed_at
        "#;

        let row = sqlx::query(query)
            .bind(uuid::Uuid::new_v4())
            .bind(class_id)
            .bind(tutor_id)
            .bind(score as i16)
            .fetch_one(&self.pool)
            .await?;

        let record = record_from_row(&row)?;

        tracing::debug!(
            "Stored match record {}: {} -> {} ({})",
            record.id,
            class_id,
            tutor_id,
            record.score
        );

        Ok(record)
    }

    /// Get match records for a class request, newest first
    pub async fn get_matches(&self, class_id: &str) -> Result<Vec<MatchRecord>, PostgresError> {
        let query = r#"
            SELECT id, class_id, tutor_id, score, confirmed_at
            FROM match_records
            WHERE class_id = $1
            ORDER BY confirmed_at DESC
        "#;

        let rows = sqlx::query(query).bind(class_id).fetch_all(&self.pool).await?;

        rows.iter().map(record_from_row).collect()
    }

    /// Health check for the database connection
    pub async fn ping(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn record_from_row(row: &PgRow) -> Result<MatchRecord, PostgresError> {
    let score: i16 = row.try_get("score")?;
    let score = u8::try_from(score).map_err(|_| PostgresError::InvalidScore(score))?;

    Ok(MatchRecord {
        id: row.try_get("id")?,
        class_id: row.try_get("class_id")?,
        tutor_id: row.try_get("tutor_id")?,
        score,
        confirmed_at: row.try_get("confirmed_at")?,
    })
}

#[async_trait]
impl MatchingService for PostgresClient {
    async fn confirm_match(
        &self,
        class_id: &str,
        tutor_id: &str,
        score: u8,
    ) -> Result<MatchRecord, MatchingError> {
        if class_id.trim().is_empty() || tutor_id.trim().is_empty() {
            return Err(MatchingError::InvalidInput("class id and tutor id are required".into()));
        }
        Ok(self.insert_match(class_id, tutor_id, score).await?)
    }

    async fn matches_for_class(&self, class_id: &str) -> Result<Vec<MatchRecord>, MatchingError> {
        Ok(self.get_matches(class_id).await?)
    }

    async fn health_check(&self) -> Result<bool, MatchingError> {
        Ok(self.ping().await?)
    }
}
