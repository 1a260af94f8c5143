//! Database module for persistent storage.
//!
//! Provides async SQLite database access using SQLx for custom commands. The
//! [`Database`] handle implements [`CustomCommandStore`], which is all the
//! dispatcher knows about storage.

mod custom_commands;

pub use custom_commands::CustomCommandRepository;

use crate::dispatch::{CommandScope, CustomCommandRecord, CustomCommandStore};
use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

static MEMDB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),
    #[error("migration error: {0}")]
    Migration(sqlx::migrate::MigrateError),
    /// Insert refused: the name already exists in the other kind of scope.
    #[error("custom command {name} already exists as a {} command", .existing.label())]
    ScopeConflict {
        name: String,
        existing: CommandScope,
    },
    #[error("database integrity check failed: {0}")]
    Corrupt(String),
}

/// Database handle with connection pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// How long a dispatch waits for a pooled connection.
    const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Open the custom command database and apply pending migrations.
    ///
    /// `":memory:"` opens a private in-memory database. For a file path the
    /// parent directory must already exist.
    pub async fn new(path: &str) -> Result<Self, DbError> {
        let in_memory = path == ":memory:";
        let (options, max_connections) = if in_memory {
            // A named shared-cache database per call; the single pooled
            // connection keeps it alive, so it is never recycled.
            let id = MEMDB_COUNTER.fetch_add(1, Ordering::Relaxed);
            let uri = format!(
                "file:dirk-memdb-{}-{}?mode=memory&cache=shared",
                std::process::id(),
                id
            );
            let options = SqliteConnectOptions::new()
                .filename(&uri)
                .shared_cache(true)
                .create_if_missing(true);
            (options, 1)
        } else {
            // Dispatches read while a create or edit writes
            let options = SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
            (options, 4)
        };

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Self::ACQUIRE_TIMEOUT);
        if in_memory {
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }
        let pool = pool_options.connect_with(options).await?;

        Self::run_migrations(&pool).await?;

        let integrity: String = sqlx::query_scalar("PRAGMA integrity_check")
            .fetch_one(&pool)
            .await?;
        if integrity != "ok" {
            tracing::error!(path = %path, integrity_check = %integrity, "Custom command database is corrupt");
            return Err(DbError::Corrupt(integrity));
        }

        info!(path = %path, "Custom command database ready");
        Ok(Self { pool })
    }

    /// Get reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run embedded migrations.
    async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(DbError::Migration)?;

        debug!("Custom command migrations applied");
        Ok(())
    }

    /// Get custom command repository.
    pub fn custom_commands(&self) -> CustomCommandRepository<'_> {
        CustomCommandRepository::new(&self.pool)
    }
}

#[async_trait]
impl CustomCommandStore for Database {
    async fn exists(&self, name: &str, scope: CommandScope) -> Result<bool, DbError> {
        self.custom_commands().exists(name, scope).await
    }

    async fn find(
        &self,
        name: &str,
        scope: CommandScope,
    ) -> Result<Option<CustomCommandRecord>, DbError> {
        self.custom_commands().find(name, scope).await
    }

    async fn list_all(&self) -> Result<Vec<CustomCommandRecord>, DbError> {
        self.custom_commands().list_all().await
    }

    async fn save(&self, record: &CustomCommandRecord) -> Result<(), DbError> {
        self.custom_commands().save(record).await
    }

    async fn delete(&self, name: &str, scope: CommandScope) -> Result<bool, DbError> {
        self.custom_commands().delete(name, scope).await
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        DbError::Sqlx(err)
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration(err)
    }
}
