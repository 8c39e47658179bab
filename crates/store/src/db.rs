//! Database connection and pool management.

use exn::ResultExt;
use sqlx::SqliteConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

/// Embedded migrations that are run automatically on connect.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
// One screen talks to the store at a time; a couple of readers is plenty.
const FILE_CONNECTIONS: u32 = 2;
// Each connection to ":memory:" opens its own empty database.
const MEMORY_CONNECTIONS: u32 = 1;
const BUSY_TIMEOUT: Duration = Duration::from_millis(1500);
/// Settings with no `SqliteConnectOptions` builder, run on every new connection.
const CONNECTION_PRAGMAS: &[&str] = &["PRAGMA wal_autocheckpoint = 800", "PRAGMA temp_store = MEMORY"];

/// Database handle for the flashcard store.
///
/// This is the main entry point for interacting with the store. It owns the
/// SQLite connection pool; clone it to share it. Nothing is process-global:
/// every test can open its own isolated instance.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    /// `None` for in-memory databases.
    path: Option<PathBuf>,
}

impl Database {
    /// Connect to the flashcard database at the given path.
    ///
    /// Creates the database file if it doesn't exist (its directory must) and
    /// runs migrations.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let options = Self::base_options().filename(path).create_if_missing(true);
        let pool = Self::open_pool(options, FILE_CONNECTIONS).await?;
        let db = Self { pool, path: Some(path.to_path_buf()) };
        db.migrate().await?;
        tracing::debug!("Opened flashcard database");
        Ok(db)
    }

    /// Connect to an in-memory database.
    ///
    /// Not test-only: the app uses it for throwaway sessions, and other
    /// crates use it in their tests.
    pub async fn connect_in_memory() -> Result<Self> {
        let options = Self::base_options().filename(":memory:");
        let pool = Self::open_pool(options, MEMORY_CONNECTIONS).await?;
        let db = Self { pool, path: None };
        db.migrate().await?;
        Ok(db)
    }

    async fn open_pool(options: SqliteConnectOptions, max_connections: u32) -> Result<SqlitePool> {
        SqlitePoolOptions::new()
            .after_connect(|conn, _meta| Box::pin(Self::configure_connection(conn)))
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    fn base_options() -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .journal_mode(SqliteJournalMode::Wal)
            // Cascading deletes from sets to cards and starred markers rely on this.
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(BUSY_TIMEOUT)
    }

    async fn configure_connection(conn: &mut SqliteConnection) -> sqlx::Result<()> {
        for pragma in CONNECTION_PRAGMAS {
            sqlx::query(pragma).execute(&mut *conn).await?;
        }
        Ok(())
    }

    #[instrument("performing database migrations", skip_all)]
    async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await.or_raise(|| ErrorKind::Migration)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// File the database lives in, or `None` when it is in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Close the database connection pool.
    ///
    /// Waits for all connections to be returned to the pool and then closes
    /// them. The handle (and every clone of it) must not be used afterwards.
    pub async fn close(&self) {
        // Let SQLite update query planner statistics
        _ = sqlx::query("PRAGMA optimize").execute(&self.pool).await;
        self.pool.close().await;
        tracing::debug!("Closed flashcard database");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_in_memory() {
        let db = Database::connect_in_memory().await.unwrap();
        assert!(db.path().is_none());
        assert!(!db.pool().is_closed());
        db.close().await;
        assert!(db.pool().is_closed());
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::connect_in_memory().await.unwrap();
        db.migrate().await.unwrap();
        db.close().await;
    }

    #[tokio::test]
    async fn test_schema_has_no_join_table() {
        let db = Database::connect_in_memory().await.unwrap();
        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name NOT LIKE '_sqlx%' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();
        assert_eq!(tables, vec!["flashcards", "sets", "starred_sets"]);
        db.close().await;
    }

    #[tokio::test]
    async fn test_pragmas_are_applied() {
        let db = Database::connect_in_memory().await.unwrap();
        let row: (i64,) = sqlx::query_as("PRAGMA foreign_keys").fetch_one(db.pool()).await.unwrap();
        assert_eq!(row.0, 1, "foreign_keys should be ON");
        let row: (i64,) = sqlx::query_as("PRAGMA wal_autocheckpoint").fetch_one(db.pool()).await.unwrap();
        assert_eq!(row.0, 800, "WAL checkpoint should be 800");
        let row: (i64,) = sqlx::query_as("PRAGMA temp_store").fetch_one(db.pool()).await.unwrap();
        assert_eq!(row.0, 2, "temp_store should be MEMORY");
        db.close().await;
    }

    #[tokio::test]
    async fn test_file_database_uses_wal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flashcards.db");
        let db = Database::connect(&path).await.unwrap();
        assert_eq!(db.path(), Some(path.as_path()));
        let row: (String,) = sqlx::query_as("PRAGMA journal_mode").fetch_one(db.pool()).await.unwrap();
        assert_eq!(row.0.to_lowercase(), "wal");
        db.close().await;
    }

    #[tokio::test]
    async fn test_connect_fails_for_unreachable_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Database::connect(dir.path().join("missing").join("flashcards.db")).await.unwrap_err();
        assert_eq!(*err, ErrorKind::Database);
    }
}
