//! SQLite connection handling: pool setup, pragmas, migrations.

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use crate::error::DbResult;

/// Handle to the service's SQLite database.
#[derive(Debug, Clone)]
pub struct TicklerDb {
    pool: SqlitePool,
}

impl TicklerDb {
    /// Open the database at `path`, creating file and parent directories
    /// as needed, and bring the schema up to date.
    pub async fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.exists()) {
            std::fs::create_dir_all(parent)?;
        }

        info!("opening reminder database at {}", path.to_string_lossy());

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .pragma("cache_size", "-16000")
            // NORMAL loses nothing under WAL short of power failure
            .pragma("synchronous", "NORMAL")
            .pragma("temp_store", "MEMORY")
            .pragma("foreign_keys", "ON");

        // Writes serialize on SQLite's single writer; the extra
        // connections serve concurrent reads.
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        debug!("reminder database connected");

        Self::run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    /// Open a throwaway in-memory database, used by the test suites.
    pub async fn open_in_memory() -> DbResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(":memory:")
            .journal_mode(SqliteJournalMode::Wal)
            .pragma("foreign_keys", "ON");

        // A second connection would get its own empty in-memory database,
        // so the pool is capped at one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Self::run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
        debug!("applying pending migrations");
        sqlx::migrate!("./migrations").run(pool).await?;
        info!("schema is up to date");
        Ok(())
    }

    /// The underlying connection pool, for the query functions.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close all connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Cheap liveness probe.
    pub async fn health_check(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Row counts per table.
    pub async fn stats(&self) -> DbResult<DbStats> {
        let users: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let reminders: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reminders")
            .fetch_one(&self.pool)
            .await?;

        Ok(DbStats {
            user_count: users.0 as u64,
            reminder_count: reminders.0 as u64,
        })
    }
}

/// Row counts reported by [`TicklerDb::stats`].
#[derive(Debug, Clone)]
pub struct DbStats {
    pub user_count: u64,
    pub reminder_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_in_memory() {
        let db = TicklerDb::open_in_memory().await.unwrap();
        db.health_check().await.unwrap();

        let stats = db.stats().await.unwrap();
        assert_eq!(stats.user_count, 0);
        assert_eq!(stats.reminder_count, 0);
    }
}
