use anyhow::{Context, Result};
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
#[cfg(test)]
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tracing::debug;

/// DbConnection owns the SQLite pool shared by all repositories
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and set up the schema
    pub async fn new(url: &str) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            debug!("Creating database at {}", url);
            Sqlite::create_database(url)
                .await
                .with_context(|| format!("Failed to create database {}", url))?;
        }

        let pool = SqlitePool::connect(url)
            .await
            .with_context(|| format!("Failed to connect to database {}", url))?;

        Self::from_pool(pool).await
    }

    /// Initialize a test database with a unique name.
    ///
    /// Shared-cache memory databases do not isolate connections from each
    /// other, so the test pool holds exactly one connection and never lets it
    /// go (closing the last connection drops the database).
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(&db_url)
            .await
            .with_context(|| format!("Failed to connect to test database {}", db_url))?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        Self::setup_schema(&pool).await?;
        Ok(Self { pool: Arc::new(pool) })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS animals (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                tag_number TEXT NOT NULL,
                birth_date TEXT,
                last_heat TEXT,
                insemination_date TEXT,
                insemination_attempts INTEGER NOT NULL DEFAULT 0,
                pregnancy_check TEXT,
                dry_off_date TEXT,
                calving_date TEXT,
                hoof_care_needed BOOLEAN NOT NULL DEFAULT 0,
                sorted_out BOOLEAN NOT NULL DEFAULT 0,
                active BOOLEAN NOT NULL DEFAULT 1,
                exit_date TEXT,
                exit_reason TEXT,
                notes TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Tags are reused once an animal has left the herd
        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_animals_active_tag
            ON animals(tag_number) WHERE active = 1;
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_animals_name
            ON animals(name);
            "#,
        )
        .execute(pool)
        .await?;

        debug!("Database schema ready");
        Ok(())
    }
}
