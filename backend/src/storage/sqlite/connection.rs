use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Sqlite, SqlitePool};
use std::sync::Arc;
use tracing::info;

/// DbConnection manages the SQLite connection pool
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str, max_connections: u32) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("Creating database at {}", url);
            Sqlite::create_database(url).await?
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        // Setup database schema
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        // Generate a unique database name for tests
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url, 1).await
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        // Create schedules table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS schedules (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                medicine_name TEXT NOT NULL,
                frequency INTEGER NOT NULL CHECK (frequency >= 1 AND frequency <= 15),
                duration INTEGER NOT NULL CHECK (duration >= 0),
                start_date TEXT NOT NULL,
                end_date TEXT,
                user_id INTEGER NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                UNIQUE (medicine_name, user_id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for user_id filtering
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_schedules_user_id
            ON schedules(user_id);
            "#,
        )
        .execute(pool)
        .await?;

        // Create takings table (one row per daily taking time)
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS takings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                schedule_id INTEGER NOT NULL,
                taking_time TEXT NOT NULL,
                FOREIGN KEY (schedule_id) REFERENCES schedules (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for schedule_id lookup
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_takings_schedule_id
            ON takings(schedule_id);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}
