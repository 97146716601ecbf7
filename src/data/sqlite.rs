use crate::data::schema::{SQLITE_INIT, STOCK_CATALOG};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::{debug, info, instrument};

pub type SqlitePool = Pool<Sqlite>;

/// SQLite-backed implementation of every repository trait.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if needed) the database at `database_url`.
    #[instrument]
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        info!("Connected to SQLite database");
        Ok(Self::new(pool))
    }

    /// Private in-memory database. Pinned to a single connection that never
    /// expires, since each SQLite memory connection is its own database.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates missing tables and indexes.
    #[instrument(skip(self))]
    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        // sqlx::query runs a single statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let stmt = stmt.trim();
            if stmt.is_empty() {
                continue;
            }
            sqlx::query(stmt).execute(&self.pool).await?;
        }
        debug!("Schema initialized");
        Ok(())
    }

    /// Inserts the stock catalog when the vehicles table is empty.
    /// Returns the number of vehicles inserted.
    #[instrument(skip(self))]
    pub async fn seed_catalog(&self) -> Result<usize, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vehicles")
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            debug!(count, "Catalog already present, skipping seed");
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        for vehicle in &STOCK_CATALOG {
            sqlx::query(
                r#"
                INSERT INTO vehicles (
                    brand, model, year, price, body_type, fuel, transmission,
                    image, description, available
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 1)
                "#,
            )
            .bind(vehicle.brand)
            .bind(vehicle.model)
            .bind(vehicle.year)
            .bind(vehicle.price)
            .bind(vehicle.body_type)
            .bind(vehicle.fuel)
            .bind(vehicle.transmission)
            .bind(vehicle.image)
            .bind(vehicle.description)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        info!(count = STOCK_CATALOG.len(), "Stock catalog inserted");
        Ok(STOCK_CATALOG.len())
    }
}
