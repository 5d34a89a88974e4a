mod db;

pub mod catalog;
pub mod orders;

use std::env;

pub use db::SqliteDatabase;
use log::info;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Sqlite, SqlitePool};

use crate::db::OrderStoreError;

const SQLITE_DB_URL: &str = "sqlite://data/coursepay.db";

pub fn db_url() -> String {
    let result = env::var("CPS_DATABASE_URL").unwrap_or_else(|_| {
        info!("🗃️ CPS_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("🗃️ Using database URL: {result}");
    result
}

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, OrderStoreError> {
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;
    Ok(pool)
}

/// Creates the SQLite database file at `url` if it does not exist yet.
pub async fn create_database_if_missing(url: &str) -> Result<(), OrderStoreError> {
    if !Sqlite::database_exists(url).await? {
        info!("🗃️ Creating new database at {url}");
        Sqlite::create_database(url).await?;
    }
    Ok(())
}
