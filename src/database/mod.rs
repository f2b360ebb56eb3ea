use anyhow::Result;
use sqlx::{Sqlite, migrate::MigrateDatabase, sqlite::SqlitePool};

pub mod kv_store;
pub mod presets;

pub use kv_store::{KeyValueStore, MemoryStore, SqliteStore, StoreError};
pub use presets::{CUSTOM_PRESET, DEFAULT_PRESET, PRESET_NAMESPACE, Preset, PresetError, PresetRepository};

pub async fn init_database(database_url: &str) -> Result<SqlitePool> {
    // Create database if it doesn't exist
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        log::info!("Creating database {}", database_url);
        Sqlite::create_database(database_url).await?;
    }

    let pool = SqlitePool::connect(database_url).await?;

    log::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
