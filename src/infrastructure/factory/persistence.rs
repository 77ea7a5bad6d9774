//! Persistence factory for the engine store.

use tracing::info;

use crate::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations};
use crate::adapter::outbound::sqlite::SqliteStore;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Open the configured SQLite database, migrate it, and wrap it in a store.
///
/// # Errors
/// Returns an error if the pool cannot be created or migrations fail.
pub fn build_store(config: &Config) -> Result<SqliteStore> {
    let pool = create_pool(&config.database)?;
    run_migrations(&pool)?;
    info!(database = %config.database, "Database ready");
    Ok(SqliteStore::new(pool, config.game))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::outbound::store::EngineStore;

    #[tokio::test]
    async fn build_store_migrates_a_fresh_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database: dir.path().join("engine.db").to_string_lossy().to_string(),
            ..Config::default()
        };

        let store = build_store(&config).unwrap();
        assert!(store.list_outcomes().await.unwrap().is_empty());
        assert!(dir.path().join("engine.db").exists());
    }
}
