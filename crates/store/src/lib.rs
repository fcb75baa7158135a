//! Store backend implementations for CampusDesk.

pub mod in_memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use in_memory::InMemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

use std::sync::Arc;

use campusdesk_config::StoreConfig;
use campusdesk_core::{Error, KnowledgeStore};

/// Build a store backend from configuration.
pub async fn build_from_config(config: &StoreConfig) -> Result<Arc<dyn KnowledgeStore>, Error> {
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(InMemoryStore::new())),

        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let path = config.database_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| Error::Internal(format!("Cannot create store directory: {e}")))?;
            }
            let store = SqliteStore::new(&path.to_string_lossy()).await?;
            Ok(Arc::new(store))
        }

        other => Err(Error::Config {
            message: format!("Unknown store backend: '{other}'"),
        }),
    }
}
