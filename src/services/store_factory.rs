use std::sync::Arc;

use tracing::info;

use crate::dao::score_store::{MemoryScoreStore, ScoreStore};

/// Pick the score store once at startup.
///
/// The durable backend is only attempted when it is configured; any failure while
/// connecting or provisioning falls back to the in-memory store instead of aborting startup.
/// The choice is final for the lifetime of the process.
pub async fn select_store() -> Arc<dyn ScoreStore> {
    if let Some(store) = connect_mongo().await {
        return store;
    }

    info!("durable score store not available; using in-memory store");
    Arc::new(MemoryScoreStore::new())
}

#[cfg(feature = "mongo-store")]
async fn connect_mongo() -> Option<Arc<dyn ScoreStore>> {
    use tracing::warn;

    use crate::dao::score_store::mongodb::{MongoConfig, MongoDaoError, MongoScoreStore};

    let config = match MongoConfig::from_env().await {
        Ok(config) => config,
        Err(MongoDaoError::MissingEnvVar { var }) => {
            info!(var, "MongoDB not configured");
            return None;
        }
        Err(err) => {
            warn!(error = %err, "invalid MongoDB configuration; falling back to memory store");
            return None;
        }
    };

    match MongoScoreStore::connect(config).await {
        Ok(store) => Some(Arc::new(store)),
        Err(err) => {
            warn!(error = %err, "failed to connect to MongoDB; falling back to memory store");
            None
        }
    }
}

#[cfg(not(feature = "mongo-store"))]
async fn connect_mongo() -> Option<Arc<dyn ScoreStore>> {
    None
}
