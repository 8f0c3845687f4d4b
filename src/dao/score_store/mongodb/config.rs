use std::time::Duration;

use mongodb::options::ClientOptions;

use super::error::{MongoDaoError, MongoResult};

const DEFAULT_DB: &str = "voting_war";
/// Bound on finding a reachable server; the driver default of 30 s would stall startup.
const DEFAULT_SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(2);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Connection settings for the durable score store.
#[derive(Clone)]
pub struct MongoConfig {
    pub options: ClientOptions,
    pub database_name: String,
}

impl MongoConfig {
    /// Parse `uri`; timeouts the URI does not set get short startup-friendly defaults.
    pub async fn from_uri(uri: &str, db_name: Option<&str>) -> MongoResult<Self> {
        let database_name = db_name.unwrap_or(DEFAULT_DB).to_owned();
        let mut options =
            ClientOptions::parse(uri)
                .await
                .map_err(|source| MongoDaoError::InvalidUri {
                    uri: uri.to_owned(),
                    source,
                })?;
        options
            .server_selection_timeout
            .get_or_insert(DEFAULT_SERVER_SELECTION_TIMEOUT);
        options.connect_timeout.get_or_insert(DEFAULT_CONNECT_TIMEOUT);

        Ok(Self {
            options,
            database_name,
        })
    }

    /// Build the configuration from `MONGO_URI` and the optional `MONGO_DB`.
    ///
    /// Returns [`MongoDaoError::MissingEnvVar`] when no URI is configured, which callers treat
    /// as "durable storage not requested" rather than as a failure.
    pub async fn from_env() -> MongoResult<Self> {
        let uri = std::env::var("MONGO_URI")
            .ok()
            .filter(|uri| !uri.trim().is_empty())
            .ok_or(MongoDaoError::MissingEnvVar { var: "MONGO_URI" })?;
        let db = std::env::var("MONGO_DB").ok();
        Self::from_uri(&uri, db.as_deref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unset_timeouts_get_startup_defaults() {
        let config = MongoConfig::from_uri("mongodb://localhost:27017", None)
            .await
            .unwrap();

        assert_eq!(config.database_name, "voting_war");
        assert_eq!(
            config.options.server_selection_timeout,
            Some(DEFAULT_SERVER_SELECTION_TIMEOUT)
        );
        assert_eq!(config.options.connect_timeout, Some(DEFAULT_CONNECT_TIMEOUT));
    }

    #[tokio::test]
    async fn uri_timeouts_are_kept() {
        let config = MongoConfig::from_uri(
            "mongodb://localhost:27017/?serverSelectionTimeoutMS=500&connectTimeoutMS=750",
            Some("votes"),
        )
        .await
        .unwrap();

        assert_eq!(config.database_name, "votes");
        assert_eq!(
            config.options.server_selection_timeout,
            Some(Duration::from_millis(500))
        );
        assert_eq!(
            config.options.connect_timeout,
            Some(Duration::from_millis(750))
        );
    }

    #[tokio::test]
    async fn malformed_uri_is_rejected() {
        let err = MongoConfig::from_uri("postgres://nope", None)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, MongoDaoError::InvalidUri { .. }));
    }
}
