use std::time::Duration;

use mongodb::{Client, Database, bson::doc};
use tokio::time::sleep;
use tracing::debug;

use super::{
    config::MongoConfig,
    error::{MongoDaoError, MongoResult},
};

/// Pings tried before startup gives up and falls back to the memory store.
const PING_ATTEMPTS: u32 = 2;
/// Pause between two pings.
const PING_PAUSE: Duration = Duration::from_millis(500);

/// Build the client and confirm the server answers.
///
/// Each ping is bounded by the driver's server selection timeout set in [`MongoConfig`].
pub async fn open_database(config: &MongoConfig) -> MongoResult<Database> {
    let client = Client::with_options(config.options.clone())
        .map_err(|source| MongoDaoError::ClientConstruction { source })?;
    let database = client.database(&config.database_name);

    let mut attempt = 1;
    loop {
        match database.run_command(doc! { "ping": 1 }).await {
            Ok(_) => return Ok(database),
            Err(source) if attempt >= PING_ATTEMPTS => {
                return Err(MongoDaoError::InitialPing {
                    attempts: attempt,
                    source,
                });
            }
            Err(err) => {
                debug!(attempt, error = %err, "MongoDB ping failed; retrying");
                sleep(PING_PAUSE).await;
                attempt += 1;
            }
        }
    }
}
