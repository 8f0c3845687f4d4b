use mongodb::error::Error as MongoError;
use thiserror::Error;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("missing MongoDB environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("failed to seed score document in collection `{collection}`")]
    Provision {
        collection: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to read scores")]
    LoadScores {
        #[source]
        source: MongoError,
    },
    #[error("failed to increment score of `{team}`")]
    Increment {
        team: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("increment of `{team}` returned no document")]
    MissingDocument { team: &'static str },
    #[error("failed to reset scores")]
    Reset {
        #[source]
        source: MongoError,
    },
}
