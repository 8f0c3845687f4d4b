use std::sync::Arc;

use futures::future::BoxFuture;
use mongodb::{
    Collection, Database,
    bson::{Document, doc},
    options::ReturnDocument,
};
use tracing::info;

use super::{
    config::MongoConfig,
    connection::open_database,
    error::{MongoDaoError, MongoResult},
    models::{MongoScoreDocument, score_doc_filter},
};
use crate::{
    dao::{models::Scores, score_store::ScoreStore, storage::StorageResult},
    state::team::Team,
};

pub(super) const BACKEND: &str = "mongodb";
const SCORE_COLLECTION_NAME: &str = "scores";

/// Durable counters stored in a single MongoDB document and mutated with `$inc`.
#[derive(Clone)]
pub struct MongoScoreStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    database: Database,
}

impl MongoScoreStore {
    /// Connect to MongoDB and make sure the score document exists.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let database = open_database(&config).await?;

        let store = Self {
            inner: Arc::new(MongoInner { database }),
        };
        store.ensure_document().await?;
        info!(
            database = %config.database_name,
            collection = SCORE_COLLECTION_NAME,
            "MongoDB score store ready"
        );
        Ok(store)
    }

    fn collection(&self) -> Collection<MongoScoreDocument> {
        self.inner
            .database
            .collection::<MongoScoreDocument>(SCORE_COLLECTION_NAME)
    }

    /// Seed the counters at zero without touching an existing document.
    async fn ensure_document(&self) -> MongoResult<()> {
        self.collection()
            .update_one(
                score_doc_filter(),
                doc! { "$setOnInsert": { "team1": 0_i64, "team2": 0_i64 } },
            )
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::Provision {
                collection: SCORE_COLLECTION_NAME,
                source,
            })?;
        Ok(())
    }

    async fn scores(&self) -> MongoResult<Scores> {
        let document = self
            .collection()
            .find_one(score_doc_filter())
            .await
            .map_err(|source| MongoDaoError::LoadScores { source })?;

        Ok(document.map(Scores::from).unwrap_or_default())
    }

    async fn increment(&self, team: Team) -> MongoResult<Scores> {
        let mut counter = Document::new();
        counter.insert(team.as_str(), 1_i64);

        let updated = self
            .collection()
            .find_one_and_update(score_doc_filter(), doc! { "$inc": counter })
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|source| MongoDaoError::Increment {
                team: team.as_str(),
                source,
            })?;

        updated
            .map(Scores::from)
            .ok_or(MongoDaoError::MissingDocument {
                team: team.as_str(),
            })
    }

    async fn reset(&self) -> MongoResult<Scores> {
        self.collection()
            .replace_one(score_doc_filter(), MongoScoreDocument::zeroed())
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::Reset { source })?;

        Ok(Scores::ZERO)
    }
}

impl ScoreStore for MongoScoreStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    fn scores(&self) -> BoxFuture<'static, StorageResult<Scores>> {
        let store = self.clone();
        Box::pin(async move { store.scores().await.map_err(Into::into) })
    }

    fn increment(&self, team: Team) -> BoxFuture<'static, StorageResult<Scores>> {
        let store = self.clone();
        Box::pin(async move { store.increment(team).await.map_err(Into::into) })
    }

    fn reset(&self) -> BoxFuture<'static, StorageResult<Scores>> {
        let store = self.clone();
        Box::pin(async move { store.reset().await.map_err(Into::into) })
    }
}
