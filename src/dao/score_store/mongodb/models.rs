use mongodb::bson::{Document, doc};
use serde::{Deserialize, Serialize};

use crate::dao::models::Scores;

/// Identifier of the single document holding the live counters.
pub const SCORE_DOC_ID: &str = "current";

/// Stored shape of the counter pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoScoreDocument {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    team1: i64,
    #[serde(default)]
    team2: i64,
}

impl MongoScoreDocument {
    pub fn zeroed() -> Self {
        Self {
            id: SCORE_DOC_ID.to_owned(),
            team1: 0,
            team2: 0,
        }
    }
}

impl From<MongoScoreDocument> for Scores {
    fn from(value: MongoScoreDocument) -> Self {
        // Counters only ever grow from zero; clamp anything odd written by hand.
        Self {
            team1: u64::try_from(value.team1).unwrap_or(0),
            team2: u64::try_from(value.team2).unwrap_or(0),
        }
    }
}

pub fn score_doc_filter() -> Document {
    doc! { "_id": SCORE_DOC_ID }
}
