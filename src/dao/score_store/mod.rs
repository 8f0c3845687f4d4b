/// In-process backend.
pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use futures::future::BoxFuture;

use crate::{
    dao::{models::Scores, storage::StorageResult},
    state::team::Team,
};

pub use memory::MemoryScoreStore;

/// Counter pair persistence with atomic increments, unaware of match rules.
pub trait ScoreStore: Send + Sync {
    /// Short identifier of the backend, reported by the health endpoint.
    fn backend(&self) -> &'static str;
    /// Read the current persisted counters.
    fn scores(&self) -> BoxFuture<'static, StorageResult<Scores>>;
    /// Add one vote to `team` without losing concurrent updates; returns post-increment values.
    fn increment(&self, team: Team) -> BoxFuture<'static, StorageResult<Scores>>;
    /// Set both counters back to zero.
    fn reset(&self) -> BoxFuture<'static, StorageResult<Scores>>;
}
