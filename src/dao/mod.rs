/// Score persistence backends and the trait they implement.
pub mod score_store;
/// Persisted data shapes.
pub mod models;
/// Storage abstraction layer error types.
pub mod storage;
