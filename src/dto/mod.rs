/// Health endpoint payload.
pub mod health;
/// Match state message sent to clients.
pub mod snapshot;
/// Custom `validator` checks.
pub mod validation;
/// Vote request body.
pub mod vote;
