//! Library crate for voting-war-back, exposing modules for binaries and integration tests.

pub mod config;
/// Score persistence backends.
pub mod dao;
/// Wire types for REST and WebSocket payloads.
pub mod dto;
/// Service and HTTP error types.
pub mod error;
/// Axum routers.
pub mod routes;
/// Request handlers and background tasks.
pub mod services;
/// Match authority and viewer registry.
pub mod state;
