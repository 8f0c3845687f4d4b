/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Periodic rebroadcast of the match state.
pub mod heartbeat;
/// Startup selection of the score store backend.
pub mod store_factory;
/// Score reads and vote handling.
pub mod vote_service;
/// Viewer WebSocket connection handling.
pub mod websocket_service;
