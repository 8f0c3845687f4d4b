use serde::Serialize;
use utoipa::ToSchema;

/// Liveness payload returned by the `/api/health` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests.
    pub status: String,
    /// Identifier of the score store backend in use (`"memory"` or `"mongodb"`).
    pub db: String,
    /// Number of connected viewer WebSockets.
    pub ws_clients: usize,
}

impl HealthResponse {
    /// Create a health response for a running server.
    pub fn ok(db: &str, ws_clients: usize) -> Self {
        Self {
            status: "ok".to_string(),
            db: db.to_string(),
            ws_clients,
        }
    }
}
