use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{services::documentation::ApiDoc, state::SharedState};

/// Health check route.
pub mod health;
/// Score and vote routes.
pub mod scores;
/// Viewer WebSocket route.
pub mod websocket;

/// Compose the `/api` route trees and the Swagger UI, wiring in the shared state.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(scores::router())
        .merge(websocket::router());

    let docs_router: Router<SharedState> = SwaggerUi::new("/docs")
        .url("/api-doc/openapi.json", ApiDoc::openapi())
        .into();

    Router::new()
        .nest("/api", api_router)
        .merge(docs_router)
        .with_state(state)
}
