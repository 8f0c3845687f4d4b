use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Voting War Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::scores::get_scores,
        crate::routes::scores::vote,
        crate::routes::websocket::ws_handler,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::snapshot::MatchStateMessage,
            crate::dto::snapshot::MatchStateLabel,
            crate::dto::vote::VoteRequest,
            crate::state::team::Team,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "match", description = "Scores and voting"),
        (name = "viewers", description = "Real-time match state stream"),
    )
)]
pub struct ApiDoc;
