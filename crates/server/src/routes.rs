use axum::{
    routing::{get, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod policies;

pub const HOME_MESSAGE: &str = "Insurance Policy Tracker API running ✅";

#[utoipa::path(get, path = "/", tag = "health", responses((status = 200, description = "Service banner", body = String)))]
pub async fn home() -> &'static str {
    HOME_MESSAGE
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: banner, health, policy CRUD and API docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route(
            "/api/policies",
            get(policies::list).post(policies::create).delete(policies::delete_all),
        )
        .route(
            "/api/policies/:application_number",
            put(policies::update).delete(policies::delete),
        );

    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .merge(api)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx logged at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
