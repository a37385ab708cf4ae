pub mod api;
pub mod config;
pub mod models;
pub mod services;

use crate::config::RelayConfig;
use crate::services::source::ScriptSource;
use axum::{
    Json, Router,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::health::health_check,
        api::handlers::scripts::get_script,
    ),
    components(
        schemas(
            api::handlers::health::HealthResponse,
            api::error::ErrorResponse,
        )
    ),
    modifiers(&ApiKeyAddon),
    tags(
        (name = "system", description = "Liveness"),
        (name = "scripts", description = "Script relay")
    )
)]
pub struct ApiDoc;

struct ApiKeyAddon;

impl Modify for ApiKeyAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(
                    api::middleware::api_key::API_KEY_HEADER,
                ))),
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn ScriptSource>,
    pub config: RelayConfig,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::handlers::health::health_check))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .route(
            "/obtener-script",
            get(api::handlers::scripts::get_script).layer(from_fn_with_state(
                state.clone(),
                api::middleware::api_key::api_key_middleware,
            )),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(api::middleware::trace::request_span)
                .on_request(api::middleware::trace::log_request)
                .on_response(api::middleware::trace::log_response),
        )
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .with_state(state)
}
