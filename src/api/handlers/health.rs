use crate::AppState;
use axum::{Json, extract::State};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    /// RFC 3339 UTC timestamp
    pub time: String,
}

impl HealthResponse {
    pub fn at(service: &str, now: DateTime<Utc>) -> Self {
        Self {
            ok: true,
            service: service.to_string(),
            time: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::at(&state.config.service_name, Utc::now()))
}
