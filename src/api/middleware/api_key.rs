use crate::AppState;
use crate::api::error::AppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

pub const API_KEY_HEADER: &str = "x-api-key";

pub async fn api_key_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .filter(|v| !v.is_empty())
        .ok_or(AppError::NoApiKey)?;

    // No configured key means nothing is accepted
    let authorized = state
        .config
        .api_key
        .as_deref()
        .is_some_and(|expected| expected.as_bytes() == provided.as_bytes());

    if !authorized {
        return Err(AppError::InvalidApiKey);
    }

    Ok(next.run(req).await)
}
