use crate::AppState;
use crate::api::error::AppError;
use crate::services::selection::select_script;
use axum::{
    extract::{RawQuery, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::info;
use utoipa::IntoParams;

pub const SCRIPT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

#[derive(Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScriptQuery {
    /// Exact name of the script to fetch; a random one is picked when omitted
    pub file: Option<String>,
}

impl ScriptQuery {
    /// Parse a raw query string. Repeated `file` values are joined with
    /// commas, so they can only ever match a name containing those commas.
    pub fn parse(raw: Option<&str>) -> Self {
        let pairs: Vec<(String, String)> = raw
            .and_then(|q| serde_urlencoded::from_str(q).ok())
            .unwrap_or_default();

        let files: Vec<String> = pairs
            .into_iter()
            .filter(|(key, _)| key == "file")
            .map(|(_, value)| value)
            .collect();

        Self {
            file: (!files.is_empty()).then(|| files.join(",")),
        }
    }

    fn requested(&self) -> Option<&str> {
        self.file.as_deref().filter(|name| !name.is_empty())
    }
}

#[utoipa::path(
    get,
    path = "/obtener-script",
    params(ScriptQuery),
    responses(
        (status = 200, description = "Raw script content", body = String, content_type = "text/plain"),
        (status = 401, description = "Missing or invalid API key", body = crate::api::error::ErrorResponse),
        (status = 404, description = "No scripts, or requested script not found", body = crate::api::error::ErrorResponse),
        (status = 500, description = "Server misconfigured or unexpected failure", body = crate::api::error::ErrorResponse),
        (status = 502, description = "GitHub call failed", body = crate::api::error::ErrorResponse)
    ),
    security(
        ("api_key" = [])
    ),
    tag = "scripts"
)]
pub async fn get_script(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<Response, AppError> {
    let query = ScriptQuery::parse(raw.as_deref());
    let dir = state.config.display_dir();

    // 1. List the directory
    let entries = state
        .source
        .list_entries()
        .await
        .map_err(AppError::from_listing)?;

    // 2. Pick a file
    let selected = {
        let mut rng = rand::thread_rng();
        select_script(entries, query.requested(), &mut rng)
            .map_err(|e| AppError::from_selection(e, &dir))?
    };

    let download_url = selected.download_url.as_deref().ok_or(AppError::NoDownloadUrl)?;

    // 3. Fetch and relay the raw content
    let content = state
        .source
        .download(download_url)
        .await
        .map_err(AppError::from_download)?;

    info!(
        file = %selected.name,
        bytes = content.len(),
        random = query.requested().is_none(),
        "Relaying script"
    );

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, SCRIPT_CONTENT_TYPE)],
        content,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_file_param() {
        let query = ScriptQuery::parse(Some("file=a.lua&x=1"));
        assert_eq!(query.requested(), Some("a.lua"));
    }

    #[test]
    fn test_repeated_file_params_are_joined() {
        let query = ScriptQuery::parse(Some("file=a.lua&file=b.lua"));
        assert_eq!(query.requested(), Some("a.lua,b.lua"));
    }

    #[test]
    fn test_percent_encoded_name() {
        let query = ScriptQuery::parse(Some("file=my%20script.lua"));
        assert_eq!(query.requested(), Some("my script.lua"));
    }

    #[test]
    fn test_missing_or_empty_file_param() {
        assert_eq!(ScriptQuery::parse(None).requested(), None);
        assert_eq!(ScriptQuery::parse(Some("file=")).requested(), None);
    }
}
