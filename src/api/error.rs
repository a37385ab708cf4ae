use crate::services::selection::SelectionError;
use crate::services::source::SourceError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing x-api-key header")]
    NoApiKey,

    #[error("Unauthorized")]
    InvalidApiKey,

    #[error("GITHUB_TOKEN is not set in the environment")]
    NoGithubToken,

    #[error("GitHub rejected the credentials ({status})")]
    GithubAuth { status: StatusCode, body: Value },

    #[error("Listing files on GitHub failed ({status})")]
    GithubList { status: StatusCode, body: Value },

    #[error("No scripts found in {0} of the repository")]
    NoFiles(String),

    #[error("The requested file \"{name}\" does not exist in {dir}")]
    FileNotFound { name: String, dir: String },

    #[error("The selected entry has no download_url")]
    NoDownloadUrl,

    #[error("Downloading the script from GitHub failed ({status})")]
    GithubDownload { status: StatusCode, body: Value },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Body of every error response
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub ok: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub github_body: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AppError {
    /// Translate a failure of the directory listing call
    pub fn from_listing(err: SourceError) -> Self {
        match err {
            SourceError::MissingToken => AppError::NoGithubToken,
            SourceError::Upstream { status, body }
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN =>
            {
                AppError::GithubAuth { status, body }
            }
            SourceError::Upstream { status, body } => AppError::GithubList { status, body },
            SourceError::Transport(e) => AppError::Unexpected(e.to_string()),
        }
    }

    /// Translate a failure of the raw download call
    pub fn from_download(err: SourceError) -> Self {
        match err {
            SourceError::MissingToken => AppError::NoGithubToken,
            SourceError::Upstream { status, body } => AppError::GithubDownload { status, body },
            SourceError::Transport(e) => AppError::Unexpected(e.to_string()),
        }
    }

    pub fn from_selection(err: SelectionError, dir: &str) -> Self {
        match err {
            SelectionError::NoFiles => AppError::NoFiles(dir.to_string()),
            SelectionError::NotFound(name) => AppError::FileNotFound {
                name,
                dir: dir.to_string(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NoApiKey | AppError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            AppError::NoFiles(_) | AppError::FileNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::GithubAuth { .. }
            | AppError::GithubList { .. }
            | AppError::NoDownloadUrl
            | AppError::GithubDownload { .. } => StatusCode::BAD_GATEWAY,
            AppError::NoGithubToken | AppError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::NoApiKey => "NO_API_KEY",
            AppError::InvalidApiKey => "INVALID_API_KEY",
            AppError::NoGithubToken => "NO_GITHUB_TOKEN",
            AppError::GithubAuth { .. } => "GITHUB_AUTH",
            AppError::GithubList { .. } => "GITHUB_LIST",
            AppError::NoFiles(_) => "NO_FILES",
            AppError::FileNotFound { .. } => "FILE_NOT_FOUND",
            AppError::NoDownloadUrl => "NO_DOWNLOAD_URL",
            AppError::GithubDownload { .. } => "GITHUB_DOWNLOAD",
            AppError::Unexpected(_) => "UNEXPECTED",
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::GithubAuth { .. } => "GitHub rejected the authentication. Check that the token is valid and can read repository contents.".to_string(),
            AppError::GithubList { .. } => "Error listing files on GitHub.".to_string(),
            AppError::GithubDownload { .. } => "Error downloading the script from GitHub.".to_string(),
            AppError::Unexpected(_) => "Unexpected error while fetching the script".to_string(),
            other => other.to_string(),
        }
    }

    fn into_body(self) -> ErrorResponse {
        let code = self.code().to_string();
        let message = self.message();

        let (github_status, github_body, error) = match self {
            AppError::GithubAuth { status, body }
            | AppError::GithubList { status, body }
            | AppError::GithubDownload { status, body } => {
                (Some(status.as_u16()), Some(body), None)
            }
            AppError::Unexpected(e) => (None, None, Some(e)),
            _ => (None, None, None),
        };

        ErrorResponse {
            ok: false,
            code,
            message,
            github_status,
            github_body,
            error,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::Unexpected(e) => tracing::error!("Unexpected failure: {}", e),
            AppError::GithubAuth { status, .. }
            | AppError::GithubList { status, .. }
            | AppError::GithubDownload { status, .. } => {
                tracing::warn!(code = self.code(), upstream_status = %status, "GitHub call failed")
            }
            AppError::NoGithubToken => tracing::error!("GITHUB_TOKEN is not configured"),
            _ => {}
        }

        (status, Json(self.into_body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::json;

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_listing_auth_failures_map_to_github_auth() {
        for code in [401u16, 403] {
            let err = AppError::from_listing(SourceError::Upstream {
                status: StatusCode::from_u16(code).unwrap(),
                body: json!({ "message": "Bad credentials" }),
            });
            let (status, json) = body_json(err).await;
            assert_eq!(status, StatusCode::BAD_GATEWAY);
            assert_eq!(json["ok"], false);
            assert_eq!(json["code"], "GITHUB_AUTH");
            assert_eq!(json["githubStatus"], code);
            assert_eq!(json["githubBody"]["message"], "Bad credentials");
        }
    }

    #[tokio::test]
    async fn test_other_listing_failures_map_to_github_list() {
        let err = AppError::from_listing(SourceError::Upstream {
            status: StatusCode::NOT_FOUND,
            body: json!({ "message": "Not Found" }),
        });
        let (status, json) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["code"], "GITHUB_LIST");
        assert_eq!(json["githubStatus"], 404);
    }

    #[tokio::test]
    async fn test_download_auth_failure_is_download_error() {
        let err = AppError::from_download(SourceError::Upstream {
            status: StatusCode::FORBIDDEN,
            body: json!("denied"),
        });
        let (status, json) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["code"], "GITHUB_DOWNLOAD");
        assert_eq!(json["githubBody"], "denied");
    }

    #[tokio::test]
    async fn test_plain_errors_have_no_extras() {
        let (status, json) = body_json(AppError::NoApiKey).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["code"], "NO_API_KEY");
        assert!(json.get("githubStatus").is_none());
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn test_file_not_found_names_file() {
        let err = AppError::from_selection(SelectionError::NotFound("x.lua".into()), "/LUAU");
        let (status, json) = body_json(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "FILE_NOT_FOUND");
        assert!(json["message"].as_str().unwrap().contains("\"x.lua\""));
    }

    #[tokio::test]
    async fn test_unexpected_carries_error_text() {
        let (status, json) = body_json(AppError::Unexpected("connection reset".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "UNEXPECTED");
        assert_eq!(json["error"], "connection reset");
    }
}
