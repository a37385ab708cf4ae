use crate::config::RelayConfig;
use crate::models::ContentEntry;
use bytes::Bytes;
use reqwest::{Client, StatusCode, header};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const ACCEPT_LISTING: &str = "application/vnd.github.v3+json";
const ACCEPT_RAW: &str = "application/vnd.github.raw";

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("GitHub token is not configured")]
    MissingToken,

    /// Upstream answered with a status >= 400
    #[error("GitHub responded with status {status}")]
    Upstream { status: StatusCode, body: Value },

    #[error("request to GitHub failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Where scripts are listed and downloaded from
#[async_trait::async_trait]
pub trait ScriptSource: Send + Sync {
    /// List every entry of the configured directory. A body that is not a
    /// JSON array yields an empty list.
    async fn list_entries(&self) -> Result<Vec<ContentEntry>, SourceError>;

    /// Fetch the raw bytes behind an entry's `download_url`
    async fn download(&self, url: &str) -> Result<Bytes, SourceError>;
}

/// GitHub contents API backed source
pub struct GitHubSource {
    client: Client,
    token: Option<String>,
    listing_url: String,
}

impl GitHubSource {
    pub fn new(config: &RelayConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            token: config.github_token.clone(),
            listing_url: config.listing_url(),
        })
    }

    fn token(&self) -> Result<&str, SourceError> {
        self.token.as_deref().ok_or(SourceError::MissingToken)
    }

    async fn get(&self, url: &str, accept: &str) -> Result<Bytes, SourceError> {
        let token = self.token()?;

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .header(header::ACCEPT, accept)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if status.is_client_error() || status.is_server_error() {
            return Err(SourceError::Upstream {
                status,
                body: upstream_body(&body),
            });
        }

        Ok(body)
    }
}

#[async_trait::async_trait]
impl ScriptSource for GitHubSource {
    async fn list_entries(&self) -> Result<Vec<ContentEntry>, SourceError> {
        let body = self.get(&self.listing_url, ACCEPT_LISTING).await?;
        Ok(parse_listing(&body))
    }

    async fn download(&self, url: &str) -> Result<Bytes, SourceError> {
        self.get(url, ACCEPT_RAW).await
    }
}

/// Upstream body as JSON when it parses, otherwise as a string
pub fn upstream_body(body: &[u8]) -> Value {
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

fn parse_listing(body: &[u8]) -> Vec<ContentEntry> {
    let Ok(Value::Array(items)) = serde_json::from_slice::<Value>(body) else {
        debug!("listing body is not a JSON array, treating as empty");
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<ContentEntry>(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("skipping unreadable listing item: {}", e);
                None
            }
        })
        .collect()
}
