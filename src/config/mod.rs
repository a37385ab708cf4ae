use std::env;

/// Runtime configuration for the relay
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Listen port (default: 3000)
    pub port: u16,

    /// Listen address (default: "0.0.0.0")
    pub bind_addr: String,

    /// Key callers must send in `x-api-key`. When unset every key is rejected.
    pub api_key: Option<String>,

    /// Token used for both GitHub calls. Requests fail with NO_GITHUB_TOKEN when unset.
    pub github_token: Option<String>,

    /// Base URL of the GitHub REST API (default: "https://api.github.com")
    pub github_api_url: String,

    /// Repository owner (default: "OkumaruSenpai")
    pub repo_owner: String,

    /// Repository name (default: "Sytem2.0")
    pub repo_name: String,

    /// Directory holding the scripts (default: "LUAU")
    pub scripts_dir: String,

    /// User-Agent sent upstream; GitHub rejects requests without one
    pub user_agent: String,

    /// Name reported by the health endpoint (default: "myspiders")
    pub service_name: String,

    /// Per-request upstream timeout in seconds (default: 30)
    pub upstream_timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            bind_addr: "0.0.0.0".to_string(),
            api_key: None,
            github_token: None,
            github_api_url: "https://api.github.com".to_string(),
            repo_owner: "OkumaruSenpai".to_string(),
            repo_name: "Sytem2.0".to_string(),
            scripts_dir: "LUAU".to_string(),
            user_agent: "myspiders-app".to_string(),
            service_name: "myspiders".to_string(),
            upstream_timeout_secs: 30,
        }
    }
}

impl RelayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),

            bind_addr: env::var("BIND_ADDR").unwrap_or(default.bind_addr),

            api_key: non_empty_var("API_KEY"),

            github_token: non_empty_var("GITHUB_TOKEN"),

            github_api_url: env::var("GITHUB_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(default.github_api_url),

            repo_owner: env::var("GITHUB_OWNER").unwrap_or(default.repo_owner),

            repo_name: env::var("GITHUB_REPO").unwrap_or(default.repo_name),

            scripts_dir: env::var("GITHUB_DIR")
                .map(|v| v.trim_matches('/').to_string())
                .unwrap_or(default.scripts_dir),

            user_agent: env::var("GITHUB_USER_AGENT").unwrap_or(default.user_agent),

            service_name: env::var("SERVICE_NAME").unwrap_or(default.service_name),

            upstream_timeout_secs: env::var("UPSTREAM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.upstream_timeout_secs),
        }
    }

    /// URL of the contents listing for the configured directory
    pub fn listing_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.github_api_url, self.repo_owner, self.repo_name, self.scripts_dir
        )
    }

    /// Directory as shown in caller-facing messages, e.g. "/LUAU"
    pub fn display_dir(&self) -> String {
        format!("/{}", self.scripts_dir)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RelayConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert!(config.api_key.is_none());
        assert!(config.github_token.is_none());
        assert_eq!(config.user_agent, "myspiders-app");
        assert_eq!(config.upstream_timeout_secs, 30);
    }

    #[test]
    fn test_listing_url() {
        let config = RelayConfig::default();
        assert_eq!(
            config.listing_url(),
            "https://api.github.com/repos/OkumaruSenpai/Sytem2.0/contents/LUAU"
        );
    }

    #[test]
    fn test_listing_url_custom_base() {
        let config = RelayConfig {
            github_api_url: "http://127.0.0.1:8080".to_string(),
            repo_owner: "acme".to_string(),
            repo_name: "tools".to_string(),
            scripts_dir: "scripts/lua".to_string(),
            ..RelayConfig::default()
        };
        assert_eq!(
            config.listing_url(),
            "http://127.0.0.1:8080/repos/acme/tools/contents/scripts/lua"
        );
        assert_eq!(config.display_dir(), "/scripts/lua");
    }
}
