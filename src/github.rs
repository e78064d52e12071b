//! GitHub star counter for the site repository.

use crate::config::GithubConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct RepoResponse {
    stargazers_count: u64,
}

/// Fetches the star count of `owner/name`.
pub async fn fetch_stars(config: &GithubConfig, timeout_seconds: u64) -> Result<u64> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")?;

    let url = repo_url(&config.api_url, &config.repo);
    debug!("GET {}", url);

    let response = http_client
        .get(&url)
        .header("Accept", "application/vnd.github+json")
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                anyhow::anyhow!("GitHub request timed out after {}s", timeout_seconds)
            } else {
                anyhow::anyhow!("GitHub request failed: {}", e)
            }
        })?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(anyhow::anyhow!("GitHub API error {}: {}", status, body));
    }

    let repo: RepoResponse = response
        .json()
        .await
        .context("Failed to parse GitHub response")?;

    Ok(repo.stargazers_count)
}

/// Star count, or `None` when it could not be fetched.
pub async fn stars_or_none(config: &GithubConfig, timeout_seconds: u64) -> Option<u64> {
    match fetch_stars(config, timeout_seconds).await {
        Ok(stars) => Some(stars),
        Err(e) => {
            warn!("Failed to fetch stars for {}: {}", config.repo, e);
            None
        }
    }
}

fn repo_url(api_url: &str, repo: &str) -> String {
    format!(
        "{}/repos/{}",
        api_url.trim_end_matches('/'),
        repo.trim_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_url() {
        assert_eq!(
            repo_url("https://api.github.com/", "/ThoBustos/thomasbustos"),
            "https://api.github.com/repos/ThoBustos/thomasbustos"
        );
    }

    #[test]
    fn test_parse_repo_response() {
        let repo: RepoResponse =
            serde_json::from_str(r#"{"id": 1, "stargazers_count": 42, "forks": 3}"#).unwrap();
        assert_eq!(repo.stargazers_count, 42);
    }

    #[tokio::test]
    async fn test_unreachable_api_is_none() {
        let config = GithubConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            repo: "a/b".to_string(),
        };
        assert_eq!(stars_or_none(&config, 2).await, None);
    }
}
