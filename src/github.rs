//! Read-only GitHub REST lookups behind the home page.
//!
//! Only two endpoints are used: the latest published release and the
//! repository itself. Both are fetched concurrently by [`lookup`].

use reqwest::header::{ACCEPT, AUTHORIZATION, RETRY_AFTER, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::site::HomeState;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_OWNER: &str = "sam20908";
pub const DEFAULT_REPO: &str = "matrixpp";

const RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";
const RATELIMIT_RESET: &str = "x-ratelimit-reset";

/// Owner/repository pair addressed by the lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl Default for RepoRef {
    fn default() -> Self {
        Self {
            owner: DEFAULT_OWNER.to_string(),
            repo: DEFAULT_REPO.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub tag_name: String,
    pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub html_url: String,
}

/// The two lookups the home page needs.
#[allow(async_fn_in_trait)]
pub trait RepoApi {
    async fn latest_release(&self, repo: &RepoRef) -> Result<Release>;
    async fn repository(&self, repo: &RepoRef) -> Result<Repository>;
}

#[derive(Debug, Clone)]
pub struct LookupConfig {
    pub api_base: String,
    pub token: Option<String>,
    /// Longest wait for a primary rate-limit reset we sleep through once.
    pub max_retry_wait: Duration,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
            max_retry_wait: Duration::from_secs(60),
        }
    }
}

pub struct GitHubClient {
    config: LookupConfig,
    client: reqwest::Client,
}

impl GitHubClient {
    pub fn new(config: LookupConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_base.trim_end_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let mut retried = false;

        loop {
            let mut request = self
                .client
                .get(&url)
                .header(USER_AGENT, concat!("matrixpp-site/", env!("CARGO_PKG_VERSION")))
                .header(ACCEPT, "application/vnd.github+json");
            if let Some(token) = &self.config.token {
                request = request.header(AUTHORIZATION, format!("Bearer {token}"));
            }

            let response = request.send().await?;
            let status = response.status();
            if status.is_success() {
                return Ok(response.json().await?);
            }

            let headers = response.headers();
            let header_u64 = |name: &str| {
                headers
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<u64>().ok())
            };
            let limited = status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::FORBIDDEN;

            // Primary limit: the hourly quota is spent until `x-ratelimit-reset`.
            if limited && header_u64(RATELIMIT_REMAINING) == Some(0) {
                let reset = header_u64(RATELIMIT_RESET).unwrap_or_default();
                let now = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default();
                let wait = Duration::from_secs(reset.saturating_sub(now));
                if retried || wait > self.config.max_retry_wait {
                    return Err(Error::RateLimited { url });
                }
                tracing::warn!("Rate limit exhausted on {url}, retrying after {}s", wait.as_secs());
                tokio::time::sleep(wait).await;
                retried = true;
                continue;
            }

            // Secondary (abuse) limit: reported, never retried.
            if status == StatusCode::TOO_MANY_REQUESTS || (limited && headers.contains_key(RETRY_AFTER)) {
                tracing::warn!("Secondary rate limit hit on {url}");
                return Err(Error::AbuseLimited { url });
            }

            return Err(Error::Status {
                url,
                status: status.as_u16(),
            });
        }
    }
}

impl RepoApi for GitHubClient {
    async fn latest_release(&self, repo: &RepoRef) -> Result<Release> {
        self.get_json(&format!("/repos/{}/{}/releases/latest", repo.owner, repo.repo))
            .await
    }

    async fn repository(&self, repo: &RepoRef) -> Result<Repository> {
        self.get_json(&format!("/repos/{}/{}", repo.owner, repo.repo)).await
    }
}

/// Run both lookups concurrently and settle the home page state.
///
/// Neither failure propagates: a missing release clears `has_releases`, a
/// failed repository lookup leaves the link unset.
pub async fn lookup<A: RepoApi>(api: &A, repo: &RepoRef) -> HomeState {
    let (release, repository) = tokio::join!(api.latest_release(repo), api.repository(repo));

    let mut state = HomeState::default();
    match release {
        Ok(release) => state.record_release(release),
        Err(e) => {
            if e.is_not_found() {
                tracing::debug!("No release published for {}/{}", repo.owner, repo.repo);
            } else {
                tracing::warn!("Release lookup for {}/{} failed: {e}", repo.owner, repo.repo);
            }
            state.record_no_release();
        }
    }

    match repository {
        Ok(repository) => state.repo_url = Some(repository.html_url),
        Err(e) => tracing::warn!("Repository lookup for {}/{} failed: {e}", repo.owner, repo.repo),
    }

    state
}
