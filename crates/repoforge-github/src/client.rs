use crate::error::{Error, Result};
use crate::repository::RemoteRepo;
use async_trait::async_trait;
use reqwest::{header, Method, StatusCode};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

const GITHUB_API: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("repoforge/", env!("CARGO_PKG_VERSION"));
const MAX_ATTEMPTS: u32 = 3;
const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// The narrow remote-hosting surface the batch engine consumes.
///
/// Retried creates are not assumed idempotent by callers; a transient error
/// may mean the repository was created anyway.
#[async_trait]
pub trait RepoService: Send + Sync {
    async fn repo_exists(&self, owner: &str, name: &str) -> Result<bool>;
    async fn create_repo(
        &self,
        owner: &str,
        name: &str,
        description: &str,
        private: bool,
    ) -> Result<RemoteRepo>;
    async fn get_repo(&self, owner: &str, name: &str) -> Result<RemoteRepo>;
}

/// GitHub REST client with bounded retry and exponential backoff on
/// transient failures (transport errors, 5xx, 429). Authorization and
/// validation failures are never retried.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    token: String,
    user: Option<String>,
    api_base: String,
    backoff_base: Duration,
}

impl GitHubClient {
    pub fn new(token: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            token,
            user: None,
            api_base: GITHUB_API.to_string(),
            backoff_base: Duration::from_secs(2),
        })
    }

    /// The authenticated user; creates for this owner go through `/user/repos`.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    #[doc(hidden)]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    #[doc(hidden)]
    pub fn with_backoff(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.api_base, path))
            .header(header::AUTHORIZATION, format!("token {}", self.token))
            .header(header::ACCEPT, "application/vnd.github+json")
    }

    async fn send_with_retry<F>(&self, build: F) -> Result<reqwest::Response>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut attempt = 1;
        loop {
            match build().send().await {
                Ok(resp)
                    if resp.status().is_server_error()
                        || resp.status() == StatusCode::TOO_MANY_REQUESTS =>
                {
                    if attempt >= MAX_ATTEMPTS {
                        return Err(Error::Network(format!(
                            "GitHub returned {} after {attempt} attempts",
                            resp.status()
                        )));
                    }
                    warn!(status = %resp.status(), attempt, "transient GitHub error, retrying");
                }
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    if attempt >= MAX_ATTEMPTS {
                        return Err(Error::Network(e.to_string()));
                    }
                    warn!(error = %e, attempt, "request to GitHub failed, retrying");
                }
            }

            let delay = (self.backoff_base * 2u32.pow(attempt - 1)).min(MAX_BACKOFF);
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn error_from_response(resp: reqwest::Response) -> Error {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or(body);

        match status.as_u16() {
            401 | 403 => Error::Auth(message),
            422 => Error::Conflict(message),
            code => Error::Api { status: code, message },
        }
    }
}

#[async_trait]
impl RepoService for GitHubClient {
    async fn repo_exists(&self, owner: &str, name: &str) -> Result<bool> {
        debug!("checking whether {owner}/{name} exists");
        let resp = self
            .send_with_retry(|| self.request(Method::GET, &format!("/repos/{owner}/{name}")))
            .await?;

        match resp.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(Self::error_from_response(resp).await),
        }
    }

    async fn create_repo(
        &self,
        owner: &str,
        name: &str,
        description: &str,
        private: bool,
    ) -> Result<RemoteRepo> {
        let body = json!({
            "name": name,
            "description": description,
            "private": private,
            "auto_init": false,
        });

        // Repositories for the authenticated user go through /user/repos;
        // anything else is treated as an organization.
        let path = if owner.is_empty() || self.user.as_deref() == Some(owner) {
            "/user/repos".to_string()
        } else {
            format!("/orgs/{owner}/repos")
        };

        info!("creating repository {owner}/{name} (private={private})");
        let resp = self
            .send_with_retry(|| self.request(Method::POST, &path).json(&body))
            .await?;

        let status = resp.status();
        if status != StatusCode::CREATED && status != StatusCode::OK {
            return Err(Self::error_from_response(resp).await);
        }

        let repo: RemoteRepo = resp.json().await?;
        info!("created repository {}", repo.full_name);
        Ok(repo)
    }

    async fn get_repo(&self, owner: &str, name: &str) -> Result<RemoteRepo> {
        let resp = self
            .send_with_retry(|| self.request(Method::GET, &format!("/repos/{owner}/{name}")))
            .await?;

        if resp.status() != StatusCode::OK {
            return Err(Self::error_from_response(resp).await);
        }
        Ok(resp.json().await?)
    }
}
