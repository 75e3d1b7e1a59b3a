//! GitHub contents API client.
//!
//! `GET /repos/{owner}/{repo}/contents/{path}?ref={ref}` answers probes and
//! listings; downloads walk the same endpoint and fetch each file's raw
//! bytes.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, header};
use serde::Deserialize;
use tracing::{debug, instrument};

use strata_core::{
    application::ports::{Listing, Probe, RemoteEntry, RemoteError, RemoteRepository},
    domain::RelativePath,
};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Where the templates live and how to reach them.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub api_url: String,
    pub owner: String,
    pub repo: String,
    /// Branch, tag or commit.
    pub reference: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl GitHubConfig {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            owner: owner.into(),
            repo: repo.into(),
            reference: "main".to_string(),
            token: None,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ContentItem {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
    download_url: Option<String>,
}

/// A directory answers with an array, a file with a single object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Contents {
    Dir(Vec<ContentItem>),
    File(ContentItem),
}

impl Contents {
    fn into_items(self) -> Vec<ContentItem> {
        match self {
            Self::Dir(items) => items,
            Self::File(item) => vec![item],
        }
    }
}

/// [`RemoteRepository`] over one GitHub repository at one reference.
pub struct GitHubRepository {
    http: Client,
    config: GitHubConfig,
}

impl GitHubRepository {
    pub fn new(config: GitHubConfig) -> Result<Self, RemoteError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("strata/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RemoteError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.owner,
            self.config.repo,
            path.trim_matches('/')
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_contents(&self, path: &str) -> Result<reqwest::Response, RemoteError> {
        let request = self
            .http
            .get(self.contents_url(path))
            .query(&[("ref", self.config.reference.as_str())])
            .header(header::ACCEPT, "application/vnd.github+json");

        self.authorized(request).send().await.map_err(map_reqwest)
    }

    async fn read_contents(&self, path: &str) -> Result<Option<Vec<ContentItem>>, RemoteError> {
        let response = self.get_contents(path).await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }
        let contents: Contents = response.json().await.map_err(|e| {
            RemoteError::Decode(format!("Failed to parse contents of {path}: {e}"))
        })?;
        Ok(Some(contents.into_items()))
    }

    async fn fetch_file(&self, item: &ContentItem, dest: &Path) -> Result<(), RemoteError> {
        let Some(url) = &item.download_url else {
            return Err(RemoteError::Decode(format!(
                "file {} has no download URL",
                item.path
            )));
        };
        let relative = RelativePath::try_new(&item.path)
            .map_err(|e| RemoteError::Decode(format!("unsafe path {}: {e}", item.path)))?;
        let target = dest.join(relative.as_path());

        let response = self
            .authorized(self.http.get(url))
            .send()
            .await
            .map_err(map_reqwest)?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                path: item.path.clone(),
            });
        }
        let bytes = response.bytes().await.map_err(map_reqwest)?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(parent, e))?;
        }
        tokio::fs::write(&target, &bytes)
            .await
            .map_err(|e| io_error(&target, e))?;
        debug!(path = %item.path, bytes = bytes.len(), "Fetched file");
        Ok(())
    }
}

#[async_trait]
impl RemoteRepository for GitHubRepository {
    #[instrument(skip(self), fields(repo = %self.config.repo))]
    async fn probe(&self, subpath: &str) -> Result<Probe, RemoteError> {
        let status = self.get_contents(subpath).await?.status();
        Ok(match status {
            s if s.is_success() => Probe::Present,
            StatusCode::NOT_FOUND => Probe::Absent,
            s => Probe::Inconclusive(s.as_u16()),
        })
    }

    #[instrument(skip(self), fields(repo = %self.config.repo))]
    async fn list(&self, subpath: &str) -> Result<Listing, RemoteError> {
        Ok(match self.read_contents(subpath).await? {
            None => Listing::Absent,
            Some(items) => Listing::Entries(
                items
                    .into_iter()
                    .map(|item| RemoteEntry {
                        is_dir: item.kind == "dir",
                        name: item.name,
                    })
                    .collect(),
            ),
        })
    }

    #[instrument(skip(self, dest), fields(repo = %self.config.repo))]
    async fn download(&self, subpath: &str, dest: &Path) -> Result<(), RemoteError> {
        let mut pending = vec![subpath.to_string()];
        let mut files = 0usize;

        while let Some(path) = pending.pop() {
            let items = self.read_contents(&path).await?.ok_or_else(|| RemoteError::Status {
                status: StatusCode::NOT_FOUND.as_u16(),
                path: path.clone(),
            })?;

            for item in items {
                match item.kind.as_str() {
                    "dir" => pending.push(item.path),
                    "file" => {
                        self.fetch_file(&item, dest).await?;
                        files += 1;
                    }
                    other => debug!(path = %item.path, kind = other, "Skipping entry"),
                }
            }
        }

        debug!(files, "Download complete");
        Ok(())
    }
}

fn map_reqwest(e: reqwest::Error) -> RemoteError {
    if e.is_timeout() {
        RemoteError::Timeout
    } else {
        RemoteError::Transport(e.to_string())
    }
}

fn io_error(path: &Path, e: std::io::Error) -> RemoteError {
    RemoteError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}
