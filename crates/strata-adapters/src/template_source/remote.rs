use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use tempfile::TempDir;
use tracing::{debug, info, instrument, warn};

use strata_core::{
    application::{
        ApplicationError,
        ports::{Listing, Probe, RemoteError, RemoteRepository, TemplateSource},
    },
    domain::{RelativePath, ResolvedTemplateDirectory, SourceKind, TemplateCoordinate, cache_key},
    error::{StrataError, StrataResult},
};

use super::{is_listable, list_child_dirs};

/// One download, awaited by every caller asking for the same key. Once it
/// completes successfully it doubles as the cache entry.
type InFlight = Shared<BoxFuture<'static, StrataResult<ResolvedTemplateDirectory>>>;

/// Templates fetched from a hosted repository on demand.
///
/// Each coordinate is downloaded at most once per instance: successful
/// resolutions are cached, and concurrent requests for the same key wait on
/// one in-flight download and receive its result. A failed download is
/// forgotten once it settles, so a later request tries again. Downloads live
/// in temporary directories that are removed when the source is dropped.
pub struct RemoteTemplateSource<R: RemoteRepository> {
    fetcher: Arc<Fetcher<R>>,
    in_flight: Mutex<HashMap<String, InFlight>>,
}

/// The parts of a remote source a download needs, shared with the
/// in-flight futures.
struct Fetcher<R> {
    repository: R,
    root: String,
    downloads: Mutex<Vec<TempDir>>,
}

impl<R: RemoteRepository + 'static> RemoteTemplateSource<R> {
    /// `root` is the directory inside the repository that holds the
    /// template layout; empty for the repository root.
    pub fn new(repository: R, root: impl Into<String>) -> Self {
        Self {
            fetcher: Arc::new(Fetcher {
                repository,
                root: root.into().trim_matches('/').to_string(),
                downloads: Mutex::new(Vec::new()),
            }),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn repository(&self) -> &R {
        &self.fetcher.repository
    }

    /// Cached or coalesced resolution of one subpath.
    async fn resolve_subpath(
        &self,
        subpath: &RelativePath,
        label: &str,
    ) -> StrataResult<ResolvedTemplateDirectory> {
        let key = cache_key(SourceKind::Remote, subpath);
        let pending = {
            let mut in_flight = self
                .in_flight
                .lock()
                .map_err(|_| ApplicationError::StoreLockError)?;

            if let Some(existing) = in_flight.get(&key).cloned() {
                if let Some(Ok(dir)) = existing.peek() {
                    debug!(coordinate = label, "Cache hit");
                    return Ok(dir.clone());
                }
                debug!(coordinate = label, "Joining in-flight download");
                existing
            } else {
                let fetcher = Arc::clone(&self.fetcher);
                let subpath = subpath.clone();
                let label = label.to_string();
                let download = async move { fetcher.fetch(&subpath, &label).await }
                    .boxed()
                    .shared();
                in_flight.insert(key.clone(), download.clone());
                download
            }
        };

        let result = pending.clone().await;
        if result.is_err() {
            let mut in_flight = self
                .in_flight
                .lock()
                .map_err(|_| ApplicationError::StoreLockError)?;
            if in_flight.get(&key).is_some_and(|f| f.ptr_eq(&pending)) {
                in_flight.remove(&key);
            }
        }
        result
    }
}

impl<R: RemoteRepository> Fetcher<R> {
    /// Repository-relative path for a subpath of the template layout.
    fn repo_path(&self, subpath: &RelativePath) -> String {
        let sub = subpath.to_slash_string();
        match (self.root.is_empty(), sub.is_empty()) {
            (true, _) => sub,
            (false, true) => self.root.clone(),
            (false, false) => format!("{}/{}", self.root, sub),
        }
    }

    #[instrument(skip(self, subpath, label), fields(coordinate = label))]
    async fn fetch(
        &self,
        subpath: &RelativePath,
        label: &str,
    ) -> StrataResult<ResolvedTemplateDirectory> {
        let repo_path = self.repo_path(subpath);

        match self
            .repository
            .probe(&repo_path)
            .await
            .map_err(|e| fetch_error(label, e))?
        {
            Probe::Present => {}
            Probe::Absent => {
                debug!(path = %repo_path, "Not present in repository");
                return Err(ApplicationError::TemplateNotFound {
                    coordinate: label.to_string(),
                }
                .into());
            }
            Probe::Inconclusive(status) => {
                warn!(path = %repo_path, status, "Existence probe inconclusive, downloading anyway");
            }
        }

        let tmp = tempfile::Builder::new()
            .prefix("strata-")
            .tempdir()
            .map_err(|e| ApplicationError::Fetch {
                coordinate: label.to_string(),
                reason: format!("cannot create temporary directory: {e}"),
            })?;

        self.repository
            .download(&repo_path, tmp.path())
            .await
            .map_err(|e| fetch_error(label, e))?;

        let dir = select_candidate(tmp.path(), &self.root, subpath);
        info!(path = %dir.display(), "Downloaded remote template");

        self.downloads
            .lock()
            .map_err(|_| ApplicationError::StoreLockError)?
            .push(tmp);

        Ok(ResolvedTemplateDirectory::new(dir, SourceKind::Remote))
    }
}

#[async_trait]
impl<R: RemoteRepository + 'static> TemplateSource for RemoteTemplateSource<R> {
    async fn resolve(
        &self,
        coordinate: &TemplateCoordinate,
    ) -> StrataResult<ResolvedTemplateDirectory> {
        self.resolve_subpath(&coordinate.relative_path(), &coordinate.to_string())
            .await
    }

    #[instrument(skip(self, coordinate), fields(coordinate = %coordinate))]
    async fn list(&self, coordinate: &TemplateCoordinate) -> StrataResult<BTreeSet<String>> {
        let subpath = coordinate.listing_path();
        let repo_path = self.fetcher.repo_path(&subpath);

        match self.fetcher.repository.list(&repo_path).await {
            Ok(Listing::Absent) => {
                debug!(path = %repo_path, "Listing target not present");
                return Ok(BTreeSet::new());
            }
            Ok(Listing::Entries(entries)) => {
                let names: BTreeSet<String> = entries
                    .into_iter()
                    .filter(|e| e.is_dir && is_listable(&e.name))
                    .map(|e| e.name)
                    .collect();
                if !names.is_empty() {
                    return Ok(names);
                }
                debug!(path = %repo_path, "Listing query returned nothing, falling back");
            }
            Err(e) => {
                warn!(path = %repo_path, error = %e, "Listing query failed, falling back to download");
            }
        }

        let label = cache_key(SourceKind::Remote, &subpath);
        match self.resolve_subpath(&subpath, &label).await {
            Ok(dir) => list_child_dirs(&dir.path),
            Err(e) if e.is_not_found() => Ok(BTreeSet::new()),
            Err(e) => Err(e),
        }
    }
}

fn fetch_error(label: &str, e: RemoteError) -> StrataError {
    ApplicationError::Fetch {
        coordinate: label.to_string(),
        reason: e.to_string(),
    }
    .into()
}

/// Relative paths, most specific first, at which a download of `subpath`
/// may have landed:
///
/// `<root>/s1/../sn`, `s1/../sn`, `s2/../sn`, ..., `sn`, then the download
/// root itself (the empty path).
pub fn candidate_paths(root: &str, subpath: &RelativePath) -> Vec<PathBuf> {
    let segments: Vec<String> = subpath
        .as_path()
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    let mut candidates = Vec::with_capacity(segments.len() + 2);
    if !root.is_empty() {
        let mut full: PathBuf = root.split('/').filter(|s| !s.is_empty()).collect();
        full.extend(&segments);
        candidates.push(full);
    }
    for start in 0..segments.len() {
        candidates.push(segments[start..].iter().collect());
    }
    candidates.push(PathBuf::new());
    candidates.dedup();
    candidates
}

fn select_candidate(download_root: &Path, root: &str, subpath: &RelativePath) -> PathBuf {
    candidate_paths(root, subpath)
        .into_iter()
        .map(|c| download_root.join(c))
        .find(|p| p.is_dir())
        .unwrap_or_else(|| download_root.to_path_buf())
}
