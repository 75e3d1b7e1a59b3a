//! Remote template source behaviour against fake repositories.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use mockall::{mock, predicate::eq};
use pretty_assertions::assert_eq;

use strata_adapters::RemoteTemplateSource;
use strata_core::{
    application::{
        ApplicationError,
        ports::{Listing, Probe, RemoteEntry, RemoteError, RemoteRepository, TemplateSource},
    },
    domain::{SourceKind, TemplateCoordinate},
    error::StrataError,
};

mock! {
    pub Repo {}

    #[async_trait]
    impl RemoteRepository for Repo {
        async fn probe(&self, subpath: &str) -> Result<Probe, RemoteError>;
        async fn list(&self, subpath: &str) -> Result<Listing, RemoteError>;
        async fn download(&self, subpath: &str, dest: &Path) -> Result<(), RemoteError>;
    }
}

fn basic() -> TemplateCoordinate {
    TemplateCoordinate::template(SourceKind::Remote, "rust", "cli", "basic").unwrap()
}

fn lay_out(dest: &Path, repo_path: &str, files: &[&str]) {
    for file in files {
        let path = dest.join(repo_path).join(file);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, file).unwrap();
    }
}

// ============================================================================
// resolve
// ============================================================================

#[tokio::test]
async fn absent_probe_is_not_found_without_download() {
    let mut repo = MockRepo::new();
    repo.expect_probe()
        .with(eq("templates/rust/cli/basic"))
        .times(1)
        .returning(|_| Ok(Probe::Absent));
    repo.expect_download().times(0);

    let source = RemoteTemplateSource::new(repo, "templates");
    let err = source.resolve(&basic()).await.unwrap_err();

    assert!(err.is_not_found(), "{err}");
}

#[tokio::test]
async fn present_probe_downloads_and_selects_most_specific_path() {
    let mut repo = MockRepo::new();
    repo.expect_probe().returning(|_| Ok(Probe::Present));
    repo.expect_download()
        .times(1)
        .returning(|subpath, dest| {
            lay_out(dest, subpath, &["Cargo.toml", "src/main.rs"]);
            Ok(())
        });

    let source = RemoteTemplateSource::new(repo, "templates");
    let dir = source.resolve(&basic()).await.unwrap();

    assert_eq!(dir.source, SourceKind::Remote);
    assert!(dir.path.ends_with("templates/rust/cli/basic"));
    assert!(dir.path.join("src/main.rs").is_file());
}

#[tokio::test]
async fn inconclusive_probe_still_downloads() {
    let mut repo = MockRepo::new();
    repo.expect_probe().returning(|_| Ok(Probe::Inconclusive(403)));
    repo.expect_download().times(1).returning(|_, dest| {
        // Archive flattened to the last segment.
        lay_out(dest, "basic", &["README.md"]);
        Ok(())
    });

    let source = RemoteTemplateSource::new(repo, "templates");
    let dir = source.resolve(&basic()).await.unwrap();

    assert!(dir.path.ends_with("basic"));
    assert!(dir.path.join("README.md").is_file());
}

#[tokio::test]
async fn transport_failure_is_fetch_error() {
    let mut repo = MockRepo::new();
    repo.expect_probe()
        .returning(|_| Err(RemoteError::Transport("connection refused".into())));
    repo.expect_download().times(0);

    let source = RemoteTemplateSource::new(repo, "templates");
    let err = source.resolve(&basic()).await.unwrap_err();

    match err {
        StrataError::Application(ApplicationError::Fetch { coordinate, reason }) => {
            assert_eq!(coordinate, "remote:rust/cli/basic");
            assert!(reason.contains("connection refused"));
        }
        other => panic!("expected fetch error, got {other:?}"),
    }
}

#[tokio::test]
async fn successful_resolution_is_cached() {
    let mut repo = MockRepo::new();
    repo.expect_probe().times(1).returning(|_| Ok(Probe::Present));
    repo.expect_download().times(1).returning(|subpath, dest| {
        lay_out(dest, subpath, &["x"]);
        Ok(())
    });

    let source = RemoteTemplateSource::new(repo, "templates");
    let first = source.resolve(&basic()).await.unwrap();
    let second = source.resolve(&basic()).await.unwrap();

    assert_eq!(first, second);
}

// ============================================================================
// list
// ============================================================================

#[tokio::test]
async fn absent_listing_is_empty_not_error() {
    let mut repo = MockRepo::new();
    repo.expect_list()
        .with(eq("templates/zig"))
        .returning(|_| Ok(Listing::Absent));
    repo.expect_probe().times(0);
    repo.expect_download().times(0);

    let source = RemoteTemplateSource::new(repo, "templates");
    let coord = TemplateCoordinate::listing(SourceKind::Remote, Some("zig"), None).unwrap();

    assert!(source.list(&coord).await.unwrap().is_empty());
}

#[tokio::test]
async fn listing_keeps_directories_except_shared() {
    let mut repo = MockRepo::new();
    repo.expect_list().returning(|_| {
        Ok(Listing::Entries(vec![
            RemoteEntry::dir("basic"),
            RemoteEntry::dir("shared"),
            RemoteEntry::dir("workspace"),
            RemoteEntry::file("README.md"),
        ]))
    });

    let source = RemoteTemplateSource::new(repo, "templates");
    let coord = TemplateCoordinate::listing(SourceKind::Remote, Some("rust"), Some("cli")).unwrap();

    assert_eq!(
        source.list(&coord).await.unwrap().into_iter().collect::<Vec<_>>(),
        vec!["basic", "workspace"]
    );
}

#[tokio::test]
async fn failed_listing_falls_back_to_download() {
    let mut repo = MockRepo::new();
    repo.expect_list()
        .returning(|_| Err(RemoteError::Status { status: 500, path: "templates/rust".into() }));
    repo.expect_probe()
        .with(eq("templates/rust"))
        .returning(|_| Ok(Probe::Present));
    repo.expect_download().times(1).returning(|subpath, dest| {
        lay_out(dest, subpath, &["cli/basic/a", "api/axum/b", "shared/c"]);
        Ok(())
    });

    let source = RemoteTemplateSource::new(repo, "templates");
    let coord = TemplateCoordinate::listing(SourceKind::Remote, Some("rust"), None).unwrap();

    assert_eq!(
        source.list(&coord).await.unwrap().into_iter().collect::<Vec<_>>(),
        vec!["api", "cli"]
    );
}

#[tokio::test]
async fn fallback_not_found_is_empty() {
    let mut repo = MockRepo::new();
    repo.expect_list().returning(|_| Ok(Listing::Entries(Vec::new())));
    repo.expect_probe().returning(|_| Ok(Probe::Absent));
    repo.expect_download().times(0);

    let source = RemoteTemplateSource::new(repo, "templates");
    let coord = TemplateCoordinate::listing(SourceKind::Remote, None, None).unwrap();

    assert!(source.list(&coord).await.unwrap().is_empty());
}

// ============================================================================
// Coalescing
// ============================================================================

/// Counts downloads and takes its time about them, so concurrent callers
/// overlap.
struct SlowRepo {
    downloads: AtomicUsize,
    failures_left: AtomicUsize,
}

impl SlowRepo {
    fn new(failures: usize) -> Self {
        Self {
            downloads: AtomicUsize::new(0),
            failures_left: AtomicUsize::new(failures),
        }
    }
}

#[async_trait]
impl RemoteRepository for SlowRepo {
    async fn probe(&self, _subpath: &str) -> Result<Probe, RemoteError> {
        Ok(Probe::Present)
    }

    async fn list(&self, _subpath: &str) -> Result<Listing, RemoteError> {
        Ok(Listing::Absent)
    }

    async fn download(&self, subpath: &str, dest: &Path) -> Result<(), RemoteError> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;

        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(RemoteError::Timeout);
        }
        lay_out(dest, subpath, &["file"]);
        Ok(())
    }
}

#[tokio::test]
async fn concurrent_resolves_share_one_download() {
    let source = RemoteTemplateSource::new(SlowRepo::new(0), "templates");
    let coord = basic();

    let (a, b) = tokio::join!(source.resolve(&coord), source.resolve(&coord));

    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(source.repository().downloads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn distinct_coordinates_download_separately() {
    let source = RemoteTemplateSource::new(SlowRepo::new(0), "templates");
    let basic = basic();
    let shared = TemplateCoordinate::resource_shared(SourceKind::Remote, "rust", "cli").unwrap();

    let (a, b) = tokio::join!(source.resolve(&basic), source.resolve(&shared));

    assert_ne!(a.unwrap().path, b.unwrap().path);
    assert_eq!(source.repository().downloads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn concurrent_callers_share_one_failure() {
    let source = RemoteTemplateSource::new(SlowRepo::new(1), "templates");
    let coord = basic();

    let (a, b) = tokio::join!(source.resolve(&coord), source.resolve(&coord));

    for result in [a, b] {
        assert!(matches!(
            result,
            Err(StrataError::Application(ApplicationError::Fetch { .. }))
        ));
    }
    assert_eq!(source.repository().downloads.load(Ordering::SeqCst), 1);

    let retried = source.resolve(&coord).await.unwrap();
    assert!(retried.path.join("file").is_file());
    assert_eq!(source.repository().downloads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failures_are_not_memoized() {
    let source = RemoteTemplateSource::new(SlowRepo::new(1), "templates");

    let first = source.resolve(&basic()).await;
    assert!(matches!(
        first,
        Err(StrataError::Application(ApplicationError::Fetch { .. }))
    ));

    let second = source.resolve(&basic()).await.unwrap();
    assert!(second.path.join("file").is_file());
    assert_eq!(source.repository().downloads.load(Ordering::SeqCst), 2);
}
