use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, instrument};

use strata_core::{
    application::{ApplicationError, ports::TemplateSource},
    domain::{ResolvedTemplateDirectory, SourceKind, TemplateCoordinate},
    error::StrataResult,
};

use super::list_child_dirs;

/// Templates laid out on disk under a fixed root. Directories are read in
/// place; nothing is copied or cached.
#[derive(Debug, Clone)]
pub struct LocalTemplateSource {
    root: PathBuf,
}

impl LocalTemplateSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl TemplateSource for LocalTemplateSource {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn resolve(
        &self,
        coordinate: &TemplateCoordinate,
    ) -> StrataResult<ResolvedTemplateDirectory> {
        let path = self.root.join(coordinate.relative_path());
        if !path.is_dir() {
            debug!(path = %path.display(), "No local directory");
            return Err(ApplicationError::TemplateNotFound {
                coordinate: coordinate.to_string(),
            }
            .into());
        }
        Ok(ResolvedTemplateDirectory::new(path, SourceKind::Local))
    }

    async fn list(&self, coordinate: &TemplateCoordinate) -> StrataResult<BTreeSet<String>> {
        list_child_dirs(&self.root.join(coordinate.listing_path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn layout() -> TempDir {
        let tmp = TempDir::new().unwrap();
        for dir in ["shared", "rust/shared", "rust/cli/shared", "rust/cli/basic", "rust/cli/.git", "go"] {
            std::fs::create_dir_all(tmp.path().join(dir)).unwrap();
        }
        std::fs::write(tmp.path().join("rust/cli/NOTES.md"), "not a template").unwrap();
        tmp
    }

    #[tokio::test]
    async fn resolves_existing_directory() {
        let tmp = layout();
        let source = LocalTemplateSource::new(tmp.path());
        let coord = TemplateCoordinate::template(SourceKind::Local, "rust", "cli", "basic").unwrap();

        let dir = source.resolve(&coord).await.unwrap();
        assert_eq!(dir.path, tmp.path().join("rust/cli/basic"));
        assert_eq!(dir.source, SourceKind::Local);
    }

    #[tokio::test]
    async fn missing_directory_is_not_found() {
        let tmp = layout();
        let source = LocalTemplateSource::new(tmp.path());
        let coord = TemplateCoordinate::language_shared(SourceKind::Local, "go").unwrap();

        let err = source.resolve(&coord).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn lists_children_without_shared_files_or_hidden() {
        let tmp = layout();
        let source = LocalTemplateSource::new(tmp.path());

        let root = TemplateCoordinate::listing(SourceKind::Local, None, None).unwrap();
        let item = TemplateCoordinate::listing(SourceKind::Local, Some("rust"), Some("cli")).unwrap();
        let missing = TemplateCoordinate::listing(SourceKind::Local, Some("zig"), None).unwrap();

        assert_eq!(
            source.list(&root).await.unwrap().into_iter().collect::<Vec<_>>(),
            vec!["go", "rust"]
        );
        assert_eq!(
            source.list(&item).await.unwrap().into_iter().collect::<Vec<_>>(),
            vec!["basic"]
        );
        assert!(source.list(&missing).await.unwrap().is_empty());
    }
}
