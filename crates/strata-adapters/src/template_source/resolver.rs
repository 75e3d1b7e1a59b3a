use std::collections::BTreeSet;

use async_trait::async_trait;

use strata_core::{
    application::{ApplicationError, ports::TemplateSource},
    domain::{ResolvedTemplateDirectory, SourceKind, TemplateCoordinate},
    error::StrataResult,
};

use super::LocalTemplateSource;

/// Routes each coordinate to the source named by its [`SourceKind`].
///
/// Holds the only remote source of a run, so its download cache is shared
/// by every caller of this resolver.
pub struct TemplateSourceResolver {
    local: LocalTemplateSource,
    remote: Option<Box<dyn TemplateSource>>,
}

impl TemplateSourceResolver {
    pub fn new(local: LocalTemplateSource) -> Self {
        Self {
            local,
            remote: None,
        }
    }

    pub fn with_remote(mut self, remote: impl TemplateSource + 'static) -> Self {
        self.remote = Some(Box::new(remote));
        self
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    fn pick(&self, kind: SourceKind) -> StrataResult<&dyn TemplateSource> {
        match kind {
            SourceKind::Local => Ok(&self.local as &dyn TemplateSource),
            SourceKind::Remote => self
                .remote
                .as_deref()
                .ok_or_else(|| ApplicationError::RemoteNotConfigured.into()),
        }
    }
}

#[async_trait]
impl TemplateSource for TemplateSourceResolver {
    async fn resolve(
        &self,
        coordinate: &TemplateCoordinate,
    ) -> StrataResult<ResolvedTemplateDirectory> {
        self.pick(coordinate.source())?.resolve(coordinate).await
    }

    async fn list(&self, coordinate: &TemplateCoordinate) -> StrataResult<BTreeSet<String>> {
        self.pick(coordinate.source())?.list(coordinate).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::error::StrataError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn remote_without_configuration_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let resolver = TemplateSourceResolver::new(LocalTemplateSource::new(tmp.path()));
        let coord = TemplateCoordinate::global_shared(SourceKind::Remote);

        let err = resolver.resolve(&coord).await.unwrap_err();
        assert!(matches!(
            err,
            StrataError::Application(ApplicationError::RemoteNotConfigured)
        ));
        assert!(!resolver.has_remote());
    }

    #[tokio::test]
    async fn local_coordinates_go_to_local_root() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("shared")).unwrap();
        let resolver = TemplateSourceResolver::new(LocalTemplateSource::new(tmp.path()));

        let dir = resolver
            .resolve(&TemplateCoordinate::global_shared(SourceKind::Local))
            .await
            .unwrap();
        assert_eq!(dir.path, tmp.path().join("shared"));
    }
}
