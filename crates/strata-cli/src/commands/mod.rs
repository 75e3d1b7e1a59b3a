//! Subcommand handlers. Each translates parsed arguments into core calls and
//! prints the outcome; no pipeline logic lives here.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use strata_adapters::{
    GitHubRepository, LocalTemplateSource, RemoteTemplateSource, TemplateSourceResolver,
};
use strata_core::application::ports::TemplateSource;

use crate::{
    config::AppConfig,
    error::{CliError, CliResult},
};

pub mod completions;
pub mod init;
pub mod list;
pub mod new;

/// One resolver per run, so every layer shares the remote download cache.
///
/// The remote side is wired only when `[remote]` is configured; asking for a
/// remote coordinate without it fails inside the core with a configuration
/// error.
pub(crate) fn template_source(
    config: &AppConfig,
    templates_dir: Option<&Path>,
) -> CliResult<Arc<dyn TemplateSource>> {
    let local_root = templates_dir.unwrap_or(config.templates.local_root.as_path());
    debug!(root = %local_root.display(), "Local template root");
    let mut resolver = TemplateSourceResolver::new(LocalTemplateSource::new(local_root));

    if let Some(remote) = &config.remote {
        let repository =
            GitHubRepository::new(remote.github()).map_err(|e| CliError::ConfigError {
                message: "cannot set up the remote template client".into(),
                source: Some(Box::new(e)),
            })?;
        debug!(owner = %remote.owner, repo = %remote.repo, reference = %remote.reference, "Remote templates");
        resolver = resolver.with_remote(RemoteTemplateSource::new(repository, remote.root.clone()));
    }

    Ok(Arc::new(resolver))
}
