//! Layered composition: merge every layer of a plan onto one target tree.

use std::path::Path;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateSource},
    },
    domain::LayerPlan,
    error::StrataResult,
};

/// Outcome of one [`LayeredComposer::compose`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositionSummary {
    pub layers_applied: usize,
    pub layers_skipped: usize,
    pub files_copied: usize,
}

/// Applies a [`LayerPlan`] to a target directory, last write wins.
pub struct LayeredComposer {
    source: Arc<dyn TemplateSource>,
    filesystem: Arc<dyn Filesystem>,
}

impl LayeredComposer {
    pub fn new(source: Arc<dyn TemplateSource>, filesystem: Arc<dyn Filesystem>) -> Self {
        Self { source, filesystem }
    }

    /// Resolve every layer (concurrently), then copy them onto `target` one
    /// at a time in ascending precedence.
    ///
    /// A missing optional layer is skipped. A missing template layer, or any
    /// other resolution failure, aborts composition.
    #[instrument(skip_all, fields(target = %target.display(), layers = plan.len()))]
    pub async fn compose(&self, target: &Path, plan: &LayerPlan) -> StrataResult<CompositionSummary> {
        let resolutions = join_all(plan.iter().map(|layer| self.source.resolve(&layer.coordinate))).await;

        let mut summary = CompositionSummary::default();
        self.filesystem.create_dir_all(target)?;

        for (layer, resolution) in plan.iter().zip(resolutions) {
            let dir = match resolution {
                Ok(dir) => dir,
                Err(e) if e.is_not_found() && !layer.is_required() => {
                    debug!(role = %layer.role, coordinate = %layer.coordinate, "Layer absent, skipping");
                    summary.layers_skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let copied = self.copy_tree(&dir.path, target)?;
            debug!(
                role = %layer.role,
                coordinate = %layer.coordinate,
                from = %dir.path.display(),
                files = copied,
                "Layer applied"
            );
            summary.layers_applied += 1;
            summary.files_copied += copied;
        }

        info!(
            applied = summary.layers_applied,
            skipped = summary.layers_skipped,
            files = summary.files_copied,
            "Composition complete"
        );
        Ok(summary)
    }

    /// Recursively copy `from` onto `to`, overwriting files. Returns the
    /// number of files written.
    fn copy_tree(&self, from: &Path, to: &Path) -> StrataResult<usize> {
        self.filesystem.create_dir_all(to)?;

        let mut copied = 0;
        for entry in self.filesystem.read_dir(from)? {
            let dest = to.join(&entry.name);
            if entry.is_dir() {
                if self.filesystem.exists(&dest) && !self.filesystem.is_dir(&dest) {
                    return Err(ApplicationError::FilesystemError {
                        path: dest,
                        reason: "a file from an earlier layer is in the way of a directory".into(),
                    }
                    .into());
                }
                copied += self.copy_tree(&entry.path, &dest)?;
            } else if entry.is_file() {
                self.filesystem.copy_file(&entry.path, &dest)?;
                copied += 1;
            } else {
                debug!(path = %entry.path.display(), "Skipping non-regular entry");
            }
        }
        Ok(copied)
    }
}
