//! Scaffold Service - main application orchestrator.
//!
//! Runs one generation request through the pipeline:
//! 1. Compose the layer plan onto the target
//! 2. Prune private-only entries (private artifacts only)
//! 3. Render marked files
//!
//! No rollback: a failure leaves whatever the completed steps wrote.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    application::{
        ports::{Filesystem, TemplateSource},
        services::{LayeredComposer, TemplateRenderer, VisibilityPruner},
    },
    domain::{LayerPlan, MarkerInfix, PruneSet, RenderContext, Visibility},
    error::StrataResult,
};

/// Everything one generation needs. Assembled by the caller.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub target_dir: PathBuf,
    pub plan: LayerPlan,
    pub visibility: Visibility,
    pub prune_set: PruneSet,
    pub context: RenderContext,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub layers_applied: usize,
    pub layers_skipped: usize,
    pub files_copied: usize,
    pub entries_pruned: usize,
    pub files_rendered: usize,
}

/// Main generation service.
pub struct ScaffoldService {
    composer: LayeredComposer,
    pruner: VisibilityPruner,
    renderer: TemplateRenderer,
}

impl ScaffoldService {
    /// Create a new scaffold service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use std::sync::Arc;
    /// use strata_core::prelude::*;
    ///
    /// # fn build(source: Arc<dyn TemplateSource>, fs: Arc<dyn Filesystem>) {
    /// let service = ScaffoldService::new(source, fs, MarkerInfix::default());
    /// # }
    /// ```
    pub fn new(
        source: Arc<dyn TemplateSource>,
        filesystem: Arc<dyn Filesystem>,
        marker: MarkerInfix,
    ) -> Self {
        Self {
            composer: LayeredComposer::new(source, Arc::clone(&filesystem)),
            pruner: VisibilityPruner::new(Arc::clone(&filesystem)),
            renderer: TemplateRenderer::new(filesystem, marker),
        }
    }

    /// Generate a project: compose, prune if private, render.
    #[instrument(
        skip_all,
        fields(
            target = %request.target_dir.display(),
            visibility = %request.visibility,
        )
    )]
    pub async fn generate(&self, request: &GenerationRequest) -> StrataResult<GenerationReport> {
        let target = request.target_dir.as_path();

        let composed = self.composer.compose(target, &request.plan).await?;

        let entries_pruned = if request.visibility.is_private() {
            self.pruner.prune(target, &request.prune_set)?
        } else {
            0
        };

        let files_rendered = self.renderer.render(target, &request.context)?;

        let report = GenerationReport {
            layers_applied: composed.layers_applied,
            layers_skipped: composed.layers_skipped,
            files_copied: composed.files_copied,
            entries_pruned,
            files_rendered,
        };
        info!(?report, "Generation completed");
        Ok(report)
    }
}
