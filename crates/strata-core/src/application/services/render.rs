//! Substitution pass over marked files.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{MarkerInfix, RenderContext, render},
    error::{StrataError, StrataResult},
};

/// Renders every file whose name carries the marker infix, in place.
pub struct TemplateRenderer {
    filesystem: Arc<dyn Filesystem>,
    marker: MarkerInfix,
}

impl TemplateRenderer {
    pub fn new(filesystem: Arc<dyn Filesystem>, marker: MarkerInfix) -> Self {
        Self { filesystem, marker }
    }

    pub fn marker(&self) -> &MarkerInfix {
        &self.marker
    }

    /// Walk `root` and render each marked file to its unmarked name,
    /// removing the original. Stops at the first file that fails.
    ///
    /// Returns the number of files rendered. A missing `root` renders nothing.
    #[instrument(skip_all, fields(root = %root.display(), marker = %self.marker))]
    pub fn render(&self, root: &Path, context: &RenderContext) -> StrataResult<usize> {
        if !self.filesystem.is_dir(root) {
            debug!("Nothing to render");
            return Ok(0);
        }
        let rendered = self.render_dir(root, context)?;
        info!(rendered, "Rendered marked files");
        Ok(rendered)
    }

    fn render_dir(&self, dir: &Path, context: &RenderContext) -> StrataResult<usize> {
        let mut rendered = 0;
        for entry in self.filesystem.read_dir(dir)? {
            if entry.is_dir() {
                rendered += self.render_dir(&entry.path, context)?;
                continue;
            }
            if !entry.is_file() {
                continue;
            }
            let Some(output_name) = self.marker.strip(&entry.name) else {
                continue;
            };
            self.render_file(&entry.path, &dir.join(output_name), context)?;
            rendered += 1;
        }
        Ok(rendered)
    }

    fn render_file(&self, source: &Path, dest: &Path, context: &RenderContext) -> StrataResult<()> {
        let render_error = |reason: String| -> StrataError {
            ApplicationError::Render {
                path: source.to_path_buf(),
                reason,
            }
            .into()
        };

        let text = self
            .filesystem
            .read_to_string(source)
            .map_err(|e| render_error(e.to_string()))?;

        let masked = render::mask(&text);
        let output = render::render(&masked.text, context).map_err(|e| render_error(e.to_string()))?;
        let output = render::restore(&output, &masked.tokens);

        self.filesystem
            .write_file(dest, &output)
            .and_then(|()| self.filesystem.copy_permissions(source, dest))
            .map_err(|e| render_error(e.to_string()))?;
        if source != dest {
            self.filesystem
                .remove_file(source)
                .map_err(|e| render_error(e.to_string()))?;
        }

        debug!(
            from = %source.display(),
            to = %dest.display(),
            foreign_spans = masked.tokens.len(),
            "Rendered"
        );
        Ok(())
    }
}
