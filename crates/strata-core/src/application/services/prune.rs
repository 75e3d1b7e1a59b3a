//! Removal of private-only entries from a composed tree.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{application::ports::Filesystem, domain::PruneSet, error::StrataResult};

pub struct VisibilityPruner {
    filesystem: Arc<dyn Filesystem>,
}

impl VisibilityPruner {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Delete every entry under `root` matched by `rules`. A matching
    /// directory goes in one step; nothing beneath it is visited.
    ///
    /// Returns the number of entries removed. A missing `root` or an empty
    /// rule set removes nothing.
    #[instrument(skip_all, fields(root = %root.display(), rules = rules.len()))]
    pub fn prune(&self, root: &Path, rules: &PruneSet) -> StrataResult<usize> {
        if rules.is_empty() || !self.filesystem.is_dir(root) {
            debug!("Nothing to prune");
            return Ok(0);
        }
        let removed = self.prune_dir(root, "", rules)?;
        info!(removed, "Pruned private-only entries");
        Ok(removed)
    }

    fn prune_dir(&self, dir: &Path, prefix: &str, rules: &PruneSet) -> StrataResult<usize> {
        let mut removed = 0;
        // Listing is read in full before anything is deleted.
        for entry in self.filesystem.read_dir(dir)? {
            let relative = if prefix.is_empty() {
                entry.name.clone()
            } else {
                format!("{prefix}/{}", entry.name)
            };

            if rules.matches(&entry.name, &relative) {
                if entry.is_dir() {
                    self.filesystem.remove_dir_all(&entry.path)?;
                } else {
                    self.filesystem.remove_file(&entry.path)?;
                }
                debug!(path = %relative, "Pruned");
                removed += 1;
            } else if entry.is_dir() {
                removed += self.prune_dir(&entry.path, &relative, rules)?;
            }
        }
        Ok(removed)
    }
}
