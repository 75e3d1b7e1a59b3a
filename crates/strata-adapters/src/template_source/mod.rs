//! Template sources: local checkout, remote repository, and the resolver
//! that dispatches between them.

mod local;
mod remote;
mod resolver;

pub use local::LocalTemplateSource;
pub use remote::{RemoteTemplateSource, candidate_paths};
pub use resolver::TemplateSourceResolver;

use std::collections::BTreeSet;
use std::path::Path;

use strata_core::{
    application::ApplicationError,
    domain::SHARED,
    error::StrataResult,
};

/// `true` for directory names that count as catalogue entries.
pub(crate) fn is_listable(name: &str) -> bool {
    name != SHARED && !name.starts_with('.')
}

/// Child directory names of `dir`, minus `shared` and hidden entries.
/// A missing directory lists as empty.
pub(crate) fn list_child_dirs(dir: &Path) -> StrataResult<BTreeSet<String>> {
    if !dir.is_dir() {
        return Ok(BTreeSet::new());
    }
    let io_error = |e: std::io::Error| ApplicationError::FilesystemError {
        path: dir.to_path_buf(),
        reason: format!("Failed to list directory: {e}"),
    };

    let mut names = BTreeSet::new();
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_listable(&name) {
            names.insert(name);
        }
    }
    Ok(names)
}
