//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `strata-adapters` crate provides implementations.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ResolvedTemplateDirectory, TemplateCoordinate};
use crate::error::StrataResult;

// ============================================================================
// Filesystem
// ============================================================================

/// What a directory entry is, judged without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Symlinks, sockets, devices. Never copied or rendered.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub name: String,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `strata_adapters::filesystem::LocalFilesystem`
///
/// ## Design Notes
///
/// - Synchronous; the pipeline touches one target tree at a time
/// - `read_dir` returns the complete listing, so callers may mutate the
///   directory while iterating the result
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> StrataResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> StrataResult<()>;

    fn read_to_string(&self, path: &Path) -> StrataResult<String>;

    /// Copy bytes and permissions, overwriting `to`.
    fn copy_file(&self, from: &Path, to: &Path) -> StrataResult<()>;

    /// Give `to` the permissions of `from`, leaving its content alone.
    fn copy_permissions(&self, from: &Path, to: &Path) -> StrataResult<()>;

    /// Full listing of `path`, sorted by name.
    fn read_dir(&self, path: &Path) -> StrataResult<Vec<DirEntry>>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn remove_file(&self, path: &Path) -> StrataResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> StrataResult<()>;
}

// ============================================================================
// Template sources
// ============================================================================

/// Port mapping coordinates to readable directories.
///
/// Implemented by:
/// - `strata_adapters::template_source::LocalTemplateSource`
/// - `strata_adapters::template_source::RemoteTemplateSource`
/// - `strata_adapters::template_source::TemplateSourceResolver` (dispatch by source kind)
#[async_trait]
pub trait TemplateSource: Send + Sync {
    /// Resolve a coordinate to a directory.
    ///
    /// Fails with `ApplicationError::TemplateNotFound` when the coordinate
    /// does not exist, and `ApplicationError::Fetch` when it could not be
    /// retrieved.
    async fn resolve(
        &self,
        coordinate: &TemplateCoordinate,
    ) -> StrataResult<ResolvedTemplateDirectory>;

    /// Names of the child directories under the coordinate's listing path,
    /// excluding `shared`. A missing level lists as empty.
    async fn list(&self, coordinate: &TemplateCoordinate) -> StrataResult<BTreeSet<String>>;
}

// ============================================================================
// Remote repositories
// ============================================================================

/// Outcome of a metadata-only existence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    Present,
    /// The repository answered definitively that the path does not exist.
    Absent,
    /// Any other answer (rate limits, server errors). Carries the status.
    Inconclusive(u16),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub name: String,
    pub is_dir: bool,
}

impl RemoteEntry {
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Entries(Vec<RemoteEntry>),
    Absent,
}

/// Failure talking to a remote repository.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("unexpected status {status} for {path}")]
    Status { status: u16, path: String },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("I/O error at {path}: {reason}")]
    Io { path: PathBuf, reason: String },
}

/// Port for a hosted repository of templates.
///
/// Paths are repository-relative with forward slashes.
///
/// Implemented by:
/// - `strata_adapters::remote::GitHubRepository`
#[async_trait]
pub trait RemoteRepository: Send + Sync {
    /// Existence check without transferring content.
    async fn probe(&self, subpath: &str) -> Result<Probe, RemoteError>;

    /// Immediate children of `subpath`.
    async fn list(&self, subpath: &str) -> Result<Listing, RemoteError>;

    /// Materialize `subpath` under `dest`, keeping its repository-relative
    /// location (`dest/<subpath>/...`).
    async fn download(&self, subpath: &str, dest: &Path) -> Result<(), RemoteError>;
}
