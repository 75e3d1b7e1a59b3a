//! Infrastructure adapters for Strata.
//!
//! This crate implements the ports defined in `strata-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod remote;
pub mod template_source;

// Re-export commonly used adapters
pub use filesystem::LocalFilesystem;
pub use remote::{GitHubConfig, GitHubRepository};
pub use template_source::{LocalTemplateSource, RemoteTemplateSource, TemplateSourceResolver};
