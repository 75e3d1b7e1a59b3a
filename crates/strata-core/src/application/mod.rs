//! Application layer for Strata.
//!
//! This layer contains:
//! - **Services**: compose, prune, render and the generation pipeline
//! - **Ports**: interface definitions (traits) for filesystems and sources
//! - **Errors**: application-specific error types
//!
//! Text rules (coordinates, prune matching, the substitution engine) live in
//! `crate::domain`; this layer walks directories and calls them.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    CatalogLevel, CompositionSummary, GenerationReport, GenerationRequest, LayeredComposer, ScaffoldService,
    TemplateRenderer, TemplateService, VisibilityPruner,
};

pub use ports::{
    DirEntry, EntryKind, Filesystem, Listing, Probe, RemoteEntry, RemoteError, RemoteRepository,
    TemplateSource,
};

pub use error::ApplicationError;
