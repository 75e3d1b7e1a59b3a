//! Strata Core - Hexagonal Architecture Implementation
//!
//! Domain and application layers for the Strata template composition
//! engine, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           strata-cli (CLI)              │
//! │   (assembles plan, prune set, context)  │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  compose → prune (private) → render     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ Filesystem, TemplateSource, RemoteRepo  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     strata-adapters (Infrastructure)    │
//! │  LocalFilesystem, sources, GitHub API   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ coordinates, layer plans, text engine   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use strata_core::prelude::*;
//!
//! # async fn run(source: Arc<dyn TemplateSource>, fs: Arc<dyn Filesystem>) -> StrataResult<()> {
//! let service = ScaffoldService::new(source, fs, MarkerInfix::default());
//! let request = GenerationRequest {
//!     target_dir: "./my-app".into(),
//!     plan: LayerPlan::standard(SourceKind::Local, "rust", "cli", "basic")?,
//!     visibility: Visibility::Public,
//!     prune_set: PruneSet::new(),
//!     context: RenderContext::new().with("project_name", "my-app"),
//! };
//! let report = service.generate(&request).await?;
//! println!("{} files rendered", report.files_rendered);
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        GenerationReport, GenerationRequest, ScaffoldService, TemplateService,
        ports::{Filesystem, RemoteRepository, TemplateSource},
    };
    pub use crate::domain::{
        ContextValue, LayerPlan, MarkerInfix, PruneSet, RenderContext, SourceKind,
        TemplateCoordinate, Visibility,
    };
    pub use crate::error::{StrataError, StrataResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
