//! Application services - orchestrate use cases.
//!
//! Each step of generation is its own service so callers and tests can run
//! them in isolation; `ScaffoldService` chains them.

pub mod compose;
pub mod prune;
pub mod render;
pub mod scaffold_service;
pub mod template_service;

pub use compose::{CompositionSummary, LayeredComposer};
pub use prune::VisibilityPruner;
pub use render::TemplateRenderer;
pub use scaffold_service::{GenerationReport, GenerationRequest, ScaffoldService};
pub use template_service::{CatalogLevel, TemplateService};
