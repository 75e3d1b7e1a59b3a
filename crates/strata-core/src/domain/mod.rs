// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Strata.
//!
//! Pure values and text transformations. Nothing in here touches the
//! filesystem or the network; all I/O goes through the ports defined in the
//! application layer.
//!
//! - **No async**: domain logic is synchronous
//! - **No I/O**: paths are values, never opened here
//! - **Immutable entities**: coordinates and plans do not change once built
pub mod entities;
pub mod error;
pub mod render;

pub use entities::{
    common::RelativePath,
    context::{ContextValue, RenderContext},
    coordinate::{ResolvedTemplateDirectory, SHARED, SourceKind, TemplateCoordinate, cache_key},
    layer_plan::{Layer, LayerPlan, LayerRole},
    prune_set::{PruneRule, PruneSet, Visibility},
};

pub use error::{DomainError, ErrorCategory};

pub use render::{ForeignExpressionToken, MarkerInfix, MaskedText};
