pub mod common;
pub mod context;
pub mod coordinate;
pub mod layer_plan;
pub mod prune_set;

pub use crate::domain::DomainError;
pub use context::{ContextValue, RenderContext};
pub use coordinate::{ResolvedTemplateDirectory, SHARED, SourceKind, TemplateCoordinate};
pub use layer_plan::{Layer, LayerPlan, LayerRole};
pub use prune_set::{PruneRule, PruneSet, Visibility};
