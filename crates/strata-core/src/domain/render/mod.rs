//! Text-level rendering primitives: the marker convention, foreign
//! expression masking and the substitution engine itself.

pub mod engine;
pub mod foreign;
pub mod marker;

pub use engine::render;
pub use foreign::{ForeignExpressionToken, MaskedText, mask, restore};
pub use marker::MarkerInfix;
