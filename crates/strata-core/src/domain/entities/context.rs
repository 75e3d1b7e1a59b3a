//! Render context: the values substituted into marked template files.
//!
//! The caller decides *what* goes in here; the core only reads it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single context value.
///
/// Closed set of shapes so the renderer never has to guess at structure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    Bool(bool),
    Number(f64),
    String(String),
    #[default]
    Absent,
}

impl ContextValue {
    /// Absent, `false` and `""` are falsy. Everything else, including `0`,
    /// is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Absent => false,
            Self::Bool(b) => *b,
            Self::String(s) => !s.is_empty(),
            Self::Number(_) => true,
        }
    }

    /// Text emitted for `{{key}}`. Absent renders as nothing.
    pub fn to_interpolation(&self) -> String {
        match self {
            Self::Absent => String::new(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            // Whole numbers print without a trailing `.0`.
            Self::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for ContextValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for ContextValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for ContextValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl<T: Into<ContextValue>> From<Option<T>> for ContextValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

/// Ordered mapping from key to [`ContextValue`].
///
/// Keys iterate in sorted order so debug output and logs are stable.
/// A key that was never inserted behaves exactly like one set to
/// [`ContextValue::Absent`].
///
/// ```
/// use strata_core::domain::RenderContext;
///
/// let ctx = RenderContext::new()
///     .with("project_name", "my-app")
///     .with("private", false);
///
/// assert_eq!(ctx.interpolate("project_name"), "my-app");
/// assert!(!ctx.is_truthy("private"));
/// assert!(!ctx.is_truthy("never_set"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderContext {
    values: BTreeMap<String, ContextValue>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. Later values for the same key replace earlier ones.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Overlay every entry of `other` onto this context.
    pub fn extend(&mut self, other: RenderContext) {
        self.values.extend(other.values);
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.values.get(key)
    }

    pub fn is_truthy(&self, key: &str) -> bool {
        self.get(key).is_some_and(ContextValue::is_truthy)
    }

    pub fn interpolate(&self, key: &str) -> String {
        self.get(key)
            .map(ContextValue::to_interpolation)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<ContextValue>> FromIterator<(K, V)> for RenderContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut ctx = Self::new();
        for (k, v) in iter {
            ctx.insert(k, v);
        }
        ctx
    }
}
