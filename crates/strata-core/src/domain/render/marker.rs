use std::fmt;

use crate::domain::error::DomainError;

/// Filename infix that flags a file for the substitution pass.
///
/// Matching is ASCII case-insensitive; the first occurrence is the one
/// stripped, so `Cargo.MARKER.toml` becomes `Cargo.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerInfix(String);

impl MarkerInfix {
    pub const DEFAULT: &'static str = ".marker.";

    /// The infix must start and end with a dot and carry at least one
    /// character between them.
    pub fn new(infix: impl Into<String>) -> Result<Self, DomainError> {
        let infix = infix.into();
        let valid = infix.len() > 2
            && infix.starts_with('.')
            && infix.ends_with('.')
            && !infix.contains(['/', '\\']);
        if !valid {
            return Err(DomainError::InvalidMarker(infix));
        }
        Ok(Self(infix.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn find(&self, file_name: &str) -> Option<usize> {
        file_name.to_ascii_lowercase().find(&self.0)
    }

    pub fn is_marked(&self, file_name: &str) -> bool {
        self.find(file_name).is_some()
    }

    /// Output name for a marked file, or `None` if the name carries no marker.
    pub fn strip(&self, file_name: &str) -> Option<String> {
        // ASCII lowercasing keeps byte offsets stable.
        let at = self.find(file_name)?;
        let mut out = String::with_capacity(file_name.len());
        out.push_str(&file_name[..at]);
        out.push('.');
        out.push_str(&file_name[at + self.0.len()..]);
        Some(out)
    }
}

impl Default for MarkerInfix {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for MarkerInfix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
