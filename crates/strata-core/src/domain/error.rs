// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (the resolver hands the same failure to every waiter)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid template coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Invalid layer plan: {0}")]
    InvalidLayerPlan(String),

    #[error("Invalid prune rule '{rule}': {reason}")]
    InvalidPruneRule { rule: String, reason: String },

    #[error("Invalid marker infix '{0}'")]
    InvalidMarker(String),

    // ========================================================================
    // Template Text Errors
    // ========================================================================
    #[error("Template syntax error on line {line}: {reason}")]
    TemplateSyntax { line: usize, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidCoordinate(msg) => vec![
                format!("Details: {}", msg),
                "Languages, kinds and templates are single directory names".into(),
                "Try: strata list to see what is available".into(),
            ],
            Self::MissingRequiredField { field } => {
                vec![format!("Provide a value for '{}'", field)]
            }
            Self::InvalidPruneRule { .. } => vec![
                "Prune rules are a file name (matched anywhere) or a path relative to the project root"
                    .into(),
                "Check the [prune] section of your config".into(),
            ],
            Self::InvalidMarker(_) => vec![
                "The marker must start and end with '.', e.g. '.marker.'".into(),
                "Check templates.marker in your config".into(),
            ],
            Self::TemplateSyntax { .. } => vec![
                "Every {{#key}} or {{^key}} block needs a matching {{/key}}".into(),
                "Fix the template file and run again".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidCoordinate(_)
            | Self::MissingRequiredField { .. }
            | Self::AbsolutePathNotAllowed { .. } => ErrorCategory::Validation,
            Self::InvalidPruneRule { .. } | Self::InvalidMarker(_) => ErrorCategory::Configuration,
            Self::TemplateSyntax { .. } => ErrorCategory::Template,
            Self::InvalidLayerPlan(_) => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Template,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_mentions_line() {
        let err = DomainError::TemplateSyntax {
            line: 7,
            reason: "block 'a' is never closed".into(),
        };
        assert_eq!(
            err.to_string(),
            "Template syntax error on line 7: block 'a' is never closed"
        );
        assert_eq!(err.category(), ErrorCategory::Template);
    }

    #[test]
    fn every_error_has_a_suggestion() {
        let errors = [
            DomainError::InvalidCoordinate("x".into()),
            DomainError::MissingRequiredField { field: "language" },
            DomainError::InvalidLayerPlan("x".into()),
            DomainError::InvalidMarker("x".into()),
        ];
        for err in errors {
            assert!(!err.suggestions().is_empty(), "{err}");
        }
    }
}
