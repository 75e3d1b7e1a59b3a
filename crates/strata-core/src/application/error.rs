//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not business
//! logic. Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The coordinate does not exist in its source.
    #[error("Template not found: {coordinate}")]
    TemplateNotFound { coordinate: String },

    /// Probe, listing or download of a remote coordinate failed.
    #[error("Failed to fetch {coordinate}: {reason}")]
    Fetch { coordinate: String, reason: String },

    /// A remote coordinate was requested but no remote source is configured.
    #[error("No remote template source configured")]
    RemoteNotConfigured,

    /// One marked file could not be rendered.
    #[error("Failed to render {path}: {reason}")]
    Render { path: PathBuf, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Resolver cache lock poisoned.
    #[error("Template cache lock poisoned")]
    StoreLockError,
}

impl ApplicationError {
    /// `true` for the error optional layers are allowed to swallow.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TemplateNotFound { .. })
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateNotFound { coordinate } => vec![
                format!("Nothing exists at {}", coordinate),
                "Try: strata list to see available languages, kinds and templates".into(),
            ],
            Self::Fetch { reason, .. } => vec![
                format!("Remote request failed: {}", reason),
                "Check your network connection and the [remote] config section".into(),
                "Set the token environment variable if you are rate limited".into(),
            ],
            Self::RemoteNotConfigured => vec![
                "Add a [remote] section with owner and repo to your config".into(),
                "Or drop --remote to use local templates".into(),
            ],
            Self::Render { path, .. } => vec![
                format!("Check the template file behind {}", path.display()),
                "Blocks opened with {{#key}} or {{^key}} must be closed with {{/key}}".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::StoreLockError => vec![
                "The template cache is in an inconsistent state".into(),
                "Run the command again".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::Fetch { .. } => ErrorCategory::Network,
            Self::RemoteNotConfigured => ErrorCategory::Configuration,
            Self::Render { .. } => ErrorCategory::Template,
            Self::FilesystemError { .. } | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
