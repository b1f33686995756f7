//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// A template with this name is already in the store.
    #[error("Template '{name}' already exists")]
    TemplateExists { name: String },

    /// No template with this name in the store.
    #[error("Template '{name}' not found")]
    TemplateNotFound { name: String },

    /// Capture source is missing or is not a directory.
    #[error("Source directory not found: {}", .path.display())]
    SourceNotFound { path: PathBuf },

    /// Instantiation target is a file or a non-empty directory.
    #[error("Destination already exists and is not empty: {}", .path.display())]
    DestinationExists { path: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {}: {reason}", .path.display())]
    FilesystemError { path: PathBuf, reason: String },

    /// A stored template could not be loaded.
    #[error("Template '{name}' is corrupt: {reason}")]
    CorruptTemplate { name: String, reason: String },

    /// Instantiation failed after writing started.
    #[error(
        "Project at {} is incomplete after {files_written} file(s): {reason} ({})",
        .destination.display(),
        rollback_note(.rolled_back)
    )]
    IncompleteInstantiation {
        destination: PathBuf,
        files_written: usize,
        rolled_back: bool,
        reason: String,
    },

    /// Interactive prompt could not be completed.
    #[error("Prompt for '{variable}' failed: {reason}")]
    PromptFailed { variable: String, reason: String },

    /// Validation failed (application-level, not domain).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

fn rollback_note(rolled_back: &bool) -> &'static str {
    if *rolled_back {
        "partial output removed"
    } else {
        "partial output left in place"
    }
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateExists { name } => vec![
                format!("A template named '{}' is already saved", name),
                "Use --force to replace it".into(),
                "Or choose a different template name".into(),
            ],
            Self::TemplateNotFound { .. } => vec![
                "Try: prozes template list to see saved templates".into(),
                "Template names are case-sensitive".into(),
            ],
            Self::SourceNotFound { path } => vec![
                format!("'{}' does not exist or is not a directory", path.display()),
                "Pass the directory of the project you want to capture".into(),
            ],
            Self::DestinationExists { path } => vec![
                format!("'{}' already contains files", path.display()),
                "Choose a new directory or an empty one".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have read and write permissions".into(),
                "Ensure there is enough disk space".into(),
            ],
            Self::CorruptTemplate { name, .. } => vec![
                format!("Delete it with: prozes template delete {} --yes", name),
                "Then save it again from its source".into(),
            ],
            Self::IncompleteInstantiation {
                destination,
                rolled_back,
                ..
            } => {
                let mut hints = vec!["Fix the underlying error and run the command again".into()];
                if !rolled_back {
                    hints.push(format!(
                        "Remove '{}' before retrying",
                        destination.display()
                    ));
                }
                hints
            }
            Self::PromptFailed { .. } => vec![
                "Run without --interactive and pass values with --var KEY=VALUE".into(),
            ],
            Self::ValidationFailed(_) => vec!["Check the command arguments".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateExists { .. } | Self::DestinationExists { .. } => {
                ErrorCategory::Conflict
            }
            Self::TemplateNotFound { .. } | Self::SourceNotFound { .. } => ErrorCategory::NotFound,
            Self::ValidationFailed(_) | Self::PromptFailed { .. } => ErrorCategory::Validation,
            Self::FilesystemError { .. }
            | Self::CorruptTemplate { .. }
            | Self::IncompleteInstantiation { .. } => ErrorCategory::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_instantiation_message_mentions_progress() {
        let err = ApplicationError::IncompleteInstantiation {
            destination: PathBuf::from("/tmp/foo"),
            files_written: 3,
            rolled_back: true,
            reason: "disk full".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("3 file(s)"));
        assert!(msg.contains("partial output removed"));
        assert_eq!(err.category(), ErrorCategory::Internal);
    }

    #[test]
    fn lookup_failures_are_not_found() {
        let err = ApplicationError::TemplateNotFound { name: "x".into() };
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(!err.suggestions().is_empty());
    }
}
