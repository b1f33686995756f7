// ============================================================================
// domain/error.rs - VALIDATION ERROR DOMAIN
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel inside reports and retries)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
///
/// Every variant is raised before the engine touches the filesystem.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Naming Errors
    // ========================================================================
    #[error("Invalid template name '{name}': {reason}")]
    InvalidTemplateName { name: String, reason: String },

    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("Invalid variable name '{name}': {reason}")]
    InvalidVariableName { name: String, reason: String },

    #[error("Invalid variable assignment '{input}': {reason}")]
    InvalidVariableAssignment { input: String, reason: String },

    // ========================================================================
    // Path Safety Errors
    // ========================================================================
    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Unsafe path '{path}': {reason}")]
    UnsafePath { path: String, reason: String },

    #[error("Duplicate path in generated project: {path}")]
    DuplicatePath { path: String },

    // ========================================================================
    // Metadata Errors
    // ========================================================================
    #[error("Invalid template metadata: {0}")]
    InvalidMetadata(String),

    #[error("Invalid exclusion pattern '{pattern}': {reason}")]
    InvalidExcludePattern { pattern: String, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidTemplateName { name, .. } => vec![
                format!("'{}' cannot be used as a template name", name),
                "Start with a letter or underscore".into(),
                "Use only letters, digits, '-' and '_'".into(),
                "Examples: flask-api, my_cli, service2".into(),
            ],
            Self::InvalidProjectName { name, .. } => vec![
                format!("'{}' cannot be used as a project name", name),
                "Use alphanumeric characters, '.', '-' and '_'".into(),
                "Do not start the name with '.'".into(),
            ],
            Self::InvalidVariableName { .. } => vec![
                "Variable names look like identifiers: project_name, db_port".into(),
            ],
            Self::InvalidVariableAssignment { .. } => vec![
                "Pass variables as KEY=VALUE, e.g. --var author=Ada".into(),
                "Repeat --var for each variable".into(),
            ],
            Self::UnsafePath { .. } | Self::AbsolutePathNotAllowed { .. } => vec![
                "A variable value would escape the destination directory".into(),
                "Values used in file or directory names cannot contain '/', '\\' or '..'".into(),
            ],
            Self::DuplicatePath { path } => vec![
                format!("Two template files resolve to '{}'", path),
                "Supply different values for the variables used in file names".into(),
            ],
            Self::InvalidMetadata(_) => vec![
                "The template's template.json is damaged".into(),
                "Re-save the template with: prozes template save <source> <name> --force".into(),
            ],
            Self::InvalidExcludePattern { .. } => vec![
                "Patterns are a plain name, '*suffix' or 'prefix*'".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidMetadata(_) => ErrorCategory::Internal,
            _ => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Internal,
}
