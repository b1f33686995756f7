// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Prozes.
//!
//! This module contains pure template-engine logic with no I/O. Reading and
//! writing trees, storing templates and prompting users are handled via ports
//! (traits) defined in the application layer.
//!
//! - **Names**: `TemplateName`, `ProjectName`, `RelativePath`
//! - **Metadata**: `TemplateMetadata` (the `template.json` record)
//! - **Variables**: placeholder scanning, substitution, `VariableSet`
//! - **Content**: text/binary classification
//! - **Exclusion**: which entries a capture walk skips
//! - **Resolution**: variable precedence and built-in values
//!
pub mod content;
pub mod entities;
pub mod error;
pub mod exclusion;
pub mod resolution;
pub mod variables;

mod validation;

// Re-exports for convenience
pub use entities::{
    EntryKind, ProjectName, RelativePath, TemplateDescriptor, TemplateDraft, TemplateMetadata,
    TemplateName, TreeEntry,
    common::validate_component,
    template::{FORMAT_VERSION, METADATA_FILE, is_metadata_record},
};

pub use content::{Content, LARGE_FILE_WARN_BYTES};
pub use error::{DomainError, ErrorCategory};
pub use exclusion::{DEFAULT_EXCLUDED_DIRS, ExclusionRules, NamePattern, STORE_CONTROL_PATTERNS};
pub use resolution::{
    BuiltinVariables, Decision, Resolution, ResolvedVariable, VariableSource, decide,
};
pub use validation::DomainValidator;
pub use variables::{VariableSet, detect, parse_assignment, substitute};

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Cross-module behaviour
    // ========================================================================

    #[test]
    fn declared_set_drives_substitution() {
        let declared = detect("name = \"{{project_name}}\"\nowner = \"{{author}}\"");
        assert_eq!(declared.as_slice(), &["project_name", "author"]);

        let builtins = BuiltinVariables::new(
            &ProjectName::try_new("foo").unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        );
        let decisions = declared.iter().map(|name| {
            (
                name.to_string(),
                decide(
                    name,
                    &Default::default(),
                    &builtins,
                    &Default::default(),
                    false,
                ),
            )
        });
        let resolution = Resolution::collect(&declared, decisions, &Default::default());

        let out = resolution.render_text("NAME = \"{{project_name}}\" by {{author}}", &declared);
        assert_eq!(out, "NAME = \"foo\" by {{author}}");
        assert_eq!(resolution.unresolved, vec!["author".to_string()]);
    }

    #[test]
    fn relative_path_rejects_escape() {
        assert!(RelativePath::try_new("../x").is_err());
        assert!(RelativePath::try_new("/etc/passwd").is_err());
        assert!(RelativePath::try_new("a/./b").is_ok());
        assert!(RelativePath::try_new("a/b/c.txt").is_ok());
    }

    #[test]
    fn component_validation() {
        assert!(validate_component("src").is_ok());
        assert!(validate_component("..").is_err());
        assert!(validate_component("a\\b").is_err());
    }
}
