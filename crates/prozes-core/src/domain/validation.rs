use std::collections::HashSet;

use crate::domain::{
    entities::{RelativePath, TemplateDescriptor, TemplateName},
    error::DomainError,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across services.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_template_name(name: &str) -> Result<TemplateName, DomainError> {
        TemplateName::try_new(name)
    }

    /// A loaded descriptor must describe the directory it was loaded from.
    pub fn validate_descriptor(
        descriptor: &TemplateDescriptor,
        dir_name: &str,
    ) -> Result<(), DomainError> {
        if descriptor.metadata.name.as_str() != dir_name {
            return Err(DomainError::InvalidMetadata(format!(
                "record names '{}' but lives in directory '{}'",
                descriptor.metadata.name, dir_name
            )));
        }
        Ok(())
    }

    /// Destination paths planned for one instantiation must be distinct.
    pub fn validate_unique_paths<'a, I>(paths: I) -> Result<(), DomainError>
    where
        I: IntoIterator<Item = &'a RelativePath>,
    {
        let mut seen = HashSet::new();
        for path in paths {
            if !seen.insert(path) {
                return Err(DomainError::DuplicatePath {
                    path: path.to_string(),
                });
            }
        }
        Ok(())
    }
}
