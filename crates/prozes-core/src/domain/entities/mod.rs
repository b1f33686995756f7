pub mod common;
pub mod template;

pub use crate::domain::DomainError;
pub use common::{EntryKind, RelativePath, TreeEntry};
pub use template::{
    ProjectName, TemplateDescriptor, TemplateDraft, TemplateMetadata, TemplateName,
};
