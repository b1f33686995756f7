//! Catalog Service - read-only views over the store, plus deletion.
//!
//! Separated from capture and instantiation for single responsibility.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, instrument};

use crate::{
    application::ports::{Filesystem, TemplateStore},
    domain::{
        DomainValidator as validator, ExclusionRules, TemplateDescriptor, TemplateMetadata,
        is_metadata_record,
    },
    error::ProzesResult,
};

/// One row of `list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSummary {
    pub name: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub version: Option<String>,
    pub variable_count: usize,
    pub created_at: DateTime<Utc>,
}

impl From<&TemplateDescriptor> for TemplateSummary {
    fn from(descriptor: &TemplateDescriptor) -> Self {
        let meta = &descriptor.metadata;
        Self {
            name: meta.name.to_string(),
            description: meta.description.clone(),
            author: meta.author.clone(),
            version: meta.version.clone(),
            variable_count: meta.variables.len(),
            created_at: meta.created_at,
        }
    }
}

/// Everything `show` reports about one template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateDetails {
    pub metadata: TemplateMetadata,
    pub root: PathBuf,
    pub file_count: usize,
    /// Sorted, `/`-separated relative file paths; only when requested.
    pub files: Option<Vec<String>>,
}

/// Service for catalog operations.
pub struct CatalogService {
    store: Box<dyn TemplateStore>,
    filesystem: Box<dyn Filesystem>,
}

impl CatalogService {
    pub fn new(store: Box<dyn TemplateStore>, filesystem: Box<dyn Filesystem>) -> Self {
        Self { store, filesystem }
    }

    /// All loadable templates, ordered by name. An empty store is not an error.
    pub fn list(&self) -> ProzesResult<Vec<TemplateSummary>> {
        Ok(self
            .store
            .list()?
            .map(|descriptor| TemplateSummary::from(&descriptor))
            .collect())
    }

    /// Full metadata of one template, optionally with its file list.
    #[instrument(skip(self))]
    pub fn show(&self, name: &str, with_files: bool) -> ProzesResult<TemplateDetails> {
        let name = validator::validate_template_name(name)?;
        let descriptor = self.store.get(&name)?;

        let mut files: Vec<String> = self
            .filesystem
            .walk(&descriptor.root, &ExclusionRules::default())?
            .into_iter()
            .filter(|entry| entry.is_file() && !is_metadata_record(entry))
            .map(|entry| entry.path.to_string())
            .collect();
        files.sort();

        Ok(TemplateDetails {
            file_count: files.len(),
            files: with_files.then_some(files),
            metadata: descriptor.metadata,
            root: descriptor.root,
        })
    }

    /// Whether a template with this name exists (invalid names never do).
    pub fn exists(&self, name: &str) -> bool {
        validator::validate_template_name(name)
            .map(|name| self.store.exists(&name))
            .unwrap_or(false)
    }

    /// Remove a template from the store.
    #[instrument(skip(self))]
    pub fn delete(&self, name: &str) -> ProzesResult<()> {
        let name = validator::validate_template_name(name)?;
        self.store.delete(&name)?;
        info!(template = %name, "Template deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationError;
    use crate::application::ports::{MockFilesystem, MockTemplateStore};
    use crate::domain::{RelativePath, TemplateName, TreeEntry};
    use crate::error::ProzesError;

    fn descriptor(name: &str, vars: &[&str]) -> TemplateDescriptor {
        TemplateDescriptor {
            metadata: TemplateMetadata::new(TemplateName::try_new(name).unwrap(), Utc::now())
                .with_description(Some(format!("{name} template")))
                .with_variables(vars.iter().copied().collect()),
            root: PathBuf::from("/store").join(name),
        }
    }

    #[test]
    fn empty_store_lists_nothing() {
        let mut store = MockTemplateStore::new();
        store
            .expect_list()
            .returning(|| Ok(Box::new(std::iter::empty())));

        let service = CatalogService::new(Box::new(store), Box::new(MockFilesystem::new()));
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn list_summarizes_descriptors() {
        let mut store = MockTemplateStore::new();
        store.expect_list().returning(|| {
            Ok(Box::new(
                vec![descriptor("alpha", &["a", "b"]), descriptor("beta", &[])].into_iter(),
            ))
        });

        let service = CatalogService::new(Box::new(store), Box::new(MockFilesystem::new()));
        let rows = service.list().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "alpha");
        assert_eq!(rows[0].variable_count, 2);
        assert_eq!(rows[1].description.as_deref(), Some("beta template"));
    }

    #[test]
    fn show_counts_files_without_metadata_record() {
        let mut store = MockTemplateStore::new();
        store.expect_get().returning(|_| Ok(descriptor("alpha", &[])));
        let mut fs = MockFilesystem::new();
        fs.expect_walk().returning(|_, _| {
            Ok(vec![
                TreeEntry::directory(RelativePath::try_new("src").unwrap()),
                TreeEntry::file(RelativePath::try_new("src/main.py").unwrap(), 10),
                TreeEntry::file(RelativePath::try_new("template.json").unwrap(), 10),
                TreeEntry::file(RelativePath::try_new("README.md").unwrap(), 10),
            ])
        });

        let service = CatalogService::new(Box::new(store), Box::new(fs));
        let details = service.show("alpha", true).unwrap();
        assert_eq!(details.file_count, 2);
        assert_eq!(
            details.files,
            Some(vec!["README.md".to_string(), "src/main.py".to_string()])
        );

        let details = service.show("alpha", false).unwrap();
        assert!(details.files.is_none());
    }

    #[test]
    fn show_missing_template_is_not_found() {
        let mut store = MockTemplateStore::new();
        store.expect_get().returning(|name| {
            Err(ApplicationError::TemplateNotFound {
                name: name.to_string(),
            }
            .into())
        });

        let service = CatalogService::new(Box::new(store), Box::new(MockFilesystem::new()));
        assert!(matches!(
            service.show("ghost", false),
            Err(ProzesError::Application(ApplicationError::TemplateNotFound { .. }))
        ));
    }

    #[test]
    fn exists_is_false_for_invalid_names() {
        let mut store = MockTemplateStore::new();
        store.expect_exists().never();
        let service = CatalogService::new(Box::new(store), Box::new(MockFilesystem::new()));
        assert!(!service.exists("../etc"));
    }
}
