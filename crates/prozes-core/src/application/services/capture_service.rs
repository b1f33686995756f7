//! Capture Service - turns a project directory into a stored template.
//!
//! Workflow:
//! 1. Validate the name and the source directory
//! 2. Walk the source, skipping excluded directories and the store itself
//!    (or, for a source inside the store, the store's staging and trash entries)
//! 3. Classify files and detect placeholders (paths before contents)
//! 4. Hand the filtered tree to the store, which stages and commits it

use chrono::Utc;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateStore},
    },
    domain::{
        Content, DomainValidator as validator, EntryKind, ExclusionRules, LARGE_FILE_WARN_BYTES,
        STORE_CONTROL_PATTERNS, TemplateDescriptor, TemplateDraft, TemplateMetadata, TreeEntry,
        VariableSet, is_metadata_record, variables,
    },
    error::ProzesResult,
};

/// Input of a capture.
#[derive(Debug, Clone, Default)]
pub struct CaptureRequest {
    pub source: PathBuf,
    pub name: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub version: Option<String>,
    /// Replace an existing template with the same name.
    pub overwrite: bool,
    /// When false the template declares no variables.
    pub detect_variables: bool,
    /// Extra name patterns excluded for files and directories.
    pub exclude: Vec<String>,
}

/// Why an entry of the source tree was not captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    Symlink,
    ReservedName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedPath {
    pub path: String,
    pub reason: SkipReason,
}

/// Result of a successful capture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptureReport {
    pub template: TemplateDescriptor,
    pub files: usize,
    pub directories: usize,
    pub text_files: usize,
    pub binary_files: usize,
    pub skipped: Vec<SkippedPath>,
    /// Files above the large-file threshold (captured anyway).
    pub large_files: Vec<String>,
    pub replaced: bool,
}

/// Capture (`save`) use case.
pub struct CaptureService {
    store: Box<dyn TemplateStore>,
    filesystem: Box<dyn Filesystem>,
}

impl CaptureService {
    pub fn new(store: Box<dyn TemplateStore>, filesystem: Box<dyn Filesystem>) -> Self {
        Self { store, filesystem }
    }

    /// Capture `request.source` as template `request.name`.
    ///
    /// Nothing is written to the store unless every file could be read.
    #[instrument(
        skip_all,
        fields(
            template = %request.name,
            source = %request.source.display()
        )
    )]
    pub fn capture(&self, request: CaptureRequest) -> ProzesResult<CaptureReport> {
        let name = validator::validate_template_name(&request.name)?;

        if !self.filesystem.is_dir(&request.source) {
            return Err(ApplicationError::SourceNotFound {
                path: request.source.clone(),
            }
            .into());
        }
        let source = self.filesystem.canonicalize(&request.source)?;

        let existed = self.store.exists(&name);
        if existed && !request.overwrite {
            return Err(ApplicationError::TemplateExists {
                name: name.to_string(),
            }
            .into());
        }

        let store_root = self.store.root();
        let rules = ExclusionRules::with_defaults().with_patterns(&request.exclude)?;
        let rules = if source.starts_with(&store_root) {
            debug!(source = %source.display(), "Source lives inside the template store");
            rules.with_patterns(STORE_CONTROL_PATTERNS)?
        } else {
            rules.exclude_root(store_root)
        };

        let walked = self.filesystem.walk(&source, &rules)?;
        info!(entries = walked.len(), "Source tree walked");

        let mut tally = Tally::default();
        let mut kept = Vec::with_capacity(walked.len());

        for entry in walked {
            if let Some(reason) = skip_reason(&entry) {
                debug!(path = %entry.path, ?reason, "Skipping entry");
                tally.skipped.push(SkippedPath {
                    path: entry.path.to_string(),
                    reason,
                });
                continue;
            }

            if request.detect_variables {
                for component in entry.path.components().filter_map(|c| c.to_str()) {
                    variables::detect_into(component, &mut tally.variables);
                }
            }

            match entry.kind {
                EntryKind::Directory => tally.directories += 1,
                EntryKind::File => self.inspect_file(&source, &entry, &request, &mut tally)?,
                EntryKind::Symlink => {}
            }

            kept.push(entry);
        }

        let metadata = TemplateMetadata::new(name, Utc::now())
            .with_description(request.description)
            .with_author(request.author)
            .with_version(request.version)
            .with_variables(tally.variables);

        let draft = TemplateDraft {
            metadata,
            source_root: source,
            entries: kept,
        };
        let files = draft.file_count();

        let template = self.store.create(&draft, request.overwrite)?;

        info!(
            files,
            variables = template.variables().len(),
            replaced = existed,
            "Template captured"
        );

        Ok(CaptureReport {
            template,
            files,
            directories: tally.directories,
            text_files: tally.text_files,
            binary_files: tally.binary_files,
            skipped: tally.skipped,
            large_files: tally.large_files,
            replaced: existed,
        })
    }

    /// Classify one file and scan it for placeholders.
    fn inspect_file(
        &self,
        source: &Path,
        entry: &TreeEntry,
        request: &CaptureRequest,
        tally: &mut Tally,
    ) -> ProzesResult<()> {
        if entry.size > LARGE_FILE_WARN_BYTES {
            warn!(
                path = %entry.path,
                size = entry.size,
                "Large file captured into template"
            );
            tally.large_files.push(entry.path.to_string());
        }

        let bytes = self.filesystem.read_file(&source.join(entry.path.as_path()))?;
        match Content::classify(entry.path.as_path(), bytes) {
            Content::Text(text) => {
                tally.text_files += 1;
                if request.detect_variables {
                    variables::detect_into(&text, &mut tally.variables);
                }
            }
            Content::Binary(_) => tally.binary_files += 1,
        }
        Ok(())
    }
}

#[derive(Default)]
struct Tally {
    variables: VariableSet,
    directories: usize,
    text_files: usize,
    binary_files: usize,
    skipped: Vec<SkippedPath>,
    large_files: Vec<String>,
}

fn skip_reason(entry: &TreeEntry) -> Option<SkipReason> {
    if entry.is_symlink() {
        Some(SkipReason::Symlink)
    } else if is_metadata_record(entry) {
        Some(SkipReason::ReservedName)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockFilesystem, MockTemplateStore};
    use crate::domain::{RelativePath, TemplateName};
    use crate::error::ProzesError;
    use mockall::predicate::*;

    fn rel(p: &str) -> RelativePath {
        RelativePath::try_new(p).unwrap()
    }

    fn request(name: &str) -> CaptureRequest {
        CaptureRequest {
            source: PathBuf::from("/src/proj"),
            name: name.into(),
            detect_variables: true,
            ..Default::default()
        }
    }

    fn source_fs(entries: Vec<TreeEntry>, files: Vec<(&'static str, &'static [u8])>) -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().return_const(true);
        fs.expect_canonicalize()
            .returning(|p| Ok(p.to_path_buf()));
        fs.expect_walk().return_once(move |_, _| Ok(entries));
        fs.expect_read_file().returning(move |path| {
            files
                .iter()
                .find(|(name, _)| path == Path::new("/src/proj").join(name))
                .map(|(_, bytes)| bytes.to_vec())
                .ok_or_else(|| {
                    ApplicationError::FilesystemError {
                        path: path.to_path_buf(),
                        reason: "missing".into(),
                    }
                    .into()
                })
        });
        fs
    }

    fn accepting_store() -> MockTemplateStore {
        let mut store = MockTemplateStore::new();
        store.expect_exists().return_const(false);
        store.expect_root().return_const(PathBuf::from("/home/u/.prozes"));
        store.expect_create().returning(|draft, _| {
            Ok(TemplateDescriptor {
                metadata: draft.metadata.clone(),
                root: PathBuf::from("/home/u/.prozes").join(draft.metadata.name.as_str()),
            })
        });
        store
    }

    #[test]
    fn invalid_name_fails_before_touching_anything() {
        let service = CaptureService::new(
            Box::new(MockTemplateStore::new()),
            Box::new(MockFilesystem::new()),
        );
        let err = service.capture(request("bad/name")).unwrap_err();
        assert!(matches!(
            err,
            ProzesError::Domain(crate::domain::DomainError::InvalidTemplateName { .. })
        ));
    }

    #[test]
    fn missing_source_is_reported() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().return_const(false);
        let service = CaptureService::new(Box::new(MockTemplateStore::new()), Box::new(fs));

        let err = service.capture(request("demo")).unwrap_err();
        assert!(matches!(
            err,
            ProzesError::Application(ApplicationError::SourceNotFound { .. })
        ));
    }

    #[test]
    fn existing_name_conflicts_without_overwrite() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().return_const(true);
        fs.expect_canonicalize().returning(|p| Ok(p.to_path_buf()));
        let mut store = MockTemplateStore::new();
        store
            .expect_exists()
            .with(eq(TemplateName::try_new("demo").unwrap()))
            .return_const(true);
        store.expect_create().never();

        let service = CaptureService::new(Box::new(store), Box::new(fs));
        let err = service.capture(request("demo")).unwrap_err();
        assert!(matches!(
            err,
            ProzesError::Application(ApplicationError::TemplateExists { .. })
        ));
    }

    #[test]
    fn detects_variables_from_paths_then_contents() {
        let entries = vec![
            TreeEntry::directory(rel("{{package}}")),
            TreeEntry::file(rel("{{package}}/app.py"), 20),
            TreeEntry::file(rel("logo.png"), 8),
            TreeEntry::file(rel("README.md"), 30),
        ];
        let files: Vec<(&'static str, &'static [u8])> = vec![
            ("{{package}}/app.py", b"NAME = \"{{project_name}}\"" as &[u8]),
            ("logo.png", b"{{ignored}}"),
            ("README.md", b"# {{project_name}} by {{author}}"),
        ];
        let service = CaptureService::new(Box::new(accepting_store()), Box::new(source_fs(entries, files)));

        let report = service.capture(request("demo")).unwrap();
        assert_eq!(
            report.template.variables().as_slice(),
            &["package", "project_name", "author"]
        );
        assert_eq!(report.files, 3);
        assert_eq!(report.directories, 1);
        assert_eq!(report.text_files, 2);
        assert_eq!(report.binary_files, 1);
    }

    #[test]
    fn no_detection_stores_empty_variable_set() {
        let entries = vec![TreeEntry::file(rel("a.txt"), 5)];
        let files: Vec<(&'static str, &'static [u8])> = vec![("a.txt", b"{{x}}" as &[u8])];
        let service = CaptureService::new(Box::new(accepting_store()), Box::new(source_fs(entries, files)));

        let mut req = request("demo");
        req.detect_variables = false;
        let report = service.capture(req).unwrap();
        assert!(report.template.variables().is_empty());
    }

    #[test]
    fn reserved_metadata_file_and_symlinks_are_skipped() {
        let entries = vec![
            TreeEntry::file(rel("template.json"), 2),
            TreeEntry::symlink(rel("link")),
            TreeEntry::file(rel("sub/template.json"), 2),
        ];
        let files: Vec<(&'static str, &'static [u8])> = vec![("sub/template.json", b"{}" as &[u8])];
        let mut store = MockTemplateStore::new();
        store.expect_exists().return_const(false);
        store.expect_root().return_const(PathBuf::from("/home/u/.prozes"));
        store.expect_create().returning(|draft, _| {
            assert_eq!(draft.entries.len(), 1);
            assert_eq!(draft.entries[0].path.to_string(), "sub/template.json");
            Ok(TemplateDescriptor {
                metadata: draft.metadata.clone(),
                root: PathBuf::from("/home/u/.prozes/demo"),
            })
        });
        let service = CaptureService::new(Box::new(store), Box::new(source_fs(entries, files)));

        let report = service.capture(request("demo")).unwrap();
        assert_eq!(
            report.skipped,
            vec![
                SkippedPath {
                    path: "template.json".into(),
                    reason: SkipReason::ReservedName
                },
                SkippedPath {
                    path: "link".into(),
                    reason: SkipReason::Symlink
                },
            ]
        );
    }

    #[test]
    fn read_failure_aborts_before_store_write() {
        let entries = vec![TreeEntry::file(rel("gone.txt"), 1)];
        let mut store = MockTemplateStore::new();
        store.expect_exists().return_const(false);
        store.expect_root().return_const(PathBuf::from("/home/u/.prozes"));
        store.expect_create().never();
        let service = CaptureService::new(Box::new(store), Box::new(source_fs(entries, vec![])));

        let err = service.capture(request("demo")).unwrap_err();
        assert!(matches!(
            err,
            ProzesError::Application(ApplicationError::FilesystemError { .. })
        ));
    }

    #[test]
    fn source_inside_store_skips_control_entries_only() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().return_const(true);
        fs.expect_canonicalize()
            .returning(|_| Ok(PathBuf::from("/home/u/.prozes/t1")));
        fs.expect_walk()
            .withf(|root, rules| {
                root == Path::new("/home/u/.prozes/t1")
                    && !rules.excludes_path(Path::new("/home/u/.prozes/t1/app.py"))
                    && rules.excludes_dir(".staging-a1b2")
                    && rules.excludes_dir(".trash-0000")
                    && !rules.excludes_file("app.py")
            })
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    TreeEntry::file(rel("app.py"), 3),
                    TreeEntry::file(rel("template.json"), 40),
                ])
            });
        fs.expect_read_file().returning(|_| Ok(b"x=1".to_vec()));
        let service = CaptureService::new(Box::new(accepting_store()), Box::new(fs));

        let report = service.capture(request("demo")).unwrap();
        assert_eq!(report.files, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].reason, SkipReason::ReservedName);
    }
}
