//! Directory-backed template store.
//!
//! # Layout
//!
//! ```text
//! <root>/
//! ├── flask-api/
//! │   ├── template.json      ← metadata record
//! │   └── ...                ← captured tree, byte-for-byte
//! ├── .staging-XXXX/         ← in-progress capture (ignored by list)
//! └── .trash-<uuid>/         ← template being replaced (ignored by list)
//! ```
//!
//! A template is visible exactly when `<root>/<name>/template.json` exists.
//! Captures are staged next to their final location and renamed into place,
//! so a failed capture never leaves a half-written template behind.
//! No locking: concurrent writers against the same name may race.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use prozes_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{
        DomainValidator as validator, EntryKind, METADATA_FILE, TemplateDescriptor,
        TemplateDraft, TemplateMetadata, TemplateName,
    },
    error::{ProzesError, ProzesResult},
};

use crate::filesystem::map_io_error;

const STAGING_PREFIX: &str = ".staging-";
const TRASH_PREFIX: &str = ".trash-";

/// Template store rooted at a single per-user directory.
#[derive(Debug, Clone)]
pub struct FsTemplateStore {
    root: PathBuf,
}

impl FsTemplateStore {
    /// Open the store at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> ProzesResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| map_io_error(&root, e, "create store directory"))?;
        let root = fs::canonicalize(&root).map_err(|e| map_io_error(&root, e, "resolve store"))?;
        debug!(root = %root.display(), "Template store opened");
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    fn template_dir(&self, name: &TemplateName) -> PathBuf {
        self.root.join(name.as_str())
    }

    /// Copy the draft's entries plus a fresh metadata record into a staging
    /// directory inside the store root.
    fn stage(&self, draft: &TemplateDraft) -> ProzesResult<TempDir> {
        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&self.root)
            .map_err(|e| map_io_error(&self.root, e, "create staging directory"))?;

        for entry in &draft.entries {
            let from = draft.source_root.join(entry.path.as_path());
            let to = staging.path().join(entry.path.as_path());
            match entry.kind {
                EntryKind::Directory => {
                    fs::create_dir_all(&to).map_err(|e| map_io_error(&to, e, "create directory"))?;
                }
                EntryKind::File => {
                    if let Some(parent) = to.parent() {
                        fs::create_dir_all(parent)
                            .map_err(|e| map_io_error(parent, e, "create directory"))?;
                    }
                    fs::copy(&from, &to).map_err(|e| map_io_error(&from, e, "copy file"))?;
                }
                EntryKind::Symlink => {}
            }
        }

        let record = staging.path().join(METADATA_FILE);
        let mut json = serde_json::to_string_pretty(&draft.metadata).map_err(|e| {
            ProzesError::Internal {
                message: format!("failed to serialize template metadata: {}", e),
            }
        })?;
        json.push('\n');
        fs::write(&record, json).map_err(|e| map_io_error(&record, e, "write metadata"))?;

        Ok(staging)
    }

    /// Move the staged tree to `target`, replacing whatever is there.
    fn commit(&self, staging: TempDir, target: &Path) -> ProzesResult<()> {
        let trash = if target.exists() {
            let trash = self.root.join(format!("{}{}", TRASH_PREFIX, Uuid::new_v4()));
            fs::rename(target, &trash)
                .map_err(|e| map_io_error(target, e, "move old template aside"))?;
            Some(trash)
        } else {
            None
        };

        if let Err(e) = fs::rename(staging.path(), target) {
            if let Some(trash) = &trash {
                if let Err(restore) = fs::rename(trash, target) {
                    warn!(
                        error = %restore,
                        trash = %trash.display(),
                        "Could not restore previous template"
                    );
                }
            }
            return Err(map_io_error(target, e, "move template into place"));
        }
        // The staged directory now lives at `target`.
        let _ = staging.keep();

        if let Some(trash) = trash {
            if let Err(e) = fs::remove_dir_all(&trash) {
                warn!(error = %e, trash = %trash.display(), "Could not remove replaced template");
            }
        }
        Ok(())
    }
}

/// Read and validate `<dir>/template.json`.
fn load(dir: &Path, name: &TemplateName) -> ProzesResult<TemplateDescriptor> {
    let record = dir.join(METADATA_FILE);
    let raw = fs::read_to_string(&record).map_err(|e| map_io_error(&record, e, "read metadata"))?;

    let corrupt = |reason: String| ApplicationError::CorruptTemplate {
        name: name.to_string(),
        reason,
    };
    let metadata: TemplateMetadata =
        serde_json::from_str(&raw).map_err(|e| corrupt(format!("invalid {}: {}", METADATA_FILE, e)))?;

    let descriptor = TemplateDescriptor {
        metadata,
        root: dir.to_path_buf(),
    };
    validator::validate_descriptor(&descriptor, name.as_str())
        .map_err(|e| corrupt(e.to_string()))?;
    Ok(descriptor)
}

fn has_record(dir: &Path) -> bool {
    dir.join(METADATA_FILE).is_file()
}

impl TemplateStore for FsTemplateStore {
    fn root(&self) -> PathBuf {
        self.root.clone()
    }

    fn exists(&self, name: &TemplateName) -> bool {
        has_record(&self.template_dir(name))
    }

    #[instrument(skip_all, fields(template = %draft.metadata.name, overwrite))]
    fn create(&self, draft: &TemplateDraft, overwrite: bool) -> ProzesResult<TemplateDescriptor> {
        let name = &draft.metadata.name;
        let target = self.template_dir(name);

        if has_record(&target) && !overwrite {
            return Err(ApplicationError::TemplateExists {
                name: name.to_string(),
            }
            .into());
        }

        let staging = self.stage(draft)?;
        debug!(staging = %staging.path().display(), "Template staged");
        self.commit(staging, &target)?;

        info!(root = %target.display(), "Template stored");
        Ok(TemplateDescriptor {
            metadata: draft.metadata.clone(),
            root: target,
        })
    }

    fn get(&self, name: &TemplateName) -> ProzesResult<TemplateDescriptor> {
        let dir = self.template_dir(name);
        if !has_record(&dir) {
            return Err(ApplicationError::TemplateNotFound {
                name: name.to_string(),
            }
            .into());
        }
        load(&dir, name)
    }

    fn list(&self) -> ProzesResult<Box<dyn Iterator<Item = TemplateDescriptor>>> {
        let read_dir = match fs::read_dir(&self.root) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Box::new(std::iter::empty()));
            }
            Err(e) => return Err(map_io_error(&self.root, e, "read store directory")),
        };

        let mut names: Vec<TemplateName> = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| map_io_error(&self.root, e, "read store entry"))?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if file_name.starts_with('.') || !entry.path().is_dir() {
                continue;
            }
            match TemplateName::try_new(file_name.as_str()) {
                Ok(name) => names.push(name),
                Err(_) => debug!(entry = %file_name, "Ignoring directory with invalid template name"),
            }
        }
        names.sort();

        let root = self.root.clone();
        Ok(Box::new(names.into_iter().filter_map(move |name| {
            let dir = root.join(name.as_str());
            if !has_record(&dir) {
                debug!(dir = %dir.display(), "Skipping directory without metadata");
                return None;
            }
            match load(&dir, &name) {
                Ok(descriptor) => Some(descriptor),
                Err(e) => {
                    warn!(
                        dir = %dir.display(),
                        error = %e,
                        "Skipping template with unreadable metadata"
                    );
                    None
                }
            }
        })))
    }

    #[instrument(skip(self), fields(template = %name))]
    fn delete(&self, name: &TemplateName) -> ProzesResult<()> {
        let dir = self.template_dir(name);
        if !has_record(&dir) {
            return Err(ApplicationError::TemplateNotFound {
                name: name.to_string(),
            }
            .into());
        }

        // Metadata goes first: once it is gone the template is invisible even
        // if removing the tree fails halfway.
        let record = dir.join(METADATA_FILE);
        fs::remove_file(&record).map_err(|e| map_io_error(&record, e, "remove metadata"))?;
        fs::remove_dir_all(&dir).map_err(|e| map_io_error(&dir, e, "remove template"))?;
        Ok(())
    }
}
