//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `prozes-adapters` crate provides the filesystem, store and finalizer
//! implementations; the CLI provides the prompter.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::{ExclusionRules, TemplateDescriptor, TemplateDraft, TemplateName, TreeEntry};
use crate::error::ProzesResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `prozes_adapters::filesystem::LocalFilesystem` (production)
///
/// ## Design Notes
///
/// - Content is bytes; text decoding is a domain decision
/// - `walk` never follows symlinks, it reports them as `EntryKind::Symlink`
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> ProzesResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &[u8]) -> ProzesResult<()>;

    /// Read a whole file.
    fn read_file(&self, path: &Path) -> ProzesResult<Vec<u8>>;

    /// Check if path exists (without following a final symlink).
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Check if a directory has no entries.
    fn is_empty_dir(&self, path: &Path) -> ProzesResult<bool>;

    /// Absolute, symlink-free form of an existing path.
    fn canonicalize(&self, path: &Path) -> ProzesResult<PathBuf>;

    /// List every entry below `root` (root excluded), depth-first, siblings
    /// sorted by file name, paths relative to `root`.
    ///
    /// Excluded directories are not descended into.
    fn walk(&self, root: &Path, rules: &ExclusionRules) -> ProzesResult<Vec<TreeEntry>>;

    /// Set or clear the executable bit.
    fn set_permissions(&self, path: &Path, executable: bool) -> ProzesResult<()>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> ProzesResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> ProzesResult<()>;
}

/// Port for the template catalog.
///
/// Implemented by:
/// - `prozes_adapters::template_store::FsTemplateStore` (one directory per template)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateStore: Send + Sync {
    /// Directory holding every template.
    fn root(&self) -> PathBuf;

    /// Whether a template directory with this name exists.
    fn exists(&self, name: &TemplateName) -> bool;

    /// Persist a draft. Fails with `TemplateExists` unless `overwrite` is set.
    ///
    /// Either the whole template becomes visible or nothing does.
    fn create(&self, draft: &TemplateDraft, overwrite: bool) -> ProzesResult<TemplateDescriptor>;

    /// Load a template. Fails with `TemplateNotFound` if absent.
    fn get(&self, name: &TemplateName) -> ProzesResult<TemplateDescriptor>;

    /// Loadable templates ordered by name, loaded lazily.
    fn list(&self) -> ProzesResult<Box<dyn Iterator<Item = TemplateDescriptor>>>;

    /// Remove a template. Fails with `TemplateNotFound` if absent.
    fn delete(&self, name: &TemplateName) -> ProzesResult<()>;
}

/// Port for interactive variable entry.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter {
    /// Ask for a value. An empty answer leaves the variable unresolved.
    fn prompt(&self, variable: &str) -> ProzesResult<String>;
}

/// Port for the optional steps run on a freshly generated project.
///
/// Never fails as a whole; each requested step reports its own outcome.
#[cfg_attr(test, mockall::automock)]
pub trait ProjectFinalizer: Send + Sync {
    fn finalize(&self, destination: &Path, options: &SetupOptions) -> Vec<StepOutcome>;
}

// ============================================================================
// Setup DTOs
// ============================================================================

/// Common scaffolding options passed through to the finalizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SetupOptions {
    pub venv: bool,
    pub git: bool,
    pub install_deps: bool,
}

impl SetupOptions {
    pub fn any(&self) -> bool {
        self.venv || self.git || self.install_deps
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SetupStep {
    Venv,
    Git,
    InstallDeps,
}

impl fmt::Display for SetupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Venv => "virtual environment",
            Self::Git => "git repository",
            Self::InstallDeps => "dependency installation",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub step: SetupStep,
    pub success: bool,
    pub detail: String,
}

impl StepOutcome {
    pub fn ok(step: SetupStep, detail: impl Into<String>) -> Self {
        Self {
            step,
            success: true,
            detail: detail.into(),
        }
    }

    pub fn failed(step: SetupStep, detail: impl Into<String>) -> Self {
        Self {
            step,
            success: false,
            detail: detail.into(),
        }
    }
}
