//! Local filesystem adapter using std::fs and walkdir.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::trace;
use walkdir::{DirEntry, WalkDir};

use prozes_core::{
    application::{ApplicationError, ports::Filesystem},
    domain::{ExclusionRules, RelativePath, TreeEntry},
    error::{ProzesError, ProzesResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> ProzesResult<()> {
        fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> ProzesResult<()> {
        fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn read_file(&self, path: &Path) -> ProzesResult<Vec<u8>> {
        fs::read(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_empty_dir(&self, path: &Path) -> ProzesResult<bool> {
        let mut entries = fs::read_dir(path).map_err(|e| map_io_error(path, e, "read directory"))?;
        Ok(entries.next().is_none())
    }

    fn canonicalize(&self, path: &Path) -> ProzesResult<PathBuf> {
        fs::canonicalize(path).map_err(|e| map_io_error(path, e, "resolve path"))
    }

    fn walk(&self, root: &Path, rules: &ExclusionRules) -> ProzesResult<Vec<TreeEntry>> {
        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_excluded(entry, rules));

        let mut entries = Vec::new();
        for item in walker {
            let entry = item.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                let reason = format!("Failed to walk directory: {}", e);
                ProzesError::from(ApplicationError::FilesystemError { path, reason })
            })?;

            let relative = entry.path().strip_prefix(root).map_err(|_| {
                ProzesError::Internal {
                    message: format!("walked path {} escaped its root", entry.path().display()),
                }
            })?;
            let relative = RelativePath::try_new(relative)?;

            let file_type = entry.file_type();
            let tree_entry = if file_type.is_symlink() {
                TreeEntry::symlink(relative)
            } else if file_type.is_dir() {
                TreeEntry::directory(relative)
            } else {
                let metadata = entry
                    .metadata()
                    .map_err(|e| map_walk_error(entry.path(), e))?;
                TreeEntry::file(relative, metadata.len()).executable(is_executable(&metadata))
            };

            trace!(path = %tree_entry.path, kind = ?tree_entry.kind, "walked");
            entries.push(tree_entry);
        }

        Ok(entries)
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> ProzesResult<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata = fs::metadata(path).map_err(|e| map_io_error(path, e, "get metadata"))?;
            let mut perms = metadata.permissions();
            let mode = perms.mode();
            perms.set_mode(if executable { mode | 0o111 } else { mode & !0o111 });
            fs::set_permissions(path, perms)
                .map_err(|e| map_io_error(path, e, "set permissions"))?;
        }
        #[cfg(not(unix))]
        {
            // No executable bit on this platform
            let _ = (path, executable);
        }
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> ProzesResult<()> {
        fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn remove_dir_all(&self, path: &Path) -> ProzesResult<()> {
        fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }
}

fn is_excluded(entry: &DirEntry, rules: &ExclusionRules) -> bool {
    if rules.excludes_path(entry.path()) {
        return true;
    }
    let name = entry.file_name().to_string_lossy();
    if entry.file_type().is_dir() {
        rules.excludes_dir(&name)
    } else {
        rules.excludes_file(&name)
    }
}

#[cfg(unix)]
fn is_executable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &fs::Metadata) -> bool {
    false
}

fn map_walk_error(path: &Path, e: walkdir::Error) -> ProzesError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to read metadata: {}", e),
    }
    .into()
}

pub(crate) fn map_io_error(path: &Path, e: io::Error, operation: &str) -> ProzesError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn paths(entries: &[TreeEntry]) -> Vec<String> {
        entries.iter().map(|e| e.path.to_string()).collect()
    }

    #[test]
    fn walk_is_sorted_and_relative() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/b.py"), "b").unwrap();
        fs::write(root.join("src/a.py"), "a").unwrap();
        fs::write(root.join("README.md"), "r").unwrap();

        let entries = LocalFilesystem::new()
            .walk(root, &ExclusionRules::default())
            .unwrap();
        assert_eq!(paths(&entries), vec!["README.md", "src", "src/a.py", "src/b.py"]);
        assert!(entries[1].is_dir());
        assert_eq!(entries[0].size, 1);
    }

    #[test]
    fn walk_prunes_excluded_directories() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join(".git/objects")).unwrap();
        fs::write(root.join(".git/HEAD"), "ref").unwrap();
        fs::create_dir_all(root.join("pkg.egg-info")).unwrap();
        fs::write(root.join("main.py"), "").unwrap();
        fs::write(root.join("debug.log"), "").unwrap();

        let rules = ExclusionRules::with_defaults()
            .with_patterns(["*.log"])
            .unwrap();
        let entries = LocalFilesystem::new().walk(root, &rules).unwrap();
        assert_eq!(paths(&entries), vec!["main.py"]);
    }

    #[test]
    fn walk_skips_excluded_roots() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("store/t1")).unwrap();
        fs::write(root.join("store/t1/x"), "").unwrap();
        fs::write(root.join("keep.txt"), "").unwrap();

        let rules = ExclusionRules::default().exclude_root(root.join("store"));
        let entries = LocalFilesystem::new().walk(&root, &rules).unwrap();
        assert_eq!(paths(&entries), vec!["keep.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn walk_reports_symlinks_and_executables() {
        use std::os::unix::fs::{PermissionsExt, symlink};

        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("run.sh"), "#!/bin/sh\n").unwrap();
        fs::set_permissions(root.join("run.sh"), fs::Permissions::from_mode(0o755)).unwrap();
        symlink(root.join("run.sh"), root.join("link")).unwrap();

        let entries = LocalFilesystem::new()
            .walk(root, &ExclusionRules::default())
            .unwrap();
        assert_eq!(paths(&entries), vec!["link", "run.sh"]);
        assert!(entries[0].is_symlink());
        assert!(entries[1].executable);
    }

    #[test]
    fn empty_dir_detection() {
        let temp = TempDir::new().unwrap();
        let fs_adapter = LocalFilesystem::new();
        assert!(fs_adapter.is_empty_dir(temp.path()).unwrap());

        fs::write(temp.path().join("f"), "").unwrap();
        assert!(!fs_adapter.is_empty_dir(temp.path()).unwrap());
    }

    #[test]
    fn io_errors_carry_the_path() {
        let err = LocalFilesystem::new()
            .read_file(Path::new("/definitely/not/here.txt"))
            .unwrap_err();
        assert!(matches!(
            err,
            ProzesError::Application(ApplicationError::FilesystemError { ref path, .. })
                if path == Path::new("/definitely/not/here.txt")
        ));
    }
}
