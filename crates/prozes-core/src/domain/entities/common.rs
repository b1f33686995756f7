use super::DomainError;
use std::fmt;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// A filesystem path guaranteed to be relative and contained.
///
/// Invariant: never absolute, never contains `..`, `.` or a prefix component.
/// Enforced at construction, so joining it onto a root can never escape
/// that root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// Fallible constructor.
    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        if path.is_absolute() || path.has_root() {
            return Err(DomainError::AbsolutePathNotAllowed {
                path: path.display().to_string(),
            });
        }
        if path.as_os_str().is_empty() {
            return Err(DomainError::UnsafePath {
                path: String::new(),
                reason: "path is empty".into(),
            });
        }
        for component in path.components() {
            match component {
                Component::Normal(_) => {}
                Component::ParentDir => {
                    return Err(DomainError::UnsafePath {
                        path: path.display().to_string(),
                        reason: "parent directory components are not allowed".into(),
                    });
                }
                _ => {
                    return Err(DomainError::UnsafePath {
                        path: path.display().to_string(),
                        reason: "only plain path components are allowed".into(),
                    });
                }
            }
        }
        Ok(Self(path))
    }

    /// Build a path from already-validated components.
    pub fn from_components<I, S>(components: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut path = PathBuf::new();
        for component in components {
            let component = component.as_ref();
            validate_component(component)?;
            path.push(component);
        }
        Self::try_new(path)
    }

    /// Path components exactly as they are named on disk.
    pub fn components(&self) -> impl Iterator<Item = &OsStr> {
        self.0.components().map(|c| c.as_os_str())
    }

    /// Number of components; `src/main.rs` has depth 2.
    pub fn depth(&self) -> usize {
        self.0.components().count()
    }

    /// First component (the top-level entry this path lives under).
    pub fn first_component(&self) -> PathBuf {
        self.components().next().map(PathBuf::from).unwrap_or_default()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name().and_then(|n| n.to_str())
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Forward-slash rendering, stable across platforms. Lossy; for display only.
    pub fn to_slash_string(&self) -> String {
        self.components()
            .map(OsStr::to_string_lossy)
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Check that one substituted path component is still a single, plain name.
///
/// Works on raw names, so components that are not valid UTF-8 pass unchanged.
pub fn validate_component(component: impl AsRef<OsStr>) -> Result<(), DomainError> {
    let component = component.as_ref();
    let bytes = component.as_encoded_bytes();
    let reason = if bytes.is_empty() {
        Some("component is empty")
    } else if bytes == b"." || bytes == b".." {
        Some("relative directory markers are not allowed")
    } else if bytes.contains(&b'/') || bytes.contains(&b'\\') {
        Some("component contains a path separator")
    } else if bytes.contains(&0) {
        Some("component contains a NUL byte")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(DomainError::UnsafePath {
            path: component.to_string_lossy().into_owned(),
            reason: reason.into(),
        }),
        None => Ok(()),
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_slash_string())
    }
}

/// What a walked tree entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    /// Never followed; reported so callers can skip it visibly.
    Symlink,
}

/// One entry of a walked directory tree, relative to the walk root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub path: RelativePath,
    pub kind: EntryKind,
    /// Unix executable bit; always `false` on platforms without one.
    pub executable: bool,
    /// Size in bytes (0 for directories).
    pub size: u64,
}

impl TreeEntry {
    pub fn file(path: RelativePath, size: u64) -> Self {
        Self {
            path,
            kind: EntryKind::File,
            executable: false,
            size,
        }
    }

    pub fn directory(path: RelativePath) -> Self {
        Self {
            path,
            kind: EntryKind::Directory,
            executable: false,
            size: 0,
        }
    }

    pub fn symlink(path: RelativePath) -> Self {
        Self {
            path,
            kind: EntryKind::Symlink,
            executable: false,
            size: 0,
        }
    }

    pub fn executable(mut self, executable: bool) -> Self {
        self.executable = executable;
        self
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::Symlink
    }
}
