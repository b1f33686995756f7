//! Which entries a capture walk leaves out.

use std::path::{Path, PathBuf};

use super::error::DomainError;

/// Staging and trash entries the template store keeps next to templates.
pub const STORE_CONTROL_PATTERNS: &[&str] = &[".staging-*", ".trash-*"];

/// Directory names never captured into a template.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "__pycache__",
    "venv",
    ".venv",
    "env",
    "node_modules",
    ".pytest_cache",
    ".mypy_cache",
    ".tox",
    ".idea",
    ".vscode",
    "dist",
    "build",
    "*.egg-info",
];

/// A single-segment name pattern: `exact`, `*suffix` or `prefix*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamePattern {
    Exact(String),
    Suffix(String),
    Prefix(String),
}

impl NamePattern {
    pub fn parse(pattern: &str) -> Result<Self, DomainError> {
        let invalid = |reason: &str| DomainError::InvalidExcludePattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = pattern.trim();
        if trimmed.is_empty() || trimmed == "*" {
            return Err(invalid("pattern must name something"));
        }
        if trimmed.contains('/') || trimmed.contains('\\') {
            return Err(invalid("patterns match a single name, not a path"));
        }

        let stars = trimmed.matches('*').count();
        match (stars, trimmed.strip_prefix('*'), trimmed.strip_suffix('*')) {
            (0, _, _) => Ok(Self::Exact(trimmed.to_string())),
            (1, Some(suffix), _) => Ok(Self::Suffix(suffix.to_string())),
            (1, None, Some(prefix)) => Ok(Self::Prefix(prefix.to_string())),
            _ => Err(invalid("'*' is only supported at the start or the end")),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Exact(exact) => name == exact,
            Self::Suffix(suffix) => name.ends_with(suffix.as_str()),
            Self::Prefix(prefix) => name.starts_with(prefix.as_str()),
        }
    }
}

/// Exclusion rules applied while walking a source tree.
#[derive(Debug, Clone, Default)]
pub struct ExclusionRules {
    /// Matched against directory names only.
    dir_patterns: Vec<NamePattern>,
    /// Matched against both file and directory names.
    name_patterns: Vec<NamePattern>,
    /// Absolute roots that are skipped wholesale (e.g. the store itself).
    excluded_roots: Vec<PathBuf>,
}

impl ExclusionRules {
    /// Rules with the default directory list.
    pub fn with_defaults() -> Self {
        let dir_patterns = DEFAULT_EXCLUDED_DIRS
            .iter()
            .filter_map(|p| NamePattern::parse(p).ok())
            .collect();

        Self {
            dir_patterns,
            ..Self::default()
        }
    }

    /// Add user patterns that apply to files and directories alike.
    pub fn with_patterns<I, S>(mut self, patterns: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            self.name_patterns.push(NamePattern::parse(pattern.as_ref())?);
        }
        Ok(self)
    }

    /// Skip everything under `root`.
    pub fn exclude_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.excluded_roots.push(root.into());
        self
    }

    pub fn excludes_dir(&self, name: &str) -> bool {
        self.dir_patterns.iter().any(|p| p.matches(name)) || self.excludes_name(name)
    }

    pub fn excludes_file(&self, name: &str) -> bool {
        self.excludes_name(name)
    }

    /// Whether an absolute path lies inside an excluded root.
    pub fn excludes_path(&self, path: &Path) -> bool {
        self.excluded_roots.iter().any(|root| path.starts_with(root))
    }

    fn excludes_name(&self, name: &str) -> bool {
        self.name_patterns.iter().any(|p| p.matches(name))
    }
}
