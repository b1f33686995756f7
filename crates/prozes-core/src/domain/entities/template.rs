// ============================================================================
// domain/entities/template.rs
// ============================================================================

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::common::TreeEntry;
use crate::domain::error::DomainError;
use crate::domain::variables::VariableSet;

/// Name of the metadata record inside every template directory.
pub const METADATA_FILE: &str = "template.json";

/// Current `template.json` format version.
pub const FORMAT_VERSION: &str = "1.0";

const MAX_TEMPLATE_NAME_LEN: usize = 64;

/// Whether a walked entry is the root-level metadata record.
///
/// The record is never part of a template's payload.
pub fn is_metadata_record(entry: &TreeEntry) -> bool {
    entry.is_file() && entry.path.depth() == 1 && entry.path.file_name() == Some(METADATA_FILE)
}

// ============================================================================
// TemplateName
// ============================================================================

/// Validated template name: `^[A-Za-z_][A-Za-z0-9_-]*$`, at most 64 chars.
///
/// A valid name is always a single safe path component, so it can be used
/// directly as the template's directory name inside the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateName(String);

impl TemplateName {
    pub fn try_new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let invalid = |reason: &str| DomainError::InvalidTemplateName {
            name: name.clone(),
            reason: reason.to_string(),
        };

        let mut chars = name.chars();
        match chars.next() {
            None => return Err(invalid("name cannot be empty")),
            Some(first) if !(first.is_ascii_alphabetic() || first == '_') => {
                return Err(invalid("must start with a letter or '_'"));
            }
            Some(_) => {}
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(invalid("only letters, digits, '-' and '_' are allowed"));
        }
        if name.len() > MAX_TEMPLATE_NAME_LEN {
            return Err(invalid("name is longer than 64 characters"));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TemplateName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_new(s)
    }
}

impl AsRef<str> for TemplateName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for TemplateName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TemplateName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::try_new(raw).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// ProjectName
// ============================================================================

/// Name of a generated project, taken from the destination's last component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectName(String);

impl ProjectName {
    pub fn try_new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let invalid = |reason: &str| DomainError::InvalidProjectName {
            name: name.clone(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        if name.starts_with('.') {
            return Err(invalid("name cannot start with '.'"));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(invalid("only letters, digits, '.', '-' and '_' are allowed"));
        }

        Ok(Self(name))
    }

    /// Derive the project name from a destination path.
    pub fn from_destination(destination: &std::path::Path) -> Result<Self, DomainError> {
        let last = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::try_new(last)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// TemplateMetadata
// ============================================================================

/// The `template.json` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateMetadata {
    #[serde(default = "default_format_version")]
    pub format_version: String,
    pub name: TemplateName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub variables: VariableSet,
    #[serde(with = "rfc3339")]
    pub created_at: DateTime<Utc>,
}

fn default_format_version() -> String {
    FORMAT_VERSION.to_string()
}

impl TemplateMetadata {
    pub fn new(name: TemplateName, created_at: DateTime<Utc>) -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            name,
            description: None,
            author: None,
            version: None,
            variables: VariableSet::new(),
            created_at,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = non_blank(description);
        self
    }

    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = non_blank(author);
        self
    }

    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = non_blank(version);
        self
    }

    pub fn with_variables(mut self, variables: VariableSet) -> Self {
        self.variables = variables;
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// `created_at` is written as RFC 3339 with second precision and a `Z` suffix.
mod rfc3339 {
    use super::*;

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Descriptors and Drafts
// ============================================================================

/// A stored template: its metadata plus the directory that holds its tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateDescriptor {
    pub metadata: TemplateMetadata,
    pub root: PathBuf,
}

impl TemplateDescriptor {
    pub fn name(&self) -> &TemplateName {
        &self.metadata.name
    }

    pub fn variables(&self) -> &VariableSet {
        &self.metadata.variables
    }
}

/// A template about to be persisted: metadata plus the filtered source entries.
///
/// Entry paths are relative to `source_root`; the store copies exactly these
/// entries, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDraft {
    pub metadata: TemplateMetadata,
    pub source_root: PathBuf,
    pub entries: Vec<TreeEntry>,
}

impl TemplateDraft {
    pub fn file_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_file()).count()
    }
}
