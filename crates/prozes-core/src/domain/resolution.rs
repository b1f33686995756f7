//! Variable resolution policy.
//!
//! Deciding which value a declared variable gets is a pure function of the
//! user-supplied map, the built-ins and the answers already collected. The
//! prompting itself lives behind the `Prompter` port.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use super::entities::{ProjectName, RelativePath};
use super::error::DomainError;
use super::variables::{VariableSet, substitute, to_kebab_case, to_pascal_case, to_snake_case};

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariableSource {
    User,
    BuiltIn,
    Interactive,
}

impl fmt::Display for VariableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::User => "user",
            Self::BuiltIn => "built-in",
            Self::Interactive => "interactive",
        })
    }
}

// ============================================================================
// Built-ins
// ============================================================================

/// Values every instantiation provides without being asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinVariables {
    values: Vec<(&'static str, String)>,
}

impl BuiltinVariables {
    pub const NAMES: [&'static str; 6] = [
        "project_name",
        "project_name_snake",
        "project_name_kebab",
        "project_name_pascal",
        "date",
        "year",
    ];

    pub fn new(project: &ProjectName, today: NaiveDate) -> Self {
        let name = project.as_str();
        Self {
            values: vec![
                ("project_name", name.to_string()),
                ("project_name_snake", to_snake_case(name)),
                ("project_name_kebab", to_kebab_case(name)),
                ("project_name_pascal", to_pascal_case(name)),
                ("date", today.format("%Y-%m-%d").to_string()),
                ("year", today.year().to_string()),
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

// ============================================================================
// Decisions
// ============================================================================

/// Outcome of resolving one variable with the information at hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Resolved {
        value: String,
        source: VariableSource,
    },
    /// Interactive mode is on and the user has not been asked yet.
    Ask,
    Unresolved,
}

/// Precedence: user-supplied, then built-in, then an interactive answer
/// (an empty answer counts as no answer), else unresolved.
pub fn decide(
    name: &str,
    supplied: &BTreeMap<String, String>,
    builtins: &BuiltinVariables,
    answers: &HashMap<String, String>,
    interactive: bool,
) -> Decision {
    if let Some(value) = supplied.get(name) {
        return Decision::Resolved {
            value: value.clone(),
            source: VariableSource::User,
        };
    }
    if let Some(value) = builtins.get(name) {
        return Decision::Resolved {
            value: value.to_string(),
            source: VariableSource::BuiltIn,
        };
    }
    match answers.get(name) {
        Some(answer) if !answer.is_empty() => Decision::Resolved {
            value: answer.clone(),
            source: VariableSource::Interactive,
        },
        Some(_) => Decision::Unresolved,
        None if interactive => Decision::Ask,
        None => Decision::Unresolved,
    }
}

// ============================================================================
// Resolution
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedVariable {
    pub name: String,
    pub value: String,
    pub source: VariableSource,
}

/// Final resolution of a template's declared variables for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Resolved variables in declaration order.
    pub resolved: Vec<ResolvedVariable>,
    /// Declared but left as literal placeholders.
    pub unresolved: Vec<String>,
    /// Supplied by the user but never declared by the template.
    pub unused: Vec<String>,
}

impl Resolution {
    /// Collect decisions made for `declared`, flagging unused `supplied` keys.
    ///
    /// `Decision::Ask` must have been answered before this point and is
    /// treated as unresolved.
    pub fn collect<I>(
        declared: &VariableSet,
        decisions: I,
        supplied: &BTreeMap<String, String>,
    ) -> Self
    where
        I: IntoIterator<Item = (String, Decision)>,
    {
        let mut resolution = Self::default();
        for (name, decision) in decisions {
            match decision {
                Decision::Resolved { value, source } => {
                    resolution.resolved.push(ResolvedVariable {
                        name,
                        value,
                        source,
                    });
                }
                Decision::Ask | Decision::Unresolved => resolution.unresolved.push(name),
            }
        }
        resolution.unused = supplied
            .keys()
            .filter(|key| !declared.contains(key))
            .cloned()
            .collect();
        resolution
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.resolved
            .iter()
            .find(|v| v.name == name)
            .map(|v| v.value.as_str())
    }

    /// Substitute resolved values of `declared` variables into `text`.
    pub fn render_text(&self, text: &str, declared: &VariableSet) -> String {
        substitute(text, declared, |name| self.value(name))
    }

    /// Substitute into every component of a template path.
    ///
    /// Each rendered component must remain one plain name; a value containing
    /// a separator or `..` is rejected with `UnsafePath`. Components that are
    /// not valid UTF-8 cannot hold a placeholder and are kept byte for byte.
    pub fn render_path(
        &self,
        path: &RelativePath,
        declared: &VariableSet,
    ) -> Result<RelativePath, DomainError> {
        let rendered: Vec<OsString> = path
            .components()
            .map(|component| match component.to_str() {
                Some(text) => OsString::from(self.render_text(text, declared)),
                None => component.to_os_string(),
            })
            .collect();

        RelativePath::from_components(&rendered).map_err(|e| match e {
            DomainError::UnsafePath { reason, .. } => DomainError::UnsafePath {
                path: format!(
                    "{} -> {}",
                    path,
                    rendered.iter().collect::<PathBuf>().display()
                ),
                reason,
            },
            other => other,
        })
    }
}
