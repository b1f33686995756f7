//! Instantiate Service - generates a project from a stored template.
//!
//! This service coordinates the whole `use` workflow:
//! 1. Validate the request and load the template
//! 2. Refuse populated destinations
//! 3. Resolve every declared variable (prompting at most once each)
//! 4. Plan all destination paths, then copy-with-transform
//! 5. Roll back on failure, run the finalizer on success

use chrono::Local;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, ProjectFinalizer, Prompter, SetupOptions, StepOutcome, TemplateStore},
    },
    domain::{
        BuiltinVariables, Content, Decision, DomainValidator as validator, EntryKind,
        ExclusionRules, ProjectName, RelativePath, Resolution, ResolvedVariable,
        TemplateDescriptor, TemplateName, VariableSet, decide, is_metadata_record,
        variables::validate_variable_name,
    },
    error::ProzesResult,
};

/// Input of an instantiation.
#[derive(Debug, Clone, Default)]
pub struct InstantiateRequest {
    pub template: String,
    pub destination: PathBuf,
    /// User-supplied values (`--var KEY=VALUE`).
    pub variables: BTreeMap<String, String>,
    pub interactive: bool,
    pub setup: SetupOptions,
}

/// Result of a successful instantiation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstantiateReport {
    pub template: TemplateName,
    pub destination: PathBuf,
    pub project_name: String,
    pub files_written: usize,
    pub directories_created: usize,
    pub resolved: Vec<ResolvedVariable>,
    pub unresolved: Vec<String>,
    pub unused: Vec<String>,
    pub setup: Vec<StepOutcome>,
}

/// Instantiation (`use`) use case.
pub struct InstantiateService {
    store: Box<dyn TemplateStore>,
    filesystem: Box<dyn Filesystem>,
    finalizer: Box<dyn ProjectFinalizer>,
}

impl InstantiateService {
    pub fn new(
        store: Box<dyn TemplateStore>,
        filesystem: Box<dyn Filesystem>,
        finalizer: Box<dyn ProjectFinalizer>,
    ) -> Self {
        Self {
            store,
            filesystem,
            finalizer,
        }
    }

    /// Generate a project at `request.destination`.
    ///
    /// All validation (names, destination, path plan) happens before the
    /// first write. A failure after that point is reported as
    /// `IncompleteInstantiation`, never as success.
    #[instrument(
        skip_all,
        fields(
            template = %request.template,
            destination = %request.destination.display()
        )
    )]
    pub fn instantiate(
        &self,
        request: InstantiateRequest,
        prompter: Option<&dyn Prompter>,
    ) -> ProzesResult<InstantiateReport> {
        let name = validator::validate_template_name(&request.template)?;
        for key in request.variables.keys() {
            validate_variable_name(key)?;
        }
        if request.setup.install_deps && !request.setup.venv {
            return Err(ApplicationError::ValidationFailed(
                "--install-deps requires --venv".into(),
            )
            .into());
        }
        let project = ProjectName::from_destination(&request.destination)?;

        let template = self.store.get(&name)?;
        let destination = request.destination.as_path();
        let destination_existed = self.check_destination(destination)?;

        let builtins = BuiltinVariables::new(&project, Local::now().date_naive());
        let resolution = resolve_variables(
            template.variables(),
            &request.variables,
            &builtins,
            request.interactive,
            prompter,
        )?;

        let plan = self.plan(&template, &resolution)?;
        info!(entries = plan.len(), "Destination plan ready");

        let progress = self.write_plan(
            destination,
            destination_existed,
            template.variables(),
            &resolution,
            &plan,
        )?;

        let setup = if request.setup.any() {
            self.finalizer.finalize(destination, &request.setup)
        } else {
            Vec::new()
        };
        for outcome in setup.iter().filter(|o| !o.success) {
            warn!(step = %outcome.step, detail = %outcome.detail, "Setup step failed");
        }

        if !resolution.unresolved.is_empty() {
            warn!(unresolved = ?resolution.unresolved, "Variables left unresolved");
        }
        if !resolution.unused.is_empty() {
            warn!(unused = ?resolution.unused, "Supplied variables not used by template");
        }
        info!(
            files = progress.files_written,
            "Project generated successfully"
        );

        Ok(InstantiateReport {
            template: name,
            destination: request.destination,
            project_name: project.to_string(),
            files_written: progress.files_written,
            directories_created: progress.directories_created,
            resolved: resolution.resolved,
            unresolved: resolution.unresolved,
            unused: resolution.unused,
            setup,
        })
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Returns whether the destination already existed (as an empty directory).
    fn check_destination(&self, destination: &Path) -> ProzesResult<bool> {
        if !self.filesystem.exists(destination) {
            return Ok(false);
        }
        if self.filesystem.is_dir(destination) && self.filesystem.is_empty_dir(destination)? {
            debug!("Populating existing empty directory");
            return Ok(true);
        }
        Err(ApplicationError::DestinationExists {
            path: destination.to_path_buf(),
        }
        .into())
    }

    /// Map every template entry to its destination path.
    fn plan(
        &self,
        template: &TemplateDescriptor,
        resolution: &Resolution,
    ) -> ProzesResult<Vec<PlannedEntry>> {
        let entries = self
            .filesystem
            .walk(&template.root, &ExclusionRules::default())?;
        let declared = template.variables();

        let mut plan = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.is_symlink() || is_metadata_record(&entry) {
                continue;
            }
            plan.push(PlannedEntry {
                source: template.root.join(entry.path.as_path()),
                target: resolution.render_path(&entry.path, declared)?,
                kind: entry.kind,
                executable: entry.executable,
            });
        }

        validator::validate_unique_paths(plan.iter().map(|p| &p.target))?;
        Ok(plan)
    }

    /// Write the plan with rollback on failure.
    fn write_plan(
        &self,
        destination: &Path,
        destination_existed: bool,
        declared: &VariableSet,
        resolution: &Resolution,
        plan: &[PlannedEntry],
    ) -> ProzesResult<Progress> {
        let mut progress = Progress::default();

        match self.write_all(
            destination,
            destination_existed,
            declared,
            resolution,
            plan,
            &mut progress,
        ) {
            Ok(()) => Ok(progress),
            Err(e) => {
                warn!(
                    error = %e,
                    files_written = progress.files_written,
                    "Write failed, attempting rollback"
                );
                let rolled_back = self.rollback(destination, destination_existed, &progress);
                Err(ApplicationError::IncompleteInstantiation {
                    destination: destination.to_path_buf(),
                    files_written: progress.files_written,
                    rolled_back,
                    reason: e.to_string(),
                }
                .into())
            }
        }
    }

    fn write_all(
        &self,
        destination: &Path,
        destination_existed: bool,
        declared: &VariableSet,
        resolution: &Resolution,
        plan: &[PlannedEntry],
        progress: &mut Progress,
    ) -> ProzesResult<()> {
        if !destination_existed {
            self.filesystem.create_dir_all(destination)?;
        }

        for entry in plan {
            progress.touch(&entry.target);
            let path = destination.join(entry.target.as_path());

            match entry.kind {
                EntryKind::Directory => {
                    self.filesystem.create_dir_all(&path)?;
                    progress.directories_created += 1;
                }
                EntryKind::File => {
                    if let Some(parent) = path.parent() {
                        self.filesystem.create_dir_all(parent)?;
                    }

                    let bytes = self.filesystem.read_file(&entry.source)?;
                    let output = match Content::classify(&entry.source, bytes) {
                        Content::Text(text) => resolution.render_text(&text, declared).into_bytes(),
                        Content::Binary(bytes) => bytes,
                    };
                    self.filesystem.write_file(&path, &output)?;

                    if entry.executable {
                        self.filesystem.set_permissions(&path, true)?;
                    }
                    progress.files_written += 1;
                }
                EntryKind::Symlink => {}
            }
        }

        Ok(())
    }

    /// Best-effort rollback. Returns whether every created path is gone.
    fn rollback(&self, destination: &Path, destination_existed: bool, progress: &Progress) -> bool {
        let targets: Vec<PathBuf> = if destination_existed {
            progress
                .top_level
                .iter()
                .map(|entry| destination.join(entry))
                .collect()
        } else {
            vec![destination.to_path_buf()]
        };

        let mut clean = true;
        for target in targets {
            if !self.filesystem.exists(&target) {
                continue;
            }
            let result = if self.filesystem.is_dir(&target) {
                self.filesystem.remove_dir_all(&target)
            } else {
                self.filesystem.remove_file(&target)
            };
            if let Err(e) = result {
                warn!(
                    error = %e,
                    path = %target.display(),
                    "Rollback failed"
                );
                clean = false;
            }
        }

        if clean {
            info!("Rollback successful");
        }
        clean
    }
}

/// Resolve every declared variable.
///
/// Interactive prompting only happens when `interactive` is set and a
/// prompter is available; each variable is asked at most once.
pub fn resolve_variables(
    declared: &VariableSet,
    supplied: &BTreeMap<String, String>,
    builtins: &BuiltinVariables,
    interactive: bool,
    prompter: Option<&dyn Prompter>,
) -> ProzesResult<Resolution> {
    let interactive = interactive && prompter.is_some();
    let mut answers: HashMap<String, String> = HashMap::new();
    let mut decisions = Vec::with_capacity(declared.len());

    for name in declared.iter() {
        let mut decision = decide(name, supplied, builtins, &answers, interactive);
        if decision == Decision::Ask {
            if let Some(prompter) = prompter {
                let answer = prompter.prompt(name)?;
                answers.insert(name.to_string(), answer.trim().to_string());
                decision = decide(name, supplied, builtins, &answers, interactive);
            }
        }
        decisions.push((name.to_string(), decision));
    }

    Ok(Resolution::collect(declared, decisions, supplied))
}

struct PlannedEntry {
    source: PathBuf,
    target: RelativePath,
    kind: EntryKind,
    executable: bool,
}

#[derive(Default)]
struct Progress {
    files_written: usize,
    directories_created: usize,
    /// Top-level destination entries this run has started writing.
    top_level: Vec<PathBuf>,
}

impl Progress {
    fn touch(&mut self, target: &RelativePath) {
        let top = target.first_component();
        if !self.top_level.contains(&top) {
            self.top_level.push(top);
        }
    }
}
