//! Runs the optional venv / git / dependency steps on a generated project.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::{debug, info, instrument, warn};

use prozes_core::application::ports::{ProjectFinalizer, SetupOptions, SetupStep, StepOutcome};

const VENV_DIR: &str = "venv";
const REQUIREMENTS_FILE: &str = "requirements.txt";

#[cfg(windows)]
const DEFAULT_PYTHON: &str = "python";
#[cfg(not(windows))]
const DEFAULT_PYTHON: &str = "python3";

/// `ProjectFinalizer` backed by `std::process::Command`.
///
/// Steps run in a fixed order: virtual environment, dependency installation,
/// git repository. A failing step never aborts the others, except that
/// dependency installation needs the venv step to have succeeded.
#[derive(Debug, Clone)]
pub struct ProcessFinalizer {
    python: String,
    git: String,
}

impl ProcessFinalizer {
    pub fn new() -> Self {
        Self {
            python: DEFAULT_PYTHON.to_string(),
            git: "git".to_string(),
        }
    }

    /// Interpreter used to create the virtual environment.
    pub fn with_python(mut self, python: impl Into<String>) -> Self {
        self.python = python.into();
        self
    }

    pub fn with_git(mut self, git: impl Into<String>) -> Self {
        self.git = git.into();
        self
    }

    fn create_venv(&self, destination: &Path) -> StepOutcome {
        let venv = destination.join(VENV_DIR);
        if venv.exists() {
            return StepOutcome::ok(SetupStep::Venv, "virtual environment already exists");
        }

        let mut command = Command::new(&self.python);
        command.arg("-m").arg("venv").arg(&venv).current_dir(destination);
        match run(&mut command) {
            Ok(_) => StepOutcome::ok(SetupStep::Venv, format!("created {}", venv.display())),
            Err(reason) => StepOutcome::failed(SetupStep::Venv, reason),
        }
    }

    fn install_deps(&self, destination: &Path) -> StepOutcome {
        let requirements = destination.join(REQUIREMENTS_FILE);
        if !requirements.is_file() {
            return StepOutcome::failed(
                SetupStep::InstallDeps,
                format!("{} not found", REQUIREMENTS_FILE),
            );
        }

        let mut command = Command::new(venv_pip(&destination.join(VENV_DIR)));
        command
            .arg("install")
            .arg("-r")
            .arg(&requirements)
            .current_dir(destination);
        match run(&mut command) {
            Ok(_) => StepOutcome::ok(SetupStep::InstallDeps, "dependencies installed"),
            Err(reason) => StepOutcome::failed(SetupStep::InstallDeps, reason),
        }
    }

    fn init_git(&self, destination: &Path) -> StepOutcome {
        let mut command = Command::new(&self.git);
        command.arg("init").current_dir(destination);
        if let Err(reason) = run(&mut command) {
            return StepOutcome::failed(SetupStep::Git, reason);
        }
        if !destination.join(".git").is_dir() {
            return StepOutcome::failed(SetupStep::Git, ".git directory was not created");
        }

        // Older gits default to `master`; a failure here is not worth reporting.
        let mut rename = Command::new(&self.git);
        rename.args(["branch", "-M", "main"]).current_dir(destination);
        if let Err(reason) = run(&mut rename) {
            debug!(%reason, "Could not rename initial branch");
        }

        StepOutcome::ok(SetupStep::Git, "initialized git repository")
    }
}

impl Default for ProcessFinalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectFinalizer for ProcessFinalizer {
    #[instrument(skip_all, fields(destination = %destination.display()))]
    fn finalize(&self, destination: &Path, options: &SetupOptions) -> Vec<StepOutcome> {
        let mut outcomes = Vec::new();

        let mut venv_ready = false;
        if options.venv {
            let outcome = self.create_venv(destination);
            venv_ready = outcome.success;
            outcomes.push(outcome);
        }

        if options.install_deps {
            outcomes.push(if venv_ready {
                self.install_deps(destination)
            } else {
                StepOutcome::failed(SetupStep::InstallDeps, "virtual environment not available")
            });
        }

        if options.git {
            outcomes.push(self.init_git(destination));
        }

        for outcome in &outcomes {
            if outcome.success {
                info!(step = %outcome.step, detail = %outcome.detail, "Setup step finished");
            } else {
                warn!(step = %outcome.step, detail = %outcome.detail, "Setup step failed");
            }
        }
        outcomes
    }
}

fn venv_pip(venv: &Path) -> PathBuf {
    if cfg!(windows) {
        venv.join("Scripts").join("pip.exe")
    } else {
        venv.join("bin").join("pip")
    }
}

/// Run to completion, capturing output. Errors are rendered for the report.
fn run(command: &mut Command) -> Result<Output, String> {
    let program = command.get_program().to_string_lossy().into_owned();
    debug!(%program, args = ?command.get_args().collect::<Vec<_>>(), "Running");

    let output = command
        .output()
        .map_err(|e| format!("failed to run {}: {}", program, e))?;
    if output.status.success() {
        return Ok(output);
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    Err(if stderr.is_empty() {
        format!("{} exited with {}", program, output.status)
    } else {
        format!("{} exited with {}: {}", program, output.status, stderr)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MISSING: &str = "prozes-definitely-not-a-program";

    #[test]
    fn no_options_runs_nothing() {
        let temp = TempDir::new().unwrap();
        let outcomes = ProcessFinalizer::new().finalize(temp.path(), &SetupOptions::default());
        assert!(outcomes.is_empty());
    }

    #[test]
    fn missing_interpreter_fails_venv_and_install() {
        let temp = TempDir::new().unwrap();
        let finalizer = ProcessFinalizer::new().with_python(MISSING);
        let options = SetupOptions {
            venv: true,
            install_deps: true,
            git: false,
        };

        let outcomes = finalizer.finalize(temp.path(), &options);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].step, SetupStep::Venv);
        assert!(!outcomes[0].success);
        assert!(outcomes[0].detail.contains(MISSING));
        assert_eq!(outcomes[1].step, SetupStep::InstallDeps);
        assert!(!outcomes[1].success);
    }

    #[test]
    fn existing_venv_is_kept() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(VENV_DIR)).unwrap();
        let finalizer = ProcessFinalizer::new().with_python(MISSING);

        let outcomes = finalizer.finalize(
            temp.path(),
            &SetupOptions {
                venv: true,
                ..Default::default()
            },
        );
        assert!(outcomes[0].success);
    }

    #[test]
    fn install_without_requirements_fails() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(VENV_DIR)).unwrap();
        let finalizer = ProcessFinalizer::new().with_python(MISSING);

        let outcomes = finalizer.finalize(
            temp.path(),
            &SetupOptions {
                venv: true,
                install_deps: true,
                git: false,
            },
        );
        assert!(!outcomes[1].success);
        assert!(outcomes[1].detail.contains(REQUIREMENTS_FILE));
    }

    #[test]
    fn missing_git_reports_failure() {
        let temp = TempDir::new().unwrap();
        let finalizer = ProcessFinalizer::new().with_git(MISSING);

        let outcomes = finalizer.finalize(
            temp.path(),
            &SetupOptions {
                git: true,
                ..Default::default()
            },
        );
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].step, SetupStep::Git);
        assert!(!outcomes[0].success);
    }
}
