//! Implementation of `prozes template use`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use prozes_adapters::{FsTemplateStore, LocalFilesystem, ProcessFinalizer};
use prozes_core::{
    application::{InstantiateReport, InstantiateRequest, InstantiateService, Prompter, SetupOptions},
    domain::parse_assignment,
};

use crate::{
    cli::UseArgs,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(template = %args.name, destination = %args.destination.display()))]
pub fn execute(args: UseArgs, store: FsTemplateStore, output: &OutputManager) -> CliResult<()> {
    let request = build_request(&args)?;

    let prompter = prompter(args.interactive)?;

    let service = InstantiateService::new(
        Box::new(store),
        Box::new(LocalFilesystem::new()),
        Box::new(ProcessFinalizer::new()),
    );
    let report = service.instantiate(request, prompter.as_deref())?;
    info!(files = report.files_written, "Project generated");

    if output.is_json() {
        output.json(&report)?;
        return Ok(());
    }
    render(&report, &args.destination, output)?;
    Ok(())
}

fn build_request(args: &UseArgs) -> CliResult<InstantiateRequest> {
    Ok(InstantiateRequest {
        template: args.name.clone(),
        destination: absolute(&args.destination)?,
        variables: parse_vars(&args.vars)?,
        interactive: args.interactive,
        setup: SetupOptions {
            venv: args.venv,
            git: args.git,
            install_deps: args.install_deps,
        },
    })
}

#[cfg(feature = "interactive")]
fn prompter(interactive: bool) -> CliResult<Option<Box<dyn Prompter>>> {
    Ok(interactive.then(|| Box::new(crate::prompt::DialoguerPrompter) as Box<dyn Prompter>))
}

#[cfg(not(feature = "interactive"))]
fn prompter(interactive: bool) -> CliResult<Option<Box<dyn Prompter>>> {
    if interactive {
        return Err(CliError::FeatureNotAvailable {
            feature: "interactive",
        });
    }
    Ok(None)
}

/// `KEY=VALUE` pairs; a repeated key keeps its last value.
fn parse_vars(raw: &[String]) -> CliResult<BTreeMap<String, String>> {
    let mut vars = BTreeMap::new();
    for assignment in raw {
        let (key, value) = parse_assignment(assignment).map_err(|e| CliError::Core(e.into()))?;
        vars.insert(key, value);
    }
    Ok(vars)
}

/// `.` and relative paths still need a last component to name the project.
fn absolute(path: &Path) -> CliResult<PathBuf> {
    std::path::absolute(path)
        .with_cli_context(|| format!("failed to resolve destination '{}'", path.display()))
}

fn render(report: &InstantiateReport, shown: &Path, output: &OutputManager) -> std::io::Result<()> {
    output.success(&format!(
        "Project '{}' created from template '{}'",
        report.project_name, report.template
    ))?;
    output.field("Location", &report.destination.display().to_string())?;
    output.field(
        "Files",
        &format!(
            "{} files, {} directories",
            report.files_written, report.directories_created
        ),
    )?;

    if !report.resolved.is_empty() {
        output.print("")?;
        output.header("Variables:")?;
        for var in &report.resolved {
            output.field(&var.name, &format!("{} ({})", var.value, var.source))?;
        }
    }

    if !report.unresolved.is_empty() {
        output.warning(&format!(
            "Left unresolved: {} (pass --var KEY=VALUE or --interactive)",
            report.unresolved.join(", ")
        ))?;
    }
    if !report.unused.is_empty() {
        output.info(&format!(
            "Not used by this template: {}",
            report.unused.join(", ")
        ))?;
    }

    for step in &report.setup {
        if step.success {
            output.success(&format!("{}: {}", step.step, step.detail))?;
        } else {
            output.warning(&format!("{} failed: {}", step.step, step.detail))?;
        }
    }

    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  cd {}", shown.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(vars: &[&str]) -> UseArgs {
        UseArgs {
            name: "flask-api".into(),
            destination: PathBuf::from("shop"),
            vars: vars.iter().map(|s| s.to_string()).collect(),
            interactive: false,
            venv: false,
            git: true,
            install_deps: false,
        }
    }

    #[test]
    fn vars_split_on_first_equals_and_last_wins() {
        let vars = parse_vars(&[
            "url=http://x?a=b".to_string(),
            "name=one".to_string(),
            "name=two".to_string(),
        ])
        .unwrap();
        assert_eq!(vars["url"], "http://x?a=b");
        assert_eq!(vars["name"], "two");
    }

    #[test]
    fn malformed_var_is_a_user_error() {
        let err = parse_vars(&["novalue".to_string()]).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let err = parse_vars(&["1bad=x".to_string()]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn destination_is_made_absolute() {
        let request = build_request(&args(&["author=Ada"])).unwrap();
        assert!(request.destination.is_absolute());
        assert!(request.destination.ends_with("shop"));
        assert_eq!(request.variables["author"], "Ada");
        assert!(request.setup.git);
        assert!(!request.setup.venv);
    }
}
