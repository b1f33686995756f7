//! Implementation of `prozes template save`.

use tracing::{info, instrument};

use prozes_adapters::{FsTemplateStore, LocalFilesystem};
use prozes_core::application::{CaptureReport, CaptureRequest, CaptureService, SkipReason};

use crate::{cli::SaveArgs, config::AppConfig, error::CliResult, output::OutputManager};

#[instrument(skip_all, fields(template = %args.name, source = %args.source.display()))]
pub fn execute(
    args: SaveArgs,
    store: FsTemplateStore,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let request = build_request(args, config);
    let service = CaptureService::new(Box::new(store), Box::new(LocalFilesystem::new()));

    let report = service.capture(request)?;
    info!(files = report.files, "Template saved");

    if output.is_json() {
        output.json(&report)?;
        return Ok(());
    }
    render(&report, output)?;
    Ok(())
}

/// Flags win over config; config excludes are added to the flag's.
fn build_request(args: SaveArgs, config: &AppConfig) -> CaptureRequest {
    let mut exclude = config.templates.exclude.clone();
    exclude.extend(args.exclude);

    CaptureRequest {
        source: args.source,
        name: args.name,
        description: args.description,
        author: args.author.or_else(|| config.defaults.author.clone()),
        version: args.version,
        overwrite: args.force,
        detect_variables: !args.no_detect_variables,
        exclude,
    }
}

fn render(report: &CaptureReport, output: &OutputManager) -> std::io::Result<()> {
    let name = report.template.name();
    if report.replaced {
        output.success(&format!("Template '{name}' replaced"))?;
    } else {
        output.success(&format!("Template '{name}' saved"))?;
    }

    output.field("Location", &report.template.root.display().to_string())?;
    output.field(
        "Files",
        &format!(
            "{} ({} text, {} binary)",
            report.files, report.text_files, report.binary_files
        ),
    )?;
    output.field("Directories", &report.directories.to_string())?;

    let variables = report.template.variables();
    let listed = if variables.is_empty() {
        "none".to_string()
    } else {
        variables.iter().collect::<Vec<_>>().join(", ")
    };
    output.field("Variables", &listed)?;

    for skipped in &report.skipped {
        let why = match skipped.reason {
            SkipReason::Symlink => "symbolic links are not captured",
            SkipReason::ReservedName => "name is reserved for template metadata",
        };
        output.warning(&format!("Skipped {}: {}", skipped.path, why))?;
    }
    for large in &report.large_files {
        output.warning(&format!("Large file captured: {large}"))?;
    }

    output.print("")?;
    output.print(&format!("Use it with: prozes template use {name} <destination>"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args() -> SaveArgs {
        SaveArgs {
            source: PathBuf::from("./proj"),
            name: "demo".into(),
            description: None,
            author: None,
            version: None,
            force: false,
            exclude: vec!["*.log".into()],
            no_detect_variables: false,
        }
    }

    #[test]
    fn config_supplies_author_and_excludes() {
        let mut config = AppConfig::default();
        config.defaults.author = Some("Ada".into());
        config.templates.exclude = vec!["secrets".into()];

        let request = build_request(args(), &config);
        assert_eq!(request.author.as_deref(), Some("Ada"));
        assert_eq!(request.exclude, vec!["secrets", "*.log"]);
        assert!(request.detect_variables);
    }

    #[test]
    fn flag_author_wins() {
        let mut config = AppConfig::default();
        config.defaults.author = Some("Ada".into());
        let mut a = args();
        a.author = Some("Grace".into());
        a.no_detect_variables = true;
        a.force = true;

        let request = build_request(a, &config);
        assert_eq!(request.author.as_deref(), Some("Grace"));
        assert!(!request.detect_variables);
        assert!(request.overwrite);
    }
}
