//! Implementation of `prozes template list`.

use prozes_adapters::{FsTemplateStore, LocalFilesystem};
use prozes_core::application::{CatalogService, TemplateSummary};

use crate::{
    cli::{ListArgs, ListFormat},
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, store: FsTemplateStore, output: &OutputManager) -> CliResult<()> {
    let service = CatalogService::new(Box::new(store), Box::new(LocalFilesystem::new()));
    let templates = service.list()?;

    // The global JSON mode overrides the per-command format.
    let format = if output.is_json() {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Table => {
            if templates.is_empty() {
                output.info("No templates saved yet.")?;
                output.print("Create one with: prozes template save <source> <name>")?;
                return Ok(());
            }
            output.header("Saved Templates:")?;
            for line in table(&templates) {
                output.print(&line)?;
            }
        }
        // Machine-readable formats bypass quiet mode: they are the result.
        ListFormat::List => {
            for t in &templates {
                println!("{}", t.name);
            }
        }
        ListFormat::Json => output.json(&templates)?,
        ListFormat::Csv => {
            println!("name,description,author,variables,created_at");
            for t in &templates {
                println!("{}", csv_row(t));
            }
        }
    }

    Ok(())
}

fn table(templates: &[TemplateSummary]) -> Vec<String> {
    let width = templates
        .iter()
        .map(|t| t.name.len())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    let mut lines = vec![format!(
        "  {:<width$}  {:>4}  {:<10}  DESCRIPTION",
        "NAME", "VARS", "CREATED"
    )];
    for t in templates {
        lines.push(format!(
            "  {:<width$}  {:>4}  {:<10}  {}",
            t.name,
            t.variable_count,
            t.created_at.format("%Y-%m-%d"),
            t.description.as_deref().unwrap_or("-"),
        ));
    }
    lines
}

fn csv_row(t: &TemplateSummary) -> String {
    [
        csv_field(&t.name),
        csv_field(t.description.as_deref().unwrap_or("")),
        csv_field(t.author.as_deref().unwrap_or("")),
        t.variable_count.to_string(),
        t.created_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
    ]
    .join(",")
}

/// RFC 4180 quoting: only when the field needs it.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
