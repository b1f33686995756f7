//! Implementation of `prozes template show`.

use std::collections::BTreeMap;

use prozes_adapters::{FsTemplateStore, LocalFilesystem};
use prozes_core::application::{CatalogService, TemplateDetails};

use crate::{cli::ShowArgs, error::CliResult, output::OutputManager};

pub fn execute(args: ShowArgs, store: FsTemplateStore, output: &OutputManager) -> CliResult<()> {
    let service = CatalogService::new(Box::new(store), Box::new(LocalFilesystem::new()));
    let details = service.show(&args.name, args.show_files)?;

    if output.is_json() {
        output.json(&details)?;
        return Ok(());
    }
    render(&details, output)?;
    Ok(())
}

fn render(details: &TemplateDetails, output: &OutputManager) -> std::io::Result<()> {
    let meta = &details.metadata;
    output.header(&format!("Template '{}'", meta.name))?;

    output.field("Description", meta.description.as_deref().unwrap_or("-"))?;
    output.field("Author", meta.author.as_deref().unwrap_or("-"))?;
    output.field("Version", meta.version.as_deref().unwrap_or("-"))?;
    output.field(
        "Created",
        &meta.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )?;
    output.field("Format", &meta.format_version)?;
    output.field("Location", &details.root.display().to_string())?;
    output.field("Files", &details.file_count.to_string())?;

    if meta.variables.is_empty() {
        output.field("Variables", "none")?;
    } else {
        output.field("Variables", &meta.variables.len().to_string())?;
        for name in meta.variables.iter() {
            output.print(&format!("    {{{{{name}}}}}"))?;
        }
    }

    if let Some(files) = &details.files {
        output.print("")?;
        output.print(&format!("{}/", meta.name))?;
        for line in tree(files) {
            output.print(&line)?;
        }
    }
    Ok(())
}

#[derive(Default)]
struct Node {
    children: BTreeMap<String, Node>,
}

/// Render `/`-separated paths as an indented tree.
fn tree(files: &[String]) -> Vec<String> {
    let mut root = Node::default();
    for file in files {
        let mut node = &mut root;
        for part in file.split('/') {
            node = node.children.entry(part.to_string()).or_default();
        }
    }

    let mut lines = Vec::new();
    draw(&root, "", &mut lines);
    lines
}

fn draw(node: &Node, prefix: &str, lines: &mut Vec<String>) {
    let count = node.children.len();
    for (i, (name, child)) in node.children.iter().enumerate() {
        let last = i + 1 == count;
        let (branch, indent) = if last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        let slash = if child.children.is_empty() { "" } else { "/" };
        lines.push(format!("{prefix}{branch}{name}{slash}"));
        draw(child, &format!("{prefix}{indent}"), lines);
    }
}
