//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "prozes",
    bin_name = "prozes",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Project scaffolding from your own templates",
    long_about = "Prozes captures an existing project directory as a reusable template \
                  and stamps out new projects from it, substituting {{variables}} in \
                  file contents and paths.",
    after_help = "EXAMPLES:\n\
        \x20 prozes template save ./my-api flask-api --description \"Flask starter\"\n\
        \x20 prozes template use flask-api ./shop --var author=Ada --git\n\
        \x20 prozes template list\n\
        \x20 prozes completions bash > /usr/share/bash-completion/completions/prozes",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Save, use and manage project templates.
    #[command(
        visible_alias = "t",
        about = "Manage project templates",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 prozes template save . my-template\n\
            \x20 prozes template use my-template ../new-project\n\
            \x20 prozes template show my-template --show-files"
    )]
    Template(TemplateCommands),

    /// Initialise a Prozes configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 prozes init\n\
            \x20 prozes init --force   # overwrite an existing file"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 prozes completions bash > ~/.local/share/bash-completion/completions/prozes\n\
            \x20 prozes completions zsh  > ~/.zfunc/_prozes\n\
            \x20 prozes completions fish > ~/.config/fish/completions/prozes.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the Prozes configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 prozes config get templates.store_path\n\
            \x20 prozes config set defaults.author \"Ada Lovelace\"\n\
            \x20 prozes config list"
    )]
    Config(ConfigCommands),
}

// ── template ──────────────────────────────────────────────────────────────────

/// Subcommands for `prozes template`.
#[derive(Debug, Subcommand)]
pub enum TemplateCommands {
    /// Capture a directory as a named template.
    #[command(after_help = "EXAMPLES:\n\
        \x20 prozes template save ./my-api flask-api\n\
        \x20 prozes template save . cli-tool --exclude '*.log' --force")]
    Save(SaveArgs),

    /// Create a new project from a saved template.
    #[command(after_help = "EXAMPLES:\n\
        \x20 prozes template use flask-api ./shop\n\
        \x20 prozes template use flask-api ./shop --var author=Ada --var port=8080\n\
        \x20 prozes template use flask-api ./shop --interactive --venv --install-deps")]
    Use(UseArgs),

    /// List saved templates.
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show one template's metadata.
    Show(ShowArgs),

    /// Delete a saved template.
    #[command(visible_alias = "rm")]
    Delete(DeleteArgs),
}

/// Arguments for `prozes template save`.
#[derive(Debug, Args)]
pub struct SaveArgs {
    /// Directory to capture.
    #[arg(value_name = "SOURCE", help = "Directory to capture")]
    pub source: PathBuf,

    /// Template name (letters, digits, `-` and `_`; starts with a letter or `_`).
    #[arg(value_name = "NAME", help = "Template name")]
    pub name: String,

    #[arg(short = 'd', long = "description", value_name = "TEXT")]
    pub description: Option<String>,

    /// Defaults to `defaults.author` from the config file.
    #[arg(short = 'a', long = "author", value_name = "TEXT")]
    pub author: Option<String>,

    #[arg(long = "template-version", value_name = "VERSION", help = "Template version label")]
    pub version: Option<String>,

    /// Replace an existing template with the same name.
    #[arg(short = 'f', long = "force", help = "Overwrite an existing template")]
    pub force: bool,

    /// Extra exclude patterns: `name`, `*suffix` or `prefix*`.
    #[arg(
        short = 'e',
        long = "exclude",
        value_name = "PATTERN",
        help = "Exclude files or directories matching PATTERN (repeatable)"
    )]
    pub exclude: Vec<String>,

    /// Store the template without scanning for `{{variables}}`.
    #[arg(long = "no-detect-variables", help = "Do not detect {{variables}}")]
    pub no_detect_variables: bool,
}

/// Arguments for `prozes template use`.
#[derive(Debug, Args)]
pub struct UseArgs {
    /// Name of a saved template.
    #[arg(value_name = "NAME", help = "Template to use")]
    pub name: String,

    /// Directory to create. Its last component becomes `{{project_name}}`.
    #[arg(value_name = "DESTINATION", help = "Project directory to create")]
    pub destination: PathBuf,

    /// Variable assignment, `KEY=VALUE`.
    #[arg(
        long = "var",
        value_name = "KEY=VALUE",
        help = "Set a template variable (repeatable)"
    )]
    pub vars: Vec<String>,

    /// Prompt for variables that are still missing.
    #[arg(short = 'i', long = "interactive", help = "Prompt for missing variables")]
    pub interactive: bool,

    #[arg(long = "venv", help = "Create a Python virtual environment")]
    pub venv: bool,

    #[arg(long = "git", help = "Initialise a git repository")]
    pub git: bool,

    #[arg(
        long = "install-deps",
        requires = "venv",
        help = "Install requirements.txt into the virtual environment (needs --venv)"
    )]
    pub install_deps: bool,
}

/// Arguments for `prozes template list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

/// Arguments for `prozes template show`.
#[derive(Debug, Args)]
pub struct ShowArgs {
    #[arg(value_name = "NAME", help = "Template to show")]
    pub name: String,

    /// Print the template's file tree.
    #[arg(long = "show-files", help = "Show the template's files")]
    pub show_files: bool,
}

/// Arguments for `prozes template delete`.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    #[arg(value_name = "NAME", help = "Template to delete")]
    pub name: String,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes", help = "Delete without asking")]
    pub yes: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `prozes init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `prozes completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `prozes config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `templates.store_path`.
        key: String,
    },
    /// Set a configuration key to a value.
    Set {
        /// Dotted key path.
        key: String,
        /// New value. Lists (`templates.exclude`) are comma-separated.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_save_command() {
        let cli = Cli::parse_from([
            "prozes", "template", "save", "./src-dir", "flask-api", "-d", "Flask", "-e", "*.log",
            "-e", "tmp",
        ]);
        let Commands::Template(TemplateCommands::Save(args)) = cli.command else {
            panic!("expected template save");
        };
        assert_eq!(args.name, "flask-api");
        assert_eq!(args.description.as_deref(), Some("Flask"));
        assert_eq!(args.exclude, vec!["*.log", "tmp"]);
        assert!(!args.force);
    }

    #[test]
    fn parse_use_with_repeated_vars() {
        let cli = Cli::parse_from([
            "prozes", "t", "use", "flask-api", "shop", "--var", "a=1", "--var", "b=x=y", "--git",
        ]);
        let Commands::Template(TemplateCommands::Use(args)) = cli.command else {
            panic!("expected template use");
        };
        assert_eq!(args.vars, vec!["a=1", "b=x=y"]);
        assert!(args.git);
        assert!(!args.interactive);
    }

    #[test]
    fn install_deps_requires_venv() {
        let result = Cli::try_parse_from([
            "prozes", "template", "use", "t", "out", "--install-deps",
        ]);
        assert!(result.is_err());

        let result = Cli::try_parse_from([
            "prozes", "template", "use", "t", "out", "--install-deps", "--venv",
        ]);
        assert!(result.is_ok());
    }

    #[test]
    fn list_alias_and_format() {
        let cli = Cli::parse_from(["prozes", "template", "ls", "--format", "csv"]);
        assert!(matches!(
            cli.command,
            Commands::Template(TemplateCommands::List(ListArgs {
                format: ListFormat::Csv
            }))
        ));
    }

    #[test]
    fn store_flag_is_global() {
        let cli = Cli::parse_from(["prozes", "template", "list", "--store", "/tmp/store"]);
        assert_eq!(cli.global.store, Some(PathBuf::from("/tmp/store")));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["prozes", "--quiet", "--verbose", "template", "list"]);
        assert!(result.is_err());
    }
}
