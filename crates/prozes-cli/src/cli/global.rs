//! Flags accepted before or after any `prozes` subcommand.

use clap::Args;
use std::path::PathBuf;

/// Flattened into [`super::Cli`]; every field is `global = true`.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Log verbosity for the prozes crates: `-v` info, `-vv` debug, `-vvv` trace.
    /// `RUST_LOG` overrides it.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase log verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Only errors are logged; `template delete` stops asking for confirmation.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        help = "Disable colored output (also honours NO_COLOR)"
    )]
    pub no_color: bool,

    /// Config file to read, and the file `init` and `config set` write.
    /// A missing file means built-in defaults.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        env = "PROZES_CONFIG",
        value_name = "FILE",
        help = "Configuration file path"
    )]
    pub config: Option<PathBuf>,

    /// `auto` falls back to `output.format` from the config, then to human
    /// output on a terminal and plain text otherwise.
    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "Output format"
    )]
    pub output_format: OutputFormat,

    /// Where templates are saved and looked up.
    ///
    /// Precedence: `--store`, then `PROZES_STORE`, then `templates.store_path`
    /// from the config, then `<data dir>/prozes/templates`.
    #[arg(
        long = "store",
        global = true,
        env = "PROZES_STORE",
        value_name = "DIR",
        help = "Template store directory"
    )]
    pub store: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Auto,
    /// Colored, decorated output.
    Human,
    /// No colors or symbols.
    Plain,
    /// Command results as JSON on stdout.
    Json,
}
