//! Tracing subscriber for the `prozes` binary.
//!
//! The core and adapter crates only emit events; this is the one place a
//! subscriber is installed. Logs always go to stderr so that `--output-format
//! json` and `template list --format csv` stay machine-readable on stdout.

use std::io::IsTerminal as _;

use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::cli::GlobalArgs;

/// Targets of the workspace crates; dependencies stay at their defaults.
const WORKSPACE_TARGETS: &[&str] = &["prozes", "prozes_core", "prozes_adapters"];

/// Install the global subscriber. `RUST_LOG`, when set, replaces the
/// verbosity flags entirely.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let level = level(args);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(level)));

    // Store, capture and finalizer events are easier to tell apart by target
    // once debugging is on.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(level >= LevelFilter::DEBUG)
        .with_ansi(!args.no_color && std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))
}

/// `--quiet` wins over any number of `-v`.
fn level(args: &GlobalArgs) -> LevelFilter {
    if args.quiet {
        return LevelFilter::ERROR;
    }
    match args.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn filter_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    WORKSPACE_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}
