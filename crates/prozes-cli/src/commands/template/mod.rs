//! `prozes template ...` handlers.

use tracing::debug;

use prozes_adapters::FsTemplateStore;

use crate::{
    cli::{GlobalArgs, TemplateCommands},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

mod delete;
mod instantiate;
mod list;
mod save;
mod show;

/// Dispatch to the correct template subcommand.
pub fn execute(
    cmd: TemplateCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let store = open_store(&global, &config)?;

    match cmd {
        TemplateCommands::Save(args) => save::execute(args, store, &config, &output),
        TemplateCommands::Use(args) => instantiate::execute(args, store, &output),
        TemplateCommands::List(args) => list::execute(args, store, &output),
        TemplateCommands::Show(args) => show::execute(args, store, &output),
        TemplateCommands::Delete(args) => delete::execute(args, store, &global, &output),
    }
}

fn open_store(global: &GlobalArgs, config: &AppConfig) -> CliResult<FsTemplateStore> {
    let root = config.store_path(global.store.as_deref());
    debug!(store = %root.display(), "Opening template store");
    Ok(FsTemplateStore::open(root)?)
}
