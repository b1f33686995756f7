//! Implementation of `prozes template delete`.

use prozes_adapters::{FsTemplateStore, LocalFilesystem};
use prozes_core::application::CatalogService;

use crate::{
    cli::{DeleteArgs, GlobalArgs},
    error::{CliError, CliResult},
    output::OutputManager,
    prompt::confirm,
};

pub fn execute(
    args: DeleteArgs,
    store: FsTemplateStore,
    global: &GlobalArgs,
    output: &OutputManager,
) -> CliResult<()> {
    let service = CatalogService::new(Box::new(store), Box::new(LocalFilesystem::new()));

    // Fail with "not found" before asking anything.
    let details = service.show(&args.name, false)?;

    if !args.yes && !global.quiet {
        let question = format!(
            "Delete template '{}' ({} files)?",
            details.metadata.name, details.file_count
        );
        if !confirm(&question)? {
            return Err(CliError::Cancelled);
        }
    }

    service.delete(&args.name)?;
    output.success(&format!("Template '{}' deleted", args.name))?;
    Ok(())
}
