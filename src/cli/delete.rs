//! Delete command with an interactive confirmation prompt.

use crate::config::{ConfigStore, DeleteTrigger};
use crate::error::{ConfigError, ConfigResult};
use anyhow::Result;
use clap::Args;
use std::io::Write;
use std::path::Path;

/// Arguments for the delete command.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Delete the global config instead of the local one
    #[arg(short, long)]
    pub global: bool,

    /// Delete without prompting for confirmation.
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Run the delete command.
pub fn run_delete(store: &mut ConfigStore, args: &DeleteArgs) -> Result<()> {
    let path = if args.global {
        store.global_config_path()
    } else {
        store.local_config_path()
    };
    if !path.exists() {
        println!("Nothing to delete: '{}' does not exist.", path.display());
        return Ok(());
    }

    match (args.global, args.yes) {
        (true, true) => store.delete_global_config()?,
        (false, true) => store.delete_local_config()?,
        (true, false) => store.delete_global_config_with(confirm_on_stdin)?,
        (false, false) => store.delete_local_config_with(confirm_on_stdin)?,
    }
    Ok(())
}

/// Ask on stdin before firing the trigger.
fn confirm_on_stdin(path: &Path, trigger: DeleteTrigger<'_>) -> ConfigResult<()> {
    print!("Delete '{}'? [y/N] ", path.display());
    std::io::stdout()
        .flush()
        .map_err(|e| ConfigError::io(path, e))?;

    let mut input = String::new();
    std::io::stdin()
        .read_line(&mut input)
        .map_err(|e| ConfigError::io(path, e))?;

    if !input.trim().eq_ignore_ascii_case("y") {
        println!("Deletion cancelled.");
        return Ok(());
    }

    trigger.delete()?;
    println!("Deleted '{}'.", path.display());
    Ok(())
}
