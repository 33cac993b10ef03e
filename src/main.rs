//! gitlike-config
//!
//! Inspect and edit layered JSON configuration from the shell.

use anyhow::Result;
use clap::Parser;
use gitlike_config::cli::{self, Cli};
use gitlike_config::logging::init_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log, cli.verbose)?;
    cli::run(&cli)
}
