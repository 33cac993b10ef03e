//! CLI command definitions for gitlike-config
//!
//! Each subcommand opens a store with the global options and runs one
//! store operation against it.

pub mod delete;

use crate::config::{ConfigStore, Layer, StoreOptions};
use crate::logging::LogTarget;
use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use delete::DeleteArgs;
use serde_json::Value;
use std::path::PathBuf;

/// Which view of the configuration to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ShowLayer {
    /// Merged configuration (default)
    #[default]
    Effective,
    Defaults,
    Global,
    Local,
}

/// Layered JSON configuration for command-line tools
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Application name; selects `<config dir>/<name>/config.json` and `.<name>.config.json`
    #[arg(short, long, global = true, default_value = "gitlike-config")]
    pub name: String,

    /// Directory used instead of the platform config directory
    #[arg(long, global = true)]
    pub config_home: Option<PathBuf>,

    /// Only look for the local config in the current directory
    #[arg(long, global = true)]
    pub no_parent_search: bool,

    /// Default values as a JSON object
    #[arg(long, global = true)]
    pub defaults: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: LogTarget,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the configuration
    Show {
        #[arg(long, value_enum, default_value_t)]
        layer: ShowLayer,
    },

    /// Print a single value
    Get {
        /// Dotted key path, e.g. `editor.tabs`
        key: String,

        /// JSON value printed when the key is not set
        #[arg(long)]
        default: Option<String>,
    },

    /// Set a value (parsed as JSON, otherwise stored as a string)
    Set(SetArgs),

    /// Remove a value
    Unset {
        key: String,

        /// Edit the global config instead of the local one
        #[arg(short, long)]
        global: bool,
    },

    /// Create an empty local config in the current directory
    Init,

    /// Delete a config file
    Delete(DeleteArgs),

    /// Print the path of a config file
    Path {
        /// Print the global config path instead of the local one
        #[arg(short, long)]
        global: bool,
    },
}

/// Arguments for the set command.
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Dotted key path, e.g. `editor.tabs`
    pub key: String,

    pub value: String,

    /// Edit the global config instead of the local one
    #[arg(short, long)]
    pub global: bool,
}

/// Parse a command-line value as JSON, falling back to a plain string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Build the store described by the global options.
pub fn open_store(cli: &Cli) -> Result<ConfigStore> {
    let mut options = StoreOptions::new(cli.name.clone()).look_in_parent_dirs(!cli.no_parent_search);
    if let Some(home) = &cli.config_home {
        options = options.with_config_home(home);
    }
    if let Some(defaults) = &cli.defaults {
        let defaults: Value =
            serde_json::from_str(defaults).context("--defaults must be a JSON object")?;
        options = options.with_defaults(defaults);
    }
    ConfigStore::new(options).context("failed to open configuration")
}

fn print_value(value: &Value) -> Result<()> {
    match value {
        Value::String(s) => println!("{}", s),
        other => println!("{}", serde_json::to_string_pretty(other)?),
    }
    Ok(())
}

/// Run the selected subcommand.
pub fn run(cli: &Cli) -> Result<()> {
    let mut store = open_store(cli)?;

    match &cli.command {
        Command::Show { layer } => {
            let value = match layer {
                ShowLayer::Effective => store.effective_config().clone(),
                ShowLayer::Defaults => Value::Object(store.layer(Layer::Defaults).clone()),
                ShowLayer::Global => Value::Object(store.layer(Layer::Global).clone()),
                ShowLayer::Local => Value::Object(store.layer(Layer::Local).clone()),
            };
            print_value(&value)?;
        }
        Command::Get { key, default } => match (store.get(key.as_str())?, default) {
            (Some(value), _) => print_value(value)?,
            (None, Some(default)) => print_value(&parse_value(default))?,
            (None, None) => bail!("'{}' is not set", key),
        },
        Command::Set(args) => {
            let value = parse_value(&args.value);
            if args.global {
                store.set_global(args.key.as_str(), value)?;
            } else {
                store.set(args.key.as_str(), value)?;
            }
        }
        Command::Unset { key, global } => {
            let removed = if *global {
                store.unset_global(key.as_str())?
            } else {
                store.unset(key.as_str())?
            };
            if !removed {
                println!("'{}' was not set", key);
            }
        }
        Command::Init => {
            if store.init_local_config()? {
                println!("Created {}", store.local_config_path().display());
            } else {
                println!(
                    "Local config already exists at {}",
                    store.local_config_path().display()
                );
            }
        }
        Command::Delete(args) => delete::run_delete(&mut store, args)?,
        Command::Path { global } => {
            let path = if *global {
                store.global_config_path()
            } else {
                store.local_config_path()
            };
            println!("{}", path.display());
        }
    }

    Ok(())
}
