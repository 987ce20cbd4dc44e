use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use lvlua::config::{create_example_config, LvluaConfig};
use lvlua::logging::init_logging;
use lvlua::runner::{run_script, symbols, RunOptions};

#[derive(Parser)]
#[command(version = env!("VERSION_STRING"), about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a script against a simulated display
    Run {
        /// Lua script to run
        script: PathBuf,

        /// Click the widget stored in this global after the script finishes (repeatable)
        #[arg(long = "click", value_name = "GLOBAL")]
        clicks: Vec<String>,

        /// Print the object tree when done
        #[arg(long)]
        dump: bool,
    },
    /// List every global the bindings install
    Symbols,
    /// Write an example config file
    InitConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = LvluaConfig::load_or_default(cli.config.as_deref())?;
    let _guard = init_logging(&config.logging).context("Failed to initialize logging")?;

    info!(target: "runner", "lvlua {}", env!("VERSION_STRING"));

    match cli.command {
        Command::Run {
            script,
            clicks,
            dump,
        } => {
            let options = RunOptions { clicks, dump };
            if let Some(tree) = run_script(&config, &script, &options)? {
                print!("{}", tree);
            }
        }
        Command::Symbols => {
            for symbol in symbols()?.symbols {
                println!("{:<10} {}", symbol.kind, symbol.name);
            }
        }
        Command::InitConfig => {
            let path = match cli.config {
                Some(path) => path,
                None => LvluaConfig::config_path()
                    .ok_or_else(|| anyhow!("Could not determine config directory"))?,
            };
            create_example_config(&path).map_err(|e| anyhow!("{}", e))?;
            eprintln!("Config file created at: {}", path.display());
        }
    }

    Ok(())
}
