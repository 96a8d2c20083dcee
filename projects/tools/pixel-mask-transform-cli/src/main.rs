#![allow(unexpected_cfgs)]
#![cfg(not(tarpaulin_include))]

mod commands;
mod error;
mod util;
use argh::FromArgs;
use core::error::Error;

#[derive(FromArgs, Debug)]
/// Runs the pixel transform variants over the images in a directory
struct TopLevel {
    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Commands {
    Run(commands::run::RunCmd),
    Inspect(commands::inspect::InspectCmd),
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli: TopLevel = argh::from_env();

    match cli.command {
        Commands::Run(cmd) => {
            commands::run::handle_run_command(cmd)?;
        }
        Commands::Inspect(cmd) => {
            commands::inspect::handle_inspect_command(cmd)?;
        }
    }

    Ok(())
}
