mod backends;
mod cli;
mod config;
mod error;
mod platform;
mod profile;
mod run;
mod runlog;
mod runner;
mod utils;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    run::run(&cli)
}
