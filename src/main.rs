use clap::Parser;
use log::*;
use std::process::ExitCode;

mod analyzer;
mod cli;
mod clients;
mod command;
mod config;
mod error;
mod provider;
mod repo;
mod upgrader;

use crate::error::Result;

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("neukeeper")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = color_eyre::install() {
        eprintln!("{err}");
        return ExitCode::from(command::EXIT_ERROR);
    }

    let args = cli::Args::parse();

    if let Err(err) = initialize_logger(args.debug) {
        eprintln!("{err}");
        return ExitCode::from(command::EXIT_ERROR);
    }

    match command::upgrade::run(&args).await {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            error!("{err}");
            ExitCode::from(command::EXIT_ERROR)
        }
    }
}
