//! Main entry point for datafingerprint CLI

use clap::Parser;
use datafingerprint::cli::Cli;
use datafingerprint::commands::execute_command;

fn main() {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG still overrides per module
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = execute_command(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
