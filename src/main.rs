mod cli;
mod commands;
mod config;
mod error;
mod hardware;
mod output;
mod slurm;

use clap::Parser;
use cli::{Cli, Commands};
use commands::{handle_generate_command, handle_inventory_command};
use output::print_error;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.as_deref();
    let result = match &cli.command {
        Commands::Generate {
            target,
            options,
            output_dir,
        } => handle_generate_command(target, options, output_dir.as_deref(), config_path),
        Commands::Inventory { options, format } => handle_inventory_command(options, format, config_path),
    };

    if let Err(e) = result {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

// Logs go to stderr; stdout is reserved for configuration text.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
