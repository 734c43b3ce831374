//! rOvertime main entrypoint.

use clap::Parser;
use rovertime::cli::parser::{Cli, Commands};
use rovertime::run_with;
use rovertime::ui::messages::error;

fn main() {
    let cli = Cli::parse();

    // diagnostics go through `log`; RUST_LOG overrides the default level
    let default_level = if matches!(cli.command, Commands::Serve { .. }) {
        "info"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    println!();
    if let Err(e) = run_with(cli) {
        error(format!("Error: {e}"));
        std::process::exit(1);
    }
}
