pub mod annotations;
pub mod cli;
pub mod emit;
pub mod error;
pub mod flatten;
pub mod graph;
pub mod lower;
pub mod names;
pub mod path_de;
pub mod preprocess;

use std::process::ExitCode;

use colored::Colorize;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins; otherwise `-v`/`-vv` pick the level.
fn init_tracing(verbosity: u8) {
    let filter = if std::env::var_os("RUST_LOG").is_some() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbosity {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        EnvFilter::new(level)
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let command_line_interface = cli::CommandLineInterface::load();
    init_tracing(command_line_interface.verbosity());
    match command_line_interface.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
