//! structgen CLI entry point.

use clap::Parser;
use structgen::cli::{self, Cli, Commands, EXIT_ERROR};
use structgen::logging;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match &cli.command {
        Commands::Interface(args) => cli::run_interface(args),
        Commands::Accessors(args) => cli::run_accessors(args),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            cli::report_error(&e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
