use clap::Parser;
use dirsort::cli::{Cli, exit_code, run_cli};
use dirsort::logging::setup_logging;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Held until exit so the file sink is flushed
    let _guard = match setup_logging(&cli.log_settings()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("--- Starting File Organizer ---");
    let outcome = run_cli(&cli);
    tracing::info!("--- File Organizer Finished ---");

    exit_code(&cli, &outcome)
}
