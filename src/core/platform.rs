//! Platform-specific error reporting and argument handling.

use crate::core::errors::PipelineError;

/// Report a fatal error and exit with status 1.
///
/// Pipeline errors that concern a single icon name the file first so it is
/// easy to spot in build logs.
pub fn handle_error(error: anyhow::Error) -> ! {
    eprintln!();
    match error.downcast_ref::<PipelineError>() {
        // Pipeline messages already carry their cause
        Some(pipeline_error) => {
            match pipeline_error.file() {
                Some(file) => eprintln!("Error building icon font ({}):", file.display()),
                None => eprintln!("Error building icon font:"),
            }
            eprintln!("{pipeline_error}");
        }
        None => {
            eprintln!("Error building icon font:");
            eprintln!("{error:#}");
        }
    }
    eprintln!();
    eprintln!("Try running with --help for usage information.");
    std::process::exit(1);
}

/// Parse and validate the command line arguments, exiting on invalid input.
pub fn get_cli_args() -> crate::core::cli::CliArgs {
    use clap::Parser;
    let args = crate::core::cli::CliArgs::parse();
    if let Err(message) = args.validate() {
        handle_error(anyhow::anyhow!(message));
    }
    args
}
