//! Builds an icon web font and a TypeScript module from a directory of SVG
//! icons.

use anyhow::{Context, Result};
use iconforge::core;
use iconforge::font::FontcGenerator;
use iconforge::logging;
use iconforge::pipeline::Pipeline;

/// Run the pipeline with the given CLI arguments.
fn run_app(cli_args: core::cli::CliArgs) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    let pipeline = Pipeline::new(cli_args.to_config());
    let generator = FontcGenerator::with_executable(&cli_args.fontc);
    let report = runtime.block_on(pipeline.run(&generator))?;

    tracing::info!(
        "Built {} icons into {}",
        report.glyphs.len(),
        report.module_path.display()
    );
    Ok(())
}

fn main() {
    let cli_args = core::platform::get_cli_args();
    if let Err(error) = logging::init() {
        eprintln!("{error:#}");
    }
    match run_app(cli_args) {
        Ok(()) => {}
        Err(error) => core::platform::handle_error(error),
    }
}
