// Entry point: parse arguments, install logging once, run the pipeline and
// print a short summary of what was written.
use clap::Parser;
use incident_cards::config::Cli;
use incident_cards::{logging, output, pipeline, util};
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = match logging::init_logging(&cli.log_config()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Fatal error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match pipeline::run(&cli.pipeline_config()) {
        Ok(summary) => {
            if let Some(load) = &summary.load {
                println!(
                    "Processing logs... ({} incident rows, {} revenue rows, {} joined)",
                    util::format_int(load.incident_rows),
                    util::format_int(load.revenue_rows),
                    util::format_int(load.joined_rows)
                );
            }
            println!(
                "{} incidents: {} cards written, {} skipped (invariant mismatch), {} skipped (format error)\n",
                util::format_int(summary.groups),
                util::format_int(summary.written),
                util::format_int(summary.integrity_skipped),
                util::format_int(summary.format_failed)
            );
            output::preview_summary(&summary.rows, cli.preview);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Fatal error");
            eprintln!("Fatal error: {}", e);
            ExitCode::FAILURE
        }
    }
}
