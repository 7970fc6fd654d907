use anyhow::{anyhow, Result};
use casetables::{config::Config, export::export_tables, pipeline, PipelineError};
use clap::Parser;
use std::{panic, process::ExitCode};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> ExitCode {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    // ─── 2) configure ────────────────────────────────────────────────
    let config = Config::parse();
    info!(
        input = %config.input.display(),
        output_dir = %config.output_dir.display(),
        format = ?config.format,
        "startup"
    );

    // ─── 3) run, reporting one failure reason ────────────────────────
    let outcome = panic::catch_unwind(|| run(&config))
        .unwrap_or_else(|_| Err(anyhow!("pipeline panicked")));
    match outcome {
        Ok(()) => {
            info!("pipeline finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e.downcast_ref::<PipelineError>() {
                Some(PipelineError::MissingInput(path)) => {
                    error!(
                        "input file {} not found; generate one with `gen_mock` first",
                        path.display()
                    );
                }
                _ => error!("pipeline failed: {:?}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<()> {
    let start = std::time::Instant::now();

    let output = pipeline::run_file(&config.input)?;
    let tables = output.tables()?;
    let written = export_tables(&tables, &config.output_dir, config.format)?;

    info!(files = written.len(), elapsed = ?start.elapsed(), "export complete");
    Ok(())
}
