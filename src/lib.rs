pub mod config;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod process;
pub mod schema;

pub use error::PipelineError;
pub use pipeline::{run, run_file, OutputTable, PipelineOutput};

/// Route `tracing` output into the test harness, once per process.
#[cfg(test)]
pub(crate) fn init_test_logging() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,casetables=debug")),
        )
        .with_test_writer()
        .finish();
    // already set by another test
    let _ = tracing::subscriber::set_global_default(subscriber);
}
