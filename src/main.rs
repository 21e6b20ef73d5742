use clap::Parser;
use microbatch::application::config::BatchConfig;
use microbatch::application::engine::BatchEngine;
use microbatch::infrastructure::processor::payload_flag_processor;
use microbatch::interfaces::csv::job_reader::JobReader;
use microbatch::interfaces::csv::outcome_writer::OutcomeWriter;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input jobs CSV file (columns: id, fail)
    input: PathBuf,

    /// Maximum number of jobs dispatched per tick
    #[arg(long, default_value_t = 50)]
    batch_size: usize,

    /// Dispatch timer period in milliseconds
    #[arg(long, default_value_t = 500)]
    interval_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = BatchConfig::new(cli.batch_size, Duration::from_millis(cli.interval_ms))
        .into_diagnostic()?;
    let engine = BatchEngine::new(Box::new(payload_flag_processor()), config);

    // Submit jobs as they stream in; bad records are reported and skipped.
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = JobReader::new(file);
    let mut handles = Vec::new();
    for job_result in reader.jobs() {
        match job_result {
            Ok(job) => match engine.submit_job(job).await {
                Ok(handle) => handles.push(handle),
                Err(e) => eprintln!("Error submitting job: {}", e),
            },
            Err(e) => eprintln!("Error reading job: {}", e),
        }
    }

    // Drain everything that was accepted, then collect per-job outcomes.
    let _ = engine.shutdown().await;
    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        outcomes.push(handle.outcome().await);
    }

    let stdout = io::stdout();
    let mut writer = OutcomeWriter::new(stdout.lock());
    writer.write_outcomes(outcomes).into_diagnostic()?;

    Ok(())
}
