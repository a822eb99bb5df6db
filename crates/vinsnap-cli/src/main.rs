mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use logging::{LogFormat, init_logging};
use thiserror::Error;
use vinsnap_core::{DEFAULT_OUTPUT_PATH, Error as CoreError, ExportConfig};
use vinsnap_export::{DEFAULT_PORT, ExportSummary, MySqlSource, export_snapshot};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "vinsnap",
    version,
    about = "Export the wine catalogue to a static JSON snapshot"
)]
struct Cli {
    /// Destination file, replaced on every successful run.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_OUTPUT_PATH)]
    out: PathBuf,
    /// Dotenv-style file supplying DB_HOST, DB_USER, DB_PASS and DB_NAME when
    /// they are not set in the environment.
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(err) = init_logging(LogFormat::from_env()) {
        eprintln!("warning: {err}");
    }

    match run_export(&cli).await {
        Ok(summary) => {
            println!("Wrote {} rows to {}", summary.rows, summary.path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error generating JSON: {err}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<ExportConfig, CliError> {
    let config = match &cli.env_file {
        Some(path) => ExportConfig::from_env_with_file(path)?,
        None => ExportConfig::from_env()?,
    };
    Ok(config)
}

async fn run_export(cli: &Cli) -> Result<ExportSummary, CliError> {
    let config = load_config(cli)?;
    tracing::info!(event = "config_loaded", endpoint = %config.redacted(DEFAULT_PORT));

    export_with_config(&config, &cli.out).await
}

/// Connect, export and close. The session is closed whether or not the
/// export succeeded.
async fn export_with_config(
    config: &ExportConfig,
    out: &Path,
) -> Result<ExportSummary, CliError> {
    let timer = Instant::now();

    let mut source = MySqlSource::connect(config).await?;
    let outcome = export_snapshot(&mut source, out).await;
    source.close().await;
    let summary = outcome?;

    let duration_ms = timer.elapsed().as_millis();
    tracing::info!(
        event = "run_finished",
        status = "success",
        rows = summary.rows,
        duration_ms = duration_ms
    );

    Ok(summary)
}
