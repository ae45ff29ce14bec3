use clap::Parser;
use shelve::config::Cli;
use shelve::Config;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        // Log stream on stderr; stdout stays clean for --summary-json.
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from(cli);

    let stats = shelve::commands::organize::run(&config)?;

    if config.summary_json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }

    // Partial failure is visible in the exit status, not just the log.
    if stats.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
