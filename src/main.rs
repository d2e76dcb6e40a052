use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use drawcheck::config::HarnessConfig;
use drawcheck::{ContractRunner, report};

#[derive(Parser)]
#[command(name = "drawcheck")]
#[command(
    about = "Replay the card game API contract against a running server",
    long_about = None
)]
struct Cli {
    /// Server root, without the /api suffix (default: http://localhost:3000)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// JSON file overriding fixtures and settings
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Also write results and summary as JSON
    #[arg(long, value_name = "PATH")]
    json_report: Option<PathBuf>,

    /// Exit non-zero when any contract case failed
    #[arg(long)]
    strict: bool,
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    if let Some(url) = cli.base_url {
        config = config.with_base_url(url);
    }

    let mut runner = ContractRunner::new(config)?;
    runner.run_all();
    let summary = runner.summary();

    if let Some(path) = &cli.json_report {
        report::write_json_report(path, runner.api_base(), &summary, runner.results())?;
        println!("\nJSON report saved to: {}", path.display());
    }

    if cli.strict && summary.failed > 0 {
        anyhow::bail!(
            "{} of {} contract cases failed",
            summary.failed,
            summary.total
        );
    }
    Ok(())
}
