//! mockrules - CLI entry point.
//!
//! Loads a candidate-response configuration and either validates it or
//! evaluates a recorded request snapshot against it.

use anyhow::Result;
use clap::Parser;
use mockrules::{select_response, RequestSnapshot, RouteResponses};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "mockrules",
    about = "Rule-based response selection for mock servers - pick a candidate response for a recorded request",
    version
)]
struct Args {
    /// Path to the response configuration file (YAML)
    #[arg(short, long, default_value = "responses.yaml")]
    config: PathBuf,

    /// Request snapshot to evaluate (YAML, or JSON by extension);
    /// prints the chosen response as JSON
    #[arg(short, long)]
    request: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, default_value = "info")]
    log_level: Level,

    /// Validate configuration and exit
    #[arg(long)]
    validate: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!(path = ?args.config, "Loading configuration");
    let config = RouteResponses::from_file(&args.config)?;

    if args.validate {
        println!(
            "Configuration is valid ({} responses defined)",
            config.responses.len()
        );
        return Ok(());
    }

    let Some(request_path) = args.request else {
        anyhow::bail!("Nothing to do: pass --request to evaluate a snapshot, or --validate");
    };

    let content = std::fs::read_to_string(&request_path)?;
    let snapshot: RequestSnapshot = if request_path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
    {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };

    let chosen = select_response(&config.responses, &snapshot, config.random_response)?;
    println!("{}", serde_json::to_string_pretty(chosen)?);

    Ok(())
}
