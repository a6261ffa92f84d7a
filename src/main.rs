//! weedscope CLI: run the detection API or analyze a single image.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use weedscope::config::load_config;
use weedscope::detection::{GrassWeedDetector, ImageSource};
use weedscope::errors::{WeedScopeError, WeedScopeResult};
use weedscope::logging::{init_logging, with_bootstrap_logging, ConsoleTarget};

#[derive(Parser)]
#[command(name = "weedscope")]
#[command(about = "Detect grass and weed in lawn photos with a hosted vision model")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve {
        /// Path to config.toml.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Analyze one image and print the report as JSON.
    Analyze(AnalyzeArgs),
}

#[derive(Debug, Clone, Args)]
struct AnalyzeArgs {
    /// Local image path, or a sample name with --sample.
    image: String,

    /// Detections kept per label; defaults to `detection.max_predictions`.
    #[arg(long)]
    top_n: Option<u32>,

    /// Path to config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read IMAGE from the sample store instead of the local disk.
    #[arg(long)]
    sample: bool,
}

#[tokio::main]
async fn main() -> WeedScopeResult<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve { config } => {
            let config = with_bootstrap_logging(|| load_config(config.as_deref()))?;
            init_logging(&config.logging, ConsoleTarget::Stdout)?;
            weedscope::run_server(config).await
        }
        Commands::Analyze(args) => run_analyze(args).await,
    }
}

async fn run_analyze(args: AnalyzeArgs) -> WeedScopeResult<()> {
    let config = with_bootstrap_logging(|| load_config(args.config.as_deref()))?;
    // stdout carries the report
    init_logging(&config.logging, ConsoleTarget::Stderr)?;

    let source = if args.sample {
        ImageSource::ByLocation(args.image.clone())
    } else {
        let data = tokio::fs::read(&args.image)
            .await
            .map_err(|e| WeedScopeError::InvalidInput(format!("reading '{}': {e}", args.image)))?;
        ImageSource::ByBytes(data)
    };

    let detector = GrassWeedDetector::from_config(&config)?;
    let top_n = args.top_n.unwrap_or(config.detection.max_predictions);
    let report = detector.analyze(source, top_n).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
