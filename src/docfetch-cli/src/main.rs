use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use docfetch::{codec, Bson, CallOptions, Client, OperationResult};
use docfetch_core::Config;

mod telemetry;

/// Run a single Data API action and print the response as Extended JSON
#[derive(Debug, Parser)]
#[command(name = "docfetch-cli", version)]
struct Args {
    /// JSON config file
    #[arg(short, long, default_value = "config.json", conflicts_with = "from_env")]
    config: PathBuf,

    /// Read configuration from DOCFETCH_* environment variables instead
    #[arg(long)]
    from_env: bool,

    /// Tracing label sent with the request
    #[arg(short, long, env = "DOCFETCH_LABEL")]
    label: Option<String>,

    /// Directory for JSON log files
    #[arg(long, default_value = "./logs")]
    log_dir: PathBuf,

    database: String,

    collection: String,

    /// Action name, e.g. findOne, insertMany, aggregate
    action: String,

    /// Request body as Extended JSON, merged with the namespace fields
    #[arg(default_value = "{}")]
    body: String,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let _guard = telemetry::init_telemetry(&args.log_dir)?;

    let config = if args.from_env {
        Config::from_env().context("failed to read DOCFETCH_* environment")?
    } else {
        Config::load(&args.config)
            .with_context(|| format!("failed to load {}", args.config.display()))?
    };

    tracing::info!("docfetch starting");
    tracing::info!("  Endpoint: {}", config.endpoint);
    tracing::info!("  Data source: {}", config.data_source);
    tracing::info!("  Action: {} on {}.{}", args.action, args.database, args.collection);

    let client = Client::from_config(&config)?;
    let body = codec::decode_document(&args.body).context("BODY must be an Extended JSON object")?;

    let collection = client.db(&args.database).collection(&args.collection);
    let options = CallOptions {
        label: args.label.clone(),
    };
    let outcome: OperationResult<Bson> = collection.call_api(&args.action, body, options).await?;

    match outcome {
        Ok(payload) => {
            println!("{}", codec::to_relaxed_string(payload)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            tracing::warn!(code = error.code, "Data API error: {}", error.message);
            eprintln!("error {}: {}", error.code, error.message);
            Ok(ExitCode::FAILURE)
        }
    }
}
