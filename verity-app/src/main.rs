use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use verity_check::{VerificationRequest, VerificationResult};
use verity_common::observability::{LogFormat, init_logging};
mod wiring;

#[derive(Parser)]
#[command(name = "verity", author, version, about = "Heuristic verification of claims and web articles", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./verity.yaml, then the user config dir)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Log encoding for the file sink: text or json
    #[arg(long, global = true, value_name = "FORMAT")]
    log_format: Option<LogFormat>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a URL or a piece of text and print the verdict as JSON
    Verify {
        /// Page to fetch and analyze; wins over --text
        #[arg(long)]
        url: Option<String>,
        /// Literal claim to analyze
        #[arg(long)]
        text: Option<String>,
        /// JSON request `{"text": .., "url": ..}` read from a file, or `-` for stdin
        #[arg(long, value_name = "FILE|-", conflicts_with_all = ["url", "text"])]
        request: Option<PathBuf>,
        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,
    },
    /// Report whether a URL belongs to a trusted domain
    Trust {
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins)
    let cfg = wiring::load_config(cli.config.as_deref())?;

    // 2) Logging goes to the file sink (and stderr if configured); stdout carries results
    let log_path = init_logging("verity", &wiring::log_settings(&cfg, cli.log_format))?;
    tracing::debug!(log = %log_path.display(), "logging initialised");

    match cli.command {
        Commands::Verify {
            url,
            text,
            request,
            pretty,
        } => {
            let request = match request {
                Some(path) => read_request(&path)?,
                None => VerificationRequest { text, url },
            };
            let validated = request.validate()?;

            let pipeline = wiring::build_pipeline(&cfg)?;
            let result = pipeline.verify(validated).await;
            print_result(&result, pretty)?;
        }
        Commands::Trust { url } => {
            let trusted = wiring::trust_policy(&cfg).is_trusted(&url);
            println!(
                "{}",
                serde_json::json!({ "url": url, "is_trusted_source": trusted })
            );
        }
    }

    Ok(())
}

fn read_request(path: &Path) -> Result<VerificationRequest> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read request from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read request file {}", path.display()))?
    };
    serde_json::from_str(&raw).context("request is not a valid JSON object")
}

fn print_result(result: &VerificationResult, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{out}");
    Ok(())
}
