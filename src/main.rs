//! Remedia CLI — the thin presentation collaborator around the
//! orchestration core. Owns everything the core does not: environment
//! loading, tracing setup, the upload slot, and terminal rendering.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use remedia::pipeline::ProcessError;
use remedia::{build_orchestrator, config, uploads, AppConfig, Consultation};

const DISCLAIMER: &str = "DISCLAIMER: The information provided here is for educational purposes \
     only and should not be considered medical advice. Always consult with a qualified \
     healthcare professional before starting any treatment or taking any medication.";

#[derive(Parser)]
#[command(name = "remedia")]
#[command(about = "Identify a medical condition and aggregate multi-tradition remedies", long_about = None)]
#[command(version = config::APP_VERSION)]
struct Cli {
    /// Symptom description or medical question.
    #[arg(long, conflicts_with = "document")]
    query: Option<String>,

    /// Path to a scanned medical document image.
    #[arg(long)]
    document: Option<PathBuf>,

    /// Emit the consultation as JSON instead of formatted text.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let orchestrator = build_orchestrator(&config);

    // An uploaded document moves through the single-slot upload dir:
    // purge the previous upload, persist the new bytes, then hand the
    // stored path to the orchestrator.
    let document = match &cli.document {
        Some(source) => {
            let staged = stage_document(source);
            match staged {
                Ok(path) => Some(path),
                Err(e) => {
                    eprintln!("Could not read document {}: {e}", source.display());
                    return ExitCode::FAILURE;
                }
            }
        }
        None => None,
    };

    let result = orchestrator
        .process(cli.query.as_deref(), document.as_deref())
        .await;

    match result {
        Ok(consultation) => {
            if cli.json {
                match serde_json::to_string_pretty(&consultation) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("Failed to serialize consultation: {e}");
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                render(&consultation);
            }
            ExitCode::SUCCESS
        }
        Err(e @ ProcessError::NoInput) => {
            // Mirror clap usage errors for the empty-invocation case.
            eprintln!("{e}");
            eprintln!("Provide --query <text> or --document <path>.");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn stage_document(source: &Path) -> std::io::Result<PathBuf> {
    let bytes = std::fs::read(source)?;
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    let dir = config::uploads_dir();
    uploads::purge_uploads(&dir)?;
    uploads::persist_upload(&dir, &name, &bytes)
}

fn render(consultation: &Consultation) {
    println!("Identified Condition: {}", consultation.condition);
    println!();
    println!("{DISCLAIMER}");

    for (category, entry) in &consultation.remedies {
        println!();
        println!("== {} remedies ==", category);
        println!("{}", entry.description);
        if entry.images.is_empty() {
            println!("No images found for this remedy.");
        } else {
            println!("Remedy images:");
            for url in &entry.images {
                println!("  {url}");
            }
        }
    }

    println!();
    println!("== Expert review ==");
    println!("{}", consultation.review);
}
