mod classifier;
mod config;
mod enricher;
mod model;
mod normalizer;
mod pipeline;
mod resolver;
mod scoring;
mod search;
mod window;

use clap::Parser;
use classifier::LlmClassifier;
use config::AppConfig;
use enricher::LinkEnricher;
use search::SearchChain;
use std::fs;
use std::path::PathBuf;
use tracing::error;

/// Batch classify visa sponsorship, enrich apply_link, and filter out 'No'.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Process a single JSON file (array or JSONL). If omitted, process all
    /// *.json in INPUT_DIR.
    #[arg(long)]
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config error: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = fs::create_dir_all(&config.output_dir) {
        error!(
            "Failed to create output dir {}: {}",
            config.output_dir.display(),
            e
        );
        std::process::exit(1);
    }

    let llm = LlmClassifier::new(config.openai_api_key.clone(), config.openai_model.clone());
    let enricher = LinkEnricher::new(SearchChain::from_config(&config));

    if let Some(file) = cli.file {
        if !file.exists() {
            error!("File not found: {}", file.display());
            std::process::exit(1);
        }
        match pipeline::process_file(&file, &config.output_dir, &llm, &enricher).await {
            Ok(report) => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).unwrap_or_default()
                );
            }
            Err(e) => {
                error!("Processing {} failed: {}", file.display(), e);
                std::process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = fs::create_dir_all(&config.input_dir) {
        error!(
            "Failed to create input dir {}: {}",
            config.input_dir.display(),
            e
        );
        std::process::exit(1);
    }

    let summary =
        match pipeline::process_dir(&config.input_dir, &config.output_dir, &llm, &enricher).await {
            Ok(reports) => reports,
            Err(e) => {
                error!(
                    "Failed to read input dir {}: {}",
                    config.input_dir.display(),
                    e
                );
                std::process::exit(1);
            }
        };

    println!("\n=== SUMMARY ===");
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).unwrap_or_default()
    );
}
