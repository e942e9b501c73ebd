//! # Post Factory
//!
//! A news-to-post pipeline: pick a topic and a writing-style preset, fetch
//! a handful of recent articles from the Google News search feed (optionally
//! from both the domestic and the English edition), and have a hosted
//! text-generation service turn them into a styled social-media post shown
//! alongside the source links and lead images. A companion subcommand
//! renders a market quote board for a fixed set of indices, commodities,
//! and cryptocurrencies.
//!
//! ## Usage
//!
//! ```sh
//! post_factory post --topic bitcoin --style hype-ant -n 3
//! post_factory quotes
//! ```
//!
//! ## Architecture
//!
//! One run is a single request/response cycle:
//! 1. **Resolve**: topic label or free text to a keyword; style preset or
//!    file to a style text
//! 2. **Index**: query the search feed for entries
//! 3. **Fetch**: download and extract articles concurrently, quality-gated
//! 4. **Assemble**: directive + article data + style into one instruction
//! 5. **Generate**: one call to the text-generation service
//! 6. **Present**: Markdown to the terminal, optional JSON bundle to disk

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod pipeline;
mod prompt;
mod quotes;
mod scrapers;
mod utils;

use api::GeminiClient;
use cli::{Cli, Command, PostArgs};
use config::AppConfig;
use error::PipelineError;
use models::PostRequest;
use outputs::{json, markdown};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("post_factory starting up");

    let args = Cli::parse();
    debug!(?args.config, "Parsed CLI arguments");
    let config = AppConfig::load(args.config.as_deref())?;

    match args.command {
        Command::Post(post_args) => run_post(&config, post_args).await?,
        Command::Quotes => run_quotes(&config).await,
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, "Execution complete");
    Ok(())
}

async fn run_post(config: &AppConfig, args: PostArgs) -> Result<(), Box<dyn Error>> {
    let style_text = pipeline::resolve_style(
        config,
        args.style.as_deref(),
        args.style_file.as_deref(),
    )?;
    if args.show_style {
        println!("{}", style_text.trim());
        return Ok(());
    }

    let keyword =
        pipeline::resolve_keyword(config, args.topic.as_deref(), args.keyword.as_deref())?;
    let request = PostRequest {
        keyword,
        style_text,
        count: usize::from(args.count),
        bilingual: args.english,
        credential: args.api_key.unwrap_or_default(),
    };

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.fetch.timeout_secs))
        .user_agent(config.fetch.user_agent.clone())
        .build()?;
    let generator = GeminiClient::new(
        &config.generation,
        &config.fetch.user_agent,
        &request.credential,
    )?;

    match pipeline::run(request, config, &http, &generator).await {
        Ok(bundle) => {
            println!("{}", markdown::render_bundle(&bundle));
            if let Some(dir) = &args.json_output_dir {
                if let Err(e) = json::write_bundle(&bundle, dir).await {
                    error!(error = %e, "Failed to write JSON bundle");
                }
            }
            Ok(())
        }
        Err(PipelineError::NoArticles { report }) => {
            // A dry topic is a warning, not a crash.
            warn!(
                considered = report.considered,
                skipped = report.skipped.len(),
                "No usable articles were found for this keyword"
            );
            println!(
                "No usable articles found ({} candidate(s) considered). \
Try another keyword or lower the quality threshold.",
                report.considered
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn run_quotes(config: &AppConfig) {
    let board = quotes::fetch_board(&config.quotes).await;
    if board.is_empty() {
        println!("Market data unavailable right now. Try again in a moment.");
        return;
    }
    println!("{}", markdown::render_quotes(&board));
}
