//! # News Feed Digest
//!
//! A daily news digest pipeline: it searches Naver News for configured
//! keyword groups, filters and deduplicates the results, sorts them into
//! report sections, prints the digest, and optionally sends it to a
//! Telegram chat.
//!
//! ## Usage
//!
//! ```sh
//! news_feed_digest -c ./digest.yaml
//! ```
//!
//! ## Architecture
//!
//! 1. **Guard**: optionally skip weekends and configured holidays
//! 2. **Fetching**: page through each query group with one search strategy
//! 3. **Filtering**: normalize, drop stale items, apply keyword rules
//! 4. **Dedup**: exact URL, then near-duplicate summaries
//! 5. **Output**: render sections, print, send to Telegram

use chrono::Local;
use clap::Parser;
use reqwest::Client;
use std::error::Error;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod dedup;
mod digest;
mod error;
mod filter;
mod models;
mod normalize;
mod notify;
mod pipeline;
mod schedule;
mod sources;
mod utils;

use cli::Cli;
use config::{Config, SourceKind};
use notify::{NotifyOutcome, send_digest};
use sources::naver_api::NaverApiSource;
use sources::naver_html::{DESKTOP, MOBILE, NaverHtmlSource};

#[tokio::main(flavor = "current_thread")]
#[instrument]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("news_feed_digest starting up");

    let args = Cli::parse();
    let credentials = args.credentials();
    debug!(?args.config, ?credentials, "Parsed CLI arguments");

    let config = Config::load(args.config.as_deref())?;
    let now = Local::now();

    if let Some(reason) = schedule::skip_reason(now.date_naive(), &config.schedule) {
        info!(%reason, exit_code = config.schedule.skip_exit_code, "No digest today");
        return Ok(ExitCode::from(config.schedule.skip_exit_code));
    }

    let client = Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;

    // ---- Fetch, filter, dedupe, classify ----
    let digest = match (config.source, credentials.naver.clone()) {
        (SourceKind::Api, Some(naver)) => {
            let source = NaverApiSource::new(&client, config.endpoints.naver_api.clone(), naver);
            pipeline::run(&source, &config, now).await
        }
        (SourceKind::Api, None) => {
            warn!("Naver API credentials missing; falling back to desktop HTML search");
            let source = NaverHtmlSource::new(&client, &config.endpoints.naver_search, &DESKTOP)?;
            pipeline::run(&source, &config, now).await
        }
        (SourceKind::Html, _) => {
            let source = NaverHtmlSource::new(&client, &config.endpoints.naver_search, &DESKTOP)?;
            pipeline::run(&source, &config, now).await
        }
        (SourceKind::MobileHtml, _) => {
            let source = NaverHtmlSource::new(&client, &config.endpoints.naver_mobile_search, &MOBILE)?;
            pipeline::run(&source, &config, now).await
        }
    };
    info!(articles = digest.article_count(), sections = digest.sections.len(), "Digest assembled");

    // ---- Output ----
    let text = digest::render(&digest, &config.report);
    let rule = "-".repeat(30);
    println!("{rule}\n{text}\n{rule}");

    let outcome = send_digest(
        &client,
        &config.endpoints.telegram_api,
        credentials.telegram.as_ref(),
        &config.notify,
        &text,
    )
    .await;
    if outcome == NotifyOutcome::Failed {
        warn!("Digest was printed but not delivered");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        ?outcome,
        "Execution complete"
    );

    Ok(ExitCode::SUCCESS)
}
