//! # Kakao News Digest
//!
//! A keyword news digest pipeline that scrapes recent Google News headlines,
//! summarizes the ones not yet delivered through the Gemini API, and sends
//! the digest to the operator's own KakaoTalk account.
//!
//! ## Features
//!
//! - Scrapes up to 10 headlines (with article links where resolvable) from
//!   the Google News search results for a keyword
//! - Deduplicates against a newline-delimited history file so a headline is
//!   only ever delivered once across runs
//! - Summarizes new headlines through the Gemini `generateContent` API
//! - Delivers the digest via the KakaoTalk "send to me" webhook, refreshing
//!   the OAuth access token at most once when a send is rejected
//!
//! ## Usage
//!
//! ```sh
//! kakao_news_digest "semiconductors"
//! ```
//!
//! ## Architecture
//!
//! One sequential pipeline per invocation (run it from cron):
//! 1. **Load**: Read the sent-headline history into a set
//! 2. **Scrape**: Fetch and parse the news search results
//! 3. **Filter**: Drop headlines already in history, preserving scrape order
//! 4. **Summarize**: One Gemini call over the remaining headlines
//! 5. **Send**: Deliver to KakaoTalk, then append the headlines to history

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod cli;
mod history;
mod messenger;
mod models;
mod scrapers;
mod token;
mod utils;

use api::GeminiClient;
use cli::Cli;
use history::{filter_new, HistoryStore};
use messenger::{deliver, KakaoApi, SendOutcome};
use token::TokenStore;
use utils::{digest_message, local_date};

#[tokio::main]
#[instrument]
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
    info!("kakao_news_digest starting up");

    // Load .env before parsing so the env-backed credential args see it
    if dotenvy::dotenv().is_ok() {
        debug!("Loaded environment from .env");
    }

    // Parse CLI (exits with a usage error when credentials are missing)
    let args = Cli::parse();
    debug!(keyword = %args.keyword, history_file = %args.history_file, token_file = %args.token_file, limit = args.limit, "Parsed CLI arguments");

    // ---- Load history ----
    let history = HistoryStore::new(&args.history_file);
    let seen = match history.load().await {
        Ok(seen) => seen,
        Err(e) => {
            error!(path = %args.history_file, error = %e, "Failed to read history file");
            return Ok(());
        }
    };
    info!(count = seen.len(), "Previously sent headlines loaded");

    // ---- Scrape ----
    let scraped = match scrapers::google_news::scrape_headlines(&args.keyword, args.limit).await {
        Ok(headlines) => headlines,
        Err(e) => {
            error!(keyword = %args.keyword, error = %e, "Scrape failed; nothing to summarize");
            return Ok(());
        }
    };
    if scraped.is_empty() {
        info!(keyword = %args.keyword, "No headlines scraped; nothing to do");
        return Ok(());
    }
    for headline in &scraped {
        debug!(title = %headline.title, link = headline.link.as_deref().unwrap_or("-"), "Scraped headline");
    }

    // ---- Filter against history ----
    let fresh = filter_new(scraped, &seen);
    if fresh.is_empty() {
        info!(keyword = %args.keyword, "All scraped headlines were already sent; nothing to do");
        return Ok(());
    }
    info!(count = fresh.len(), "New headlines found");

    // ---- Summarize ----
    let gemini = GeminiClient::new(args.gemini_api_key.clone(), args.model.clone());
    let summary = match gemini.summarize(&fresh).await {
        Ok(summary) => summary,
        Err(e) => {
            // History stays untouched so these headlines are retried on the
            // next run's scrape.
            error!(error = %e, "Summarization failed; skipping send");
            return Ok(());
        }
    };
    println!("{summary}");

    // ---- Send and record ----
    let message = digest_message(&args.keyword, &local_date(), &summary);
    let tokens = TokenStore::new(
        &args.token_file,
        args.kakao_rest_api_key.clone(),
        args.kakao_refresh_token.clone(),
    );
    let kakao = KakaoApi::new();

    match deliver(&kakao, &tokens, &message).await {
        Ok(outcome) => {
            match &outcome {
                SendOutcome::Rejected { status } => {
                    warn!(status, "Digest was not delivered; webhook rejected the retry");
                }
                _ => info!(?outcome, "Send flow completed"),
            }
            // History is appended once the send call returns, regardless of
            // whether the webhook accepted the message.
            if let Err(e) = history.append(&fresh).await {
                error!(path = %args.history_file, error = %e, "Failed to append headlines to history");
            }
        }
        Err(e) => {
            error!(error = %e, "Send flow failed; history not updated");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        date = %Local::now().date_naive(),
        "Execution complete"
    );

    Ok(())
}
