//! Command-line interface definitions for the news digest.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Credentials are read from the environment (a local `.env` file is loaded
//! before parsing), everything else can be given as flags.

use clap::Parser;

/// Command-line arguments for the news digest.
///
/// One positional argument selects the search keyword; file paths, the model
/// name, and the headline limit have defaults matching the working-directory
/// layout the tool has always used.
///
/// # Examples
///
/// ```sh
/// # Basic usage: keyword only, credentials from the environment
/// kakao_news_digest "semiconductors"
///
/// # Custom file locations and a smaller batch
/// kakao_news_digest "AI" --history-file /var/lib/digest/sent.txt --limit 5
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// News search keyword
    pub keyword: String,

    /// Path to the sent-headline history file
    #[arg(long, default_value = "sent_headlines.txt")]
    pub history_file: String,

    /// Path to the Kakao access-token file
    #[arg(long, default_value = "kakao_token.json")]
    pub token_file: String,

    /// Gemini model used for summarization
    #[arg(long, env = "GEMINI_MODEL", default_value = "gemini-1.5-flash")]
    pub model: String,

    /// Maximum number of headlines to take from one scrape
    #[arg(long, default_value_t = 10)]
    pub limit: usize,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: String,

    /// Kakao REST API key (used as the OAuth client id)
    #[arg(long, env = "KAKAO_REST_API_KEY", hide_env_values = true)]
    pub kakao_rest_api_key: String,

    /// Kakao OAuth refresh token
    #[arg(long, env = "KAKAO_REFRESH_TOKEN", hide_env_values = true)]
    pub kakao_refresh_token: String,
}
