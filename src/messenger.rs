//! KakaoTalk "send to me" delivery with one refresh-and-retry cycle.
//!
//! The messaging webhook takes a bearer access token and a form-encoded
//! `template_object` payload. Because no token expiry is tracked, a rejected
//! send is treated as a stale token: the flow performs exactly one
//! refresh-token exchange and exactly one retry, never more.
//!
//! # Architecture
//!
//! The module uses a trait-based design so the retry policy can be exercised
//! without the network:
//! - [`SendMessage`]: one HTTP send attempt against the webhook
//! - [`ProvideToken`]: access to the current token and the refresh exchange
//! - [`deliver`]: the two-state flow composing the two, returning an explicit
//!   [`SendOutcome`] instead of nested conditionals
//!
//! # Retry Strategy
//!
//! - Missing token file → refresh before the first attempt
//! - Non-success status on a send → one refresh, one retry
//! - A second rejection is reported as an outcome, not retried again

use crate::utils::truncate_for_log;
use serde_json::json;
use std::error::Error;
use tracing::{info, instrument, warn};

/// Webhook endpoint for sending a template message to one's own account.
const MEMO_SEND_URL: &str = "https://kapi.kakao.com/v2/api/talk/memo/default/send";

/// Link attached to every digest message. The Kakao text template requires
/// link fields; they point at the news search the digest came from.
const DIGEST_LINK_URL: &str = "https://news.google.com/tbm=nws";

/// Trait for one send attempt against the messaging webhook.
///
/// Implementors perform a single HTTP POST and report the response status;
/// the refresh-and-retry policy lives in [`deliver`], outside the transport.
pub trait SendMessage {
    /// POST `text` to the webhook using `access_token` as the bearer token.
    ///
    /// # Returns
    ///
    /// The HTTP status code of the response, or an error for transport
    /// failures (the status of a rejected send is a result, not an error).
    async fn send(&self, access_token: &str, text: &str) -> Result<u16, Box<dyn Error>>;
}

/// Trait for access-token lookup and refresh.
pub trait ProvideToken {
    /// The currently persisted access token, or `None` when no token file
    /// exists yet.
    async fn current(&self) -> Result<Option<String>, Box<dyn Error>>;

    /// Exchange the refresh token for a new access token, persisting it.
    async fn refresh(&self) -> Result<String, Box<dyn Error>>;
}

/// Outcome of a completed delivery flow.
///
/// `Rejected` means the flow ran to completion (refresh and retry included)
/// without the webhook accepting the message; callers treat it as a finished
/// send attempt, not a transport failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The first attempt was accepted.
    Sent,
    /// The first attempt was rejected; the retry after a refresh was accepted.
    SentAfterRefresh,
    /// Both the first attempt and the post-refresh retry were rejected.
    Rejected {
        /// Status code of the final attempt.
        status: u16,
    },
}

/// Send a text message, refreshing the token at most once.
///
/// Two states: token-present and token-absent-or-rejected. A missing token
/// file triggers a refresh before the first attempt; a non-success status
/// triggers exactly one refresh and one retry. Refresh failures and
/// transport errors abort the flow with an error.
///
/// # Arguments
///
/// * `sender` - The webhook transport
/// * `tokens` - The token store
/// * `text` - The message text to deliver
#[instrument(level = "info", skip_all)]
pub async fn deliver<S, T>(sender: &S, tokens: &T, text: &str) -> Result<SendOutcome, Box<dyn Error>>
where
    S: SendMessage,
    T: ProvideToken,
{
    let access_token = match tokens.current().await? {
        Some(token) => token,
        None => tokens.refresh().await?,
    };

    let status = sender.send(&access_token, text).await?;
    if is_success(status) {
        info!("Message sent");
        return Ok(SendOutcome::Sent);
    }

    warn!(status, "Send rejected; refreshing token and retrying once");
    let fresh_token = tokens.refresh().await?;
    let status = sender.send(&fresh_token, text).await?;
    if is_success(status) {
        info!("Message sent after token refresh");
        Ok(SendOutcome::SentAfterRefresh)
    } else {
        warn!(status, "Retry after refresh was rejected; giving up");
        Ok(SendOutcome::Rejected { status })
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Build the Kakao text template for a message.
///
/// The link fields are required by the template schema and hardcoded to the
/// news search URL.
pub fn template_object(text: &str) -> serde_json::Value {
    json!({
        "object_type": "text",
        "text": text,
        "link": {
            "web_url": DIGEST_LINK_URL,
            "mobile_web_url": DIGEST_LINK_URL,
        },
    })
}

/// HTTP transport for the messaging webhook.
#[derive(Debug, Default)]
pub struct KakaoApi {
    client: reqwest::Client,
}

impl KakaoApi {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SendMessage for KakaoApi {
    #[instrument(level = "info", skip_all)]
    async fn send(&self, access_token: &str, text: &str) -> Result<u16, Box<dyn Error>> {
        let payload = [("template_object", template_object(text).to_string())];
        let response = self
            .client
            .post(MEMO_SEND_URL)
            .bearer_auth(access_token)
            .form(&payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        if !is_success(status) {
            let body = response.text().await.unwrap_or_default();
            warn!(status, body = %truncate_for_log(&body, 300), "Webhook rejected the send");
        }
        Ok(status)
    }
}
