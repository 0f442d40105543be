//! Kakao OAuth access-token persistence and refresh.
//!
//! The access token is a short-lived opaque string kept in a flat JSON file
//! (`{"access_token": "..."}`). No expiry timestamp is tracked; staleness is
//! detected reactively when the messaging webhook rejects a send, at which
//! point the token is replaced wholesale via a `grant_type=refresh_token`
//! exchange. The refresh token itself comes from the environment and is never
//! written to disk.

use crate::messenger::ProvideToken;
use crate::utils::truncate_for_log;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// OAuth token endpoint for the refresh-token exchange.
const KAUTH_TOKEN_URL: &str = "https://kauth.kakao.com/oauth/token";

/// On-disk shape of the token file.
#[derive(Debug, Deserialize, Serialize)]
struct TokenFile {
    access_token: String,
}

/// File-backed access-token store with OAuth refresh.
///
/// Constructed from the CLI-provided path and the Kakao credentials, then
/// injected into the send flow via [`ProvideToken`].
#[derive(Debug)]
pub struct TokenStore {
    path: PathBuf,
    client_id: String,
    refresh_token: String,
    client: reqwest::Client,
}

impl TokenStore {
    /// Create a store backed by the given token file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the JSON token file (need not exist yet)
    /// * `client_id` - The Kakao REST API key, sent as the OAuth client id
    /// * `refresh_token` - The long-lived OAuth refresh token
    pub fn new(path: impl Into<PathBuf>, client_id: String, refresh_token: String) -> Self {
        Self {
            path: path.into(),
            client_id,
            refresh_token,
            client: reqwest::Client::new(),
        }
    }

    /// Persist the access token, replacing any previous file contents.
    async fn save(&self, access_token: &str) -> Result<(), Box<dyn Error>> {
        let file = TokenFile {
            access_token: access_token.to_string(),
        };
        fs::write(&self.path, serde_json::to_string(&file)?).await?;
        debug!(path = %self.path.display(), "Persisted access token");
        Ok(())
    }
}

impl ProvideToken for TokenStore {
    /// Read the persisted access token, if the token file exists.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    async fn current(&self) -> Result<Option<String>, Box<dyn Error>> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No token file; a refresh is needed before sending");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let file: TokenFile = serde_json::from_str(&contents)?;
        Ok(Some(file.access_token))
    }

    /// Exchange the refresh token for a new access token and persist it.
    ///
    /// A response without an `access_token` field is an error; the send flow
    /// terminates rather than retrying with a token it does not have.
    #[instrument(level = "info", skip_all)]
    async fn refresh(&self) -> Result<String, Box<dyn Error>> {
        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", self.client_id.as_str()),
            ("refresh_token", self.refresh_token.as_str()),
        ];

        let response = self
            .client
            .post(KAUTH_TOKEN_URL)
            .form(&params)
            .send()
            .await?;
        let body = response.text().await?;

        match extract_access_token(&body) {
            Some(access_token) => {
                info!("Access token refreshed");
                self.save(&access_token).await?;
                Ok(access_token)
            }
            None => {
                warn!(body = %truncate_for_log(&body, 300), "Token refresh response had no access_token");
                Err("token refresh failed: no access_token in response".into())
            }
        }
    }
}

/// Pull the `access_token` field out of a token-endpoint response body.
///
/// Returns `None` for non-JSON bodies and for JSON error payloads, which is
/// how the Kakao endpoint reports a rejected exchange.
fn extract_access_token(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("access_token")?
        .as_str()
        .map(str::to_string)
}
