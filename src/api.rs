//! Gemini API client for summarizing headline batches.
//!
//! This module sends the collected headlines as a single prompt to the
//! Gemini `generateContent` endpoint and returns the response text verbatim.
//! No streaming, no chunking, no retry: a failed call is reported to the
//! caller, which skips the send and leaves the history file untouched so the
//! same headlines are picked up again on a later run.

use crate::models::Headline;
use crate::utils::truncate_for_log;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Instant;
use tracing::{error, info, instrument};

/// Base URL of the Gemini REST API.
const GENERATE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Request body for `generateContent`: a single user turn.
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize, Serialize)]
struct Part {
    text: String,
}

/// Response body for `generateContent`. Only the fields the digest needs.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

/// Client for the Gemini `generateContent` endpoint.
///
/// Holds the API key and model name from the CLI; one instance is built per
/// run and used for a single request.
#[derive(Debug)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a client for the given model.
    ///
    /// # Arguments
    ///
    /// * `api_key` - The Gemini API key, sent in the `x-goog-api-key` header
    /// * `model` - Model name, e.g. `gemini-1.5-flash`
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    /// Summarize a batch of headlines into a single digest text.
    ///
    /// # Returns
    ///
    /// The model's response text verbatim (trimmed), or an error if the
    /// request fails, the API returns a non-success status, or the response
    /// carries no candidates.
    #[instrument(level = "info", skip_all, fields(model = %self.model, count = headlines.len()))]
    pub async fn summarize(&self, headlines: &[Headline]) -> Result<String, Box<dyn Error>> {
        let url = format!("{GENERATE_BASE_URL}/{}:generateContent", self.model);
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(headlines),
                }],
            }],
        };

        let t0 = Instant::now();
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let dt = t0.elapsed();

        if !status.is_success() {
            error!(
                status = status.as_u16(),
                elapsed_ms = dt.as_millis() as u128,
                body = %truncate_for_log(&body, 300),
                "Gemini request rejected"
            );
            return Err(format!("gemini request failed with status {status}").into());
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        match extract_text(&parsed) {
            Some(summary) => {
                info!(
                    elapsed_ms = dt.as_millis() as u128,
                    bytes = summary.len(),
                    "Summary generated"
                );
                Ok(summary)
            }
            None => {
                error!(body = %truncate_for_log(&body, 300), "Gemini response had no candidates");
                Err("gemini response contained no candidate text".into())
            }
        }
    }
}

/// Build the summarization prompt from a headline batch.
///
/// Asks for a short per-headline summary in list form, mirroring the shape
/// the digest message expects.
fn build_prompt(headlines: &[Headline]) -> String {
    let listing = headlines
        .iter()
        .map(|headline| format!("- {}", headline.title))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a news summarization expert. For each of the following news \
         headlines, summarize the key point in two or three sentences. Present \
         the result as a list, one item per headline.\n\n\
         [Headlines]\n{listing}\n\n\
         [Output format example]\n\
         - [Headline]: summary of the story.\n\
         - [Another headline]: summary of that story."
    )
}

/// Pull the text of the first candidate's first part, trimmed.
fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let part = response.candidates.first()?.content.parts.first()?;
    Some(part.text.trim().to_string())
}
