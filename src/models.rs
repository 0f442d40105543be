//! Data models shared across the pipeline.
//!
//! This module defines the core data structure used throughout the
//! application:
//! - [`Headline`]: a single scraped news title, optionally with its article link
//!
//! Headlines are created by the scraper, filtered against the history store,
//! summarized by the Gemini client, and finally appended to the history store
//! once a digest has been sent.

use serde::{Deserialize, Serialize};

/// A single news headline scraped from a search results page.
///
/// The title is normalized (surrounding whitespace trimmed) at construction
/// time so that equality checks against the history store are exact string
/// matches, the same normalization the history file itself uses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Headline {
    /// The headline text, whitespace-trimmed.
    pub title: String,
    /// The absolute article URL, when one could be resolved from the markup.
    pub link: Option<String>,
}

impl Headline {
    /// Build a headline from raw scraped text, trimming surrounding whitespace.
    pub fn new(title: &str, link: Option<String>) -> Self {
        Self {
            title: title.trim().to_string(),
            link,
        }
    }

    /// Whether the headline carries any text after normalization.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
    }
}
