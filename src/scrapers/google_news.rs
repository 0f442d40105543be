//! Google News search results scraper.
//!
//! This module scrapes the news tab of Google web search
//! (`https://www.google.com/search?tbm=nws`) for a keyword and extracts the
//! result headlines. The request carries a desktop-browser `User-Agent`
//! header; without one Google serves a stripped page with different markup.
//!
//! # Markup
//!
//! Headline titles live in `div.MBeuO` elements inside each result card. The
//! enclosing `a[href]` carries the article link, usually as a `/url?q=...`
//! redirect that is unwrapped to the target URL.

use crate::models::Headline;
use itertools::Itertools;
use reqwest::header::USER_AGENT;
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Browser User-Agent sent with the search request so Google returns the
/// full result markup instead of the no-JS fallback page.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Base URL used to resolve relative result links.
const SEARCH_BASE_URL: &str = "https://www.google.com";

/// Scrape recent Google News headlines for a keyword.
///
/// Issues one GET against the news search endpoint and parses the response.
/// No retry and no pagination: whatever the first page yields is the
/// candidate set for this run.
///
/// # Arguments
///
/// * `keyword` - The search keyword, URL-encoded into the query string
/// * `limit` - Maximum number of headlines to return
///
/// # Returns
///
/// Up to `limit` unique headlines in document order, or an error if the
/// fetch fails or Google returns a non-success status.
#[instrument(level = "info", skip_all, fields(%keyword))]
pub async fn scrape_headlines(
    keyword: &str,
    limit: usize,
) -> Result<Vec<Headline>, Box<dyn Error>> {
    let encoded = urlencoding::encode(keyword);
    let search_url = format!("{SEARCH_BASE_URL}/search?q={encoded}&tbm=nws&hl=ko&gl=KR");
    debug!(url = %search_url, "Fetching news search results");

    let client = reqwest::Client::new();
    let html = client
        .get(&search_url)
        .header(USER_AGENT, BROWSER_USER_AGENT)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let headlines = parse_headlines(&html, limit);
    if headlines.is_empty() {
        warn!("No headlines found; the results markup may have changed");
    } else {
        info!(count = headlines.len(), "Scraped headlines");
        debug!(titles = ?headlines.iter().map(|h| &h.title).collect::<Vec<_>>(), "Headline titles");
    }

    Ok(headlines)
}

/// Extract headlines from a news search results page.
///
/// Titles are trimmed, empty ones dropped, exact repeats collapsed (Google
/// lists syndicated copies of the same story), and the list capped at
/// `limit`, all while preserving document order.
pub fn parse_headlines(html: &str, limit: usize) -> Vec<Headline> {
    let document = Html::parse_document(html);
    let title_selector = Selector::parse("div.MBeuO").unwrap();

    document
        .select(&title_selector)
        .map(|element| {
            let title = element.text().collect::<Vec<_>>().join("");
            Headline::new(&title, link_for(element))
        })
        .filter(|headline| !headline.is_empty())
        .unique_by(|headline| headline.title.clone())
        .take(limit)
        .collect()
}

/// Resolve the article link for a headline element.
///
/// Walks up to the enclosing anchor and resolves its `href` against the
/// search base URL. Google wraps result links in `/url?q=<target>` redirects;
/// those are unwrapped to the target.
fn link_for(element: ElementRef<'_>) -> Option<String> {
    let href = element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "a")
        .and_then(|anchor| anchor.value().attr("href"))?;

    let base = Url::parse(SEARCH_BASE_URL).ok()?;
    let resolved = base.join(href).ok()?;

    if resolved.path() == "/url" {
        resolved
            .query_pairs()
            .find(|(key, _)| key == "q")
            .map(|(_, target)| target.into_owned())
    } else {
        Some(resolved.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_card(title: &str, href: &str) -> String {
        format!(
            r#"<a href="{href}"><div class="SoaBEf"><div class="MBeuO">{title}</div></div></a>"#
        )
    }

    #[test]
    fn test_parse_extracts_titles_in_order() {
        let html = format!(
            "<html><body>{}{}</body></html>",
            result_card("First story", "https://example.com/a"),
            result_card("Second story", "https://example.com/b"),
        );
        let headlines = parse_headlines(&html, 10);
        assert_eq!(headlines.len(), 2);
        assert_eq!(headlines[0].title, "First story");
        assert_eq!(headlines[1].title, "Second story");
    }

    #[test]
    fn test_parse_trims_and_drops_empty_titles() {
        let html = format!(
            "<html><body>{}{}</body></html>",
            result_card("  Padded title \n", "https://example.com/a"),
            result_card("   ", "https://example.com/b"),
        );
        let headlines = parse_headlines(&html, 10);
        assert_eq!(headlines.len(), 1);
        assert_eq!(headlines[0].title, "Padded title");
    }

    #[test]
    fn test_parse_collapses_duplicate_titles() {
        let html = format!(
            "<html><body>{}{}{}</body></html>",
            result_card("Same story", "https://example.com/a"),
            result_card("Same story", "https://example.com/b"),
            result_card("Other story", "https://example.com/c"),
        );
        let headlines = parse_headlines(&html, 10);
        assert_eq!(headlines.len(), 2);
        assert_eq!(headlines[0].title, "Same story");
        assert_eq!(headlines[1].title, "Other story");
    }

    #[test]
    fn test_parse_caps_at_limit() {
        let cards: String = (0..15)
            .map(|i| result_card(&format!("Story {i}"), "https://example.com"))
            .collect();
        let html = format!("<html><body>{cards}</body></html>");
        let headlines = parse_headlines(&html, 10);
        assert_eq!(headlines.len(), 10);
        assert_eq!(headlines[9].title, "Story 9");
    }

    #[test]
    fn test_parse_unwraps_redirect_links() {
        let html = format!(
            "<html><body>{}</body></html>",
            result_card(
                "Redirected story",
                "/url?q=https://paper.example/article&amp;sa=U"
            ),
        );
        let headlines = parse_headlines(&html, 10);
        assert_eq!(
            headlines[0].link.as_deref(),
            Some("https://paper.example/article")
        );
    }

    #[test]
    fn test_parse_resolves_relative_links() {
        let html = format!(
            "<html><body>{}</body></html>",
            result_card("Relative story", "./articles/xyz"),
        );
        let headlines = parse_headlines(&html, 10);
        assert_eq!(
            headlines[0].link.as_deref(),
            Some("https://www.google.com/articles/xyz")
        );
    }

    #[test]
    fn test_parse_title_without_anchor_has_no_link() {
        let html = r#"<html><body><div class="MBeuO">Bare title</div></body></html>"#;
        let headlines = parse_headlines(html, 10);
        assert_eq!(headlines[0].title, "Bare title");
        assert!(headlines[0].link.is_none());
    }

    #[test]
    fn test_parse_empty_document() {
        assert!(parse_headlines("<html><body></body></html>", 10).is_empty());
    }
}
