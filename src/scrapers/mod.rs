//! News scrapers for discovering recent headlines.
//!
//! Each scraper follows the same pattern:
//!
//! 1. **Fetching**: Issue a single GET against the source's search endpoint
//! 2. **Parsing**: Extract headline titles (and links where resolvable) from
//!    the returned HTML
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | Google News | [`google_news`] | HTML scraping | Keyword search via `tbm=nws` |
//!
//! Scrapers do not retry, paginate, or rate limit; a failed fetch is reported
//! to the caller, which skips the rest of the pipeline.

pub mod google_news;
