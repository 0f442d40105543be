//! Persistent record of headlines that have already been delivered.
//!
//! The history file is newline-delimited UTF-8 text, one headline title per
//! line, append-only. It is read into a `HashSet` at the start of a run and
//! used to drop headlines that were sent by a previous invocation; after a
//! send, the newly delivered titles are appended. The file is never rewritten
//! or compacted.
//!
//! Overlapping runs are not coordinated: two processes appending at once may
//! interleave. Accepted limitation for a cron-driven tool.

use crate::models::Headline;
use std::collections::HashSet;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

/// File-backed set of previously sent headline titles.
///
/// Constructed once per run from the CLI-provided path and passed into the
/// pipeline, so tests can point it at a scratch file.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Create a store backed by the given file path. The file does not need
    /// to exist yet; a missing file reads as an empty history.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the set of previously sent headline titles.
    ///
    /// Each line is trimmed; blank lines are ignored. A missing file yields
    /// an empty set, which is the normal state on the first run.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    pub async fn load(&self) -> Result<HashSet<String>, Box<dyn Error>> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("History file not found; starting with empty history");
                return Ok(HashSet::new());
            }
            Err(e) => return Err(e.into()),
        };

        let seen: HashSet<String> = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        info!(count = seen.len(), "Loaded sent-headline history");
        Ok(seen)
    }

    /// Append newly sent headline titles, one per line.
    ///
    /// The file is created if missing. Existing contents are never touched,
    /// so after the append the file holds the union of the prior history and
    /// the new titles.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display(), count = headlines.len()))]
    pub async fn append(&self, headlines: &[Headline]) -> Result<(), Box<dyn Error>> {
        if headlines.is_empty() {
            return Ok(());
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        for headline in headlines {
            file.write_all(headline.title.as_bytes()).await?;
            file.write_all(b"\n").await?;
        }
        file.flush().await?;

        info!("Appended headlines to history");
        Ok(())
    }
}

/// Drop headlines whose title is already in the history set.
///
/// Preserves the scrape order of `headlines` and never introduces
/// duplicates: the scraper already collapses exact repeats within a single
/// scrape, and membership in `seen` covers repeats across runs.
pub fn filter_new(headlines: Vec<Headline>, seen: &HashSet<String>) -> Vec<Headline> {
    headlines
        .into_iter()
        .filter(|headline| !seen.contains(&headline.title))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headline(title: &str) -> Headline {
        Headline::new(title, None)
    }

    fn scratch_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "kakao_news_digest_history_{tag}_{}",
            std::process::id()
        ))
    }

    #[test]
    fn test_filter_new_removes_seen_preserving_order() {
        let scraped = vec![headline("a"), headline("b"), headline("c"), headline("d")];
        let seen: HashSet<String> = ["b", "d"].iter().map(|s| s.to_string()).collect();

        let fresh = filter_new(scraped, &seen);
        let titles: Vec<&str> = fresh.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "c"]);
    }

    #[test]
    fn test_filter_new_with_empty_history_keeps_all() {
        let scraped = vec![headline("a"), headline("b")];
        let fresh = filter_new(scraped.clone(), &HashSet::new());
        assert_eq!(fresh, scraped);
    }

    #[test]
    fn test_filter_new_all_seen_yields_empty() {
        let scraped = vec![headline("a"), headline("b")];
        let seen: HashSet<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
        assert!(filter_new(scraped, &seen).is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let store = HistoryStore::new(scratch_path("missing"));
        let seen = store.load().await.unwrap();
        assert!(seen.is_empty());
    }

    #[tokio::test]
    async fn test_append_then_load_roundtrip() {
        let path = scratch_path("roundtrip");
        let _ = std::fs::remove_file(&path);

        let store = HistoryStore::new(&path);
        store
            .append(&[headline("first"), headline("second")])
            .await
            .unwrap();

        let seen = store.load().await.unwrap();
        assert!(seen.contains("first"));
        assert!(seen.contains("second"));
        assert_eq!(seen.len(), 2);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_append_is_union_with_prior_contents() {
        let path = scratch_path("union");
        let _ = std::fs::remove_file(&path);

        let store = HistoryStore::new(&path);
        store.append(&[headline("old")]).await.unwrap();
        store.append(&[headline("new")]).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "old\nnew\n");

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_rerun_after_send_yields_no_new_headlines() {
        let path = scratch_path("rerun");
        let _ = std::fs::remove_file(&path);

        let scraped = vec![headline("a"), headline("b")];
        let store = HistoryStore::new(&path);

        // First run: nothing seen, everything is new, send then append.
        let seen = store.load().await.unwrap();
        let fresh = filter_new(scraped.clone(), &seen);
        assert_eq!(fresh.len(), 2);
        store.append(&fresh).await.unwrap();

        // Second run with identical scrape output: nothing new.
        let seen = store.load().await.unwrap();
        assert!(filter_new(scraped, &seen).is_empty());

        let _ = std::fs::remove_file(&path);
    }
}
