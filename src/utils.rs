//! Utility functions for string manipulation and log formatting.
//!
//! Helpers used throughout the application:
//! - String truncation for keeping HTTP response bodies readable in logs
//! - Digest message assembly from the summary text

use chrono::Local;

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and
/// byte count indicator appended.
///
/// # Arguments
///
/// * `s` - The string to potentially truncate
/// * `max` - Maximum number of characters to keep
///
/// # Returns
///
/// The original string if shorter than `max`, otherwise a truncated version
/// with `"…(+N bytes)"` appended. The cut backs off to a char boundary so
/// multibyte text (Kakao and Google error bodies are often Korean) never
/// splits mid-character.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Assemble the digest message sent to KakaoTalk.
///
/// Prefixes the summary with a dated header naming the search keyword so
/// the recipient can tell digests for different keywords apart.
///
/// # Arguments
///
/// * `keyword` - The search keyword the digest covers
/// * `date` - The header date, `YYYY-MM-DD`
/// * `summary` - The summary text returned by the model
pub fn digest_message(keyword: &str, date: &str, summary: &str) -> String {
    format!("📰 {date} - '{keyword}' news\n\n{summary}")
}

/// Today's local date in `YYYY-MM-DD` format, for the digest header.
pub fn local_date() -> String {
    Local::now().date_naive().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte_boundary() {
        // Byte 300 lands mid-character: one ASCII byte then 3-byte Hangul.
        let s = format!("a{}", "한".repeat(200));
        let result = truncate_for_log(&s, 300);
        assert!(result.starts_with("a한"));
        assert!(result.contains("…(+"));
        // The cut backed off to byte 298 (1 + 99 complete characters).
        assert!(result.starts_with(&format!("a{}…", "한".repeat(99))));
    }

    #[test]
    fn test_truncate_for_log_multibyte_only() {
        let s = "뉴스".repeat(100);
        // max=1 is inside the first character; everything is dropped.
        let result = truncate_for_log(&s, 1);
        assert!(result.starts_with("…(+"));
    }

    #[test]
    fn test_digest_message_header() {
        let msg = digest_message("semiconductors", "2025-11-02", "Two new fabs announced.");
        assert!(msg.starts_with("📰 2025-11-02 - 'semiconductors' news"));
        assert!(msg.ends_with("Two new fabs announced."));
    }

    #[test]
    fn test_local_date_shape() {
        let date = local_date();
        // YYYY-MM-DD
        assert_eq!(date.len(), 10);
        assert_eq!(date.as_bytes()[4], b'-');
        assert_eq!(date.as_bytes()[7], b'-');
    }
}
