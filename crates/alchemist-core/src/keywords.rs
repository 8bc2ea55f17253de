//! Keyword list parsing.
//!
//! Uploaded keyword files are plain text or CSV; entries may be separated by
//! commas, semicolons, or newlines.

/// Maximum number of keywords accepted per batch.
pub const MAX_KEYWORDS_PER_BATCH: usize = 100;

/// Entries at or above this length are dropped as garbage.
pub const MAX_KEYWORD_LEN: usize = 100;

/// Split raw file content into a cleaned, ordered keyword list.
///
/// Splits on commas, semicolons, and newlines; trims whitespace; drops empty
/// and over-long entries; caps the result at [`MAX_KEYWORDS_PER_BATCH`].
/// Submission order is preserved.
#[must_use]
pub fn parse_keyword_list(content: &str) -> Vec<String> {
    content
        .split(['\n', '\r', ',', ';'])
        .map(str::trim)
        .filter(|k| !k.is_empty() && k.len() < MAX_KEYWORD_LEN)
        .take(MAX_KEYWORDS_PER_BATCH)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_all_separators() {
        let parsed = parse_keyword_list("alpha, beta;gamma\ndelta\r\nepsilon");
        assert_eq!(parsed, vec!["alpha", "beta", "gamma", "delta", "epsilon"]);
    }

    #[test]
    fn drops_empty_and_overlong_entries() {
        let long = "x".repeat(MAX_KEYWORD_LEN);
        let parsed = parse_keyword_list(&format!("alpha,,  ,{long},beta"));
        assert_eq!(parsed, vec!["alpha", "beta"]);
    }

    #[test]
    fn caps_batch_size() {
        let content: Vec<String> = (0..250).map(|i| format!("keyword {i}")).collect();
        let parsed = parse_keyword_list(&content.join("\n"));
        assert_eq!(parsed.len(), MAX_KEYWORDS_PER_BATCH);
        assert_eq!(parsed[0], "keyword 0");
    }

    #[test]
    fn preserves_order() {
        let parsed = parse_keyword_list("zebra\napple\nmango");
        assert_eq!(parsed, vec!["zebra", "apple", "mango"]);
    }
}
