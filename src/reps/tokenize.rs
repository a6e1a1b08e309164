use std::collections::BTreeSet;

/// Splits text into lowercase tokens on every non-letter, non-digit boundary.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_lowercase())
        .collect()
}

/// Distinct tokens of `text`, in sorted order.
pub fn unique_tokens(text: &str) -> BTreeSet<String> {
    tokenize(text).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_urls_into_words() {
        assert_eq!(
            tokenize("https://leetcode.com/problems/Two-Sum/"),
            vec!["https", "leetcode", "com", "problems", "two", "sum"]
        );
    }

    #[test]
    fn keeps_digits_and_unicode_letters() {
        assert_eq!(tokenize("LRU cache (v2); café"), vec!["lru", "cache", "v2", "café"]);
    }

    #[test]
    fn empty_and_separator_only_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  --//  ").is_empty());
    }

    #[test]
    fn unique_tokens_dedups() {
        let tokens = unique_tokens("dp dp DP graph");
        assert_eq!(tokens.len(), 2);
        assert!(tokens.contains("dp"));
        assert!(tokens.contains("graph"));
    }
}
