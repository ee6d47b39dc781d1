//! Opaque lexicon handle for dictionary-constrained decoding.
//!
//! Built once at startup from a newline-delimited word list (case-normalized
//! to uppercase) and shared read-only across requests. Consumers only see
//! membership and best-match lookup; the matching structure stays internal.

/// Pre-built word structure for constrained decoding.
pub struct Lexicon {
    /// Sorted, uppercased, deduplicated.
    words: Vec<String>,
}

impl Lexicon {
    /// Compile a newline-delimited word list. Entries are trimmed and
    /// uppercased; blank lines are skipped.
    pub fn from_word_list(list: &str) -> Self {
        let mut words: Vec<String> = list
            .lines()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_uppercase)
            .collect();
        words.sort();
        words.dedup();
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Case-insensitive membership.
    pub fn contains(&self, word: &str) -> bool {
        self.words.binary_search(&word.to_uppercase()).is_ok()
    }

    /// Map a raw token onto the lexicon: the exact entry when present,
    /// otherwise the first entry sharing the longest prefix. `None` when
    /// nothing in the lexicon comes close.
    pub fn constrain(&self, token: &str) -> Option<&str> {
        let upper = token.to_uppercase();
        if let Ok(idx) = self.words.binary_search(&upper) {
            return Some(&self.words[idx]);
        }

        // Walk prefixes from longest to shortest; the partition point of a
        // prefix lands on the first word at or after it.
        for end in (1..=upper.len()).rev() {
            if !upper.is_char_boundary(end) {
                continue;
            }
            let prefix = &upper[..end];
            let idx = self.words.partition_point(|w| w.as_str() < prefix);
            if let Some(word) = self.words.get(idx) {
                if word.starts_with(prefix) {
                    return Some(word);
                }
            }
        }
        None
    }
}
