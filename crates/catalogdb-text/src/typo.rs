use catalogdb_core::SearchConfig;

use crate::normalize::fold;

/// Edit distance with unit-cost insertions, deletions, substitutions and
/// adjacent transpositions ("frneo" -> "freno" is 1).
pub fn edit_distance(a: &str, b: &str) -> usize { strsim::osa_distance(a, b) }

/// Typo-tolerant token comparison on folded text.
///
/// Tokens shorter than `min_word_length` characters only match exactly, and
/// an empty query token never matches.
pub fn is_fuzzy_match(query_token: &str, field_token: &str, max_edit_distance: u32, min_word_length: usize) -> bool {
    folded_match(&fold(query_token), &fold(field_token), max_edit_distance as usize, min_word_length)
}

fn folded_match(query: &str, field: &str, max_edit_distance: usize, min_word_length: usize) -> bool {
    if query.is_empty() || field.is_empty() {
        return false;
    }
    if query == field {
        return true;
    }
    let query_len = query.chars().count();
    if query_len < min_word_length {
        return false;
    }
    if query_len.abs_diff(field.chars().count()) > max_edit_distance {
        return false;
    }
    edit_distance(query, field) <= max_edit_distance
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypoCorrector {
    enabled: bool,
    max_edit_distance: u32,
    min_word_length: usize,
}

impl TypoCorrector {
    pub fn new(enabled: bool, max_edit_distance: u32, min_word_length: usize) -> Self {
        Self { enabled, max_edit_distance, min_word_length }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.typo_correction_enabled, config.max_edit_distance, config.min_word_length)
    }

    pub fn is_enabled(&self) -> bool { self.enabled }

    /// Always false when disabled.
    pub fn is_fuzzy_match(&self, query_token: &str, field_token: &str, max_edit_distance: u32) -> bool {
        self.enabled && is_fuzzy_match(query_token, field_token, max_edit_distance, self.min_word_length)
    }

    /// Same as `is_fuzzy_match` with the configured distance, for tokens that
    /// already went through `normalize::fold`. Always false when disabled.
    pub fn matches_folded(&self, query_token: &str, field_token: &str) -> bool {
        self.enabled && folded_match(query_token, field_token, self.max_edit_distance as usize, self.min_word_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transposition_is_one_edit() {
        assert_eq!(edit_distance("frneo", "freno"), 1);
        assert!(is_fuzzy_match("frneo", "freno", 1, 3));
        assert!(!is_fuzzy_match("frneo", "frenos", 1, 3));
    }

    #[test]
    fn accents_and_case_are_ignored() {
        assert!(is_fuzzy_match("FRENÓ", "freno", 0, 3));
        assert!(is_fuzzy_match("aceíte", "aceitte", 1, 3));
    }

    #[test]
    fn short_tokens_require_exact_match() {
        assert!(!is_fuzzy_match("de", "da", 1, 3));
        assert!(is_fuzzy_match("De", "de", 1, 3));
    }

    #[test]
    fn empty_token_never_matches() {
        assert!(!is_fuzzy_match("", "", 3, 1));
        assert!(!is_fuzzy_match("", "freno", 5, 1));
    }

    #[test]
    fn disabled_corrector_rejects_everything() {
        let typo = TypoCorrector::new(false, 2, 3);
        assert!(!typo.is_enabled());
        assert!(!typo.matches_folded("frneo", "freno"));
        assert!(!typo.is_fuzzy_match("frneo", "freno", 2));
        assert!(!typo.is_fuzzy_match("freno", "freno", 2));
        assert!(TypoCorrector::new(true, 2, 3).matches_folded("frneo", "freno"));
    }
}
