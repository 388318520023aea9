use std::collections::BTreeMap;
use tracing::trace;

use catalogdb_core::{SearchConfig, SearchableItem};

use crate::normalize::{fold, query_tokens, tokenize};
use crate::synonyms::SynonymExpander;
use crate::typo::TypoCorrector;
use crate::weights::FieldWeights;

pub const EXACT_MATCH_SCORE: f64 = 1.0;

/// Scores items against a tokenised query under one `SearchConfig`.
///
/// Built once per search call; holds no state between calls.
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    weights: FieldWeights,
    typo: TypoCorrector,
    synonyms: SynonymExpander,
    semantic: bool,
    threshold: f64,
    fuzzy_score: f64,
}

impl RelevanceScorer {
    pub fn new(config: &SearchConfig) -> Self {
        trace!(
            semantic = config.semantic_search_enabled,
            threshold = config.semantic_threshold,
            synonym_groups = config.synonym_groups.len(),
            "building relevance scorer"
        );
        Self {
            weights: FieldWeights::from_config(config),
            typo: TypoCorrector::from_config(config),
            synonyms: SynonymExpander::new(&config.synonym_groups),
            semantic: config.semantic_search_enabled,
            threshold: config.semantic_threshold,
            fuzzy_score: config.fuzzy_match_score,
        }
    }

    pub fn tokenize_query(query: &str) -> Vec<String> { query_tokens(query) }

    pub fn is_semantic(&self) -> bool { self.semantic }

    /// Relevance in `[0, 1]`.
    ///
    /// Weighted mode sums, per searchable field and query token, the best match
    /// quality times the field weight, and divides by the best total this item
    /// could reach: the weights of its searchable fields that carry text, times
    /// the token count. Lexical mode returns 1.0 when any searchable field
    /// contains any token as a substring.
    pub fn score(&self, item: &SearchableItem, query_tokens: &[String]) -> f64 {
        if query_tokens.is_empty() {
            return 0.0;
        }
        if self.semantic { self.weighted_score(item, query_tokens) } else { self.substring_score(item, query_tokens) }
    }

    /// Whether a scored item belongs in the result set at all.
    pub fn passes_threshold(&self, score: f64) -> bool {
        if self.semantic { score > 0.0 && score >= self.threshold } else { score > 0.0 }
    }

    fn substring_score(&self, item: &SearchableItem, query_tokens: &[String]) -> f64 {
        let hit = self.weights.fields().filter_map(|(field, _)| item.text(field)).any(|text| {
            let folded = fold(text);
            query_tokens.iter().any(|t| !t.is_empty() && folded.contains(t.as_str()))
        });
        if hit { EXACT_MATCH_SCORE } else { 0.0 }
    }

    fn weighted_score(&self, item: &SearchableItem, query_tokens: &[String]) -> f64 {
        let expansions: Vec<BTreeMap<String, f64>> =
            query_tokens.iter().map(|t| self.synonyms.expand_weighted(t)).collect();

        let mut total = 0.0;
        let mut reachable_weight = 0.0;
        for (field, weight) in self.weights.fields() {
            let Some(text) = item.text(field) else { continue };
            let field_tokens = tokenize(text);
            if field_tokens.is_empty() {
                continue;
            }
            reachable_weight += weight;
            for expansion in &expansions {
                total += weight * self.best_quality(expansion, &field_tokens);
            }
        }

        let max = reachable_weight * query_tokens.len() as f64;
        if max <= 0.0 {
            return 0.0;
        }
        (total / max).clamp(0.0, 1.0)
    }

    fn best_quality(&self, expansion: &BTreeMap<String, f64>, field_tokens: &[String]) -> f64 {
        let mut best: f64 = 0.0;
        for (candidate, multiplier) in expansion {
            for field_token in field_tokens {
                let quality = if candidate == field_token {
                    EXACT_MATCH_SCORE
                } else if self.typo.matches_folded(candidate, field_token) {
                    self.fuzzy_score
                } else {
                    continue;
                };
                best = best.max((quality * multiplier).min(EXACT_MATCH_SCORE));
                if best >= EXACT_MATCH_SCORE {
                    return best;
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalogdb_core::SynonymGroup;

    fn pads() -> SearchableItem {
        SearchableItem::new("2")
            .with_field("name", "Pastillas de Freno")
            .with_field("category", "Frenos")
            .with_field("price", 45.0)
    }

    fn semantic_config() -> SearchConfig {
        SearchConfig {
            semantic_search_enabled: true,
            max_edit_distance: 1,
            min_word_length: 3,
            ..SearchConfig::default()
        }
    }

    #[test]
    fn exact_match_on_every_text_field_scores_one() {
        let item = SearchableItem::new("x").with_field("name", "Freno").with_field("category", "freno");
        let scorer = RelevanceScorer::new(&semantic_config());
        assert_eq!(scorer.score(&item, &RelevanceScorer::tokenize_query("FRENO")), 1.0);
    }

    #[test]
    fn fuzzy_match_earns_partial_credit() {
        let scorer = RelevanceScorer::new(&semantic_config());
        let score = scorer.score(&pads(), &RelevanceScorer::tokenize_query("frneo"));
        // name matches fuzzily, category does not: 0.6 * 1 / 2
        assert!((score - 0.3).abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn typo_disabled_gives_nothing_for_misspelling() {
        let config = SearchConfig { typo_correction_enabled: false, ..semantic_config() };
        let scorer = RelevanceScorer::new(&config);
        assert_eq!(scorer.score(&pads(), &RelevanceScorer::tokenize_query("frneo")), 0.0);
    }

    #[test]
    fn weights_shift_the_score() {
        let mut config = semantic_config();
        config.field_weights.insert("name".into(), 3.0);
        let scorer = RelevanceScorer::new(&config);
        let score = scorer.score(&pads(), &RelevanceScorer::tokenize_query("pastillas"));
        assert!((score - 0.75).abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn synonym_match_is_scaled_by_group_weight() {
        let mut config = semantic_config();
        config.searchable_fields = vec!["name".into()];
        config.synonym_groups = vec![SynonymGroup::new(["brake", "freno"], 0.5)];
        let scorer = RelevanceScorer::new(&config);
        let score = scorer.score(&pads(), &RelevanceScorer::tokenize_query("brake"));
        assert!((score - 0.5).abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn non_searchable_and_non_text_fields_are_ignored() {
        let mut config = SearchConfig { typo_correction_enabled: false, ..semantic_config() };
        config.searchable_fields = vec!["name".into(), "price".into()];
        let scorer = RelevanceScorer::new(&config);
        assert_eq!(scorer.score(&pads(), &RelevanceScorer::tokenize_query("frenos")), 0.0);
        assert_eq!(scorer.score(&pads(), &RelevanceScorer::tokenize_query("45")), 0.0);
    }

    #[test]
    fn lexical_mode_is_binary_substring_match() {
        let scorer = RelevanceScorer::new(&SearchConfig::default());
        assert_eq!(scorer.score(&pads(), &RelevanceScorer::tokenize_query("fren")), 1.0);
        assert_eq!(scorer.score(&pads(), &RelevanceScorer::tokenize_query("aceite")), 0.0);
        assert!(scorer.passes_threshold(1.0));
        assert!(!scorer.passes_threshold(0.0));
    }

    #[test]
    fn threshold_applies_only_in_weighted_mode() {
        let config = SearchConfig { semantic_threshold: 0.5, ..semantic_config() };
        let scorer = RelevanceScorer::new(&config);
        assert!(!scorer.passes_threshold(0.49));
        assert!(scorer.passes_threshold(0.5));
    }
}
