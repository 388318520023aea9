use std::collections::{BTreeMap, BTreeSet, HashMap};

use catalogdb_core::SynonymGroup;

use crate::normalize::fold;

/// Expands a query token into its configured synonyms.
///
/// Groups may overlap; a token in several groups gets the union of their
/// words. Expansion is one level deep: synonyms are never expanded again.
#[derive(Debug, Clone, Default)]
pub struct SynonymExpander {
    groups: Vec<(BTreeSet<String>, f64)>,
    by_word: HashMap<String, Vec<usize>>,
}

impl SynonymExpander {
    pub fn new(groups: &[SynonymGroup]) -> Self {
        let mut expander = Self::default();
        for group in groups {
            let words: BTreeSet<String> = group
                .words
                .iter()
                .map(|w| fold(w.trim()))
                .filter(|w| !w.is_empty())
                .collect();
            let idx = expander.groups.len();
            for word in &words {
                expander.by_word.entry(word.clone()).or_default().push(idx);
            }
            expander.groups.push((words, group.weight));
        }
        expander
    }

    /// The token itself plus every word sharing a group with it.
    pub fn expand(&self, token: &str) -> BTreeSet<String> {
        self.expand_weighted(token).into_keys().collect()
    }

    /// Like `expand`, paired with the credit multiplier of each word: 1.0 for
    /// the literal token, otherwise the largest weight among groups that link
    /// the two words.
    pub fn expand_weighted(&self, token: &str) -> BTreeMap<String, f64> {
        let token = fold(token.trim());
        let mut out = BTreeMap::new();
        if token.is_empty() {
            return out;
        }
        for &idx in self.by_word.get(&token).into_iter().flatten() {
            let (words, weight) = &self.groups[idx];
            for word in words {
                if *word == token { continue; }
                let slot = out.entry(word.clone()).or_insert(*weight);
                if *weight > *slot { *slot = *weight; }
            }
        }
        out.insert(token, 1.0);
        out
    }

    pub fn multiplier(&self, token: &str, synonym: &str) -> Option<f64> {
        self.expand_weighted(token).get(&fold(synonym.trim())).copied()
    }
}
