//! catalogdb-text
//!
//! Lexical analysis for catalog search: accent/case folding, tokenisation,
//! field weights, typo tolerance, synonym expansion and relevance scoring.

pub mod normalize;
pub mod scorer;
pub mod synonyms;
pub mod typo;
pub mod weights;

pub use scorer::RelevanceScorer;
pub use synonyms::SynonymExpander;
pub use typo::{is_fuzzy_match, TypoCorrector};
pub use weights::FieldWeights;
