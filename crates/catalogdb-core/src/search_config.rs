//! Persisted search configuration (`SearchConfig` JSON as edited in the admin
//! console) and its validation rules.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{Error, Result};
use crate::request::PriceRange;

/// Allow-list entry for categories and brands. Upstream payloads carry either a
/// bare string or a `{ "name": ... }` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacetEntry {
    Name(String),
    Record { name: String },
}

impl FacetEntry {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Record { name } => name,
        }
    }
}

impl From<&str> for FacetEntry {
    fn from(v: &str) -> Self { Self::Name(v.to_string()) }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigFilters {
    pub categories: Vec<FacetEntry>,
    pub brands: Vec<FacetEntry>,
    pub price_range: Option<PriceRange>,
}

impl ConfigFilters {
    pub fn category_names(&self) -> impl Iterator<Item = &str> { self.categories.iter().map(FacetEntry::name) }

    pub fn brand_names(&self) -> impl Iterator<Item = &str> { self.brands.iter().map(FacetEntry::name) }
}

/// Interchangeable words. `weight` scales the credit of a match found through
/// a synonym rather than the literal query word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynonymGroup {
    pub words: Vec<String>,
    #[serde(default = "default_synonym_weight")]
    pub weight: f64,
}

fn default_synonym_weight() -> f64 { 1.0 }

impl SynonymGroup {
    pub fn new<I, S>(words: I, weight: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { words: words.into_iter().map(Into::into).collect(), weight }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    pub searchable_fields: Vec<String>,
    pub field_weights: HashMap<String, f64>,
    pub semantic_search_enabled: bool,
    pub semantic_threshold: f64,
    pub typo_correction_enabled: bool,
    pub max_edit_distance: u32,
    pub min_word_length: usize,
    /// Credit for a typo-tolerant match relative to an exact one.
    pub fuzzy_match_score: f64,
    pub synonym_groups: Vec<SynonymGroup>,
    pub filters: ConfigFilters,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            searchable_fields: ["name", "description", "category", "brand"].into_iter().map(String::from).collect(),
            field_weights: HashMap::new(),
            semantic_search_enabled: false,
            semantic_threshold: 0.3,
            typo_correction_enabled: true,
            max_edit_distance: 2,
            min_word_length: 3,
            fuzzy_match_score: 0.6,
            synonym_groups: Vec::new(),
            filters: ConfigFilters::default(),
        }
    }
}

impl SearchConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| Error::invalid(format!("malformed search config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound(path.display().to_string()),
            _ => Error::Operation(format!("failed to read {}: {e}", path.display())),
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for field in &self.searchable_fields {
            if field.trim().is_empty() {
                return Err(Error::invalid("searchableFields contains an empty field name"));
            }
            if !seen.insert(field.as_str()) {
                return Err(Error::invalid(format!("searchableFields lists '{field}' twice")));
            }
        }
        for (field, weight) in &self.field_weights {
            if !weight.is_finite() || *weight <= 0.0 {
                return Err(Error::invalid(format!("weight for '{field}' must be positive, got {weight}")));
            }
        }
        if !self.semantic_threshold.is_finite() || !(0.0..=1.0).contains(&self.semantic_threshold) {
            return Err(Error::invalid(format!("semanticThreshold must lie in [0, 1], got {}", self.semantic_threshold)));
        }
        if self.min_word_length == 0 {
            return Err(Error::invalid("minWordLength must be at least 1"));
        }
        if !self.fuzzy_match_score.is_finite() || self.fuzzy_match_score <= 0.0 || self.fuzzy_match_score > 1.0 {
            return Err(Error::invalid(format!("fuzzyMatchScore must lie in (0, 1], got {}", self.fuzzy_match_score)));
        }
        for group in &self.synonym_groups {
            if !group.weight.is_finite() || group.weight <= 0.0 {
                return Err(Error::invalid(format!("synonym group weight must be positive, got {}", group.weight)));
            }
            if group.words.iter().any(|w| w.trim().is_empty()) {
                return Err(Error::invalid("synonym group contains an empty word"));
            }
            if let Some(phrase) = group.words.iter().find(|w| word_count(w) > 1) {
                return Err(Error::invalid(format!("synonym '{phrase}' must be a single word")));
            }
        }
        if self.filters.categories.iter().chain(&self.filters.brands).any(|e| e.name().trim().is_empty()) {
            return Err(Error::invalid("filter allow-lists may not contain empty names"));
        }
        if let Some(range) = &self.filters.price_range {
            range.validate()?;
        }
        Ok(())
    }
}

/// Runs of letters and digits, the unit field text is matched in.
fn word_count(word: &str) -> usize { word.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()).count() }
