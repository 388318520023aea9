use catalogdb_core::SearchConfig;

pub const DEFAULT_FIELD_WEIGHT: f64 = 1.0;

/// Searchable fields in declared order with their resolved weights.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldWeights {
    entries: Vec<(String, f64)>,
}

impl FieldWeights {
    pub fn from_config(config: &SearchConfig) -> Self {
        let entries = config
            .searchable_fields
            .iter()
            .map(|f| (f.clone(), config.field_weights.get(f).copied().unwrap_or(DEFAULT_FIELD_WEIGHT)))
            .collect();
        Self { entries }
    }

    /// Resolved weight of a searchable field; 0.0 for any other field.
    pub fn weight_of(&self, field: &str) -> f64 {
        self.entries.iter().find(|(name, _)| name == field).map_or(0.0, |(_, w)| *w)
    }

    pub fn is_searchable(&self, field: &str) -> bool { self.entries.iter().any(|(name, _)| name == field) }

    pub fn fields(&self) -> impl Iterator<Item = (&str, f64)> { self.entries.iter().map(|(n, w)| (n.as_str(), *w)) }

    pub fn total_weight(&self) -> f64 { self.entries.iter().map(|(_, w)| w).sum() }
}
