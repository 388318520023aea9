//! Domain types shared by the scoring, caching and search crates.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub type ItemId = String;
pub type Fields = BTreeMap<String, FieldValue>;

/// A single field value of a catalog record.
///
/// Catalog data arrives from heterogeneous upstream sources, so the value is
/// decoded leniently:
/// - `Named` covers the `{ "name": "..." }` record shape used for
///   categories, brands and stores
/// - `Other` absorbs everything else (arrays, nulls, nested objects) and never
///   matches a filter or a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Named { name: String },
    Other(serde_json::Value),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Named { name } => Some(name),
            _ => None,
        }
    }

    /// Numbers, plus numeric strings such as `"25.50"`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self { Self::Text(v.to_string()) }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self { Self::Text(v) }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self { Self::Number(v) }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self { Self::Bool(v) }
}

/// A catalog record supplied by the caller.
///
/// `id` accepts strings or integers (and the `_id` spelling) on input; every
/// other key lands in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchableItem {
    #[serde(alias = "_id", deserialize_with = "deserialize_item_id")]
    pub id: ItemId,
    #[serde(flatten)]
    pub fields: Fields,
}

fn deserialize_item_id<'de, D>(deserializer: D) -> std::result::Result<ItemId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Unsigned(n) => n.to_string(),
        RawId::Signed(n) => n.to_string(),
    })
}

impl SearchableItem {
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self { id: id.into(), fields: Fields::new() }
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> { self.fields.get(name) }

    pub fn text(&self, name: &str) -> Option<&str> { self.field(name).and_then(FieldValue::as_text) }

    pub fn number(&self, name: &str) -> Option<f64> { self.field(name).and_then(FieldValue::as_number) }

    /// Display name used for ordering and tie-breaks; empty when absent.
    pub fn name(&self) -> &str { self.text("name").unwrap_or("") }
}

/// An item paired with its relevance score in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub item: SearchableItem,
    pub score: f64,
}

/// One page of ranked results.
///
/// `page` is the effective page after clamping; `total_pages` is zero when
/// nothing matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage {
    pub items: Vec<ScoredItem>,
    pub total_count: usize,
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
}

impl ResultPage {
    pub fn empty(page_size: usize) -> Self {
        Self { items: Vec::new(), total_count: 0, total_pages: 0, page: 1, page_size }
    }

    /// Structural sanity check used before trusting a cached page.
    pub fn is_consistent(&self) -> bool {
        if self.page_size == 0 || self.page == 0 || self.items.len() > self.page_size {
            return false;
        }
        if self.total_pages != self.total_count.div_ceil(self.page_size) {
            return false;
        }
        if self.page > self.total_pages.max(1) || self.items.len() > self.total_count {
            return false;
        }
        self.items.iter().all(|s| s.score.is_finite() && (0.0..=1.0).contains(&s.score))
    }
}
