use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Equality constraint on a facet field. The literal `"all"` (any case) and a
/// missing value both disable the constraint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum FacetFilter {
    #[default]
    All,
    Exact(String),
}

impl FacetFilter {
    pub fn exact(value: impl Into<String>) -> Self { Self::from(Some(value.into())) }

    pub fn value(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Exact(v) => Some(v),
        }
    }
}

impl From<Option<String>> for FacetFilter {
    fn from(v: Option<String>) -> Self {
        match v {
            Some(s) if !s.trim().is_empty() && !s.trim().eq_ignore_ascii_case("all") => Self::Exact(s),
            _ => Self::All,
        }
    }
}

impl From<FacetFilter> for Option<String> {
    fn from(v: FacetFilter) -> Self {
        match v {
            FacetFilter::All => None,
            FacetFilter::Exact(s) => Some(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

/// Inclusive price bounds; either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn between(min: f64, max: f64) -> Self { Self { min: Some(min), max: Some(max) } }

    pub fn contains(&self, price: f64) -> bool {
        self.min.map_or(true, |min| price >= min) && self.max.map_or(true, |max| price <= max)
    }

    pub fn validate(&self) -> Result<()> {
        for bound in [self.min, self.max].into_iter().flatten() {
            if !bound.is_finite() {
                return Err(Error::invalid(format!("price bound {bound} is not finite")));
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(Error::invalid(format!("price range min {min} exceeds max {max}")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilters {
    pub category: FacetFilter,
    pub subcategory: FacetFilter,
    pub brand: FacetFilter,
    pub vehicle_type: FacetFilter,
    pub store: FacetFilter,
    pub status: StatusFilter,
    pub price_range: Option<PriceRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Name,
    Price,
    Stock,
    CreatedAt,
    Relevance,
}

impl SortKey {
    pub fn default_direction(self) -> SortDirection {
        match self {
            Self::Name | Self::Price | Self::Stock => SortDirection::Asc,
            Self::CreatedAt | Self::Relevance => SortDirection::Desc,
        }
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "price" => Ok(Self::Price),
            "stock" => Ok(Self::Stock),
            "createdat" | "created_at" | "recent" => Ok(Self::CreatedAt),
            "relevance" => Ok(Self::Relevance),
            other => Err(Error::invalid(format!("unknown sort key '{other}'"))),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::Stock => "stock",
            Self::CreatedAt => "createdAt",
            Self::Relevance => "relevance",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(Error::invalid(format!("unknown sort direction '{other}'"))),
        }
    }
}

/// A single search call as issued by the storefront or admin console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryRequest {
    pub query: String,
    pub filters: SearchFilters,
    pub sort: Option<SortKey>,
    pub direction: Option<SortDirection>,
    /// 1-based; out-of-range values are clamped.
    pub page: i64,
    pub page_size: i64,
}

impl Default for QueryRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            filters: SearchFilters::default(),
            sort: None,
            direction: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    #[must_use]
    pub fn sorted_by(mut self, key: SortKey, direction: SortDirection) -> Self {
        self.sort = Some(key);
        self.direction = Some(direction);
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: i64, page_size: i64) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size <= 0 {
            return Err(Error::invalid(format!("pageSize must be positive, got {}", self.page_size)));
        }
        if let Some(range) = &self.filters.price_range {
            range.validate()?;
        }
        Ok(())
    }
}
