#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod catalog_loader;
pub mod config;
pub mod error;
pub mod request;
pub mod search_config;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use request::{FacetFilter, PriceRange, QueryRequest, SearchFilters, SortDirection, SortKey, StatusFilter};
pub use search_config::{ConfigFilters, FacetEntry, SearchConfig, SynonymGroup};
pub use types::{FieldValue, ResultPage, ScoredItem, SearchableItem};
