//! catalogdb-search
//!
//! The request/response pipeline: facet filtering, relevance scoring, ordering,
//! pagination and result caching behind `CatalogSearchEngine`.

pub mod engine;
pub mod filter;
pub mod sort;

pub use engine::CatalogSearchEngine;
pub use filter::FacetFilterEngine;
pub use sort::{paginate, sort_results, Page};
