use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use catalogdb_cache::{CacheKey, TtlCache};
use catalogdb_core::config::EngineSettings;
use catalogdb_core::traits::{CatalogSearch, TimeSource};
use catalogdb_core::{QueryRequest, Result, ResultPage, ScoredItem, SearchConfig, SearchableItem, SortKey};
use catalogdb_text::RelevanceScorer;

use crate::filter::FacetFilterEngine;
use crate::sort::{paginate, sort_candidates};

/// Score given to every item of a browse request (blank query).
const BROWSE_SCORE: f64 = 1.0;

/// Runs the filter → score → sort → paginate pipeline and memoises pages.
///
/// Each engine owns its cache; independent engines never share results.
pub struct CatalogSearchEngine {
    cache: TtlCache<CacheKey, ResultPage>,
}

impl CatalogSearchEngine {
    pub fn new() -> Self { Self::with_cache(TtlCache::default()) }

    pub fn with_ttl(ttl: Duration) -> Self { Self::with_cache(TtlCache::new(ttl)) }

    pub fn with_time_source(ttl: Duration, time_source: Arc<dyn TimeSource>) -> Self {
        Self::with_cache(TtlCache::with_time_source(ttl, time_source))
    }

    pub fn with_cache(cache: TtlCache<CacheKey, ResultPage>) -> Self { Self { cache } }

    pub fn from_settings(settings: &EngineSettings) -> Self { Self::with_cache(TtlCache::with_ttl_ms(settings.cache.ttl_ms)) }

    pub fn search(&self, request: &QueryRequest, items: &[SearchableItem], config: &SearchConfig) -> Result<ResultPage> {
        config.validate()?;
        request.validate()?;

        let key = CacheKey::derive(request, config)?;
        let expected_page_size = usize::try_from(request.page_size).unwrap_or_default();
        let cached = self.cache.get_if(&key, |page| {
            let ok = page.is_consistent() && page.page_size == expected_page_size;
            if !ok {
                warn!(key = %key, "discarding inconsistent cached page");
            }
            ok
        });
        if let Some(page) = cached {
            debug!(key = %key, total = page.total_count, "cache hit");
            return Ok((*page).clone());
        }

        debug!(key = %key, "cache miss");
        let page = Self::search_uncached(request, items, config)?;
        self.cache.put(key, page.clone());
        Ok(page)
    }

    /// The full pipeline without reading or writing the cache.
    pub fn search_uncached(request: &QueryRequest, items: &[SearchableItem], config: &SearchConfig) -> Result<ResultPage> {
        config.validate()?;
        request.validate()?;

        let filter = FacetFilterEngine::new(config);
        let scorer = RelevanceScorer::new(config);
        let tokens = RelevanceScorer::tokenize_query(&request.query);

        let survivors = items.iter().filter(|item| filter.matches(item, &request.filters));
        let candidates: Vec<(&SearchableItem, f64)> = if tokens.is_empty() {
            survivors.map(|item| (item, BROWSE_SCORE)).collect()
        } else {
            survivors
                .filter_map(|item| {
                    let score = scorer.score(item, &tokens);
                    scorer.passes_threshold(score).then_some((item, score))
                })
                .collect()
        };
        debug!(candidates = items.len(), matched = candidates.len(), query = %request.query, "scored catalog");

        let key = request.sort.unwrap_or(if scorer.is_semantic() && !tokens.is_empty() {
            SortKey::Relevance
        } else {
            SortKey::Name
        });
        let direction = request.direction.unwrap_or_else(|| key.default_direction());
        let ordered = sort_candidates(candidates, key, direction);

        let page = paginate(ordered, request.page, request.page_size)?;
        let page_size = usize::try_from(request.page_size).unwrap_or_default();
        Ok(ResultPage {
            items: page
                .items
                .into_iter()
                .map(|(item, score)| ScoredItem { item: item.clone(), score })
                .collect(),
            total_count: page.total_count,
            total_pages: page.total_pages,
            page: page.page,
            page_size,
        })
    }

    /// Drops all cached pages; call after any write to the catalog.
    pub fn invalidate(&self) { self.cache.clear(); }

    pub fn cache_len(&self) -> usize { self.cache.len() }
}

impl Default for CatalogSearchEngine {
    fn default() -> Self { Self::new() }
}

impl CatalogSearch for CatalogSearchEngine {
    fn search(&self, request: &QueryRequest, items: &[SearchableItem], config: &SearchConfig) -> Result<ResultPage> {
        Self::search(self, request, items, config)
    }

    fn invalidate(&self) { Self::invalidate(self) }
}
