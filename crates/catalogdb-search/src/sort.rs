use chrono::{DateTime, NaiveDate};
use std::cmp::Ordering;

use catalogdb_core::{Error, FieldValue, Result, ScoredItem, SearchableItem, SortDirection, SortKey};
use catalogdb_text::normalize::fold;

pub const STOCK_FIELD: &str = "stock";
pub const CREATED_AT_FIELD: &str = "createdAt";

/// A slice of an ordered sequence plus the counts needed to page through it.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub total_pages: usize,
    /// Effective 1-based page after clamping.
    pub page: usize,
}

/// Cuts page `page` of size `page_size` out of `items`.
///
/// Pages outside `1..=total_pages` clamp to the nearest valid page; an empty
/// input yields page 1 of 0.
pub fn paginate<T>(items: Vec<T>, page: i64, page_size: i64) -> Result<Page<T>> {
    if page_size <= 0 {
        return Err(Error::invalid(format!("pageSize must be positive, got {page_size}")));
    }
    let page_size = usize::try_from(page_size).map_err(|_| Error::invalid("pageSize out of range"))?;
    let total_count = items.len();
    let total_pages = total_count.div_ceil(page_size);
    let last = i64::try_from(total_pages.max(1)).unwrap_or(i64::MAX);
    let page = usize::try_from(page.clamp(1, last)).unwrap_or(1);
    let items = items.into_iter().skip((page - 1) * page_size).take(page_size).collect();
    Ok(Page { items, total_count, total_pages, page })
}

/// Orders scored results by `key`. Ties fall back to name ascending, then id.
pub fn sort_results(results: Vec<ScoredItem>, key: SortKey, direction: SortDirection) -> Vec<ScoredItem> {
    let order = sorted_order(&results, |r| (&r.item, r.score), key, direction);
    permute(results, &order)
}

/// Same ordering as `sort_results` over borrowed `(item, score)` pairs.
pub fn sort_candidates<'a>(
    candidates: Vec<(&'a SearchableItem, f64)>,
    key: SortKey,
    direction: SortDirection,
) -> Vec<(&'a SearchableItem, f64)> {
    let order = sorted_order(&candidates, |c| (c.0, c.1), key, direction);
    permute(candidates, &order)
}

struct SortFields<'a> {
    id: &'a str,
    name: &'a str,
    folded_name: String,
    value: Option<f64>,
}

fn sorted_order<T>(
    entries: &[T],
    view: impl Fn(&T) -> (&SearchableItem, f64),
    key: SortKey,
    direction: SortDirection,
) -> Vec<usize> {
    let fields: Vec<SortFields<'_>> = entries
        .iter()
        .map(|e| {
            let (item, score) = view(e);
            SortFields {
                id: &item.id,
                name: item.name(),
                folded_name: fold(item.name()),
                value: sort_value(item, score, key),
            }
        })
        .collect();

    let mut order: Vec<usize> = (0..entries.len()).collect();
    order.sort_by(|&a, &b| compare(&fields[a], &fields[b], key, direction));
    order
}

fn permute<T>(entries: Vec<T>, order: &[usize]) -> Vec<T> {
    let mut slots: Vec<Option<T>> = entries.into_iter().map(Some).collect();
    order.iter().filter_map(|&i| slots[i].take()).collect()
}

fn sort_value(item: &SearchableItem, score: f64, key: SortKey) -> Option<f64> {
    match key {
        SortKey::Name => None,
        SortKey::Relevance => Some(score),
        SortKey::Price => item.number(crate::filter::PRICE_FIELD),
        SortKey::Stock => item.number(STOCK_FIELD),
        SortKey::CreatedAt => item.field(CREATED_AT_FIELD).and_then(timestamp_millis),
    }
}

/// RFC 3339 strings, plain `YYYY-MM-DD` dates, or epoch milliseconds.
fn timestamp_millis(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Number(n) if n.is_finite() => Some(*n),
        FieldValue::Text(s) => {
            let s = s.trim();
            if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
                return Some(ts.timestamp_millis() as f64);
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc().timestamp_millis() as f64)
        }
        _ => None,
    }
}

/// Folded comparison first so "Árbol" sorts next to "arbol", raw text second
/// to keep the order total.
fn compare_names(a: &SortFields<'_>, b: &SortFields<'_>) -> Ordering {
    a.folded_name.cmp(&b.folded_name).then_with(|| a.name.cmp(b.name))
}

fn compare(a: &SortFields<'_>, b: &SortFields<'_>, key: SortKey, direction: SortDirection) -> Ordering {
    let directed = |o: Ordering| if direction == SortDirection::Desc { o.reverse() } else { o };
    let primary = match key {
        SortKey::Name => directed(compare_names(a, b)),
        // missing values go last whichever way the sort runs
        _ => match (a.value, b.value) {
            (Some(x), Some(y)) => directed(x.total_cmp(&y)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    };
    primary.then_with(|| compare_names(a, b)).then_with(|| a.id.cmp(b.id))
}
