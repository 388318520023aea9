use std::collections::BTreeMap;

use catalogdb_core::{FacetFilter, PriceRange, SearchConfig, SearchFilters, SearchableItem, StatusFilter};

pub const CATEGORY_FIELD: &str = "category";
pub const SUBCATEGORY_FIELD: &str = "subcategory";
pub const BRAND_FIELD: &str = "brand";
pub const VEHICLE_TYPE_FIELD: &str = "vehicleType";
pub const STORE_FIELD: &str = "store";
pub const PRICE_FIELD: &str = "price";

/// Exact-match constraints applied before any relevance work.
///
/// Request filters are combined with the catalog-wide allow-lists and default
/// price range of the `SearchConfig`. Items lacking a constrained field never
/// match that constraint.
#[derive(Debug, Clone, Default)]
pub struct FacetFilterEngine {
    allowed_categories: Vec<String>,
    allowed_brands: Vec<String>,
    default_price_range: Option<PriceRange>,
}

impl FacetFilterEngine {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            allowed_categories: config.filters.category_names().map(str::to_string).collect(),
            allowed_brands: config.filters.brand_names().map(str::to_string).collect(),
            default_price_range: config.filters.price_range,
        }
    }

    pub fn matches(&self, item: &SearchableItem, filters: &SearchFilters) -> bool {
        facet_matches(item, CATEGORY_FIELD, &filters.category)
            && facet_matches(item, SUBCATEGORY_FIELD, &filters.subcategory)
            && facet_matches(item, BRAND_FIELD, &filters.brand)
            && facet_matches(item, VEHICLE_TYPE_FIELD, &filters.vehicle_type)
            && facet_matches(item, STORE_FIELD, &filters.store)
            && allowed(item, CATEGORY_FIELD, &self.allowed_categories)
            && allowed(item, BRAND_FIELD, &self.allowed_brands)
            && self.price_matches(item, filters.price_range.as_ref())
            && status_matches(item, filters.status)
    }

    fn price_matches(&self, item: &SearchableItem, requested: Option<&PriceRange>) -> bool {
        let Some(range) = requested.or(self.default_price_range.as_ref()) else { return true };
        if range.min.is_none() && range.max.is_none() {
            return true;
        }
        item.number(PRICE_FIELD).is_some_and(|price| range.contains(price))
    }
}

fn facet_matches(item: &SearchableItem, field: &str, filter: &FacetFilter) -> bool {
    match filter.value() {
        None => true,
        Some(wanted) => item.text(field).is_some_and(|v| v.trim() == wanted.trim()),
    }
}

fn allowed(item: &SearchableItem, field: &str, allow_list: &[String]) -> bool {
    if allow_list.is_empty() {
        return true;
    }
    item.text(field).is_some_and(|v| allow_list.iter().any(|a| a.trim() == v.trim()))
}

/// `status` text ("active"/"inactive") wins over the boolean `isActive` or
/// `active` flags.
fn item_is_active(item: &SearchableItem) -> Option<bool> {
    if let Some(status) = item.text("status") {
        return match status.trim().to_ascii_lowercase().as_str() {
            "active" => Some(true),
            "inactive" => Some(false),
            _ => None,
        };
    }
    item.field("isActive").or_else(|| item.field("active")).and_then(|v| v.as_bool())
}

fn status_matches(item: &SearchableItem, status: StatusFilter) -> bool {
    match status {
        StatusFilter::All => true,
        StatusFilter::Active => item_is_active(item) == Some(true),
        StatusFilter::Inactive => item_is_active(item) == Some(false),
    }
}

/// Number of items per distinct text value of `field`, ordered by value.
/// Items without a text value for the field are not counted.
pub fn facet_counts(items: &[SearchableItem], field: &str) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in items.iter().filter_map(|i| i.text(field)) {
        *counts.entry(value.trim()).or_default() += 1;
    }
    counts.into_iter().map(|(v, c)| (v.to_string(), c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalogdb_core::FacetEntry;

    fn item(id: &str, category: &str, brand: &str, price: f64) -> SearchableItem {
        SearchableItem::new(id)
            .with_field("name", id)
            .with_field(CATEGORY_FIELD, category)
            .with_field(BRAND_FIELD, brand)
            .with_field(PRICE_FIELD, price)
    }

    #[test]
    fn all_sentinel_and_missing_values_skip_the_check() {
        let engine = FacetFilterEngine::default();
        let filters = SearchFilters { category: FacetFilter::exact("all"), ..SearchFilters::default() };
        assert!(engine.matches(&item("a", "Frenos", "Bosch", 10.0), &filters));
    }

    #[test]
    fn missing_field_fails_an_active_equality_filter() {
        let engine = FacetFilterEngine::default();
        let filters = SearchFilters { store: FacetFilter::exact("Centro"), ..SearchFilters::default() };
        assert!(!engine.matches(&item("a", "Frenos", "Bosch", 10.0), &filters));
        let in_store = item("b", "Frenos", "Bosch", 10.0).with_field(STORE_FIELD, "Centro");
        assert!(engine.matches(&in_store, &filters));
    }

    #[test]
    fn predicates_are_and_combined() {
        let engine = FacetFilterEngine::default();
        let filters = SearchFilters {
            category: FacetFilter::exact("Frenos"),
            brand: FacetFilter::exact("Bosch"),
            price_range: Some(PriceRange::between(10.0, 50.0)),
            ..SearchFilters::default()
        };
        assert!(engine.matches(&item("a", "Frenos", "Bosch", 50.0), &filters));
        assert!(!engine.matches(&item("b", "Frenos", "Brembo", 20.0), &filters));
        assert!(!engine.matches(&item("c", "Frenos", "Bosch", 50.01), &filters));
        assert!(!engine.matches(&SearchableItem::new("d").with_field(CATEGORY_FIELD, "Frenos").with_field(BRAND_FIELD, "Bosch"), &filters));
    }

    #[test]
    fn status_reads_text_or_flag() {
        let engine = FacetFilterEngine::default();
        let active = SearchFilters { status: StatusFilter::Active, ..SearchFilters::default() };
        let inactive = SearchFilters { status: StatusFilter::Inactive, ..SearchFilters::default() };
        let by_text = SearchableItem::new("a").with_field("status", "Active");
        let by_flag = SearchableItem::new("b").with_field("isActive", false);
        let unknown = SearchableItem::new("c");

        assert!(engine.matches(&by_text, &active));
        assert!(engine.matches(&by_flag, &inactive));
        assert!(!engine.matches(&unknown, &active));
        assert!(!engine.matches(&unknown, &inactive));
    }

    #[test]
    fn config_allow_lists_and_default_price_apply() {
        let mut config = SearchConfig::default();
        config.filters.categories = vec![FacetEntry::from("Frenos"), FacetEntry::Record { name: "Filtros".into() }];
        config.filters.price_range = Some(PriceRange::between(0.0, 30.0));
        let engine = FacetFilterEngine::new(&config);
        let none = SearchFilters::default();

        assert!(engine.matches(&item("a", "Filtros", "Bosch", 25.5), &none));
        assert!(!engine.matches(&item("b", "Motor", "Bosch", 5.0), &none));
        assert!(!engine.matches(&item("c", "Frenos", "Bosch", 45.0), &none));

        let wider = SearchFilters { price_range: Some(PriceRange::between(0.0, 100.0)), ..SearchFilters::default() };
        assert!(engine.matches(&item("c", "Frenos", "Bosch", 45.0), &wider), "request range overrides the default");
    }

    #[test]
    fn counts_facet_values() {
        let items = vec![
            item("a", "Frenos", "Bosch", 1.0),
            item("b", "Filtros", "Bosch", 1.0),
            item("c", "Frenos", "Brembo", 1.0),
            SearchableItem::new("d"),
        ];
        assert_eq!(facet_counts(&items, CATEGORY_FIELD), vec![("Filtros".to_string(), 1), ("Frenos".to_string(), 2)]);
    }
}
