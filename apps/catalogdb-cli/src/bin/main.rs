use std::env;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use catalogdb_core::catalog_loader::CatalogLoader;
use catalogdb_core::config::{Config, EngineSettings};
use catalogdb_core::{FacetFilter, QueryRequest, SearchConfig};
use catalogdb_search::filter::facet_counts;
use catalogdb_search::CatalogSearchEngine;

const USAGE: &str = "Usage: catalogdb <query|facets|validate> [args...]
  catalogdb query <catalog path> \"<query>\" [--sort key] [--dir asc|desc] [--page n] [--page-size n] [--category c] [--brand b] [--json]
  catalogdb facets <catalog path> <field>
  catalogdb validate <search config json>";

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() { eprintln!("{USAGE}"); std::process::exit(1); }
    let cmd = args.remove(0);
    (cmd, args)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

fn load_search_config(config: &Config, settings: &EngineSettings) -> anyhow::Result<SearchConfig> {
    match &settings.search.config_path {
        Some(p) => {
            let path = config.resolve(p);
            info!("Loading search config from {}", path.display());
            Ok(SearchConfig::from_path(&path)?)
        }
        None => Ok(SearchConfig::default()),
    }
}

fn catalog_path(arg: Option<&String>, config: &Config, settings: &EngineSettings) -> anyhow::Result<PathBuf> {
    match (arg, &settings.data.catalog_dir) {
        (Some(p), _) => Ok(PathBuf::from(p)),
        (None, Some(dir)) => Ok(config.resolve(dir)),
        (None, None) => anyhow::bail!("no catalog path given and data.catalog_dir is not configured\n{USAGE}"),
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter().position(|a| a == flag).and_then(|i| args.get(i + 1)).map(String::as_str)
}

fn build_request(query: &str, args: &[String], settings: &EngineSettings) -> anyhow::Result<QueryRequest> {
    let mut request = QueryRequest::new(query).with_page(1, settings.search.default_page_size);
    if let Some(key) = flag_value(args, "--sort") { request.sort = Some(key.parse()?); }
    if let Some(dir) = flag_value(args, "--dir") { request.direction = Some(dir.parse()?); }
    if let Some(page) = flag_value(args, "--page") { request.page = page.parse()?; }
    if let Some(size) = flag_value(args, "--page-size") { request.page_size = size.parse()?; }
    if let Some(c) = flag_value(args, "--category") { request.filters.category = FacetFilter::exact(c); }
    if let Some(b) = flag_value(args, "--brand") { request.filters.brand = FacetFilter::exact(b); }
    Ok(request)
}

fn run_query(args: &[String], config: &Config, settings: &EngineSettings) -> anyhow::Result<()> {
    let path = catalog_path(args.first().filter(|a| !a.starts_with("--")), config, settings)?;
    let query = args.get(1).filter(|a| !a.starts_with("--")).cloned().unwrap_or_default();
    let search_config = load_search_config(config, settings)?;
    let items = CatalogLoader::new().load_path(&path)?;
    let request = build_request(&query, args, settings)?;

    let engine = CatalogSearchEngine::from_settings(settings);
    let page = engine.search(&request, &items, &search_config)?;

    if args.iter().any(|a| a == "--json") {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }
    println!("Found {} results for \"{}\" (page {}/{})", page.total_count, query, page.page, page.total_pages);
    for (i, scored) in page.items.iter().enumerate() {
        let rank = (page.page - 1) * page.page_size + i + 1;
        let price = scored.item.number("price").map_or_else(|| "-".to_string(), |p| format!("{p:.2}"));
        println!("  {rank}. score={:.4}  id={}  name={}  price={}", scored.score, scored.item.id, scored.item.name(), price);
    }
    Ok(())
}

fn run_facets(args: &[String], config: &Config, settings: &EngineSettings) -> anyhow::Result<()> {
    let path = catalog_path(args.first(), config, settings)?;
    let field = args.get(1).map_or("category", String::as_str);
    let items = CatalogLoader::new().load_path(&path)?;
    println!("Facet counts for '{}':", field);
    for (value, count) in facet_counts(&items, field) { println!("  {}: {} items", value, count); }
    Ok(())
}

fn run_validate(args: &[String]) -> anyhow::Result<()> {
    let Some(p) = args.first() else { anyhow::bail!("missing config path\n{USAGE}") };
    let config = SearchConfig::from_path(Path::new(p))?;
    println!(
        "OK: {} searchable fields, semantic search {}, {} synonym groups",
        config.searchable_fields.len(),
        if config.semantic_search_enabled { "on" } else { "off" },
        config.synonym_groups.len()
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    let (cmd, args) = parse_args();
    match cmd.as_str() {
        "query" => run_query(&args, &config, &settings),
        "facets" => run_facets(&args, &config, &settings),
        "validate" => run_validate(&args),
        _ => { eprintln!("Unknown command: {}\n{USAGE}", cmd); std::process::exit(1); }
    }
}
