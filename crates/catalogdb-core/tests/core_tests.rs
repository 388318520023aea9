use std::fs;
use tempfile::TempDir;

use catalogdb_core::catalog_loader::CatalogLoader;
use catalogdb_core::config::{Config, DEFAULT_CACHE_TTL_MS};
use catalogdb_core::SearchConfig;

#[test]
fn load_single_file_array() {
    let tmp = TempDir::new().unwrap();
    let file_path = tmp.path().join("catalog.json");
    fs::write(
        &file_path,
        r#"[{"id": 1, "name": "Filtro de Aceite", "price": 25.5}, {"id": "p-2", "name": "Pastillas de Freno"}]"#,
    )
    .unwrap();

    let items = CatalogLoader::new().load_path(&file_path).expect("load");

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, "1");
    assert_eq!(items[1].name(), "Pastillas de Freno");
}

#[test]
fn load_directory_in_sorted_order_and_skip_other_files() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::create_dir_all(dir.join("nested")).unwrap();
    fs::write(dir.join("b.json"), r#"{"items": [{"id": "b1", "name": "Bujia"}]}"#).unwrap();
    fs::write(dir.join("a.json"), r#"{"id": "a1", "name": "Amortiguador"}"#).unwrap();
    fs::write(dir.join("nested/c.json"), r#"[{"id": "c1", "name": "Cadena"}]"#).unwrap();
    fs::write(dir.join("notes.txt"), "not a catalog").unwrap();

    let items = CatalogLoader::new().load_path(dir).expect("load dir");
    let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "b1", "c1"]);

    let limited = CatalogLoader::new().load_directory_limited(dir, 1).expect("load limited");
    assert_eq!(limited.len(), 1, "limited to one source file");
}

#[test]
fn malformed_catalog_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let file_path = tmp.path().join("broken.json");
    fs::write(&file_path, "{ nope").unwrap();
    assert!(CatalogLoader::new().load_path(&file_path).is_err());
}

#[test]
fn config_layers_merge_over_defaults() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("catalog.toml"), "[search]\ndefault_page_size = 12\nconfig_path = \"search.json\"\n").unwrap();
    fs::write(dir.join("catalog.test.toml"), "[cache]\nttl_ms = 1000\n").unwrap();

    let config = Config::load_from(dir, "test").expect("config");
    let settings = config.settings().expect("settings");
    assert_eq!(settings.cache.ttl_ms, 1000);
    assert_eq!(settings.search.default_page_size, 12);
    assert_eq!(config.get::<i64>("search.default_page_size").unwrap(), 12);
    assert_eq!(config.resolve("search.json"), dir.join("search.json"));

    let dev = Config::load_from(dir, "dev").expect("dev config");
    assert_eq!(dev.settings().unwrap().cache.ttl_ms, DEFAULT_CACHE_TTL_MS);
}

#[test]
fn config_rejects_zero_ttl() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("catalog.toml"), "[cache]\nttl_ms = 0\n").unwrap();
    assert!(Config::load_from(tmp.path(), "prod").is_err());
}

#[test]
fn search_config_from_missing_path_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let err = SearchConfig::from_path(&tmp.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, catalogdb_core::Error::NotFound(_)));
}
