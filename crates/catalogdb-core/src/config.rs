//! Host configuration loader and path helpers.
//!
//! Uses Figment to merge `catalog.toml` + `catalog.<env>.toml` + `CATALOG_*` env
//! vars (nested keys separated by `__`, e.g. `CATALOG_CACHE__TTL_MS`).

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_CACHE_TTL_MS: u64 = 300_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub ttl_ms: u64,
}

impl Default for CacheSettings {
    fn default() -> Self { Self { ttl_ms: DEFAULT_CACHE_TTL_MS } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Path of the persisted `SearchConfig` JSON; built-in defaults when unset.
    pub config_path: Option<String>,
    pub default_page_size: i64,
}

impl Default for SearchSettings {
    fn default() -> Self { Self { config_path: None, default_page_size: crate::request::DEFAULT_PAGE_SIZE } }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub catalog_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub cache: CacheSettings,
    pub search: SearchSettings,
    pub data: DataSettings,
}

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_from(Path::new("."), &env_name)
    }

    pub fn load_from(base_dir: &Path, env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(EngineSettings::default()))
            .merge(Toml::file(base_dir.join("catalog.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(base_dir.join("catalog.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base_dir.join("catalog.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base_dir.join("catalog.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("CATALOG_").split("__"));

        let config = Self { figment, base_dir: base_dir.to_path_buf() };
        config.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<EngineSettings> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to extract engine settings: {}", e))
    }

    /// Resolves a configured path against the directory the config was loaded from.
    pub fn resolve(&self, p: &str) -> PathBuf { resolve_with_base(&self.base_dir, p) }

    fn validate(&self) -> anyhow::Result<()> {
        let settings = self.settings()?;
        if settings.cache.ttl_ms == 0 {
            anyhow::bail!("cache.ttl_ms must be positive");
        }
        if settings.search.default_page_size <= 0 {
            anyhow::bail!("search.default_page_size must be positive, got {}", settings.search.default_page_size);
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
