use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;

use catalogdb_core::{Error, QueryRequest, Result, SearchConfig};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KeyMaterial<'a> {
    request: &'a QueryRequest,
    config: &'a SearchConfig,
}

/// Canonical JSON form of `(request, config)` plus its XxHash64 digest.
///
/// Object keys are sorted recursively first, so two requests that differ
/// only in map insertion order share a key. Hashing uses the digest; equality
/// compares the canonical text, so digest collisions never alias entries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CacheKey {
    digest: u64,
    canonical: String,
}

impl CacheKey {
    pub fn derive(request: &QueryRequest, config: &SearchConfig) -> Result<Self> {
        let value = serde_json::to_value(KeyMaterial { request, config })
            .map_err(|e| Error::Operation(format!("cache key serialization failed: {e}")))?;
        let canonical = sorted_keys(value).to_string();
        let mut hasher = XxHash64::with_seed(0);
        canonical.hash(&mut hasher);
        Ok(Self { digest: hasher.finish(), canonical })
    }

    pub fn digest(&self) -> u64 { self.digest }

    pub fn as_str(&self) -> &str { &self.canonical }
}

impl Hash for CacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) { state.write_u64(self.digest); }
}

fn sorted_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k, sorted_keys(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sorted_keys).collect()),
        other => other,
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:016x}", self.digest) }
}
