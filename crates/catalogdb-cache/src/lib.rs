//! In-memory result cache with per-entry expiry, keyed by a digest of the
//! request and the configuration that produced the result.
//!
//! Entries expire lazily: a stale entry is dropped by the `get` that finds it.

pub mod key;
pub mod ttl;

pub use key::CacheKey;
pub use ttl::{CacheEntry, TtlCache, DEFAULT_TTL_MS};
