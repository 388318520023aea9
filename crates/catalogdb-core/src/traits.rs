use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::error::Result;
use crate::request::QueryRequest;
use crate::search_config::SearchConfig;
use crate::types::{ResultPage, SearchableItem};

/// Abstracts the wall clock so cache expiry can be driven from tests.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> { Utc::now() }
}

/// Manually advanced clock.
#[derive(Debug)]
pub struct FakeTimeSource {
    t: Mutex<DateTime<Utc>>,
}

impl FakeTimeSource {
    pub fn new(t: DateTime<Utc>) -> Self { Self { t: Mutex::new(t) } }

    pub fn advance(&self, by: Duration) { *self.t.lock() += by; }

    pub fn set(&self, t: DateTime<Utc>) { *self.t.lock() = t; }
}

impl Default for FakeTimeSource {
    fn default() -> Self { Self::new(DateTime::<Utc>::default()) }
}

impl TimeSource for FakeTimeSource {
    fn now(&self) -> DateTime<Utc> { *self.t.lock() }
}

/// The single entry point hosts call into.
pub trait CatalogSearch: Send + Sync {
    fn search(&self, request: &QueryRequest, items: &[SearchableItem], config: &SearchConfig) -> Result<ResultPage>;

    /// Drop every cached page, e.g. after a catalog write.
    fn invalidate(&self);
}
