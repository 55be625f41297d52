//! # Sequence Generator
//!
//! Hands out business ids. Each call is one round trip to the shared counter store;
//! nothing is cached in process, so any number of service instances pointed at the
//! same store draw from one monotonic source.

use crate::docstore::CounterStore;
use crate::error::CatalogResult;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Monotonic id source backed by [`CounterStore::increment_or_create`].
#[derive(Clone)]
pub struct SequenceGenerator {
    counters: Arc<dyn CounterStore>,
}

impl SequenceGenerator {
    pub fn new(counters: Arc<dyn CounterStore>) -> Self {
        Self { counters }
    }

    /// Next value of the named counter, starting at 1.
    ///
    /// Concurrent calls never see the same value. A returned value is consumed even if
    /// the caller never uses it; on error no value may be assumed consumed.
    #[instrument(skip(self))]
    pub async fn next(&self, counter: &str) -> CatalogResult<u64> {
        match self.counters.increment_or_create(counter).await {
            Ok(value) => {
                debug!(value, "Reserved");
                Ok(value)
            }
            Err(e) => {
                warn!(error = %e, "Counter increment failed");
                Err(e.into())
            }
        }
    }

    /// Last value handed out for `counter`, if any.
    pub async fn current(&self, counter: &str) -> CatalogResult<Option<u64>> {
        Ok(self.counters.current(counter).await?)
    }
}
