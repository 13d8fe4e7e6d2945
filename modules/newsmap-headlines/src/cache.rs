//! Time-bounded headline cache keyed by location id.
//!
//! Bounds both latency and external call volume: a live entry is returned
//! without touching the provider chain. Best-effort only — concurrent misses
//! on the same key may each fetch (no single-flight), and failures are never
//! cached.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use newsmap_common::{Headline, Location, NewsMapError};

use crate::provider::ProviderChain;

pub struct HeadlineCache {
    chain: ProviderChain,
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

struct CacheEntry {
    headline: Headline,
    cached_at: Instant,
}

impl HeadlineCache {
    pub fn new(chain: ProviderChain, ttl: Duration) -> Self {
        Self {
            chain,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the cached headline for a location, fetching through the
    /// provider chain when the entry is missing or stale. The lock is never
    /// held across provider I/O.
    pub async fn get(&self, location: &Location) -> Result<Headline, NewsMapError> {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(&location.location_id) {
                if entry.cached_at.elapsed() < self.ttl {
                    debug!(location_id = %location.location_id, "Headline cache hit");
                    return Ok(entry.headline.clone());
                }
            }
        }

        let mut headline = self.chain.fetch(&location.city, &location.country).await?;
        // The cache layer owns the stamp, whichever provider produced it.
        headline.cached_at = Utc::now();

        let mut entries = self.entries.write().await;
        entries.insert(
            location.location_id.clone(),
            CacheEntry {
                headline: headline.clone(),
                cached_at: Instant::now(),
            },
        );
        Ok(headline)
    }
}
