// Trait abstraction for headline providers.
//
// HeadlineProvider puts every news source behind one interface so the chain
// can try them in order, and so tests can swap in mock providers: no network,
// no API keys, `cargo test` in seconds.

use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};

use newsmap_common::{Headline, NewsMapError};

#[async_trait]
pub trait HeadlineProvider: Send + Sync {
    /// Provider name, for logging.
    fn name(&self) -> &str;

    /// Fetch one headline for a city. Any failure (missing credential,
    /// rate limit, empty result set, network error, timeout) is an `Err`.
    async fn fetch(&self, city: &str, country: &str) -> Result<Headline>;
}

/// Ordered list of providers tried in sequence with early exit on success.
pub struct ProviderChain {
    providers: Vec<Box<dyn HeadlineProvider>>,
}

impl ProviderChain {
    pub fn new(providers: Vec<Box<dyn HeadlineProvider>>) -> Self {
        Self { providers }
    }

    /// Try each provider in order; the first usable headline wins.
    /// Returns `HeadlinesUnavailable` once every provider has failed.
    pub async fn fetch(&self, city: &str, country: &str) -> Result<Headline, NewsMapError> {
        for provider in &self.providers {
            match provider.fetch(city, country).await {
                Ok(headline) => {
                    info!(provider = provider.name(), city, "Fetched headline");
                    return Ok(headline);
                }
                Err(e) => {
                    warn!(provider = provider.name(), city, error = %e, "Provider failed");
                }
            }
        }
        Err(NewsMapError::HeadlinesUnavailable)
    }
}
