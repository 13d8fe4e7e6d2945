//! Headline retrieval: provider chain (NewsData primary, Google News RSS
//! fallback) behind a TTL cache keyed by location id.

pub mod cache;
pub mod google_news;
pub mod newsdata;
pub mod provider;

pub use cache::HeadlineCache;
pub use google_news::GoogleNewsProvider;
pub use newsdata::NewsDataProvider;
pub use provider::{HeadlineProvider, ProviderChain};
