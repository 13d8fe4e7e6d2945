// Google News RSS provider (fallback). Keyed search by "{city} {country}".

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;

use newsmap_common::Headline;

use crate::provider::HeadlineProvider;

const GOOGLE_NEWS_RSS_URL: &str = "https://news.google.com/rss/search";

pub struct GoogleNewsProvider {
    client: reqwest::Client,
}

impl GoogleNewsProvider {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build Google News HTTP client");
        Self { client }
    }

    /// Parse a search feed and pick the newest entry.
    fn first_entry(bytes: &[u8]) -> Result<Headline> {
        let feed = feed_rs::parser::parse(bytes).context("Failed to parse RSS feed")?;
        let entry = feed
            .entries
            .into_iter()
            .next()
            .context("Feed contained no entries")?;

        let url = entry
            .links
            .first()
            .map(|l| l.href.clone())
            .context("Feed entry has no link")?;

        Ok(Headline {
            title: entry
                .title
                .map(|t| t.content)
                .unwrap_or_else(|| "No title".to_string()),
            source: "Google News".to_string(),
            published_at: entry
                .published
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_default(),
            url,
            cached_at: Utc::now(),
        })
    }
}

#[async_trait]
impl HeadlineProvider for GoogleNewsProvider {
    fn name(&self) -> &str {
        "google-news-rss"
    }

    async fn fetch(&self, city: &str, country: &str) -> Result<Headline> {
        let query = format!("{city} {country}");
        let resp = self
            .client
            .get(GOOGLE_NEWS_RSS_URL)
            .query(&[("q", query.as_str()), ("hl", "en"), ("gl", "US"), ("ceid", "US:en")])
            .header("User-Agent", "newsmap/0.1")
            .send()
            .await
            .context("Google News request failed")?;

        if !resp.status().is_success() {
            anyhow::bail!("Google News returned status {}", resp.status());
        }

        let bytes = resp.bytes().await.context("Failed to read feed body")?;
        Self::first_entry(&bytes)
    }
}
