// NewsData.io provider (primary). Keyed search by city name.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use newsmap_common::Headline;

use crate::provider::HeadlineProvider;

const NEWSDATA_URL: &str = "https://newsdata.io/api/1/latest";

pub struct NewsDataProvider {
    client: reqwest::Client,
    api_key: String,
}

#[derive(Deserialize)]
struct NewsDataResponse {
    #[serde(default)]
    results: Vec<NewsDataArticle>,
}

#[derive(Deserialize)]
struct NewsDataArticle {
    title: Option<String>,
    source_id: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    link: Option<String>,
}

impl NewsDataProvider {
    /// An empty API key is allowed; fetches then fail fast so the chain
    /// moves on to the fallback provider.
    pub fn new(api_key: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build NewsData HTTP client");
        Self {
            client,
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl HeadlineProvider for NewsDataProvider {
    fn name(&self) -> &str {
        "newsdata"
    }

    async fn fetch(&self, city: &str, _country: &str) -> Result<Headline> {
        if self.api_key.is_empty() {
            anyhow::bail!("NEWSDATA_API_KEY not configured");
        }

        let resp = self
            .client
            .get(NEWSDATA_URL)
            .query(&[("q", city), ("apikey", &self.api_key), ("language", "en")])
            .send()
            .await
            .context("NewsData request failed")?;

        if !resp.status().is_success() {
            anyhow::bail!("NewsData returned status {}", resp.status());
        }

        let body: NewsDataResponse = resp.json().await.context("Invalid NewsData response")?;
        let article = body
            .results
            .into_iter()
            .next()
            .context("NewsData returned an empty result set")?;

        Ok(Headline {
            title: article.title.unwrap_or_else(|| "No title".to_string()),
            source: article.source_id.unwrap_or_else(|| "Unknown".to_string()),
            published_at: article.pub_date.unwrap_or_default(),
            url: article.link.unwrap_or_default(),
            cached_at: Utc::now(),
        })
    }
}
