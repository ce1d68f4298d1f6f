// Search module: interchangeable web-search providers behind one trait, tried
// in a fixed priority order with a rate-limit pause after every attempt.

pub mod providers;

use crate::config::AppConfig;
use crate::model::SearchError;
use async_trait::async_trait;
use providers::{BingSearch, BraveSearch, SerpApiSearch, SerperSearch};
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);
pub const MAX_RESULTS: usize = 6;

#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn search(&self, query: &str) -> Result<Vec<String>, SearchError>;
}

/// Ordered strategy list over the configured providers. The first provider
/// returning a non-empty result list wins; failures and empty lists fall
/// through to the next one.
pub struct SearchChain {
    providers: Vec<Box<dyn SearchProvider>>,
    sleep_after_call: Duration,
}

impl SearchChain {
    pub fn from_config(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        let mut providers: Vec<Box<dyn SearchProvider>> = Vec::new();
        if let Some(key) = &config.serpapi_key {
            providers.push(Box::new(SerpApiSearch::new(client.clone(), key.clone())));
        }
        if let Some(key) = &config.serper_api_key {
            providers.push(Box::new(SerperSearch::new(client.clone(), key.clone())));
        }
        if let Some(key) = &config.brave_api_key {
            providers.push(Box::new(BraveSearch::new(client.clone(), key.clone())));
        }
        if let Some(key) = &config.bing_api_key {
            providers.push(Box::new(BingSearch::new(client.clone(), key.clone())));
        }

        Self {
            providers,
            sleep_after_call: config.search_sleep,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub async fn best_links(&self, query: &str) -> Vec<String> {
        for provider in &self.providers {
            let outcome = provider.search(query).await;
            // Pause regardless of outcome to respect provider rate limits.
            sleep(self.sleep_after_call).await;
            match outcome {
                Ok(links) if !links.is_empty() => {
                    info!("Search via {}: {} result(s)", provider.name(), links.len());
                    return links;
                }
                Ok(_) => info!("Search via {}: no results", provider.name()),
                Err(e) => warn!("Search via {} failed: {}", provider.name(), e),
            }
        }
        Vec::new()
    }
}
