// Concrete search providers. Each returns at most MAX_RESULTS organic links
// and maps transport or status problems to a typed error so the chain can
// move on to the next provider.
use super::{MAX_RESULTS, SearchProvider};
use crate::model::SearchError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

fn string_list(items: Option<&Vec<Value>>, key: &str) -> Vec<String> {
    items
        .map(|arr| {
            arr.iter()
                .filter_map(|it| it.get(key).and_then(Value::as_str))
                .map(str::to_string)
                .take(MAX_RESULTS)
                .collect()
        })
        .unwrap_or_default()
}

async fn json_body(response: reqwest::Response) -> Result<Value, SearchError> {
    let status = response.status();
    if !status.is_success() {
        return Err(SearchError::Status(status.as_u16()));
    }
    Ok(response.json().await?)
}

pub struct SerpApiSearch {
    client: Client,
    api_key: String,
}

impl SerpApiSearch {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl SearchProvider for SerpApiSearch {
    fn name(&self) -> &'static str {
        "serpapi"
    }

    async fn search(&self, query: &str) -> Result<Vec<String>, SearchError> {
        let response = self
            .client
            .get("https://serpapi.com/search.json")
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("num", "6"),
                ("hl", "en"),
                ("gl", "uk"),
                ("api_key", &self.api_key),
            ])
            .send()
            .await?;
        let data = json_body(response).await?;
        Ok(string_list(
            data.get("organic_results").and_then(Value::as_array),
            "link",
        ))
    }
}

pub struct SerperSearch {
    client: Client,
    api_key: String,
}

impl SerperSearch {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl SearchProvider for SerperSearch {
    fn name(&self) -> &'static str {
        "serper"
    }

    async fn search(&self, query: &str) -> Result<Vec<String>, SearchError> {
        let response = self
            .client
            .post("https://google.serper.dev/search")
            .header("X-API-KEY", &self.api_key)
            .json(&json!({"q": query, "num": 6}))
            .send()
            .await?;
        let data = json_body(response).await?;
        Ok(string_list(
            data.get("organic").and_then(Value::as_array),
            "link",
        ))
    }
}

pub struct BraveSearch {
    client: Client,
    api_key: String,
}

impl BraveSearch {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl SearchProvider for BraveSearch {
    fn name(&self) -> &'static str {
        "brave"
    }

    async fn search(&self, query: &str) -> Result<Vec<String>, SearchError> {
        let response = self
            .client
            .get("https://api.search.brave.com/res/v1/web/search")
            .header("Accept", "application/json")
            .header("X-Subscription-Token", &self.api_key)
            .query(&[("q", query), ("count", "6"), ("country", "gb")])
            .send()
            .await?;
        let data = json_body(response).await?;
        Ok(string_list(
            data.get("web")
                .and_then(|w| w.get("results"))
                .and_then(Value::as_array),
            "url",
        ))
    }
}

/// Legacy provider, kept last in the priority order while it is deprecated.
pub struct BingSearch {
    client: Client,
    api_key: String,
}

impl BingSearch {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl SearchProvider for BingSearch {
    fn name(&self) -> &'static str {
        "bing"
    }

    async fn search(&self, query: &str) -> Result<Vec<String>, SearchError> {
        let response = self
            .client
            .get("https://api.bing.microsoft.com/v7.0/search")
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .query(&[("q", query), ("count", "6"), ("mkt", "en-GB")])
            .send()
            .await?;
        let data = json_body(response).await?;
        Ok(string_list(
            data.get("webPages")
                .and_then(|w| w.get("value"))
                .and_then(Value::as_array),
            "url",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_list_caps_and_skips_missing_keys() {
        let body = json!({
            "organic": [
                {"link": "https://a"},
                {"title": "no link"},
                {"link": "https://b"},
                {"link": "https://c"},
                {"link": "https://d"},
                {"link": "https://e"},
                {"link": "https://f"},
                {"link": "https://g"},
            ]
        });
        let links = string_list(body.get("organic").and_then(Value::as_array), "link");
        assert_eq!(links.len(), MAX_RESULTS);
        assert_eq!(links[0], "https://a");
        assert!(!links.contains(&"https://g".to_string()));
    }
}
