use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::FetchError;
use crate::models::Item;

pub const DEFAULT_API_BASE: &str = "https://hacker-news.firebaseio.com/v0/";

/// Read-only access to Hacker News items.
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Ids of the current top stories, best ranked first
    async fn top_story_ids(&self) -> Result<Vec<u64>, FetchError>;

    /// The item with this id, or `None` if the API has no record of it
    async fn item(&self, id: u64) -> Result<Option<Item>, FetchError>;
}

pub struct HackerNewsClient {
    client: Client,
    base: Url,
}

impl HackerNewsClient {
    pub fn new(base: Url) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("hn-summarize/0.1")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base: normalize_base(base),
        })
    }

    pub fn top_stories_url(&self) -> String {
        self.endpoint("topstories.json")
    }

    pub fn item_url(&self, id: u64) -> String {
        self.endpoint(&format!("item/{}.json", id))
    }

    fn endpoint(&self, path: &str) -> String {
        // The base always ends in '/', so joining a relative path cannot fail
        self.base
            .join(path)
            .map(String::from)
            .unwrap_or_else(|_| format!("{}{}", self.base, path))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, FetchError> {
        tracing::debug!(%url, "GET");

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(source) => return Err(FetchError::Request { url, source }),
        };

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }

        match response.json::<T>().await {
            Ok(body) => Ok(body),
            Err(source) => Err(FetchError::Decode { url, source }),
        }
    }
}

#[async_trait]
impl ItemSource for HackerNewsClient {
    async fn top_story_ids(&self) -> Result<Vec<u64>, FetchError> {
        self.get_json(self.top_stories_url()).await
    }

    async fn item(&self, id: u64) -> Result<Option<Item>, FetchError> {
        self.get_json(self.item_url(id)).await
    }
}

fn normalize_base(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}
