//! Feed sources
//!
//! Where the raw CSV text of each feed comes from: the public GitHub mirror
//! over HTTP, or a local directory holding the same files.

use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

use super::error::{DatasetError, DatasetResult};
use super::types::Category;

/// Default remote location of the feeds
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/bumbeishvili/covid19-daily-data/master";

/// File name of a category's feed
pub fn feed_file_name(category: Category) -> String {
    format!("time_series_19-covid-{}.csv", category.feed_name())
}

/// Common trait for anything that can hand over a feed's CSV text
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Human-readable location, for logs
    fn describe(&self, category: Category) -> String;

    /// Fetch the raw CSV text of one feed
    async fn fetch(&self, category: Category) -> DatasetResult<String>;
}

/// Fetches feeds over HTTP
pub struct HttpFeedSource {
    client: Client,
    base_url: String,
}

impl HttpFeedSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> DatasetResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, category: Category) -> String {
        format!("{}/{}", self.base_url, feed_file_name(category))
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    fn describe(&self, category: Category) -> String {
        self.url(category)
    }

    async fn fetch(&self, category: Category) -> DatasetResult<String> {
        let url = self.url(category);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(DatasetError::Http {
                url,
                error: format!("status {}", response.status()),
            });
        }

        Ok(response.text().await?)
    }
}

/// Reads feeds from a local directory
pub struct FileFeedSource {
    dir: PathBuf,
}

impl FileFeedSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, category: Category) -> PathBuf {
        self.dir.join(feed_file_name(category))
    }
}

#[async_trait]
impl FeedSource for FileFeedSource {
    fn describe(&self, category: Category) -> String {
        self.path(category).display().to_string()
    }

    async fn fetch(&self, category: Category) -> DatasetResult<String> {
        Ok(tokio::fs::read_to_string(self.path(category)).await?)
    }
}
