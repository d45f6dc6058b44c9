//! Yearly feed archive download and decompression
//!
//! Downloads the zipped NVD yearly JSON feed for one year and parses it in
//! memory. Failures here are year-scoped: the driver logs them and moves
//! on to the next year.

use crate::model::Feed;
use cvesieve_core::{Error, Result};
use reqwest::Client;
use std::io::{Cursor, Read};
use std::time::Duration;
use tracing::{debug, info};

/// HTTP client for the yearly feed archives
pub struct FeedClient {
    client: Client,
    url_template: String,
}

impl FeedClient {
    /// Create a new feed client.
    ///
    /// `url_template` must contain a `{year}` placeholder.
    pub fn new(
        url_template: impl Into<String>,
        timeout: Duration,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent(user_agent.into())
                .build()
                .expect("Failed to create HTTP client"),
            url_template: url_template.into(),
        }
    }

    /// Archive URL for one feed year
    pub fn archive_url(&self, year: u16) -> String {
        self.url_template.replace("{year}", &year.to_string())
    }

    /// Download and parse the feed for one year
    pub async fn fetch_year(&self, year: u16) -> Result<Feed> {
        let url = self.archive_url(year);
        info!("Downloading feed archive for {}: {}", year, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::FeedDownload(format!("Failed to fetch {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::FeedDownload(format!(
                "Feed server returned status {} for {}",
                response.status(),
                url
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::FeedDownload(format!("Failed to read body of {}: {}", url, e)))?;

        debug!("Downloaded {} bytes for {}", bytes.len(), year);

        let json = extract_feed_json(&bytes, year)?;
        let feed: Feed = serde_json::from_slice(&json)?;
        Ok(feed)
    }
}

/// Extract the first JSON member from a zipped feed archive
pub fn extract_feed_json(bytes: &[u8], year: u16) -> Result<Vec<u8>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| Error::FeedArchive(format!("Failed to open archive for {}: {}", year, e)))?;

    let json_name = archive
        .file_names()
        .find(|name| name.ends_with(".json"))
        .map(str::to_string)
        .ok_or(Error::EmptyArchive { year })?;

    let mut member = archive
        .by_name(&json_name)
        .map_err(|e| Error::FeedArchive(format!("Failed to read {}: {}", json_name, e)))?;

    let mut json = Vec::with_capacity(member.size() as usize);
    member.read_to_end(&mut json)?;
    Ok(json)
}
