use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_REVIEW_BASE_URL: &str = "https://phabricator.services.mozilla.com";

pub fn review_url(base: &str, id: &str) -> String {
    format!("{}/{}?download=true", base.trim_end_matches('/'), id)
}

pub struct Fetcher {
    client: reqwest::blocking::Client,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::msg(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// GET `url` and write the full response body to `dest`, creating parent
    /// directories and overwriting any existing file. Non-2xx is an error.
    pub fn download_to(&self, url: &str, dest: &Path) -> Result<()> {
        println!("Downloading patch from {url}");
        let res = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::msg(format!("failed to download {url}: {e}")))?;
        if !res.status().is_success() {
            return Err(Error::msg(format!(
                "request for {url} failed with status {}",
                res.status()
            )));
        }
        let body = res
            .bytes()
            .map_err(|e| Error::msg(format!("failed to read response body from {url}: {e}")))?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::msg(format!("failed to create dir {}: {e}", parent.display())))?;
        }
        fs::write(dest, &body)
            .map_err(|e| Error::msg(format!("failed to write {}: {e}", dest.display())))?;
        println!("Patch saved to {}", dest.display());
        Ok(())
    }
}
