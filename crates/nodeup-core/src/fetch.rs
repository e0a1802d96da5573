//! Streaming artifact downloads
//!
//! Success is strictly HTTP 200. A failed fetch leaves whatever was written
//! on disk; the destination is truncated on the next attempt, so re-running
//! an install overwrites any stale partial file from a prior failure.

use crate::errors::FetchError;
use futures_util::StreamExt;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Downloads artifacts (the runtime binary, the npm source archive) to a
/// destination path, reporting the byte count on success.
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Stream `url` into `destination`, creating or truncating the file.
    /// Returns the number of bytes written.
    pub async fn fetch(&self, url: &str, destination: &Path) -> Result<u64, FetchError> {
        let mut output = File::create(destination).await?;

        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|e| FetchError::Transport {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(FetchError::BadStatus {
                url: url.to_string(),
                status,
            });
        }

        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| FetchError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;
            output.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        output.flush().await?;

        log::info!("{} bytes downloaded from {}", written, url);
        Ok(written)
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}
