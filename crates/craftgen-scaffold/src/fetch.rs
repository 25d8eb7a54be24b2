//! Archive download
//!
//! One GET per archive, streamed to a `.part` file next to the destination
//! and renamed into place once the body is complete. There is no retry: a
//! failed download fails the run.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use craftgen_core::types::NetworkSettings;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::{Error, FetchCause, Result};

/// HTTP archive fetcher
#[derive(Debug, Clone)]
pub struct ArchiveFetcher {
    client: reqwest::Client,
}

impl ArchiveFetcher {
    /// Create a fetcher from network settings
    pub fn new(network: &NetworkSettings) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(&network.user_agent);
        if let Some(secs) = network.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = network.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Download `url` to `dest`, creating parent directories as needed.
    ///
    /// Returns the path written, which is always `dest`.
    pub async fn fetch(&self, url: &str, dest: &Utf8Path) -> Result<Utf8PathBuf> {
        info!("Downloading {}", url);

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::fetch(url, e))?;
        }

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch(url, FetchCause::Status(status.as_u16())));
        }

        let part = part_path(dest);
        let written = match self.stream_to(&mut response, &part).await {
            Ok(written) => written,
            Err(cause) => {
                let _ = tokio::fs::remove_file(&part).await;
                return Err(Error::fetch(url, cause));
            }
        };

        tokio::fs::rename(&part, dest)
            .await
            .map_err(|e| Error::fetch(url, e))?;

        debug!("Wrote {} bytes to {}", written, dest);
        Ok(dest.to_path_buf())
    }

    async fn stream_to(
        &self,
        response: &mut reqwest::Response,
        path: &Utf8Path,
    ) -> std::result::Result<u64, FetchCause> {
        let mut file = tokio::fs::File::create(path).await?;
        let mut written = 0u64;

        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        file.flush().await?;
        Ok(written)
    }
}

fn part_path(dest: &Utf8Path) -> Utf8PathBuf {
    let mut name = dest.file_name().unwrap_or("download").to_string();
    name.push_str(".part");
    dest.with_file_name(name)
}
