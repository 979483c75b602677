//! MNIST archive downloader
//!
//! This module provides async methods to fetch the four canonical
//! gzip-compressed IDX archives from an MNIST mirror and unpack them
//! into a data directory.

use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Result};
use flate2::read::GzDecoder;
use reqwest::Client;
use tracing::{info, warn};

/// Default MNIST mirror (the S3 bucket torchvision also falls back to)
const MNIST_MIRROR: &str = "https://ossci-datasets.s3.amazonaws.com/mnist/";

/// The four archives making up the dataset
const MNIST_ARCHIVES: [&str; 4] = [
    "train-images-idx3-ubyte.gz",
    "train-labels-idx1-ubyte.gz",
    "t10k-images-idx3-ubyte.gz",
    "t10k-labels-idx1-ubyte.gz",
];

/// MNIST download client
#[derive(Debug, Clone)]
pub struct MnistFetcher {
    client: Client,
    base_url: String,
}

impl Default for MnistFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MnistFetcher {
    /// Create a fetcher for the default mirror
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: MNIST_MIRROR.to_string(),
        }
    }

    /// Create a fetcher for a custom mirror
    pub fn with_base_url(base_url: &str) -> Self {
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Download one gzip archive and return its raw bytes
    pub async fn fetch_archive(&self, name: &str) -> Result<Vec<u8>> {
        let url = format!("{}{}", self.base_url, name);
        info!("Downloading {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "Download of {} failed with status {}",
                url,
                response.status()
            ));
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Download and unpack every archive into `data_dir`
    ///
    /// Files already present are skipped unless `force` is set. The unpacked
    /// IDX file is written only after the full body has been received and
    /// decompressed, so an interrupted run never leaves a partial file.
    ///
    /// # Returns
    ///
    /// Number of files actually downloaded
    pub async fn fetch_all(&self, data_dir: &Path, force: bool) -> Result<usize> {
        std::fs::create_dir_all(data_dir)?;

        let mut downloaded = 0;
        for archive in MNIST_ARCHIVES {
            let target = data_dir.join(strip_gz_suffix(archive));

            if target.exists() && !force {
                info!("{} already present, skipping", target.display());
                continue;
            }

            let compressed = self.fetch_archive(archive).await?;
            let raw = gunzip(&compressed)
                .map_err(|e| anyhow!("Failed to decompress {}: {}", archive, e))?;

            std::fs::write(&target, &raw)?;
            info!("Unpacked {} ({} bytes)", target.display(), raw.len());
            downloaded += 1;
        }

        if downloaded == 0 {
            warn!("All MNIST files already present in {}", data_dir.display());
        }

        Ok(downloaded)
    }
}

/// Decompress a gzip byte stream
fn gunzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

/// Drop a trailing `.gz` from an archive name
fn strip_gz_suffix(name: &str) -> &str {
    name.strip_suffix(".gz").unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn test_strip_gz_suffix() {
        assert_eq!(
            strip_gz_suffix("train-images-idx3-ubyte.gz"),
            "train-images-idx3-ubyte"
        );
        assert_eq!(strip_gz_suffix("already-raw"), "already-raw");
    }

    #[test]
    fn test_gunzip_roundtrip() {
        let payload = b"idx bytes go here";
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(payload).unwrap();
        let compressed = encoder.finish().unwrap();

        let decompressed = gunzip(&compressed).unwrap();
        assert_eq!(decompressed, payload);
    }

    #[test]
    fn test_gunzip_rejects_garbage() {
        assert!(gunzip(b"not a gzip stream").is_err());
    }

    #[test]
    fn test_base_url_normalization() {
        let fetcher = MnistFetcher::with_base_url("http://localhost:8080/mnist");
        assert!(fetcher.base_url.ends_with('/'));
    }
}
