//! Flat-file usage counter
//!
//! Persists how many batches and images have been processed to a small text
//! file (`<batches> <images>`). Incremented by the orchestration layer after a
//! successful batch; losing or corrupting the file resets the count and
//! affects nothing else.

use std::path::{Path, PathBuf};

use aquamark_core::UsageReporter;
use async_trait::async_trait;

pub struct FileUsageCounter {
    path: PathBuf,
}

impl FileUsageCounter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    async fn read_counts(&self) -> (u64, u64) {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(_) => return (0, 0),
        };
        let mut parts = raw.split_whitespace();
        let batches = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
        let images = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
        (batches, images)
    }

    async fn write_counts(&self, batches: u64, images: u64) -> Result<(), String> {
        tokio::fs::write(&self.path, format!("{} {}\n", batches, images))
            .await
            .map_err(|e| format!("Failed to write usage counter: {}", e))
    }

    pub async fn total_images(&self) -> u64 {
        self.read_counts().await.1
    }
}

#[async_trait]
impl UsageReporter for FileUsageCounter {
    async fn record_batch(&self, images: u64) -> Result<(), String> {
        let (batches, total_images) = self.read_counts().await;
        self.write_counts(batches + 1, total_images + images).await
    }

    async fn total_batches(&self) -> Result<u64, String> {
        Ok(self.read_counts().await.0)
    }
}
