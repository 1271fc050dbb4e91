//! Hooks for usage tracking
//!
//! The orchestration layer reports completed batches through this trait so
//! deployments can persist a usage counter without the compositor depending on
//! any storage. Counting has no bearing on compositing correctness.

use async_trait::async_trait;

/// Trait for recording completed watermark batches
#[async_trait]
pub trait UsageReporter: Send + Sync {
    /// Record one successful batch and how many images it produced
    async fn record_batch(&self, images: u64) -> Result<(), String>;

    /// Total batches recorded so far
    async fn total_batches(&self) -> Result<u64, String>;
}

/// No-op implementation for when usage tracking is disabled
pub struct NoOpUsageReporter;

#[async_trait]
impl UsageReporter for NoOpUsageReporter {
    async fn record_batch(&self, _images: u64) -> Result<(), String> {
        Ok(())
    }

    async fn total_batches(&self) -> Result<u64, String> {
        Ok(0)
    }
}
