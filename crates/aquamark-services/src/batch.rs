//! Batch watermarking
//!
//! Fans one compositor invocation per image out onto the blocking pool.
//! Invocations are independent and share no mutable state, so they run
//! concurrently up to the configured worker cap. One failing item records a
//! failure and never aborts its siblings.

use std::sync::Arc;

use aquamark_core::{AppError, BatchConfig, NoOpUsageReporter, UsageReporter, BATCH_OUTPUT_PREFIX};
use aquamark_processing::{WatermarkOptions, WatermarkPipeline};
use bytes::Bytes;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::archive::{create_zip_archive, ArchiveEntry};

/// One input image in a batch.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub filename: String,
    pub data: Vec<u8>,
}

/// One successfully watermarked image.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    /// Zero-based input index
    pub index: usize,
    /// `watermarked_<n>.png`, `n` being the 1-based input index
    pub filename: String,
    pub data: Bytes,
}

/// One failed item; siblings in the batch are unaffected.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    pub index: usize,
    pub filename: String,
    pub error: String,
}

/// Outputs in input order plus the per-item failures.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub outputs: Vec<BatchOutput>,
    pub failures: Vec<BatchFailure>,
}

/// Batch orchestrator around a shared [`WatermarkPipeline`].
///
/// The watermark is decoded once here and reused for every image; the
/// pipeline scales it once per distinct base width.
pub struct BatchWatermarker {
    pipeline: Arc<WatermarkPipeline>,
    max_workers: usize,
    usage: Arc<dyn UsageReporter>,
}

impl std::fmt::Debug for BatchWatermarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchWatermarker")
            .field("max_workers", &self.max_workers)
            .finish_non_exhaustive()
    }
}

impl BatchWatermarker {
    pub fn new(watermark_bytes: &[u8], options: WatermarkOptions) -> Result<Self, AppError> {
        Self::with_config(watermark_bytes, options, &BatchConfig::default())
    }

    pub fn with_config(
        watermark_bytes: &[u8],
        options: WatermarkOptions,
        config: &BatchConfig,
    ) -> Result<Self, AppError> {
        let pipeline = WatermarkPipeline::new(watermark_bytes, options)?;
        Ok(Self {
            pipeline: Arc::new(pipeline),
            max_workers: config.max_workers.max(1),
            usage: Arc::new(NoOpUsageReporter),
        })
    }

    pub fn with_usage_reporter(mut self, usage: Arc<dyn UsageReporter>) -> Self {
        self.usage = usage;
        self
    }

    /// Watermark every item, collecting outputs and per-item failures.
    pub async fn process(&self, items: Vec<BatchItem>) -> BatchOutcome {
        let total = items.len();
        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let mut tasks = JoinSet::new();

        for (index, item) in items.into_iter().enumerate() {
            let pipeline = Arc::clone(&self.pipeline);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let filename = item.filename.clone();
                let result =
                    tokio::task::spawn_blocking(move || pipeline.process(&item.data)).await;
                (index, filename, result)
            });
        }

        let mut outputs = Vec::new();
        let mut failures = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            let (index, filename, result) = match joined {
                Ok(task_output) => task_output,
                Err(e) => {
                    tracing::error!(error = %e, "Batch worker task failed to join");
                    continue;
                }
            };
            match result {
                Ok(Ok(data)) => outputs.push(BatchOutput {
                    index,
                    filename: format!("{}{}.png", BATCH_OUTPUT_PREFIX, index + 1),
                    data,
                }),
                Ok(Err(e)) => {
                    tracing::warn!(
                        index = index,
                        filename = %filename,
                        error_type = e.error_type(),
                        error = %e,
                        "Skipping failed batch item"
                    );
                    failures.push(BatchFailure {
                        index,
                        filename,
                        error: e.to_string(),
                    });
                }
                Err(e) => {
                    failures.push(BatchFailure {
                        index,
                        filename,
                        error: format!("worker panicked: {}", e),
                    });
                }
            }
        }

        outputs.sort_by_key(|o| o.index);
        failures.sort_by_key(|f| f.index);

        tracing::info!(
            total = total,
            succeeded = outputs.len(),
            failed = failures.len(),
            "Batch complete"
        );

        if !outputs.is_empty() {
            if let Err(e) = self.usage.record_batch(outputs.len() as u64).await {
                tracing::warn!(error = %e, "Failed to record batch usage");
            }
        }

        BatchOutcome { outputs, failures }
    }

    /// Watermark every item and package the successes as a zip archive.
    pub async fn process_to_zip(
        &self,
        items: Vec<BatchItem>,
    ) -> Result<(Vec<u8>, Vec<BatchFailure>), AppError> {
        let outcome = self.process(items).await;

        let entries: Vec<ArchiveEntry> = outcome
            .outputs
            .into_iter()
            .map(|o| ArchiveEntry {
                filename: o.filename,
                data: o.data,
            })
            .collect();

        let archive = create_zip_archive(&entries)
            .map_err(|e| AppError::Archive(format!("{:#}", e)))?;

        Ok((archive, outcome.failures))
    }
}
