//! Aquamark services
//!
//! Orchestration around the compositor core: batch fan-out, zip packaging of
//! batch results, and the flat-file usage counter.

pub mod archive;
pub mod batch;
pub mod counter;

pub use archive::{create_zip_archive, ArchiveEntry};
pub use batch::{BatchFailure, BatchItem, BatchOutcome, BatchOutput, BatchWatermarker};
pub use counter::FileUsageCounter;
