//! Zip packaging of batch results

pub mod service;

pub use service::{create_zip_archive, ArchiveEntry};
