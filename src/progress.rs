//! Progress-callback trait for per-record conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the batch processes each PubTator record. The CLI drives its
//! terminal progress bar through this trait; library callers can forward the
//! events anywhere without the library knowing how.
//!
//! # Example
//!
//! ```rust
//! use pubtator2anndoc::{ConversionProgressCallback, ConversionConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: Arc<AtomicUsize>,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_record_complete(&self, position: usize, total: usize, document_id: &str, entities: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{} {} ({} entities)", position, total, document_id, entities);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     completed: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the conversion pipeline as it processes each record.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. `position` is 1-indexed within the batch.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before the first record is parsed.
    fn on_batch_start(&self, total_records: usize) {
        let _ = total_records;
    }

    /// Called before a record is parsed.
    fn on_record_start(&self, position: usize, total_records: usize) {
        let _ = (position, total_records);
    }

    /// Called when both artifacts of a record were produced.
    fn on_record_complete(
        &self,
        position: usize,
        total_records: usize,
        document_id: &str,
        entity_count: usize,
    ) {
        let _ = (position, total_records, document_id, entity_count);
    }

    /// Called when a record fails; the batch continues.
    fn on_record_error(&self, position: usize, total_records: usize, error: &str) {
        let _ = (position, total_records, error);
    }

    /// Called once after every record has been attempted.
    fn on_batch_complete(&self, total_records: usize, success_count: usize) {
        let _ = (total_records, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
