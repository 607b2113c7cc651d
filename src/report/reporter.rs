use std::sync::{Mutex, PoisonError};

use crate::error::ReportError;

use super::types::ReportResult;

/// Collects case results from concurrent workers.
pub trait TestReporter: Send + Sync {
    fn put_record(&self, record: ReportResult);

    /// Returns every record collected so far.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be read.
    fn export_all_report_results(&self) -> Result<Vec<ReportResult>, ReportError>;
}

/// Keeps every record in memory, in completion order.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    records: Mutex<Vec<ReportResult>>,
}

impl MemoryReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TestReporter for MemoryReporter {
    fn put_record(&self, record: ReportResult) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    fn export_all_report_results(&self) -> Result<Vec<ReportResult>, ReportError> {
        Ok(self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

/// Drops every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardReporter;

impl TestReporter for DiscardReporter {
    fn put_record(&self, _record: ReportResult) {}

    fn export_all_report_results(&self) -> Result<Vec<ReportResult>, ReportError> {
        Ok(Vec::new())
    }
}
