//! cvesieve Export - tabular output
//!
//! This crate turns resolved `CveRecord`s into flat CSV rows, one per
//! (record, affected product) pair, and tracks per-run statistics.

pub mod row;
pub mod writer;

pub use row::{CveRow, COLUMNS};
pub use writer::CsvExporter;

/// Statistics accumulated over one export run
#[derive(Debug, Clone, Default)]
pub struct ExportStats {
    /// Feed years successfully processed
    pub years_processed: u32,
    /// Feed years skipped after download/extract/parse failures
    pub years_failed: u32,
    /// Vulnerability records examined
    pub records_processed: u64,
    /// Records abandoned mid-extraction (for example excessive nesting)
    pub records_failed: u64,
    /// CPE matches dropped for malformed or missing identifiers
    pub matches_skipped: u64,
    /// Output rows written
    pub rows_written: u64,
}
