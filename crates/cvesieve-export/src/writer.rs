//! CSV sink for resolved records

use crate::row::{CveRow, COLUMNS};
use cvesieve_core::{CveRecord, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// CSV exporter writing one row per (record, affected product) pair.
///
/// The header is written once at creation, so an export with zero
/// matching records still produces a well-formed file.
pub struct CsvExporter<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvExporter<File> {
    /// Create the output file and write the header row
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Creating CSV output file: {}", path.display());
        let file = File::create(path)?;
        Self::from_writer(file)
    }
}

impl<W: Write> CsvExporter<W> {
    /// Wrap an arbitrary writer; writes the header row immediately
    pub fn from_writer(inner: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(COLUMNS)?;
        Ok(Self { writer })
    }

    /// Append one row per affected product of the record.
    ///
    /// A record with no affected products writes nothing and is not an
    /// error. Returns the number of rows written.
    pub fn write_record(&mut self, record: &CveRecord) -> Result<u64> {
        let mut written = 0;
        for product in &record.affected {
            self.writer.serialize(CveRow::for_product(record, product))?;
            written += 1;
        }
        Ok(written)
    }

    /// Flush buffered rows to the underlying writer
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
