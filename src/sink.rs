//! Tabular output for product records

use crate::error::{HarvestError, Result};
use crate::results::{Column, ProductRecord};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Durable destination for product records
pub trait RecordSink {
    /// Prepare the store for the given columns
    ///
    /// Writes a header only when the store is missing or empty; existing
    /// content is kept and new rows are appended after it.
    fn initialize(&mut self, columns: &[Column]) -> Result<()>;

    /// Append one row holding the initialized columns, empty where absent
    fn append(&mut self, record: &ProductRecord) -> Result<()>;
}

/// Appends records to a CSV file
pub struct CsvSink {
    path: PathBuf,
    columns: Vec<Column>,
    writer: Option<csv::Writer<File>>,
}

impl CsvSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            columns: Vec::new(),
            writer: None,
        }
    }

    fn needs_header(&self) -> bool {
        match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        }
    }
}

impl RecordSink for CsvSink {
    fn initialize(&mut self, columns: &[Column]) -> Result<()> {
        let write_header = self.needs_header();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if write_header {
            writer.write_record(columns.iter().map(|c| c.name()))?;
            writer.flush()?;
            ::log::info!("CSV header written to {}", self.path.display());
        } else {
            ::log::info!("CSV file {} already exists. Appending.", self.path.display());
        }

        self.columns = columns.to_vec();
        self.writer = Some(writer);
        Ok(())
    }

    fn append(&mut self, record: &ProductRecord) -> Result<()> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            HarvestError::Sink(format!("{} was not initialized", self.path.display()))
        })?;

        let row = self
            .columns
            .iter()
            .map(|column| record.value(*column).unwrap_or_default());
        writer.write_record(row)?;
        writer.flush()?;
        Ok(())
    }
}

/// Keeps records in memory; `fail_on` makes the n-th append (0-based) fail
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemorySink {
    pub columns: Vec<Column>,
    pub records: Vec<ProductRecord>,
    fail_on: Option<usize>,
    fail_initialize: bool,
    attempts: usize,
}

#[cfg(test)]
impl MemorySink {
    pub fn failing_on(attempt: usize) -> Self {
        Self {
            fail_on: Some(attempt),
            ..Self::default()
        }
    }

    pub fn unwritable() -> Self {
        Self {
            fail_initialize: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
impl RecordSink for MemorySink {
    fn initialize(&mut self, columns: &[Column]) -> Result<()> {
        if self.fail_initialize {
            return Err(HarvestError::Sink("read-only store".to_string()));
        }
        self.columns = columns.to_vec();
        Ok(())
    }

    fn append(&mut self, record: &ProductRecord) -> Result<()> {
        let attempt = self.attempts;
        self.attempts += 1;
        if self.fail_on == Some(attempt) {
            return Err(HarvestError::Sink("disk full".to_string()));
        }
        self.records.push(record.clone());
        Ok(())
    }
}
