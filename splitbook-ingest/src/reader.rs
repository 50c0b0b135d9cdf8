//! Row-oriented access to a CSV statement.
//!
//! Rows may be ragged and need not be valid UTF-8; cells are decoded lossily
//! so one mangled byte never aborts a whole file.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ByteRecord;

use crate::error::IngestError;

/// A CSV source yielding a header row followed by data rows.
pub struct StatementReader<R> {
    inner: csv::Reader<R>,
    record: ByteRecord,
    records_read: u64,
}

fn builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.flexible(true).has_headers(false).escape(Some(b'\\'));
    builder
}

impl StatementReader<File> {
    /// Open a statement file. The handle is released when the reader drops.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IngestError> {
        let path = path.as_ref();
        let inner = builder()
            .from_path(path)
            .map_err(|source| IngestError::StreamOpen {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::wrap(inner))
    }
}

impl<R: Read> StatementReader<R> {
    pub fn from_reader(reader: R) -> Self {
        Self::wrap(builder().from_reader(reader))
    }

    fn wrap(inner: csv::Reader<R>) -> Self {
        Self {
            inner,
            record: ByteRecord::new(),
            records_read: 0,
        }
    }

    /// Read the header row. Must be called before [`Self::next_row`].
    pub fn header(&mut self) -> Result<Vec<String>, IngestError> {
        self.next_row()?.ok_or(IngestError::EmptyHeader)
    }

    /// Next row as untrimmed text cells, or `None` at end of input.
    pub fn next_row(&mut self) -> Result<Option<Vec<String>>, IngestError> {
        let more = self
            .inner
            .read_byte_record(&mut self.record)
            .map_err(|source| IngestError::Read {
                record: self.records_read + 1,
                source,
            })?;
        if !more {
            return Ok(None);
        }
        self.records_read += 1;

        Ok(Some(
            self.record
                .iter()
                .map(|cell| String::from_utf8_lossy(cell).into_owned())
                .collect(),
        ))
    }

    /// 1-based number of the record most recently returned (header is 1).
    pub fn records_read(&self) -> u64 {
        self.records_read
    }
}
