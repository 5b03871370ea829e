use crate::error::SinkError;
use crate::results::Record;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Column names of the output file, in order
pub const HEADER: [&str; 4] = ["Title", "Price", "Favourites", "Link"];

/// CSV writer that keeps the file well-formed after every append
///
/// The header goes out as soon as the sink is created and every `append`
/// flushes, so an interrupted run leaves the records of all finished pages
/// on disk.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl CsvSink<File> {
    /// Create (or truncate) the file at `path` and write the header
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Self::from_writer(File::create(path)?)
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(inner: W) -> Result<Self, SinkError> {
        // The header is written by hand so that an empty run still gets one
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(HEADER)?;
        writer.flush()?;
        Ok(Self { writer, rows: 0 })
    }

    /// Append rows and flush them to the underlying writer
    pub fn append(&mut self, records: &[Record]) -> Result<(), SinkError> {
        for record in records {
            self.writer.serialize(record)?;
        }
        self.writer.flush()?;
        self.rows += records.len();
        Ok(())
    }

    /// Rows written so far, header excluded
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and hand back the underlying writer
    pub fn finish(self) -> Result<W, SinkError> {
        self.writer
            .into_inner()
            .map_err(|e| SinkError::Io(e.into_error()))
    }
}

/// Write `records` to `path` in one go, replacing any existing file
pub fn write_records(records: &[Record], path: &Path) -> Result<(), SinkError> {
    let mut sink = CsvSink::create(path)?;
    sink.append(records)?;
    sink.finish()?;
    Ok(())
}
