use std::fs::File;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use csv::{Reader, ReaderBuilder, StringRecord};

use crate::error::MicroarrayError;

/// Record reader over a tab-delimited file.
///
/// Every line is a record, the first one included. Rows may differ in width; callers
/// decide which widths are acceptable. The file handle is released when the reader drops.
pub struct TsvReader {
    path: Utf8PathBuf,
    inner: Reader<File>,
    record: StringRecord,
}

impl TsvReader {
    pub fn open(path: &Utf8Path) -> Result<Self, MicroarrayError> {
        let file = File::open(path.as_std_path()).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => MicroarrayError::NotFound {
                path: path.to_owned(),
            },
            _ => MicroarrayError::Io {
                path: path.to_owned(),
                message: err.to_string(),
            },
        })?;
        let inner = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_reader(file);
        Ok(Self {
            path: path.to_owned(),
            inner,
            record: StringRecord::new(),
        })
    }

    /// Next record and its 1-based line, or `None` at end of file.
    pub fn next_record(&mut self) -> Result<Option<(u64, &StringRecord)>, MicroarrayError> {
        let more = self
            .inner
            .read_record(&mut self.record)
            .map_err(|err| MicroarrayError::Tsv {
                path: self.path.clone(),
                message: err.to_string(),
            })?;
        if !more {
            return Ok(None);
        }
        let line = self.record.position().map(|pos| pos.line()).unwrap_or(0);
        Ok(Some((line, &self.record)))
    }
}
