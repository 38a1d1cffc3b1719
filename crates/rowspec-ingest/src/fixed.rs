use std::fs;
use std::path::Path;

use rowspec_model::{DataFormat, LineDelimiter, Location, SourceRow};

use crate::error::ReadError;

/// Row source for fixed-width text.
///
/// Each record is sliced into the declared per-field character widths
/// (the exact lengths of the field declarations). With line delimiter
/// `none`, records follow each other without separation and are split by
/// the total record width instead.
pub struct FixedReader {
    records: std::vec::IntoIter<String>,
    widths: Vec<usize>,
    record_width: usize,
    source: String,
    row: u32,
}

impl FixedReader {
    pub fn open(path: &Path, format: &DataFormat, widths: Vec<usize>) -> Result<Self, ReadError> {
        let content = fs::read_to_string(path).map_err(|source| ReadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(&content, path.display().to_string(), format, widths)
    }

    pub fn new(
        content: &str,
        source: impl Into<String>,
        format: &DataFormat,
        widths: Vec<usize>,
    ) -> Result<Self, ReadError> {
        let source = source.into();
        let record_width: usize = widths.iter().sum();
        if record_width == 0 {
            return Err(ReadError::Unsupported(
                "fixed-width data must declare at least one field width".to_string(),
            ));
        }
        let mut records: Vec<String> = match format.line_delimiter() {
            LineDelimiter::Any => {
                let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
                normalized.split('\n').map(str::to_string).collect()
            }
            LineDelimiter::Lf => content.split('\n').map(str::to_string).collect(),
            LineDelimiter::CrLf => content.split("\r\n").map(str::to_string).collect(),
            LineDelimiter::Cr => content.split('\r').map(str::to_string).collect(),
            LineDelimiter::None => {
                let characters: Vec<char> = content.chars().collect();
                characters
                    .chunks(record_width)
                    .map(|chunk| chunk.iter().collect())
                    .collect()
            }
        };
        while records.last().is_some_and(|record| record.is_empty()) {
            records.pop();
        }
        tracing::debug!(source = %source, records = records.len(), "reading fixed-width data");
        Ok(Self {
            records: records.into_iter(),
            widths,
            record_width,
            source,
            row: 0,
        })
    }

    fn slice_record(&self, record: &str) -> Result<Vec<String>, ReadError> {
        let actual_width = record.chars().count();
        if actual_width != self.record_width {
            return Err(ReadError::Malformed {
                location: Location::new(self.source.as_str(), self.row, 1),
                message: format!(
                    "fixed-width row must have {} characters but has {actual_width}",
                    self.record_width
                ),
            });
        }
        let mut cells = Vec::with_capacity(self.widths.len());
        let mut characters = record.chars();
        for width in &self.widths {
            cells.push(characters.by_ref().take(*width).collect());
        }
        Ok(cells)
    }
}

impl Iterator for FixedReader {
    type Item = Result<SourceRow, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        self.row += 1;
        Some(self.slice_record(&record).map(|cells| {
            SourceRow::new(cells, Location::new(self.source.as_str(), self.row, 1))
        }))
    }
}
