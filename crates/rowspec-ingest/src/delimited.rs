use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecordsIntoIter, Terminator};

use rowspec_model::{DataFormat, LineDelimiter, Location, SourceRow};

use crate::error::ReadError;

/// Row source for delimited text, configured from the declared data
/// format: item delimiter, quote character, escape character and line
/// delimiter. Records may have any number of cells; judging the cell
/// count against the field count is the pipeline's job.
pub struct DelimitedReader<R: Read> {
    records: StringRecordsIntoIter<R>,
    source: String,
    row: u32,
    skip_initial_space: bool,
}

impl<R: Read> std::fmt::Debug for DelimitedReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelimitedReader")
            .field("source", &self.source)
            .field("row", &self.row)
            .field("skip_initial_space", &self.skip_initial_space)
            .finish_non_exhaustive()
    }
}

impl DelimitedReader<File> {
    pub fn open(path: &Path, format: &DataFormat) -> Result<Self, ReadError> {
        let file = File::open(path).map_err(|source| ReadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(file, path.display().to_string(), format)
    }
}

impl<R: Read> DelimitedReader<R> {
    pub fn new(
        reader: R,
        source: impl Into<String>,
        format: &DataFormat,
    ) -> Result<Self, ReadError> {
        let source = source.into();
        let delimiter = ascii_byte("item delimiter", format.item_delimiter())?;
        let quote = ascii_byte("quote character", format.quote_character())?;
        let mut builder = ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .quote(quote);
        if format.escape_character() == '\\' {
            builder.double_quote(false).escape(Some(b'\\'));
        }
        match format.line_delimiter() {
            LineDelimiter::Any | LineDelimiter::CrLf => {}
            LineDelimiter::Cr => {
                builder.terminator(Terminator::Any(b'\r'));
            }
            LineDelimiter::Lf => {
                builder.terminator(Terminator::Any(b'\n'));
            }
            LineDelimiter::None => {
                return Err(ReadError::Unsupported(
                    "delimited data must have a line delimiter".to_string(),
                ));
            }
        }
        tracing::debug!(source = %source, "reading delimited data");
        Ok(Self {
            records: builder.from_reader(reader).into_records(),
            source,
            row: 0,
            skip_initial_space: format.skip_initial_space(),
        })
    }
}

impl<R: Read> Iterator for DelimitedReader<R> {
    type Item = Result<SourceRow, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        self.row += 1;
        Some(match record {
            Ok(record) => {
                let cells: Vec<String> = record
                    .iter()
                    .map(|cell| {
                        if self.skip_initial_space {
                            cell.trim_start().to_string()
                        } else {
                            cell.to_string()
                        }
                    })
                    .collect();
                Ok(SourceRow::new(
                    cells,
                    Location::new(self.source.as_str(), self.row, 1),
                ))
            }
            Err(error) => Err(error.into()),
        })
    }
}

fn ascii_byte(name: &str, character: char) -> Result<u8, ReadError> {
    u8::try_from(u32::from(character)).map_err(|_| {
        ReadError::Unsupported(format!(
            "{name} {character:?} must be an ASCII character for delimited data"
        ))
    })
}
