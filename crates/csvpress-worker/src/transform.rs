//! Content transformation
//!
//! Takes one located source object from raw bytes to destination-ready
//! output: validate the key extension, fetch, decode UTF-8, parse as
//! semicolon-delimited CSV with a header row, re-serialize in canonical form,
//! and gzip-compress.
//!
//! The extension gate runs before the fetch. It is a cheap policy check, not
//! a content sniff: the upstream producer contract guarantees correctly-typed
//! uploads, and checking first avoids spending a network read on an object
//! the pipeline would reject anyway.

use crate::error::PipelineError;
use crate::event::ObjectReference;
use crate::storage::ObjectStore;
use csv::StringRecord;
use csvpress_common::compress::gzip_compress;
use tracing::debug;

/// The only accepted input extension.
const ACCEPTED_EXTENSION: &str = ".csv";

/// Field delimiter for both input and output.
const DELIMITER: u8 = b';';

/// Parsed tabular content: one header row plus zero or more data rows.
#[derive(Debug, Clone)]
pub struct Table {
    pub header: StringRecord,
    pub rows: Vec<StringRecord>,
}

/// Reject keys that do not carry the accepted extension.
pub fn check_extension(key: &str) -> Result<(), PipelineError> {
    if key.ends_with(ACCEPTED_EXTENSION) {
        Ok(())
    } else {
        Err(PipelineError::UnsupportedFormat(key.to_string()))
    }
}

/// Parse semicolon-delimited text into a [`Table`].
///
/// The first row is the header. Ragged rows and input without a discoverable
/// header row are parse failures.
pub fn parse_table(text: &str) -> Result<Table, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .from_reader(text.as_bytes());

    let header = reader
        .headers()
        .map_err(|e| PipelineError::Parse(e.to_string()))?
        .clone();

    if header.is_empty() || (header.len() == 1 && header[0].is_empty()) {
        return Err(PipelineError::Parse("no header row found".to_string()));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|e| PipelineError::Parse(e.to_string()))?;
        rows.push(row);
    }

    debug!(
        columns = header.len(),
        rows = rows.len(),
        "Parsed delimiter-separated table"
    );

    Ok(Table { header, rows })
}

/// Serialize a [`Table`] back to semicolon-delimited text bytes.
///
/// Row and column content and order are preserved exactly; values containing
/// the delimiter are quoted per the CSV quoting rules.
pub fn serialize_table(table: &Table) -> Result<Vec<u8>, PipelineError> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .from_writer(&mut buf);

        writer
            .write_record(&table.header)
            .map_err(|e| PipelineError::Compress { cause: e.into() })?;
        for row in &table.rows {
            writer
                .write_record(row)
                .map_err(|e| PipelineError::Compress { cause: e.into() })?;
        }
        writer
            .flush()
            .map_err(|e| PipelineError::Compress { cause: e.into() })?;
    }
    Ok(buf)
}

/// Normalize raw object bytes: UTF-8 decode, parse, re-serialize, gzip.
pub fn normalize(raw: Vec<u8>) -> Result<Vec<u8>, PipelineError> {
    let text = String::from_utf8(raw).map_err(PipelineError::Encoding)?;
    let table = parse_table(&text)?;
    let canonical = serialize_table(&table)?;
    gzip_compress(&canonical).map_err(|cause| PipelineError::Compress { cause })
}

/// Full transform for one reference: gate, fetch, normalize.
pub async fn transform(
    store: &dyn ObjectStore,
    reference: &ObjectReference,
) -> Result<Vec<u8>, PipelineError> {
    check_extension(&reference.key)?;

    let raw = store
        .get(&reference.bucket, &reference.key)
        .await
        .map_err(|cause| PipelineError::Fetch {
            reference: reference.clone(),
            cause,
        })?;

    normalize(raw)
}
