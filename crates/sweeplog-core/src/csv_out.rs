//! CSV rendering of extracted records.

use std::io::{self, Write};

use crate::error::ExtractResult;
use crate::record::{SweepRecord, CSV_HEADER};

/// Writes the header row followed by one row per record.
///
/// The header is always written, so an empty slice still yields a valid CSV.
/// Rows end in CRLF. Floats use the shortest text that reads back to the
/// same value.
pub fn write_csv<W: Write>(writer: W, records: &[SweepRecord]) -> ExtractResult<()> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);
    out.write_record(CSV_HEADER)?;
    for record in records {
        out.serialize(record)?;
    }
    out.flush()?;
    Ok(())
}

/// Renders records as CSV text in memory.
pub fn serialize(records: &[SweepRecord]) -> ExtractResult<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, records)?;
    let text = String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(text)
}
