use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::WriterBuilder;

use crate::error::EngineError;
use crate::model::{CanonicalField, CanonicalRecord};
use crate::options::OutputFormat;
use crate::sanitize::record_columns;

fn csv_row(record: &CanonicalRecord) -> Vec<String> {
    CanonicalField::ALL
        .iter()
        .map(|field| record.field(*field).to_string())
        .chain([record.source_file.clone(), record.row_order.to_string()])
        .collect()
}

fn write_csv<W: Write>(
    writer: W,
    records: &[CanonicalRecord],
    delimiter: u8,
) -> Result<W, EngineError> {
    let mut writer = WriterBuilder::new().delimiter(delimiter).from_writer(writer);
    writer.write_record(record_columns())?;
    for record in records {
        writer.write_record(csv_row(record))?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|error| EngineError::Io(error.into_error()))
}

fn write_ndjson<W: Write>(mut writer: W, records: &[CanonicalRecord]) -> Result<W, EngineError> {
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(writer)
}

fn write_json<W: Write>(mut writer: W, records: &[CanonicalRecord]) -> Result<W, EngineError> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(writer)
}

fn write_to<W: Write>(
    writer: W,
    records: &[CanonicalRecord],
    format: OutputFormat,
    delimiter: u8,
) -> Result<W, EngineError> {
    match format {
        OutputFormat::Csv => write_csv(writer, records, delimiter),
        OutputFormat::Ndjson => write_ndjson(writer, records),
        OutputFormat::Json => write_json(writer, records),
    }
}

/// Writes records for the warehouse loader. `delimiter` only applies to CSV.
pub fn write_records(
    path: &Path,
    records: &[CanonicalRecord],
    format: OutputFormat,
    delimiter: u8,
) -> Result<(), EngineError> {
    let file = BufWriter::new(File::create(path)?);
    write_to(file, records, format, delimiter)?;
    Ok(())
}

pub fn write_records_to_string(
    records: &[CanonicalRecord],
    format: OutputFormat,
    delimiter: u8,
) -> Result<String, EngineError> {
    let bytes = write_to(Vec::<u8>::new(), records, format, delimiter)?;
    String::from_utf8(bytes)
        .map_err(|error| EngineError::InvalidOption(format!("invalid utf-8 output: {error}")))
}
