use super::reservations::BookingsEnvelope;
use crate::analytics::BookingRecord;
use serde_json::Value;
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum BookingImportError {
    #[error("failed to read booking export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid booking CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid booking JSON data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("booking JSON must be an array or an object with an `items` array")]
    UnsupportedShape,
}

/// Loads bookings from a reservation export on disk.
pub struct BookingImporter;

impl BookingImporter {
    /// Dispatches on extension: `.csv` is read as CSV, anything else as JSON.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<BookingRecord>, BookingImportError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        if is_csv {
            Self::from_csv_reader(file)
        } else {
            Self::from_json_reader(file)
        }
    }

    /// Accepts the reservation API envelope (`{ "items": [...] }`) or a bare array.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Vec<BookingRecord>, BookingImportError> {
        let value: Value = serde_json::from_reader(reader)?;
        if value.is_array() {
            return Ok(serde_json::from_value(value)?);
        }

        let is_envelope = value.get("items").is_some() || value.get("data").is_some();
        if !is_envelope {
            return Err(BookingImportError::UnsupportedShape);
        }

        let envelope: BookingsEnvelope = serde_json::from_value(value)?;
        Ok(envelope.items)
    }

    /// Header names follow the JSON field names (`arrival`, `totalAmount`, ...).
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Vec<BookingRecord>, BookingImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut bookings = Vec::new();
        for record in csv_reader.deserialize::<BookingRecord>() {
            bookings.push(record?);
        }

        Ok(bookings)
    }
}
