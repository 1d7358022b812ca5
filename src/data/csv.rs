//! CSV loading and cleaning for incident tables

use anyhow::Result;
use chrono::NaiveDateTime;
use polars::prelude::*;

use crate::data::Incident;

/// Timestamp format used by the source export ("08/24/2025 11:30:00 PM").
const DATE_FORMAT_PRIMARY: &str = "%m/%d/%Y %I:%M:%S %p";

/// Fallback for re-exported tables that carry ISO-style timestamps.
const DATE_FORMAT_FALLBACK: &str = "%Y-%m-%d %H:%M:%S";

/// Load the incident CSV, parse dates, and drop rows without a usable
/// timestamp or coordinate pair.
///
/// This is the cleaning boundary: everything returned from here satisfies
/// the engine's input contract (present timestamp, parseable coordinates).
pub fn load_incidents(path: &str) -> Result<Vec<Incident>> {
    log::info!("Reading incident CSV: {}", path);

    if !std::path::Path::new(path).exists() {
        return Err(anyhow::anyhow!("CSV not found at {}", path));
    }

    // Read every column as a string and parse ourselves; the source table
    // mixes date formats and string-encoded booleans.
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()?
        .collect()?;

    log::info!("Loaded {} raw rows", df.height());

    let case_numbers = df.column("Case Number")?.str()?;
    let dates = df.column("Date")?.str()?;
    let latitudes = df.column("Latitude")?.str()?;
    let longitudes = df.column("Longitude")?.str()?;
    let primary_types = df.column("Primary Type")?.str()?;
    let descriptions = df.column("Description")?.str()?;
    let blocks = df.column("Block")?.str()?;
    let arrests = df.column("Arrest")?.str()?;
    let domestics = df.column("Domestic")?.str()?;

    let mut incidents = Vec::with_capacity(df.height());
    let mut dropped = 0usize;

    for i in 0..df.height() {
        let date = dates.get(i).and_then(parse_date);
        let latitude = latitudes.get(i).and_then(parse_coordinate);
        let longitude = longitudes.get(i).and_then(parse_coordinate);

        let (Some(date), Some(latitude), Some(longitude)) = (date, latitude, longitude) else {
            dropped += 1;
            continue;
        };

        incidents.push(Incident {
            case_number: case_numbers.get(i).unwrap_or_default().to_string(),
            date,
            latitude,
            longitude,
            primary_type: primary_types.get(i).unwrap_or_default().to_string(),
            description: descriptions.get(i).unwrap_or_default().to_string(),
            block: blocks.get(i).unwrap_or_default().to_string(),
            arrest: parse_bool(arrests.get(i)),
            domestic: parse_bool(domestics.get(i)),
        });
    }

    log::info!(
        "Kept {} incidents ({} rows dropped for missing date/coordinates)",
        incidents.len(),
        dropped
    );

    Ok(incidents)
}

fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, DATE_FORMAT_PRIMARY)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, DATE_FORMAT_FALLBACK))
        .ok()
}

fn parse_coordinate(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

fn parse_bool(raw: Option<&str>) -> bool {
    matches!(raw, Some(s) if s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("y"))
}
