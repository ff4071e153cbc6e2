//! CSV export of the facility status list.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::engine::FacilitySummary;

/// Column header of the status export.
const HEADER: &str = "id,lat,lon,status,remaining_capacity_kw";

/// Exports facility markers to a CSV file at the given path.
///
/// # Arguments
///
/// * `facilities` - Markers as returned by `FeasibilityEngine::list_facilities`
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_facilities_csv(facilities: &[FacilitySummary], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_facilities_csv(facilities, buf)
}

/// Writes facility markers as CSV to any writer.
///
/// Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_facilities_csv(facilities: &[FacilitySummary], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for f in facilities {
        wtr.write_record(&[
            f.id.clone(),
            format!("{:.6}", f.lat),
            format!("{:.6}", f.lon),
            f.status.as_str().to_string(),
            format!("{:.1}", f.remaining_capacity),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
