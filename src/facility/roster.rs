use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::record::Facility;

/// Parses a header-named CSV roster. Rows that cannot be read are skipped
/// and logged; short rows leave their trailing fields empty.
pub fn read_facilities<R: Read>(reader: R) -> Result<Vec<Facility>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    csv_reader
        .headers()
        .context("facility roster has no header row")?;

    let mut facilities = Vec::new();
    let mut skipped = 0usize;
    for (row, record) in csv_reader.deserialize::<Facility>().enumerate() {
        match record {
            Ok(facility) => facilities.push(facility),
            Err(error) => {
                skipped += 1;
                warn!(row = row + 1, %error, "skipping unreadable facility row");
            }
        }
    }

    let without_coordinates = facilities
        .iter()
        .filter(|facility| !facility.has_coordinates())
        .count();
    if without_coordinates > 0 {
        warn!(without_coordinates, "facilities without usable coordinates");
    }
    if skipped > 0 {
        warn!(skipped, "facility rows skipped");
    }

    Ok(facilities)
}

pub fn load_facilities(path: &Path) -> Result<Vec<Facility>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open facility roster {}", path.display()))?;
    let facilities = read_facilities(file)
        .with_context(|| format!("failed to read facility roster {}", path.display()))?;
    info!(path = %path.display(), facilities = facilities.len(), "loaded facility roster");
    Ok(facilities)
}
