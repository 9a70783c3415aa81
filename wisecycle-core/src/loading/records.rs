use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{info, warn};

use crate::{Error, RouteRecord};

/// Reads route records from a CSV file
///
/// # Errors
///
/// Returns an error if the file is missing, cannot be opened or has no
/// readable header row. Individual rows that fail to deserialize are logged
/// and skipped.
pub fn load_records(path: &Path) -> Result<Vec<RouteRecord>, Error> {
    if !path.exists() {
        return Err(Error::InvalidData(format!(
            "Route records file not found: {}",
            path.display()
        )));
    }

    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        )
    })?;

    let records = read_records(file)?;
    info!(
        "Loaded {} route records from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

/// Reads route records from any CSV source with a header row
///
/// # Errors
///
/// Returns an error if the header row cannot be read
pub fn read_records<R: Read>(reader: R) -> Result<Vec<RouteRecord>, Error> {
    let mut reader = csv::Reader::from_reader(reader);
    reader.headers()?;

    Ok(reader
        .deserialize::<RouteRecord>()
        .enumerate()
        .filter_map(|(row, record)| match record {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping unreadable route record at row {}: {e}", row + 1);
                None
            }
        })
        .collect())
}
