//! Incident table CSV schema

use std::fs::File;
use std::path::Path;

use geo::Point;
use log::info;
use serde::Deserialize;

use crate::{
    Error,
    risk::{IncidentCategory, IncidentRecord},
};

/// CSV row: `category,x,y` with coordinates in the projected CRS used
/// for scoring
#[derive(Debug, Deserialize)]
struct IncidentRow {
    category: IncidentCategory,
    x: f64,
    y: f64,
}

/// Load incident records from a CSV file.
///
/// # Errors
///
/// Malformed rows (unknown categories, non-numeric coordinates) are
/// errors, not rows to skip: a silently shrunken incident table would
/// bias every downstream risk score.
pub fn load_incidents(path: &Path) -> Result<Vec<IncidentRecord>, Error> {
    let file = File::open(path)?;

    let records = csv::Reader::from_reader(file)
        .deserialize()
        .map(|row| {
            let row: IncidentRow = row?;
            Ok(IncidentRecord {
                category: row.category,
                location: Point::new(row.x, row.y),
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    info!("Loaded {} incident records", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_temp(content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "saferoute_incidents_{}_{}.csv",
            std::process::id(),
            content.len()
        ));
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn parses_categories_and_coordinates() {
        let path = write_temp("category,x,y\nassault,630000.0,4833000.0\ncollision,630100.5,4833200.25\n");
        let records = load_incidents(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, IncidentCategory::Assault);
        assert_eq!(records[1].category, IncidentCategory::Collision);
        assert_eq!(records[1].location.x(), 630100.5);
    }

    #[test]
    fn unknown_category_is_an_error() {
        let path = write_temp("category,x,y\nburglary,0.0,0.0\n");
        let result = load_incidents(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(Error::CsvError(_))));
    }
}
