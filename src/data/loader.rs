//! CSV loading for the medal-tally file.
//!
//! The file must be comma-separated UTF-8 with a header row naming at least
//! the columns in [`REQUIRED_COLUMNS`]. Extra columns are ignored.

use crate::error::DataLoadError;
use crate::models::{MedalRecord, MedalTable};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Columns that must be present in the header row.
pub const REQUIRED_COLUMNS: [&str; 6] = ["country", "year", "gold", "silver", "bronze", "total"];

/// Load the medal table from a CSV file on disk.
pub fn load_table(path: &Path) -> Result<MedalTable, DataLoadError> {
    if !path.exists() {
        return Err(DataLoadError::NotFound(path.to_path_buf()));
    }

    debug!("Reading medal data from {}", path.display());

    let file = File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let table = parse_table(file, path)?;

    info!(
        "Loaded {} medal records from {}",
        table.len(),
        path.display()
    );

    if table.quality_warnings() > 0 {
        warn!(
            "{} rows have gold + silver + bronze != total; they are used as-is",
            table.quality_warnings()
        );
    }

    Ok(table)
}

/// Parse medal records from any reader. `source` is only used in errors.
pub fn parse_table<R: Read>(reader: R, source: &Path) -> Result<MedalTable, DataLoadError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers: StringRecord = rdr
        .headers()
        .map_err(|e| csv_error(source, 1, e))?
        .iter()
        .map(|h| h.to_lowercase())
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(DataLoadError::MissingColumns {
            path: source.to_path_buf(),
            missing,
        });
    }

    rdr.set_headers(headers);

    let mut records = Vec::new();
    let mut sums = ColumnSums::default();
    for (idx, result) in rdr.deserialize::<MedalRecord>().enumerate() {
        // Row 1 is the header.
        let row = idx as u64 + 2;
        let record = result.map_err(|e| csv_error(source, row, e))?;

        sums.add(&record)
            .map_err(|column| DataLoadError::OutOfRange {
                path: source.to_path_buf(),
                row,
                column,
            })?;

        if !record.is_consistent() {
            debug!(
                "Row {}: {} {} medals {}+{}+{} != total {}",
                row, record.country, record.year, record.gold, record.silver, record.bronze,
                record.total
            );
        }

        records.push(record);
    }

    Ok(MedalTable::new(records))
}

/// Running per-column sums. While every column sum fits in `u64`, so does
/// any aggregate over a subset of rows.
#[derive(Default)]
struct ColumnSums {
    gold: u64,
    silver: u64,
    bronze: u64,
    total: u64,
}

impl ColumnSums {
    /// Add one record, or name the first column whose sum overflows.
    fn add(&mut self, record: &MedalRecord) -> Result<(), &'static str> {
        fn bump(sum: &mut u64, value: u64, column: &'static str) -> Result<(), &'static str> {
            *sum = sum.checked_add(value).ok_or(column)?;
            Ok(())
        }

        bump(&mut self.gold, record.gold, "gold")?;
        bump(&mut self.silver, record.silver, "silver")?;
        bump(&mut self.bronze, record.bronze, "bronze")?;
        bump(&mut self.total, record.total, "total")
    }
}

fn csv_error(path: &Path, row: u64, source: csv::Error) -> DataLoadError {
    DataLoadError::Csv {
        path: path.to_path_buf(),
        row,
        source,
    }
}
