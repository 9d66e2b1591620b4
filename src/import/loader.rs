//! CSV file discovery and parallel loading
//!
//! The data directory holds any number of `charges*.csv` and `trips*.csv`
//! files (one per year is a common layout). Files are parsed in parallel and
//! merged in path order; record ids are assigned after the merge so the
//! engine's positional indexes never see a collision.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::core::{Charge, Trip};
use crate::error::ImportError;

use super::headers::{
    ChargeColumn, TripColumn, fold, match_charge_column, match_trip_column,
};
use super::rows::{RowOutcome, parse_charge_row, parse_trip_row};

#[derive(Debug, Default)]
pub(crate) struct LoadedRecords {
    pub(crate) charges: Vec<Charge>,
    pub(crate) trips: Vec<Trip>,
    /// Rows dropped for missing required fields
    pub(crate) skipped: usize,
}

/// Discover record files under the data directory.
pub(crate) fn find_data_files(data_dir: &Path) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let find = |pattern: &str| -> Vec<PathBuf> {
        let mut files = Vec::new();
        if let Ok(entries) = glob::glob(&format!("{}/{}", data_dir.display(), pattern)) {
            for entry in entries.flatten() {
                files.push(entry);
            }
        }
        files.sort();
        files
    };
    (find("charges*.csv"), find("trips*.csv"))
}

struct FileBatch<T> {
    records: Vec<T>,
    skipped: usize,
}

fn read_file<T, C, M, P>(
    path: &Path,
    match_column: M,
    required: &[(C, &str)],
    parse_row: P,
) -> Result<FileBatch<T>, ImportError>
where
    C: Copy + PartialEq,
    M: Fn(&str) -> Option<C>,
    P: Fn(&csv::StringRecord, &[Option<C>], usize, &mut Vec<String>) -> RowOutcome<T>,
{
    let read_err = |source: csv::Error| ImportError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(read_err)?;

    let columns: Vec<Option<C>> = reader
        .headers()
        .map_err(read_err)?
        .iter()
        .map(|h| match_column(&fold(h)))
        .collect();

    let mut errors = Vec::new();
    for (column, name) in required {
        if !columns.contains(&Some(*column)) {
            errors.push(format!("missing required column \"{name}\""));
        }
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;
    if errors.is_empty() {
        // Header is line 1; data rows start at 2.
        for (idx, row) in reader.records().enumerate() {
            let line = idx + 2;
            let record = match row {
                Ok(r) => r,
                Err(e) => {
                    errors.push(format!("row {line}: {e}"));
                    continue;
                }
            };
            match parse_row(&record, &columns, line, &mut errors) {
                RowOutcome::Record(r) => records.push(r),
                RowOutcome::Skipped => skipped += 1,
                RowOutcome::Invalid => {}
            }
        }
    }

    if !errors.is_empty() {
        return Err(ImportError::InvalidRows {
            path: path.to_path_buf(),
            errors,
        });
    }
    Ok(FileBatch { records, skipped })
}

fn read_charge_file(path: &Path) -> Result<FileBatch<Charge>, ImportError> {
    read_file(
        path,
        match_charge_column,
        &[
            (ChargeColumn::Date, "date"),
            (ChargeColumn::Odometer, "odometer"),
            (ChargeColumn::StartPercent, "start percent"),
        ],
        parse_charge_row,
    )
}

fn read_trip_file(path: &Path) -> Result<FileBatch<Trip>, ImportError> {
    read_file(
        path,
        match_trip_column,
        &[
            (TripColumn::Date, "date"),
            (TripColumn::StartOdometer, "start odometer"),
            (TripColumn::StartPercent, "start percent"),
            (TripColumn::Destination, "destination"),
        ],
        parse_trip_row,
    )
}

/// Load every record file. Any file with invalid rows fails the whole load;
/// merely incomplete rows are counted and dropped.
pub(crate) fn load_records(
    charge_files: &[PathBuf],
    trip_files: &[PathBuf],
) -> Result<LoadedRecords, ImportError> {
    let charge_batches: Vec<FileBatch<Charge>> = charge_files
        .par_iter()
        .map(|path| read_charge_file(path))
        .collect::<Result<_, _>>()?;
    let trip_batches: Vec<FileBatch<Trip>> = trip_files
        .par_iter()
        .map(|path| read_trip_file(path))
        .collect::<Result<_, _>>()?;

    let mut loaded = LoadedRecords::default();
    for batch in charge_batches {
        loaded.skipped += batch.skipped;
        loaded.charges.extend(batch.records);
    }
    for batch in trip_batches {
        loaded.skipped += batch.skipped;
        loaded.trips.extend(batch.records);
    }

    for (idx, charge) in loaded.charges.iter_mut().enumerate() {
        charge.id = idx as u64 + 1;
    }
    for (idx, trip) in loaded.trips.iter_mut().enumerate() {
        trip.id = idx as u64 + 1;
    }

    Ok(loaded)
}
