//! Row-level parsing and validation
//!
//! Policy per §import contract: a row missing a required field is silently
//! skipped (incomplete, not invalid); a row with an unparseable date/number
//! is collected as a row error and fails the whole batch.

use chrono::NaiveDate;
use csv::StringRecord;

use crate::consts::DATE_FORMAT;
use crate::core::{Charge, Tariff, Trip};

use super::headers::{ChargeColumn, TripColumn, fold};

pub(crate) enum RowOutcome<T> {
    Record(T),
    Skipped,
    Invalid,
}

/// Coerce a numeric cell. Accepts a decimal comma and embedded thousands
/// spaces, both common in French spreadsheet exports.
fn parse_number(cell: &str) -> Option<f64> {
    let normalized: String = cell
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    normalized.parse::<f64>().ok()
}

fn parse_date_cell(cell: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(cell, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(cell, "%d/%m/%Y"))
        .ok()
}

fn parse_bool_cell(cell: &str) -> Option<bool> {
    match fold(cell).as_str() {
        "true" | "yes" | "y" | "x" | "1" | "oui" => Some(true),
        "false" | "no" | "n" | "0" | "non" | "" => Some(false),
        _ => None,
    }
}

/// Completion status cell. Anything in-progress-like is false; missing
/// columns are handled by the caller.
fn parse_status_cell(cell: &str) -> Option<bool> {
    match fold(cell).as_str() {
        "completed" | "complete" | "done" | "termine" | "terminee" => Some(true),
        "in progress" | "open" | "pending" | "en cours" => Some(false),
        _ => None,
    }
}

struct RowReader<'a, C: Copy + PartialEq> {
    record: &'a StringRecord,
    columns: &'a [Option<C>],
}

impl<'a, C: Copy + PartialEq> RowReader<'a, C> {
    fn cell(&self, column: C) -> Option<&'a str> {
        self.columns
            .iter()
            .position(|c| *c == Some(column))
            .and_then(|idx| self.record.get(idx))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

pub(crate) fn parse_charge_row(
    record: &StringRecord,
    columns: &[Option<ChargeColumn>],
    line: usize,
    errors: &mut Vec<String>,
) -> RowOutcome<Charge> {
    let reader = RowReader { record, columns };
    let mut invalid = false;

    let date = match reader.cell(ChargeColumn::Date) {
        None => return RowOutcome::Skipped,
        Some(cell) => match parse_date_cell(cell) {
            Some(d) => Some(d),
            None => {
                errors.push(format!("row {line}: invalid date \"{cell}\""));
                invalid = true;
                None
            }
        },
    };

    let mut number = |column: ChargeColumn, name: &str| -> Option<f64> {
        let cell = reader.cell(column)?;
        match parse_number(cell) {
            Some(v) => Some(v),
            None => {
                errors.push(format!("row {line}: invalid number \"{cell}\" for {name}"));
                invalid = true;
                None
            }
        }
    };

    let odometer = number(ChargeColumn::Odometer, "odometer");
    let start_percent = number(ChargeColumn::StartPercent, "start percent");
    let end_percent = number(ChargeColumn::EndPercent, "end percent");
    let custom_price = number(ChargeColumn::CustomPrice, "custom price");
    let price_snapshot = number(ChargeColumn::PriceSnapshot, "price per kwh");

    let tariff = match reader.cell(ChargeColumn::Tariff) {
        None => None,
        Some(cell) => match Tariff::parse_label(&fold(cell)) {
            Some(t) => Some(t),
            None => {
                errors.push(format!("row {line}: unknown tariff \"{cell}\""));
                invalid = true;
                None
            }
        },
    };

    let status = match reader.cell(ChargeColumn::Status) {
        None => None,
        Some(cell) => match parse_status_cell(cell) {
            Some(s) => Some(s),
            None => {
                errors.push(format!("row {line}: unknown status \"{cell}\""));
                invalid = true;
                None
            }
        },
    };

    if invalid {
        return RowOutcome::Invalid;
    }
    let (Some(date), Some(odometer), Some(start_percent)) = (date, odometer, start_percent) else {
        return RowOutcome::Skipped;
    };

    // Without an explicit status column, a charge counts as completed once
    // its end percentage and tariff are filled in.
    let completed = status.unwrap_or(end_percent.is_some() && tariff.is_some());

    RowOutcome::Record(Charge {
        id: 0,
        date,
        odometer,
        start_percent,
        end_percent,
        tariff,
        custom_price,
        price_snapshot,
        completed,
    })
}

pub(crate) fn parse_trip_row(
    record: &StringRecord,
    columns: &[Option<TripColumn>],
    line: usize,
    errors: &mut Vec<String>,
) -> RowOutcome<Trip> {
    let reader = RowReader { record, columns };
    let mut invalid = false;

    let date = match reader.cell(TripColumn::Date) {
        None => return RowOutcome::Skipped,
        Some(cell) => match parse_date_cell(cell) {
            Some(d) => Some(d),
            None => {
                errors.push(format!("row {line}: invalid date \"{cell}\""));
                invalid = true;
                None
            }
        },
    };

    let mut number = |column: TripColumn, name: &str| -> Option<f64> {
        let cell = reader.cell(column)?;
        match parse_number(cell) {
            Some(v) => Some(v),
            None => {
                errors.push(format!("row {line}: invalid number \"{cell}\" for {name}"));
                invalid = true;
                None
            }
        }
    };

    let start_odometer = number(TripColumn::StartOdometer, "start odometer");
    let end_odometer = number(TripColumn::EndOdometer, "end odometer");
    let start_percent = number(TripColumn::StartPercent, "start percent");
    let end_percent = number(TripColumn::EndPercent, "end percent");

    let destination = reader.cell(TripColumn::Destination).map(str::to_string);
    let client = reader.cell(TripColumn::Client).map(str::to_string);

    let billed = match reader.cell(TripColumn::Billed) {
        None => false,
        Some(cell) => match parse_bool_cell(cell) {
            Some(b) => b,
            None => {
                errors.push(format!("row {line}: invalid billed flag \"{cell}\""));
                invalid = true;
                false
            }
        },
    };

    let status = match reader.cell(TripColumn::Status) {
        None => None,
        Some(cell) => match parse_status_cell(cell) {
            Some(s) => Some(s),
            None => {
                errors.push(format!("row {line}: unknown status \"{cell}\""));
                invalid = true;
                None
            }
        },
    };

    if invalid {
        return RowOutcome::Invalid;
    }
    let (Some(date), Some(start_odometer), Some(start_percent), Some(destination)) =
        (date, start_odometer, start_percent, destination)
    else {
        return RowOutcome::Skipped;
    };

    let completed = status.unwrap_or(end_odometer.is_some() && end_percent.is_some());

    RowOutcome::Record(Trip {
        id: 0,
        date,
        start_odometer,
        end_odometer,
        start_percent,
        end_percent,
        destination,
        client,
        billed,
        completed,
    })
}
