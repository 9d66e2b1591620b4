//! Command dispatch: load records, run the engine, render the requested view.

use crate::cli::{Cli, View, parse_command};
use crate::config::Config;
use crate::core::{
    DateFilter, ProcessedCharge, ProcessedTrip, aggregate_charge_periods, aggregate_clients,
    aggregate_destinations, aggregate_trip_periods, process_charges, process_trips,
};
use crate::error::AppError;
use crate::import::{find_data_files, load_records};
use crate::output::{
    SummaryOptions, TableOptions, charge_csv, charge_json, client_csv, client_json,
    destination_csv, destination_json, print_charge_table, print_client_table,
    print_destination_table, print_trip_table, trip_csv, trip_json,
};
use crate::utils::parse_date;

pub(crate) fn run(cli: &Cli) -> Result<(), AppError> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    let since = cli.since.as_deref().map(parse_date).transpose()?;
    let until = cli.until.as_deref().map(parse_date).transpose()?;
    let filter = DateFilter::new(since, until);

    let data_dir = cli
        .data_dir
        .clone()
        .or_else(|| config.data_dir.clone())
        .ok_or(AppError::NoDataDir)?;
    let (charge_files, trip_files) = find_data_files(&data_dir);
    let loaded = load_records(&charge_files, &trip_files)?;

    let settings = config.settings();
    let vehicle = config.vehicle.as_ref();

    // Derivation always runs over the full collections; the date filter only
    // narrows what is displayed, so segment linkage and trip pricing see
    // every record.
    let charges = process_charges(loaded.charges, &settings, vehicle);
    let trips = process_trips(loaded.trips, &charges, &settings, vehicle);

    let summary = SummaryOptions {
        processed: charges.len() + trips.len(),
        skipped: loaded.skipped,
    };
    let options = TableOptions {
        order: cli.order,
        use_color: cli.use_color(),
        breakdown: cli.breakdown,
    };

    match parse_command(&cli.command) {
        View::Charges(period) => {
            let view: Vec<ProcessedCharge> = charges
                .iter()
                .filter(|c| filter.contains(c.date))
                .filter(|c| cli.tariff.is_none_or(|t| c.tariff == t))
                .cloned()
                .collect();
            if view.is_empty() {
                println!("No charge data found.");
                return Ok(());
            }
            let stats = aggregate_charge_periods(&view, &charges, period, &settings);
            if cli.json {
                println!("{}", charge_json(&stats, period, cli.order, cli.breakdown));
            } else if cli.csv {
                print!("{}", charge_csv(&stats, period, cli.order, cli.breakdown));
            } else {
                print_charge_table(&stats, period, summary, options);
            }
        }
        View::Trips(period) => {
            let view = filtered_trips(&trips, filter);
            if view.is_empty() {
                println!("No trip data found.");
                return Ok(());
            }
            let stats = aggregate_trip_periods(&view, period);
            if cli.json {
                println!("{}", trip_json(&stats, period, cli.order));
            } else if cli.csv {
                print!("{}", trip_csv(&stats, period, cli.order));
            } else {
                print_trip_table(&stats, period, summary, options);
            }
        }
        View::Clients => {
            let view = filtered_trips(&trips, filter);
            if view.is_empty() {
                println!("No trip data found.");
                return Ok(());
            }
            let stats = aggregate_clients(&view);
            if cli.json {
                println!("{}", client_json(&stats));
            } else if cli.csv {
                print!("{}", client_csv(&stats));
            } else {
                print_client_table(&stats, summary, cli.use_color());
            }
        }
        View::Destinations => {
            let view = filtered_trips(&trips, filter);
            if view.is_empty() {
                println!("No trip data found.");
                return Ok(());
            }
            let stats = aggregate_destinations(&view);
            if cli.json {
                println!("{}", destination_json(&stats));
            } else if cli.csv {
                print!("{}", destination_csv(&stats));
            } else {
                print_destination_table(&stats, summary, cli.use_color());
            }
        }
    }

    Ok(())
}

fn filtered_trips(trips: &[ProcessedTrip], filter: DateFilter) -> Vec<ProcessedTrip> {
    trips
        .iter()
        .filter(|t| filter.contains(t.date))
        .cloned()
        .collect()
}
