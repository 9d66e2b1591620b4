mod csv;
mod format;
mod json;
mod table;

pub(crate) use csv::{charge_csv, client_csv, destination_csv, trip_csv};
pub(crate) use json::{charge_json, client_json, destination_json, trip_json};
pub(crate) use table::{
    SummaryOptions, TableOptions, print_charge_table, print_client_table,
    print_destination_table, print_trip_table,
};
