//! The derivation engine: pure, synchronous, no I/O
//!
//! Raw records go in, processed records and stat rows come out. Everything is
//! recomputed in full on each call; nothing derived is ever stored.

mod charges;
mod period;
mod stats;
mod tariff;
mod trips;
mod types;

pub(crate) use charges::process_charges;
pub(crate) use period::Period;
pub(crate) use stats::{
    aggregate_charge_periods, aggregate_clients, aggregate_destinations, aggregate_trip_periods,
};
pub(crate) use tariff::Tariff;
pub(crate) use trips::process_trips;
pub(crate) use types::{
    Charge, ChargePeriodStats, ClientStats, DateFilter, DestinationStats, EnergyTotals,
    ProcessedCharge, ProcessedTrip, Settings, Trip, TripPeriodStats, Vehicle,
};
