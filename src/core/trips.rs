//! Trip processor
//!
//! Derives distance, energy, cost, gasoline savings and the billing amount
//! for each completed trip. Trips are priced with the most recent charge at
//! or before their start odometer, never a later one.

use crate::consts::{BILLING_LOCAL_MAX_KM, BILLING_MEDIUM_MAX_KM, DEFAULT_FISCAL_POWER};

use super::types::{ProcessedCharge, ProcessedTrip, Settings, Trip, Vehicle, round0, round2};

/// Per-km billing rate for long trips, tiered by fiscal power.
fn per_km_rate(fiscal_power: i32) -> f64 {
    if fiscal_power <= 3 {
        0.529
    } else if fiscal_power == 4 {
        0.606
    } else {
        0.636
    }
}

fn billing_amount(distance: f64, settings: &Settings, vehicle: &Vehicle) -> f64 {
    if distance < BILLING_LOCAL_MAX_KM {
        settings.billing_rate_local
    } else if distance <= BILLING_MEDIUM_MAX_KM {
        settings.billing_rate_medium
    } else {
        let fiscal_power = vehicle.fiscal_power.unwrap_or(DEFAULT_FISCAL_POWER);
        round2(distance * per_km_rate(fiscal_power))
    }
}

/// Consumes the raw collection; only completed trips with a known end
/// odometer and percentage participate. The result is ordered for display:
/// newest date first, then highest end odometer.
pub(crate) fn process_trips(
    trips: Vec<Trip>,
    charges: &[ProcessedCharge],
    settings: &Settings,
    vehicle: Option<&Vehicle>,
) -> Vec<ProcessedTrip> {
    let Some(vehicle) = vehicle else {
        return Vec::new();
    };

    let mut eligible: Vec<Trip> = trips.into_iter().filter(Trip::is_processable).collect();
    eligible.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.end_odometer.unwrap_or(0.0).total_cmp(&a.end_odometer.unwrap_or(0.0)))
    });

    // Price index: charges ascending by odometer, independent of any other
    // ordering the caller holds.
    let mut price_index: Vec<(f64, f64)> = charges
        .iter()
        .map(|c| (c.odometer, c.price_per_kwh))
        .collect();
    price_index.sort_by(|a, b| a.0.total_cmp(&b.0));

    let price_at = |start_odometer: f64| -> f64 {
        let idx = price_index.partition_point(|&(odometer, _)| odometer <= start_odometer);
        if idx > 0 { price_index[idx - 1].1 } else { 0.0 }
    };

    eligible
        .into_iter()
        .filter_map(|trip| {
            let (Some(end_odometer), Some(end_percent)) = (trip.end_odometer, trip.end_percent)
            else {
                return None;
            };

            let distance = round0(end_odometer - trip.start_odometer);
            if distance <= 0.0 {
                // Corrupt or placeholder record: zero everything, bill nothing.
                return Some(ProcessedTrip {
                    id: trip.id,
                    date: trip.date,
                    destination: trip.destination,
                    client: trip.client,
                    billed: trip.billed,
                    distance: 0.0,
                    kwh_consumed: 0.0,
                    price_per_kwh: 0.0,
                    cost: 0.0,
                    consumption_kwh_100km: 0.0,
                    gasoline_cost: 0.0,
                    savings: 0.0,
                    billing: None,
                });
            }

            let price_per_kwh = price_at(trip.start_odometer);
            let percent_consumed = trip.start_percent - end_percent;
            let kwh_consumed = round2(percent_consumed / 100.0 * vehicle.battery_kwh);
            let cost = round2(kwh_consumed * price_per_kwh);
            let consumption_kwh_100km = round2(kwh_consumed / distance * 100.0);

            let (gasoline_cost, savings) = if settings.has_gasoline_reference() {
                let gasoline_cost =
                    round2(distance / 100.0 * settings.gasoline_consumption * settings.gasoline_price);
                (gasoline_cost, round2(gasoline_cost - cost))
            } else {
                (0.0, 0.0)
            };

            let billing = trip
                .billed
                .then(|| billing_amount(distance, settings, vehicle));

            Some(ProcessedTrip {
                id: trip.id,
                date: trip.date,
                destination: trip.destination,
                client: trip.client,
                billed: trip.billed,
                distance,
                kwh_consumed,
                price_per_kwh,
                cost,
                consumption_kwh_100km,
                gasoline_cost,
                savings,
                billing,
            })
        })
        .collect()
}
