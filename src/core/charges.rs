//! Charge processor
//!
//! Turns raw charging sessions into processed charges carrying cost, grid
//! and battery energy, and per-segment consumption figures. Segment linkage
//! is strictly by ascending odometer, never by date.

use crate::consts::AC_LOSS_FACTOR;

use super::tariff::resolve_price;
use super::types::{Charge, ProcessedCharge, Settings, Vehicle, round0, round2};

/// Consumes the raw collection; only completed charges with a known end
/// percentage and tariff participate. Without a vehicle there is nothing to
/// derive and the result is empty.
pub(crate) fn process_charges(
    charges: Vec<Charge>,
    settings: &Settings,
    vehicle: Option<&Vehicle>,
) -> Vec<ProcessedCharge> {
    let Some(vehicle) = vehicle else {
        return Vec::new();
    };

    let mut eligible: Vec<Charge> = charges.into_iter().filter(Charge::is_processable).collect();
    eligible.sort_by(|a, b| a.odometer.total_cmp(&b.odometer));

    let mut processed: Vec<ProcessedCharge> = Vec::with_capacity(eligible.len());
    // Odometer, battery kWh and cost of the charge that fueled the segment
    // ending at the current charge.
    let mut previous: Option<(f64, f64, f64)> = None;

    for charge in eligible {
        let (Some(end_percent), Some(tariff)) = (charge.end_percent, charge.tariff) else {
            continue;
        };

        let percent_added = end_percent - charge.start_percent;
        let kwh_added = round2(percent_added / 100.0 * vehicle.battery_kwh);
        let kwh_drawn = if tariff.is_ac() {
            round2(kwh_added * AC_LOSS_FACTOR)
        } else {
            kwh_added
        };

        let price = resolve_price(tariff, charge.price_snapshot, charge.custom_price, settings);
        let cost = round2(kwh_drawn * price);

        let equivalent_km = if settings.has_gasoline_reference() && cost > 0.0 {
            let liters = cost / settings.gasoline_price;
            Some(round0(liters / settings.gasoline_consumption * 100.0))
        } else {
            None
        };

        let mut distance_driven = None;
        let mut consumption_kwh_100km = None;
        let mut cost_per_100km = None;
        if let Some((prev_odometer, prev_kwh_added, prev_cost)) = previous {
            let distance = round0(charge.odometer - prev_odometer);
            distance_driven = Some(distance);
            if distance > 0.0 {
                // The segment was driven on the energy added by the previous
                // charge, so its consumption and cost are attributed from
                // that charge, not the current one.
                consumption_kwh_100km = Some(round2(prev_kwh_added / distance * 100.0));
                cost_per_100km = Some(round2(prev_cost / distance * 100.0));
            }
        }

        previous = Some((charge.odometer, kwh_added, cost));

        processed.push(ProcessedCharge {
            id: charge.id,
            date: charge.date,
            odometer: charge.odometer,
            tariff,
            kwh_added,
            kwh_drawn,
            price_per_kwh: round2(price),
            cost,
            equivalent_km,
            distance_driven,
            consumption_kwh_100km,
            cost_per_100km,
        });
    }

    processed
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::core::tariff::Tariff;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn vehicle() -> Vehicle {
        Vehicle {
            name: None,
            battery_kwh: 50.0,
            fiscal_power: Some(4),
        }
    }

    fn settings() -> Settings {
        Settings {
            price_peak: 0.20,
            price_off_peak: 0.15,
            gasoline_consumption: 6.5,
            gasoline_price: 1.85,
            ..Default::default()
        }
    }

    fn charge(id: u64, odometer: f64, start: f64, end: f64, tariff: Tariff) -> Charge {
        Charge {
            id,
            date: d(2025, 1, id as u32),
            odometer,
            start_percent: start,
            end_percent: Some(end),
            tariff: Some(tariff),
            custom_price: None,
            price_snapshot: None,
            completed: true,
        }
    }

    #[test]
    fn no_vehicle_yields_empty_result() {
        let charges = vec![charge(1, 10_000.0, 80.0, 100.0, Tariff::OffPeak)];
        assert!(process_charges(charges, &settings(), None).is_empty());
    }

    #[test]
    fn incomplete_charges_are_skipped() {
        let mut open = charge(1, 10_000.0, 80.0, 100.0, Tariff::OffPeak);
        open.end_percent = None;
        let mut no_tariff = charge(2, 10_100.0, 20.0, 60.0, Tariff::Peak);
        no_tariff.tariff = None;
        let done = charge(3, 10_200.0, 30.0, 70.0, Tariff::Peak);

        let out = process_charges(vec![open, no_tariff, done], &settings(), Some(&vehicle()));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 3);
    }

    // Reference scenario: two charges at 10000 km (80→100%, off-peak) and
    // 10300 km (40→90%, peak) on a 50 kWh battery.
    #[test]
    fn two_charge_sequence_derives_segment_from_predecessor() {
        let charges = vec![
            charge(2, 10_300.0, 40.0, 90.0, Tariff::Peak),
            charge(1, 10_000.0, 80.0, 100.0, Tariff::OffPeak),
        ];
        let out = process_charges(charges, &settings(), Some(&vehicle()));
        assert_eq!(out.len(), 2);

        let first = &out[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.kwh_added, 10.0);
        assert_eq!(first.kwh_drawn, 11.2);
        assert_eq!(first.cost, 1.68);
        assert_eq!(first.distance_driven, None);
        assert_eq!(first.consumption_kwh_100km, None);
        assert_eq!(first.cost_per_100km, None);

        let second = &out[1];
        assert_eq!(second.id, 2);
        assert_eq!(second.kwh_added, 25.0);
        assert_eq!(second.kwh_drawn, 28.0);
        assert_eq!(second.cost, 5.6);
        assert_eq!(second.distance_driven, Some(300.0));
        assert_eq!(second.consumption_kwh_100km, Some(3.33));
        assert_eq!(second.cost_per_100km, Some(0.56));
    }

    #[test]
    fn quick_charge_has_no_grid_loss_and_uses_custom_price() {
        let mut dc = charge(1, 5_000.0, 20.0, 80.0, Tariff::QuickCharge);
        dc.custom_price = Some(0.59);
        let out = process_charges(vec![dc], &settings(), Some(&vehicle()));
        assert_eq!(out[0].kwh_added, 30.0);
        assert_eq!(out[0].kwh_drawn, 30.0);
        assert_eq!(out[0].cost, 17.7);
    }

    #[test]
    fn snapshot_price_overrides_settings() {
        let mut snap = charge(1, 5_000.0, 50.0, 100.0, Tariff::OffPeak);
        snap.price_snapshot = Some(0.10);
        let out = process_charges(vec![snap], &settings(), Some(&vehicle()));
        // 25 kWh added, 28 kWh drawn at the snapshotted price
        assert_eq!(out[0].cost, 2.8);
        assert_eq!(out[0].price_per_kwh, 0.1);
    }

    #[test]
    fn free_charge_costs_nothing_and_has_no_equivalent() {
        let free = charge(1, 5_000.0, 50.0, 100.0, Tariff::FreeCharge);
        let out = process_charges(vec![free], &settings(), Some(&vehicle()));
        assert_eq!(out[0].cost, 0.0);
        assert_eq!(out[0].equivalent_km, None);
    }

    #[test]
    fn gasoline_equivalent_distance() {
        let charges = vec![charge(1, 10_000.0, 80.0, 100.0, Tariff::OffPeak)];
        let out = process_charges(charges, &settings(), Some(&vehicle()));
        // 1.68 € buys 0.908 L, worth 13.97 km at 6.5 L/100km
        assert_eq!(out[0].equivalent_km, Some(14.0));
    }

    #[test]
    fn gasoline_equivalent_requires_reference_settings() {
        let mut settings = settings();
        settings.gasoline_price = 0.0;
        let charges = vec![charge(1, 10_000.0, 80.0, 100.0, Tariff::OffPeak)];
        let out = process_charges(charges, &settings, Some(&vehicle()));
        assert_eq!(out[0].equivalent_km, None);
    }

    #[test]
    fn non_positive_segment_distance_yields_no_consumption() {
        let charges = vec![
            charge(1, 10_000.0, 80.0, 100.0, Tariff::OffPeak),
            charge(2, 10_000.0, 40.0, 90.0, Tariff::Peak),
        ];
        let out = process_charges(charges, &settings(), Some(&vehicle()));
        assert_eq!(out[1].distance_driven, Some(0.0));
        assert_eq!(out[1].consumption_kwh_100km, None);
        assert_eq!(out[1].cost_per_100km, None);
    }

    #[test]
    fn ordering_is_by_odometer_not_date() {
        // Later date but smaller odometer must come first in the sequence.
        let mut a = charge(1, 12_000.0, 80.0, 100.0, Tariff::OffPeak);
        a.date = d(2025, 1, 1);
        let mut b = charge(2, 11_500.0, 40.0, 90.0, Tariff::Peak);
        b.date = d(2025, 2, 1);

        let out = process_charges(vec![a, b], &settings(), Some(&vehicle()));
        assert_eq!(out[0].id, 2);
        assert_eq!(out[1].id, 1);
        assert_eq!(out[1].distance_driven, Some(500.0));
    }
}
