//! Periodic and group aggregators
//!
//! Groups processed records into weekly/monthly/yearly buckets, or by client
//! and destination. Every aggregation rebuilds its indexes from scratch and
//! produces deterministically ordered rows.

use std::collections::{BTreeMap, HashMap};

use crate::consts::{CO2_KG_PER_LITER, UNSPECIFIED_CLIENT};

use super::period::{Period, period_key};
use super::tariff::Tariff;
use super::types::{
    ChargePeriodStats, ClientStats, DestinationStats, EnergyTotals, ProcessedCharge,
    ProcessedTrip, Settings, TripPeriodStats, round0, round2,
};

#[derive(Debug, Default)]
struct ChargeBucket {
    total: EnergyTotals,
    tariffs: BTreeMap<Tariff, EnergyTotals>,
    slow: EnergyTotals,
    fast: EnergyTotals,
    fueled_distance: f64,
    fueled_kwh: f64,
    fueled_cost: f64,
}

/// Aggregate charges into period buckets.
///
/// `charges` is the view being reported (it may carry a tariff or date
/// filter); `all_charges` is the full processed collection, used to build the
/// global odometer-ordered index that attributes each charge's fueled
/// distance via its next charge. The index deliberately ignores any filter on
/// `charges`: the distance a charge fueled always follows the true next
/// charge on the odometer.
pub(crate) fn aggregate_charge_periods(
    charges: &[ProcessedCharge],
    all_charges: &[ProcessedCharge],
    period: Period,
    settings: &Settings,
) -> Vec<ChargePeriodStats> {
    let mut global: Vec<&ProcessedCharge> = all_charges.iter().collect();
    global.sort_by(|a, b| a.odometer.total_cmp(&b.odometer));
    let position: HashMap<u64, usize> = global
        .iter()
        .enumerate()
        .map(|(idx, charge)| (charge.id, idx))
        .collect();

    let mut buckets: BTreeMap<String, ChargeBucket> = BTreeMap::new();

    for charge in charges {
        let key = period_key(charge.date, period);
        let bucket = buckets.entry(key).or_default();

        bucket.total.add(charge.kwh_drawn, charge.cost);
        bucket
            .tariffs
            .entry(charge.tariff)
            .or_default()
            .add(charge.kwh_drawn, charge.cost);
        if charge.tariff == Tariff::QuickCharge {
            bucket.fast.add(charge.kwh_drawn, charge.cost);
        } else {
            bucket.slow.add(charge.kwh_drawn, charge.cost);
        }

        // The driving this charge paid for is recorded on the next charge in
        // global odometer order.
        if let Some(&idx) = position.get(&charge.id)
            && let Some(next) = global.get(idx + 1)
            && let Some(distance) = next.distance_driven
            && distance > 0.0
        {
            bucket.fueled_distance += distance;
            bucket.fueled_kwh += charge.kwh_added;
            bucket.fueled_cost += charge.cost;
        }
    }

    buckets
        .into_iter()
        .map(|(key, bucket)| {
            let distance = round0(bucket.fueled_distance);
            let fueled_cost = round2(bucket.fueled_cost);

            let (consumption_kwh_100km, cost_per_100km) = if distance > 0.0 {
                (
                    Some(round2(bucket.fueled_kwh / distance * 100.0)),
                    Some(round2(fueled_cost / distance * 100.0)),
                )
            } else {
                (None, None)
            };

            let (gasoline_cost, savings, co2_saved_kg) =
                if settings.has_gasoline_reference() && distance > 0.0 {
                    let liters = distance / 100.0 * settings.gasoline_consumption;
                    let gasoline_cost = liters * settings.gasoline_price;
                    (
                        Some(round2(gasoline_cost)),
                        Some(round2(gasoline_cost - fueled_cost)),
                        Some(round2(liters * CO2_KG_PER_LITER)),
                    )
                } else {
                    (None, None, None)
                };

            ChargePeriodStats {
                period: key,
                kwh: bucket.total.kwh,
                cost: bucket.total.cost,
                count: bucket.total.count,
                tariffs: bucket.tariffs,
                slow: bucket.slow,
                fast: bucket.fast,
                distance,
                consumption_kwh_100km,
                cost_per_100km,
                gasoline_cost,
                savings,
                co2_saved_kg,
            }
        })
        .collect()
}

/// Aggregate trips into period buckets: plain sums, no cross-bucket lookups.
pub(crate) fn aggregate_trip_periods(
    trips: &[ProcessedTrip],
    period: Period,
) -> Vec<TripPeriodStats> {
    let mut buckets: BTreeMap<String, TripPeriodStats> = BTreeMap::new();

    for trip in trips {
        let key = period_key(trip.date, period);
        let bucket = buckets.entry(key.clone()).or_insert_with(|| TripPeriodStats {
            period: key,
            ..Default::default()
        });
        bucket.count += 1;
        bucket.distance = round0(bucket.distance + trip.distance);
        bucket.cost = round2(bucket.cost + trip.cost);
        bucket.savings = round2(bucket.savings + trip.savings);
        bucket.billed = round2(bucket.billed + trip.billing.unwrap_or(0.0));
    }

    buckets.into_values().collect()
}

/// Group trips by client. Trips without a client fall under the
/// "unspecified" label. Sorted by billed total, highest first.
pub(crate) fn aggregate_clients(trips: &[ProcessedTrip]) -> Vec<ClientStats> {
    let mut groups: BTreeMap<String, ClientStats> = BTreeMap::new();

    for trip in trips {
        let name = trip
            .client
            .clone()
            .unwrap_or_else(|| UNSPECIFIED_CLIENT.to_string());
        let entry = groups.entry(name.clone()).or_insert_with(|| ClientStats {
            client: name,
            count: 0,
            distance: 0.0,
            billed: 0.0,
        });
        entry.count += 1;
        entry.distance = round0(entry.distance + trip.distance);
        entry.billed = round2(entry.billed + trip.billing.unwrap_or(0.0));
    }

    let mut clients: Vec<ClientStats> = groups.into_values().collect();
    clients.sort_by(|a, b| {
        b.billed
            .total_cmp(&a.billed)
            .then_with(|| a.client.cmp(&b.client))
    });
    clients
}

/// Group trips by destination. Sorted by trip count, highest first.
pub(crate) fn aggregate_destinations(trips: &[ProcessedTrip]) -> Vec<DestinationStats> {
    let mut groups: BTreeMap<String, DestinationStats> = BTreeMap::new();

    for trip in trips {
        let entry = groups
            .entry(trip.destination.clone())
            .or_insert_with(|| DestinationStats {
                destination: trip.destination.clone(),
                count: 0,
                distance: 0.0,
                avg_distance: 0.0,
            });
        entry.count += 1;
        entry.distance = round0(entry.distance + trip.distance);
    }

    let mut destinations: Vec<DestinationStats> = groups.into_values().collect();
    for dest in &mut destinations {
        dest.avg_distance = round0(dest.distance / dest.count as f64);
    }
    destinations.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.destination.cmp(&b.destination))
    });
    destinations
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::core::types::Settings;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn settings() -> Settings {
        Settings {
            gasoline_consumption: 6.5,
            gasoline_price: 1.85,
            ..Default::default()
        }
    }

    fn charge(
        id: u64,
        date: NaiveDate,
        odometer: f64,
        tariff: Tariff,
        kwh_added: f64,
        kwh_drawn: f64,
        cost: f64,
        distance_driven: Option<f64>,
    ) -> ProcessedCharge {
        ProcessedCharge {
            id,
            date,
            odometer,
            tariff,
            kwh_added,
            kwh_drawn,
            price_per_kwh: 0.15,
            cost,
            equivalent_km: None,
            distance_driven,
            consumption_kwh_100km: None,
            cost_per_100km: None,
        }
    }

    fn trip(date: NaiveDate, distance: f64, cost: f64, billing: Option<f64>) -> ProcessedTrip {
        ProcessedTrip {
            id: 0,
            date,
            destination: "Lyon".to_string(),
            client: None,
            billed: billing.is_some(),
            distance,
            kwh_consumed: 0.0,
            price_per_kwh: 0.15,
            cost,
            consumption_kwh_100km: 0.0,
            gasoline_cost: 0.0,
            savings: 1.0,
            billing,
        }
    }

    #[test]
    fn charge_buckets_sum_energy_and_cost_per_month() {
        let charges = vec![
            charge(1, d(2025, 1, 5), 10_000.0, Tariff::OffPeak, 10.0, 11.2, 1.68, None),
            charge(2, d(2025, 1, 20), 10_300.0, Tariff::Peak, 25.0, 28.0, 5.6, Some(300.0)),
            charge(3, d(2025, 2, 2), 10_600.0, Tariff::Peak, 20.0, 22.4, 4.48, Some(300.0)),
        ];
        let out = aggregate_charge_periods(&charges, &charges, Period::Monthly, &settings());
        assert_eq!(out.len(), 2);

        let january = &out[0];
        assert_eq!(january.period, "2025-01");
        assert_eq!(january.kwh, 39.2);
        assert_eq!(january.cost, 7.28);
        assert_eq!(january.count, 2);
        // Both January charges have a following charge with positive
        // distance: 300 km each.
        assert_eq!(january.distance, 600.0);
        // Energy that fueled those 600 km: 10 + 25 battery kWh.
        assert_eq!(january.consumption_kwh_100km, Some(round2(35.0 / 600.0 * 100.0)));
        assert_eq!(january.cost_per_100km, Some(round2(7.28 / 600.0 * 100.0)));

        let february = &out[1];
        assert_eq!(february.period, "2025-02");
        // Last charge in odometer order fuels nothing yet.
        assert_eq!(february.distance, 0.0);
        assert_eq!(february.consumption_kwh_100km, None);
        assert_eq!(february.gasoline_cost, None);
    }

    #[test]
    fn tariff_breakdown_and_fast_subtotals() {
        let charges = vec![
            charge(1, d(2025, 1, 5), 10_000.0, Tariff::OffPeak, 10.0, 11.2, 1.68, None),
            charge(2, d(2025, 1, 12), 10_300.0, Tariff::QuickCharge, 20.0, 20.0, 11.8, Some(300.0)),
            charge(3, d(2025, 1, 20), 10_500.0, Tariff::OffPeak, 15.0, 16.8, 2.52, Some(200.0)),
        ];
        let out = aggregate_charge_periods(&charges, &charges, Period::Monthly, &settings());
        let bucket = &out[0];

        assert_eq!(bucket.tariffs.len(), 2);
        assert_eq!(bucket.tariffs[&Tariff::OffPeak].kwh, 28.0);
        assert_eq!(bucket.tariffs[&Tariff::OffPeak].count, 2);
        assert_eq!(bucket.tariffs[&Tariff::QuickCharge].cost, 11.8);

        assert_eq!(bucket.slow.kwh, 28.0);
        assert_eq!(bucket.fast.kwh, 20.0);
        assert_eq!(bucket.fast.count, 1);
    }

    #[test]
    fn fueled_distance_follows_global_order_across_filters() {
        let all = vec![
            charge(1, d(2025, 1, 5), 10_000.0, Tariff::OffPeak, 10.0, 11.2, 1.68, None),
            charge(2, d(2025, 1, 12), 10_300.0, Tariff::Peak, 25.0, 28.0, 5.6, Some(300.0)),
            charge(3, d(2025, 1, 20), 10_500.0, Tariff::OffPeak, 15.0, 16.8, 2.52, Some(200.0)),
        ];
        // Filtered view: off-peak only. Charge 1 still finds its next charge
        // (the filtered-out peak one) through the global index.
        let filtered: Vec<ProcessedCharge> = all
            .iter()
            .filter(|c| c.tariff == Tariff::OffPeak)
            .cloned()
            .collect();

        let out = aggregate_charge_periods(&filtered, &all, Period::Monthly, &settings());
        let bucket = &out[0];
        // Charge 1 fueled 300 km (to charge 2); charge 3 fuels nothing.
        assert_eq!(bucket.distance, 300.0);
        assert_eq!(bucket.consumption_kwh_100km, Some(round2(10.0 / 300.0 * 100.0)));
    }

    #[test]
    fn gasoline_and_co2_figures_per_bucket() {
        let charges = vec![
            charge(1, d(2025, 1, 5), 10_000.0, Tariff::OffPeak, 10.0, 11.2, 1.68, None),
            charge(2, d(2025, 1, 20), 10_300.0, Tariff::Peak, 25.0, 28.0, 5.6, Some(300.0)),
        ];
        let out = aggregate_charge_periods(&charges, &charges, Period::Monthly, &settings());
        let bucket = &out[0];
        // Charge 1 fueled 300 km: 19.5 L of gasoline avoided.
        assert_eq!(bucket.distance, 300.0);
        assert_eq!(bucket.gasoline_cost, Some(round2(19.5 * 1.85)));
        assert_eq!(bucket.savings, Some(round2(19.5 * 1.85 - 1.68)));
        assert_eq!(bucket.co2_saved_kg, Some(round2(19.5 * 2.31)));
    }

    #[test]
    fn weekly_and_yearly_grouping() {
        let charges = vec![
            charge(1, d(2025, 1, 6), 10_000.0, Tariff::OffPeak, 10.0, 11.2, 1.68, None),
            charge(2, d(2025, 1, 8), 10_300.0, Tariff::OffPeak, 10.0, 11.2, 1.68, Some(300.0)),
            charge(3, d(2026, 1, 8), 20_000.0, Tariff::OffPeak, 10.0, 11.2, 1.68, Some(9700.0)),
        ];
        let weekly = aggregate_charge_periods(&charges, &charges, Period::Weekly, &settings());
        assert_eq!(weekly[0].period, "2025-W02");
        assert_eq!(weekly[0].kwh, 22.4);

        let yearly = aggregate_charge_periods(&charges, &charges, Period::Yearly, &settings());
        assert_eq!(yearly.len(), 2);
        assert_eq!(yearly[0].period, "2025");
        assert_eq!(yearly[1].period, "2026");
    }

    #[test]
    fn aggregation_is_idempotent() {
        let charges = vec![
            charge(1, d(2025, 1, 5), 10_000.0, Tariff::OffPeak, 10.0, 11.2, 1.68, None),
            charge(2, d(2025, 1, 20), 10_300.0, Tariff::Peak, 25.0, 28.0, 5.6, Some(300.0)),
        ];
        let a = aggregate_charge_periods(&charges, &charges, Period::Monthly, &settings());
        let b = aggregate_charge_periods(&charges, &charges, Period::Monthly, &settings());
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.period, y.period);
            assert_eq!(x.kwh, y.kwh);
            assert_eq!(x.cost, y.cost);
            assert_eq!(x.distance, y.distance);
            assert_eq!(x.tariffs, y.tariffs);
        }
    }

    #[test]
    fn trip_buckets_sum_and_conserve_totals() {
        let trips = vec![
            trip(d(2025, 1, 5), 100.0, 0.75, Some(60.6)),
            trip(d(2025, 1, 25), 50.0, 0.40, None),
            trip(d(2025, 2, 10), 200.0, 1.50, Some(121.2)),
        ];
        let monthly = aggregate_trip_periods(&trips, Period::Monthly);
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].period, "2025-01");
        assert_eq!(monthly[0].count, 2);
        assert_eq!(monthly[0].distance, 150.0);
        assert_eq!(monthly[0].cost, 1.15);
        assert_eq!(monthly[0].billed, 60.6);

        // Bucket totals equal raw totals for any granularity.
        let yearly = aggregate_trip_periods(&trips, Period::Yearly);
        let sum_distance: f64 = monthly.iter().map(|b| b.distance).sum();
        let sum_billed: f64 = monthly.iter().map(|b| b.billed).sum();
        assert_eq!(sum_distance, yearly.iter().map(|b| b.distance).sum::<f64>());
        assert_eq!(round2(sum_billed), round2(yearly.iter().map(|b| b.billed).sum()));
        assert_eq!(sum_distance, 350.0);
    }

    #[test]
    fn clients_group_missing_under_unspecified() {
        let mut with_client = trip(d(2025, 1, 5), 100.0, 0.75, Some(60.6));
        with_client.client = Some("Acme".to_string());
        let anonymous_a = trip(d(2025, 1, 6), 10.0, 0.10, Some(4.1));
        let anonymous_b = trip(d(2025, 1, 7), 20.0, 0.20, Some(8.2));

        let out = aggregate_clients(&[with_client, anonymous_a, anonymous_b]);
        assert_eq!(out.len(), 2);
        // Acme billed 60.6, unspecified 12.3, sorted by billed desc.
        assert_eq!(out[0].client, "Acme");
        assert_eq!(out[1].client, "unspecified");
        assert_eq!(out[1].count, 2);
        assert_eq!(out[1].distance, 30.0);
        assert_eq!(out[1].billed, 12.3);
    }

    #[test]
    fn destinations_sorted_by_count_with_average() {
        let mut lyon1 = trip(d(2025, 1, 5), 100.0, 0.75, None);
        lyon1.destination = "Lyon".to_string();
        let mut lyon2 = trip(d(2025, 1, 6), 151.0, 0.75, None);
        lyon2.destination = "Lyon".to_string();
        let mut paris = trip(d(2025, 1, 7), 500.0, 3.00, None);
        paris.destination = "Paris".to_string();

        let out = aggregate_destinations(&[lyon1, lyon2, paris]);
        assert_eq!(out[0].destination, "Lyon");
        assert_eq!(out[0].count, 2);
        assert_eq!(out[0].distance, 251.0);
        assert_eq!(out[0].avg_distance, 126.0);
        assert_eq!(out[1].destination, "Paris");
        assert_eq!(out[1].avg_distance, 500.0);
    }

    #[test]
    fn empty_inputs_produce_empty_outputs() {
        assert!(aggregate_charge_periods(&[], &[], Period::Monthly, &settings()).is_empty());
        assert!(aggregate_trip_periods(&[], Period::Weekly).is_empty());
        assert!(aggregate_clients(&[]).is_empty());
        assert!(aggregate_destinations(&[]).is_empty());
    }
}
