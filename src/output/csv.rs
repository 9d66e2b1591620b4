use std::fmt::Write;

use crate::cli::SortOrder;
use crate::core::{
    ChargePeriodStats, ClientStats, DestinationStats, Period, TripPeriodStats,
};

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn opt_field(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.2}")).unwrap_or_default()
}

fn ordered<T>(rows: &[T], order: SortOrder) -> Vec<&T> {
    match order {
        SortOrder::Asc => rows.iter().collect(),
        SortOrder::Desc => rows.iter().rev().collect(),
    }
}

pub(crate) fn charge_csv(
    stats: &[ChargePeriodStats],
    period: Period,
    order: SortOrder,
    breakdown: bool,
) -> String {
    let label = period.label();
    let mut out = String::new();

    if breakdown {
        // Breakdown: one row per tariff per period
        let _ = writeln!(out, "{label},tariff,charges,kwh,cost");
        for bucket in ordered(stats, order) {
            for (tariff, totals) in &bucket.tariffs {
                let _ = writeln!(
                    out,
                    "{},{},{},{:.2},{:.2}",
                    csv_escape(&bucket.period),
                    tariff.label(),
                    totals.count,
                    totals.kwh,
                    totals.cost,
                );
            }
        }
        return out;
    }

    let _ = writeln!(
        out,
        "{label},charges,kwh,fast_kwh,cost,distance_km,kwh_per_100km,cost_per_100km,gasoline_cost,savings,co2_saved_kg"
    );
    for bucket in ordered(stats, order) {
        let _ = writeln!(
            out,
            "{},{},{:.2},{:.2},{:.2},{:.0},{},{},{},{},{}",
            csv_escape(&bucket.period),
            bucket.count,
            bucket.kwh,
            bucket.fast.kwh,
            bucket.cost,
            bucket.distance,
            opt_field(bucket.consumption_kwh_100km),
            opt_field(bucket.cost_per_100km),
            opt_field(bucket.gasoline_cost),
            opt_field(bucket.savings),
            opt_field(bucket.co2_saved_kg),
        );
    }
    out
}

pub(crate) fn trip_csv(stats: &[TripPeriodStats], period: Period, order: SortOrder) -> String {
    let label = period.label();
    let mut out = String::new();
    let _ = writeln!(out, "{label},trips,distance_km,cost,savings,billed");
    for bucket in ordered(stats, order) {
        let _ = writeln!(
            out,
            "{},{},{:.0},{:.2},{:.2},{:.2}",
            csv_escape(&bucket.period),
            bucket.count,
            bucket.distance,
            bucket.cost,
            bucket.savings,
            bucket.billed,
        );
    }
    out
}

pub(crate) fn client_csv(stats: &[ClientStats]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "client,trips,distance_km,billed");
    for row in stats {
        let _ = writeln!(
            out,
            "{},{},{:.0},{:.2}",
            csv_escape(&row.client),
            row.count,
            row.distance,
            row.billed,
        );
    }
    out
}

pub(crate) fn destination_csv(stats: &[DestinationStats]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "destination,trips,distance_km,avg_distance_km");
    for row in stats {
        let _ = writeln!(
            out,
            "{},{},{:.0},{:.0}",
            csv_escape(&row.destination),
            row.count,
            row.distance,
            row.avg_distance,
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_escape_plain() {
        assert_eq!(csv_escape("hello"), "hello");
    }

    #[test]
    fn csv_escape_comma_and_quotes() {
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn trip_csv_structure() {
        let stats = vec![TripPeriodStats {
            period: "2025-01".to_string(),
            count: 2,
            distance: 150.0,
            cost: 1.15,
            savings: 16.89,
            billed: 60.6,
        }];
        let csv = trip_csv(&stats, Period::Monthly, SortOrder::Asc);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "month,trips,distance_km,cost,savings,billed");
        assert_eq!(lines[1], "2025-01,2,150,1.15,16.89,60.60");
    }

    #[test]
    fn charge_csv_blank_fields_for_absent_values() {
        let stats = vec![ChargePeriodStats {
            period: "2025-01".to_string(),
            kwh: 11.2,
            cost: 1.68,
            count: 1,
            ..Default::default()
        }];
        let csv = charge_csv(&stats, Period::Monthly, SortOrder::Asc, false);
        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[0].starts_with("month,charges,kwh,"));
        // Absent per-100km and savings figures stay empty, not zero.
        assert_eq!(lines[1], "2025-01,1,11.20,0.00,1.68,0,,,,,");
    }

    #[test]
    fn client_csv_escapes_names() {
        let stats = vec![ClientStats {
            client: "Acme, Inc".to_string(),
            count: 1,
            distance: 100.0,
            billed: 60.6,
        }];
        let csv = client_csv(&stats);
        assert!(csv.lines().nth(1).unwrap().starts_with("\"Acme, Inc\","));
    }
}
