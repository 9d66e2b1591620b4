use serde_json::json;

use crate::cli::SortOrder;
use crate::core::{
    ChargePeriodStats, ClientStats, DestinationStats, EnergyTotals, Period, TripPeriodStats,
};
use crate::output::format::opt_json_value;

fn ordered<T>(rows: &[T], order: SortOrder) -> Vec<&T> {
    match order {
        SortOrder::Asc => rows.iter().collect(),
        SortOrder::Desc => rows.iter().rev().collect(),
    }
}

fn totals_json(totals: &EnergyTotals) -> serde_json::Value {
    json!({
        "charges": totals.count,
        "kwh": totals.kwh,
        "cost": totals.cost,
    })
}

pub(crate) fn charge_json(
    stats: &[ChargePeriodStats],
    period: Period,
    order: SortOrder,
    breakdown: bool,
) -> String {
    let label = period.label();
    let rows: Vec<serde_json::Value> = ordered(stats, order)
        .into_iter()
        .map(|bucket| {
            let mut row = json!({
                label: bucket.period,
                "charges": bucket.count,
                "kwh": bucket.kwh,
                "cost": bucket.cost,
                "slow": totals_json(&bucket.slow),
                "fast": totals_json(&bucket.fast),
                "distance_km": bucket.distance,
                "kwh_per_100km": opt_json_value(bucket.consumption_kwh_100km),
                "cost_per_100km": opt_json_value(bucket.cost_per_100km),
                "gasoline_cost": opt_json_value(bucket.gasoline_cost),
                "savings": opt_json_value(bucket.savings),
                "co2_saved_kg": opt_json_value(bucket.co2_saved_kg),
            });
            if breakdown {
                let tariffs: serde_json::Map<String, serde_json::Value> = bucket
                    .tariffs
                    .iter()
                    .map(|(tariff, totals)| (tariff.label().to_string(), totals_json(totals)))
                    .collect();
                row["tariffs"] = serde_json::Value::Object(tariffs);
            }
            row
        })
        .collect();
    serde_json::to_string_pretty(&rows).unwrap_or_default()
}

pub(crate) fn trip_json(stats: &[TripPeriodStats], period: Period, order: SortOrder) -> String {
    let label = period.label();
    let rows: Vec<serde_json::Value> = ordered(stats, order)
        .into_iter()
        .map(|bucket| {
            json!({
                label: bucket.period,
                "trips": bucket.count,
                "distance_km": bucket.distance,
                "cost": bucket.cost,
                "savings": bucket.savings,
                "billed": bucket.billed,
            })
        })
        .collect();
    serde_json::to_string_pretty(&rows).unwrap_or_default()
}

pub(crate) fn client_json(stats: &[ClientStats]) -> String {
    let rows: Vec<serde_json::Value> = stats
        .iter()
        .map(|row| {
            json!({
                "client": row.client,
                "trips": row.count,
                "distance_km": row.distance,
                "billed": row.billed,
            })
        })
        .collect();
    serde_json::to_string_pretty(&rows).unwrap_or_default()
}

pub(crate) fn destination_json(stats: &[DestinationStats]) -> String {
    let rows: Vec<serde_json::Value> = stats
        .iter()
        .map(|row| {
            json!({
                "destination": row.destination,
                "trips": row.count,
                "distance_km": row.distance,
                "avg_distance_km": row.avg_distance,
            })
        })
        .collect();
    serde_json::to_string_pretty(&rows).unwrap_or_default()
}
