//! Core data types for the derivation engine
//!
//! Raw records come from the import layer; processed records and stat rows
//! are derived in full on every invocation and never persisted.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;

use super::tariff::Tariff;

/// Round to 2 decimals. Applied to every currency/energy figure at the point
/// of computation, not at display time.
pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Round to 0 decimals. Applied to distances.
pub(crate) fn round0(v: f64) -> f64 {
    v.round()
}

/// Vehicle configuration. Immutable input to every computation pass.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Vehicle {
    #[serde(default)]
    pub(crate) name: Option<String>,
    /// Usable battery capacity in kWh
    pub(crate) battery_kwh: f64,
    /// Tax-horsepower rating, drives the long-distance billing rate tier
    #[serde(default)]
    pub(crate) fiscal_power: Option<i32>,
}

/// Pricing and billing settings. Immutable input to every computation pass.
#[derive(Debug, Clone, Default)]
pub(crate) struct Settings {
    pub(crate) price_peak: f64,
    pub(crate) price_off_peak: f64,
    pub(crate) price_tempo_blue_peak: f64,
    pub(crate) price_tempo_blue_off_peak: f64,
    pub(crate) price_tempo_white_peak: f64,
    pub(crate) price_tempo_white_off_peak: f64,
    pub(crate) price_tempo_red_peak: f64,
    pub(crate) price_tempo_red_off_peak: f64,
    /// Reference gasoline consumption in L/100km, 0 disables the comparison
    pub(crate) gasoline_consumption: f64,
    /// Gasoline price per liter, 0 disables the comparison
    pub(crate) gasoline_price: f64,
    pub(crate) billing_rate_local: f64,
    pub(crate) billing_rate_medium: f64,
}

impl Settings {
    /// Gasoline comparison figures are only derived when both reference
    /// values are configured.
    pub(crate) fn has_gasoline_reference(&self) -> bool {
        self.gasoline_consumption > 0.0 && self.gasoline_price > 0.0
    }
}

/// A raw charging session as logged by the user. A session may be left in
/// progress (no end percentage or tariff yet) and completed later; only
/// completed sessions participate in derivation.
#[derive(Debug, Clone)]
pub(crate) struct Charge {
    pub(crate) id: u64,
    pub(crate) date: NaiveDate,
    pub(crate) odometer: f64,
    pub(crate) start_percent: f64,
    pub(crate) end_percent: Option<f64>,
    pub(crate) tariff: Option<Tariff>,
    /// Per-session price for variable-price tariffs (quick charging)
    pub(crate) custom_price: Option<f64>,
    /// Price per kWh snapshotted when the record was created
    pub(crate) price_snapshot: Option<f64>,
    pub(crate) completed: bool,
}

impl Charge {
    pub(crate) fn is_processable(&self) -> bool {
        self.completed && self.end_percent.is_some() && self.tariff.is_some()
    }
}

/// A charge with all derived financial/energy fields. Segment fields
/// (`distance_driven` and the per-100km figures) describe the stretch driven
/// since the previous charge in odometer order and are `None` on the first
/// charge of the sequence.
#[derive(Debug, Clone)]
pub(crate) struct ProcessedCharge {
    pub(crate) id: u64,
    pub(crate) date: NaiveDate,
    pub(crate) odometer: f64,
    pub(crate) tariff: Tariff,
    /// Energy stored in the battery, kWh
    pub(crate) kwh_added: f64,
    /// Energy drawn from the grid (after AC loss), kWh
    pub(crate) kwh_drawn: f64,
    pub(crate) price_per_kwh: f64,
    pub(crate) cost: f64,
    /// Distance the same cost would have covered in the reference gasoline car
    pub(crate) equivalent_km: Option<f64>,
    pub(crate) distance_driven: Option<f64>,
    pub(crate) consumption_kwh_100km: Option<f64>,
    pub(crate) cost_per_100km: Option<f64>,
}

/// A raw business trip as logged by the user.
#[derive(Debug, Clone)]
pub(crate) struct Trip {
    pub(crate) id: u64,
    pub(crate) date: NaiveDate,
    pub(crate) start_odometer: f64,
    pub(crate) end_odometer: Option<f64>,
    pub(crate) start_percent: f64,
    pub(crate) end_percent: Option<f64>,
    pub(crate) destination: String,
    pub(crate) client: Option<String>,
    pub(crate) billed: bool,
    pub(crate) completed: bool,
}

impl Trip {
    pub(crate) fn is_processable(&self) -> bool {
        self.completed && self.end_odometer.is_some() && self.end_percent.is_some()
    }
}

/// A trip with all derived fields. `billing` is `None` when the trip is not
/// billed (or its distance is corrupt), which is distinct from a zero bill.
#[derive(Debug, Clone)]
pub(crate) struct ProcessedTrip {
    pub(crate) id: u64,
    pub(crate) date: NaiveDate,
    pub(crate) destination: String,
    pub(crate) client: Option<String>,
    pub(crate) billed: bool,
    pub(crate) distance: f64,
    pub(crate) kwh_consumed: f64,
    pub(crate) price_per_kwh: f64,
    pub(crate) cost: f64,
    pub(crate) consumption_kwh_100km: f64,
    pub(crate) gasoline_cost: f64,
    pub(crate) savings: f64,
    pub(crate) billing: Option<f64>,
}

/// Energy/cost/count totals for one tariff (or one charging mode) inside a
/// period bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct EnergyTotals {
    pub(crate) kwh: f64,
    pub(crate) cost: f64,
    pub(crate) count: usize,
}

impl EnergyTotals {
    pub(crate) fn add(&mut self, kwh: f64, cost: f64) {
        self.kwh = round2(self.kwh + kwh);
        self.cost = round2(self.cost + cost);
        self.count += 1;
    }
}

/// One period bucket of charge statistics.
#[derive(Debug, Clone, Default)]
pub(crate) struct ChargePeriodStats {
    /// Bucket key: `YYYY-Www`, `YYYY-MM` or `YYYY`
    pub(crate) period: String,
    pub(crate) kwh: f64,
    pub(crate) cost: f64,
    pub(crate) count: usize,
    /// Per-tariff breakdown; BTreeMap keeps output order deterministic
    pub(crate) tariffs: BTreeMap<Tariff, EnergyTotals>,
    /// AC wall-outlet charging subtotal
    pub(crate) slow: EnergyTotals,
    /// Quick-charge subtotal
    pub(crate) fast: EnergyTotals,
    /// Distance fueled by this bucket's charging, attributed via the next
    /// charge in global odometer order
    pub(crate) distance: f64,
    pub(crate) consumption_kwh_100km: Option<f64>,
    pub(crate) cost_per_100km: Option<f64>,
    pub(crate) gasoline_cost: Option<f64>,
    pub(crate) savings: Option<f64>,
    pub(crate) co2_saved_kg: Option<f64>,
}

/// One period bucket of trip statistics.
#[derive(Debug, Clone, Default)]
pub(crate) struct TripPeriodStats {
    pub(crate) period: String,
    pub(crate) count: usize,
    pub(crate) distance: f64,
    pub(crate) cost: f64,
    pub(crate) savings: f64,
    pub(crate) billed: f64,
}

/// Aggregate row for one client.
#[derive(Debug, Clone)]
pub(crate) struct ClientStats {
    pub(crate) client: String,
    pub(crate) count: usize,
    pub(crate) distance: f64,
    pub(crate) billed: f64,
}

/// Aggregate row for one destination.
#[derive(Debug, Clone)]
pub(crate) struct DestinationStats {
    pub(crate) destination: String,
    pub(crate) count: usize,
    pub(crate) distance: f64,
    pub(crate) avg_distance: f64,
}

/// Date filter for display queries
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DateFilter {
    pub(crate) since: Option<NaiveDate>,
    pub(crate) until: Option<NaiveDate>,
}

impl DateFilter {
    pub(crate) fn new(since: Option<NaiveDate>, until: Option<NaiveDate>) -> Self {
        Self { since, until }
    }

    pub(crate) fn contains(&self, date: NaiveDate) -> bool {
        if let Some(s) = self.since
            && date < s
        {
            return false;
        }
        if let Some(u) = self.until
            && date > u
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn round2_half_cents() {
        assert_eq!(round2(1.675), 1.68);
        assert_eq!(round2(5.604), 5.6);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn round0_distances() {
        assert_eq!(round0(299.6), 300.0);
        assert_eq!(round0(300.4), 300.0);
    }

    #[test]
    fn charge_processable_needs_end_and_tariff() {
        let mut charge = Charge {
            id: 1,
            date: d(2025, 1, 1),
            odometer: 10_000.0,
            start_percent: 40.0,
            end_percent: Some(90.0),
            tariff: Some(Tariff::OffPeak),
            custom_price: None,
            price_snapshot: None,
            completed: true,
        };
        assert!(charge.is_processable());

        charge.end_percent = None;
        assert!(!charge.is_processable());

        charge.end_percent = Some(90.0);
        charge.tariff = None;
        assert!(!charge.is_processable());

        charge.tariff = Some(Tariff::OffPeak);
        charge.completed = false;
        assert!(!charge.is_processable());
    }

    #[test]
    fn trip_processable_needs_end_fields() {
        let mut trip = Trip {
            id: 1,
            date: d(2025, 1, 1),
            start_odometer: 100.0,
            end_odometer: Some(150.0),
            start_percent: 80.0,
            end_percent: Some(70.0),
            destination: "Lyon".to_string(),
            client: None,
            billed: false,
            completed: true,
        };
        assert!(trip.is_processable());

        trip.end_odometer = None;
        assert!(!trip.is_processable());
    }

    #[test]
    fn energy_totals_accumulate_rounded() {
        let mut t = EnergyTotals::default();
        t.add(11.2, 1.68);
        t.add(28.0, 5.6);
        assert_eq!(t.kwh, 39.2);
        assert_eq!(t.cost, 7.28);
        assert_eq!(t.count, 2);
    }

    #[test]
    fn date_filter_bounds_inclusive() {
        let f = DateFilter::new(Some(d(2025, 3, 1)), Some(d(2025, 3, 31)));
        assert!(!f.contains(d(2025, 2, 28)));
        assert!(f.contains(d(2025, 3, 1)));
        assert!(f.contains(d(2025, 3, 31)));
        assert!(!f.contains(d(2025, 4, 1)));
    }

    #[test]
    fn date_filter_no_bounds() {
        let f = DateFilter::default();
        assert!(f.contains(d(2020, 1, 1)));
        assert!(f.contains(d(2099, 12, 31)));
    }

    #[test]
    fn gasoline_reference_requires_both_values() {
        let mut s = Settings::default();
        assert!(!s.has_gasoline_reference());
        s.gasoline_consumption = 6.5;
        assert!(!s.has_gasoline_reference());
        s.gasoline_price = 1.85;
        assert!(s.has_gasoline_reference());
    }
}
