//! Charging tariff kinds and price resolution
//!
//! Every charge is recorded under one tariff; the tariff decides both the
//! applicable grid price and whether the 12% AC conversion loss applies.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::types::Settings;

/// Closed set of charging tariffs. The Tempo variants mirror the EDF Tempo
/// color/period grid; `QuickCharge` is DC fast charging billed per session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum Tariff {
    Peak,
    OffPeak,
    TempoBluePeak,
    TempoBlueOffPeak,
    TempoWhitePeak,
    TempoWhiteOffPeak,
    TempoRedPeak,
    TempoRedOffPeak,
    FreeCharge,
    QuickCharge,
}

impl Tariff {
    /// AC wall-outlet tariffs lose 12% between grid and battery.
    /// DC fast charging meters delivered energy directly.
    pub(crate) fn is_ac(self) -> bool {
        match self {
            Tariff::Peak
            | Tariff::OffPeak
            | Tariff::TempoBluePeak
            | Tariff::TempoBlueOffPeak
            | Tariff::TempoWhitePeak
            | Tariff::TempoWhiteOffPeak
            | Tariff::TempoRedPeak
            | Tariff::TempoRedOffPeak
            | Tariff::FreeCharge => true,
            Tariff::QuickCharge => false,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Tariff::Peak => "peak",
            Tariff::OffPeak => "off-peak",
            Tariff::TempoBluePeak => "tempo-blue-peak",
            Tariff::TempoBlueOffPeak => "tempo-blue-off-peak",
            Tariff::TempoWhitePeak => "tempo-white-peak",
            Tariff::TempoWhiteOffPeak => "tempo-white-off-peak",
            Tariff::TempoRedPeak => "tempo-red-peak",
            Tariff::TempoRedOffPeak => "tempo-red-off-peak",
            Tariff::FreeCharge => "free-charge",
            Tariff::QuickCharge => "quick-charge",
        }
    }

    /// Parse a tariff label from an imported file. Accepts the canonical
    /// kebab-case labels plus the spellings common in exported logbooks
    /// (spaces, French EDF shorthand). Input is expected pre-folded
    /// (lowercase, diacritics stripped).
    pub(crate) fn parse_label(folded: &str) -> Option<Tariff> {
        let t = match folded {
            "peak" | "hp" | "heures pleines" => Tariff::Peak,
            "off-peak" | "off peak" | "offpeak" | "hc" | "heures creuses" => Tariff::OffPeak,
            "tempo-blue-peak" | "tempo blue peak" | "tempo bleu hp" => Tariff::TempoBluePeak,
            "tempo-blue-off-peak" | "tempo blue off-peak" | "tempo blue off peak"
            | "tempo bleu hc" => Tariff::TempoBlueOffPeak,
            "tempo-white-peak" | "tempo white peak" | "tempo blanc hp" => Tariff::TempoWhitePeak,
            "tempo-white-off-peak" | "tempo white off-peak" | "tempo white off peak"
            | "tempo blanc hc" => Tariff::TempoWhiteOffPeak,
            "tempo-red-peak" | "tempo red peak" | "tempo rouge hp" => Tariff::TempoRedPeak,
            "tempo-red-off-peak" | "tempo red off-peak" | "tempo red off peak"
            | "tempo rouge hc" => Tariff::TempoRedOffPeak,
            "free-charge" | "free charge" | "free" | "gratuit" => Tariff::FreeCharge,
            "quick-charge" | "quick charge" | "quick" | "fast" | "dc" | "rapide" => {
                Tariff::QuickCharge
            }
            _ => return None,
        };
        Some(t)
    }
}

/// Resolve the effective price per kWh for a charge.
///
/// Priority: free charging is always 0; a price snapshotted on the record at
/// creation time wins over current settings; quick charging is billed at the
/// record's custom price (0 when missing); everything else reads the settings
/// price for its tariff kind.
pub(crate) fn resolve_price(
    tariff: Tariff,
    snapshot: Option<f64>,
    custom_price: Option<f64>,
    settings: &Settings,
) -> f64 {
    if tariff == Tariff::FreeCharge {
        return 0.0;
    }
    if let Some(price) = snapshot {
        return price;
    }
    match tariff {
        Tariff::Peak => settings.price_peak,
        Tariff::OffPeak => settings.price_off_peak,
        Tariff::TempoBluePeak => settings.price_tempo_blue_peak,
        Tariff::TempoBlueOffPeak => settings.price_tempo_blue_off_peak,
        Tariff::TempoWhitePeak => settings.price_tempo_white_peak,
        Tariff::TempoWhiteOffPeak => settings.price_tempo_white_off_peak,
        Tariff::TempoRedPeak => settings.price_tempo_red_peak,
        Tariff::TempoRedOffPeak => settings.price_tempo_red_off_peak,
        Tariff::QuickCharge => custom_price.unwrap_or(0.0),
        Tariff::FreeCharge => 0.0,
    }
}
