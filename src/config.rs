use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::core::{Settings, Vehicle};

/// Per-tariff grid prices and the gasoline reference, in €.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PricingConfig {
    pub(crate) peak: f64,
    pub(crate) off_peak: f64,
    pub(crate) tempo_blue_peak: f64,
    pub(crate) tempo_blue_off_peak: f64,
    pub(crate) tempo_white_peak: f64,
    pub(crate) tempo_white_off_peak: f64,
    pub(crate) tempo_red_peak: f64,
    pub(crate) tempo_red_off_peak: f64,
    pub(crate) gasoline_price_per_liter: f64,
    pub(crate) gasoline_consumption_per_100km: f64,
}

/// Flat billing rates for the short and medium trip tiers.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct BillingConfig {
    pub(crate) local: f64,
    pub(crate) medium: f64,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) vehicle: Option<Vehicle>,
    #[serde(default)]
    pub(crate) pricing: PricingConfig,
    #[serde(default)]
    pub(crate) billing: BillingConfig,
    /// Directory holding charges*.csv and trips*.csv
    #[serde(default)]
    pub(crate) data_dir: Option<PathBuf>,
}

impl Config {
    pub(crate) fn load() -> Self {
        for path in Self::config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match toml::from_str::<Config>(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                    }
                }
            }
        }
        Self::default()
    }

    pub(crate) fn load_from(path: &PathBuf) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<Config>(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/evstats/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("evstats").join("config.toml"));
        }

        // 2. Platform config dir (differs from the above on macOS/Windows)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("evstats").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.evstats.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".evstats.toml"));
        }

        paths
    }

    /// Flatten the pricing and billing blocks into the engine's settings.
    pub(crate) fn settings(&self) -> Settings {
        Settings {
            price_peak: self.pricing.peak,
            price_off_peak: self.pricing.off_peak,
            price_tempo_blue_peak: self.pricing.tempo_blue_peak,
            price_tempo_blue_off_peak: self.pricing.tempo_blue_off_peak,
            price_tempo_white_peak: self.pricing.tempo_white_peak,
            price_tempo_white_off_peak: self.pricing.tempo_white_off_peak,
            price_tempo_red_peak: self.pricing.tempo_red_peak,
            price_tempo_red_off_peak: self.pricing.tempo_red_off_peak,
            gasoline_consumption: self.pricing.gasoline_consumption_per_100km,
            gasoline_price: self.pricing.gasoline_price_per_liter,
            billing_rate_local: self.billing.local,
            billing_rate_medium: self.billing.medium,
        }
    }
}
