/// Standard date format used throughout the codebase: "2025-01-15"
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Grid-to-battery conversion loss factor for AC charging (12%)
pub(crate) const AC_LOSS_FACTOR: f64 = 1.12;

/// Kilograms of CO2 avoided per liter of gasoline not burned
pub(crate) const CO2_KG_PER_LITER: f64 = 2.31;

/// Label used when a trip has no client recorded
pub(crate) const UNSPECIFIED_CLIENT: &str = "unspecified";

/// Trips strictly shorter than this are billed at the flat local rate (km)
pub(crate) const BILLING_LOCAL_MAX_KM: f64 = 11.0;

/// Trips up to this distance are billed at the flat medium rate (km)
pub(crate) const BILLING_MEDIUM_MAX_KM: f64 = 30.0;

/// Fiscal power assumed when the vehicle does not declare one
pub(crate) const DEFAULT_FISCAL_POWER: i32 = 4;
