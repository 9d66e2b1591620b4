use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Period {
    Weekly,
    Monthly,
    Yearly,
}

impl Period {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Period::Weekly => "week",
            Period::Monthly => "month",
            Period::Yearly => "year",
        }
    }
}

/// Bucket key for a date. Keys sort lexicographically in chronological order:
/// `YYYY-Www` (ISO-8601 week, zero-padded, ISO week-year), `YYYY-MM`, `YYYY`.
pub(crate) fn period_key(date: NaiveDate, period: Period) -> String {
    match period {
        Period::Weekly => {
            let iso = date.iso_week();
            format!("{}-W{:02}", iso.year(), iso.week())
        }
        Period::Monthly => date.format("%Y-%m").to_string(),
        Period::Yearly => date.format("%Y").to_string(),
    }
}
