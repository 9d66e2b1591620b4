use chrono::NaiveDate;

use crate::consts::DATE_FORMAT;
use crate::error::AppError;

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    // Try YYYYMMDD
    if s.len() == 8
        && let Ok(d) = NaiveDate::parse_from_str(s, "%Y%m%d")
    {
        return Ok(d);
    }
    // Try YYYY-MM-DD
    if let Ok(d) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Ok(d);
    }
    Err(AppError::InvalidDate {
        input: s.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(parse_date("20250115").unwrap(), expected);
        assert_eq!(parse_date("2025-01-15").unwrap(), expected);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_date("abc").is_err());
        assert!(parse_date("2025-13-01").is_err());
        assert!(parse_date("20251301").is_err());
    }
}
