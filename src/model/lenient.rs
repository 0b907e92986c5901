//! Forgiving field deserializers for ingest payloads.
//!
//! Exported ad-platform reports write money as `"$1,892.00"`, leave cells
//! empty, and mix date layouts. These helpers accept all of that and still
//! reject values that are genuinely unreadable.

use chrono::NaiveDate;
use serde::de::Error;
use serde::{Deserialize, Deserializer};

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y"];

#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrText {
    Num(f64),
    Text(String),
}

/// Parses a number that may carry currency symbols, thousands separators or a percent sign.
/// Blank input reads as zero.
pub fn parse_number(raw: &str) -> Result<f64, String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%' | ' ' | '₹' | '€' | '£'))
        .collect();
    if cleaned.is_empty() {
        return Ok(0.0);
    }
    cleaned
        .parse::<f64>()
        .map_err(|_| format!("not a number: {raw:?}"))
}

/// Parses a date in any of the layouts seen in exported reports. A trailing
/// time component (`2024-11-16 00:00:00`, `2024-11-16T08:00`) is ignored.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().split(['T', ' ']).next().unwrap_or_default();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(day, fmt).ok())
}

pub fn f64_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    match Option::<NumOrText>::deserialize(d)? {
        None => Ok(0.0),
        Some(NumOrText::Num(n)) => Ok(n),
        Some(NumOrText::Text(s)) => parse_number(&s).map_err(D::Error::custom),
    }
}

pub fn i64_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    let value = f64_or_zero(d)?;
    if !value.is_finite() {
        return Err(D::Error::custom("count is not finite"));
    }
    // `as` saturates, so anything outside the i64 range would silently become i64::MIN/MAX
    if value.abs() >= i64::MAX as f64 {
        return Err(D::Error::custom(format!("count out of range: {value}")));
    }
    Ok(value.trunc() as i64)
}

pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(d)?;
    Ok(value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

pub fn opt_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    match opt_string(d)? {
        None => Ok(None),
        Some(s) => parse_date(&s)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("unrecognised date: {s:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_strips_report_formatting() {
        assert_eq!(parse_number("$1,892.00").unwrap(), 1892.0);
        assert_eq!(parse_number(" 12.5% ").unwrap(), 12.5);
        assert_eq!(parse_number("").unwrap(), 0.0);
        assert!(parse_number("n/a").is_err());
    }

    #[derive(Debug, Deserialize)]
    struct Counter {
        #[serde(deserialize_with = "i64_or_zero")]
        n: i64,
    }

    #[test]
    fn test_counts_outside_i64_are_rejected() {
        let ok: Counter = serde_json::from_str(r#"{"n": "1,204"}"#).unwrap();
        assert_eq!(ok.n, 1204);
        assert!(serde_json::from_str::<Counter>(r#"{"n": 1e30}"#).is_err());
        assert!(serde_json::from_str::<Counter>(r#"{"n": "-1e19"}"#).is_err());
    }

    #[test]
    fn test_parse_date_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 11, 16).unwrap();
        assert_eq!(parse_date("2024-11-16"), Some(expected));
        assert_eq!(parse_date("2024/11/16"), Some(expected));
        assert_eq!(parse_date("16-11-2024"), Some(expected));
        assert_eq!(parse_date("16/11/2024"), Some(expected));
        assert_eq!(parse_date("2024-11-16 00:00:00"), Some(expected));
        assert_eq!(parse_date("yesterday"), None);
    }
}
