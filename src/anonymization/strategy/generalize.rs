//! Generalization strategy
//!
//! Replaces a value with a coarser one. Each [`GeneralizeParams`] family has
//! its own transform:
//!
//! - numeric binning into `"{start}-{end}"` ranges
//! - digit/octet precision masking
//! - calendar truncation of dates
//! - address hierarchy reduction
//! - IPv4 octet zeroing

use crate::anonymization::rules::{AddressLevel, DateGranularity, GeneralizeParams};
use crate::domain::{Result, Value, VeilError};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use std::net::Ipv4Addr;

/// Output when an address has no component at the requested level
pub const REDACTED_ADDRESS: &str = "[REDACTED]";

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Generalizes a non-null value
///
/// # Errors
///
/// Returns a strategy error when numeric binning gets a non-numeric value or
/// octet generalization gets something other than an IPv4 address. Dates that
/// cannot be parsed are returned unchanged.
pub fn generalize(value: &Value, params: &GeneralizeParams) -> Result<Value> {
    let text = value.canonical().unwrap_or_default();

    let output = match params {
        GeneralizeParams::NumericBin {
            bin_size,
            min_value,
            max_value,
        } => {
            let number = value.as_f64().filter(|n| n.is_finite()).ok_or_else(|| {
                VeilError::strategy("numeric binning requires numeric values")
            })?;
            bin_numeric(number, *bin_size, *min_value, *max_value)
        }
        GeneralizeParams::Precision { precision } => reduce_precision(&text, *precision),
        GeneralizeParams::Granularity(granularity) => truncate_date(&text, *granularity),
        GeneralizeParams::Level(level) => reduce_address(&text, *level),
        GeneralizeParams::Octets(octets) => {
            let addr: Ipv4Addr = text.trim().parse().map_err(|_| {
                VeilError::strategy("octet generalization requires IPv4 addresses")
            })?;
            zero_octets(addr, *octets)
        }
    };

    Ok(Value::Text(output))
}

/// Maps a number onto its `"{start}-{end}"` bin within `[min_value, max_value]`
///
/// Out-of-range input is clamped. The bin containing `max_value` always ends
/// at `max_value`, and no bin extends past either bound.
///
/// # Examples
///
/// ```
/// use veil::anonymization::strategy::generalize::bin_numeric;
///
/// assert_eq!(bin_numeric(34.0, 10, 0, 100), "30-39");
/// assert_eq!(bin_numeric(150.0, 10, 0, 100), "91-100");
/// ```
pub fn bin_numeric(value: f64, bin_size: i64, min_value: i64, max_value: i64) -> String {
    let clamped = value.clamp(min_value as f64, max_value as f64);
    // Bounds math in i128 so a bin_size near i64::MAX cannot overflow
    let (min, max, size) = (
        i128::from(min_value),
        i128::from(max_value),
        i128::from(bin_size),
    );

    let (start, end) = if clamped >= max_value as f64 {
        ((max - size + 1).max(min), max)
    } else {
        let index = ((clamped - min_value as f64) / bin_size as f64).floor() as i128;
        let start = (min + index.saturating_mul(size)).clamp(min, max);
        (start, (start + size - 1).min(max))
    };

    format!("{start}-{end}")
}

/// Keeps the first `precision` significant characters and masks the rest
///
/// IPv4 addresses keep whole octets (at most four). Other values keep the
/// first `precision` alphanumeric characters; later alphanumerics become `*`
/// and separators are kept as they are.
pub fn reduce_precision(input: &str, precision: usize) -> String {
    if let Ok(addr) = input.trim().parse::<Ipv4Addr>() {
        let keep = precision.min(4);
        return addr
            .octets()
            .iter()
            .enumerate()
            .map(|(idx, octet)| {
                if idx < keep {
                    octet.to_string()
                } else {
                    "*".to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(".");
    }

    let mut kept = 0;
    input
        .chars()
        .map(|c| {
            if !c.is_alphanumeric() {
                c
            } else if kept < precision {
                kept += 1;
                c
            } else {
                '*'
            }
        })
        .collect()
}

/// Truncates a date to a calendar boundary, passing unparseable input through
pub fn truncate_date(input: &str, granularity: DateGranularity) -> String {
    let Some(date) = parse_date(input.trim()) else {
        return input.to_string();
    };

    match granularity {
        DateGranularity::Day => date.format("%Y-%m-%d").to_string(),
        DateGranularity::Week => {
            let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
            monday.format("%Y-%m-%d").to_string()
        }
        DateGranularity::Month => date.format("%Y-%m").to_string(),
        DateGranularity::Quarter => format!("{}-Q{}", date.year(), (date.month() - 1) / 3 + 1),
        DateGranularity::Year => date.year().to_string(),
    }
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        })
}

/// Reduces a comma-separated `street, city, state, country` address
///
/// Tokens containing digits are dropped at every level except
/// [`AddressLevel::Full`]. Components are aligned from the left after that.
pub fn reduce_address(input: &str, level: AddressLevel) -> String {
    let index = match level {
        AddressLevel::Full => return input.to_string(),
        AddressLevel::Street => 0,
        AddressLevel::City => 1,
        AddressLevel::State => 2,
        AddressLevel::Country => 3,
    };

    let parts: Vec<String> = input
        .split(',')
        .map(|part| {
            part.split_whitespace()
                .filter(|token| !token.chars().any(|c| c.is_ascii_digit()))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|part| !part.is_empty())
        .collect();

    match level {
        AddressLevel::Country => parts
            .get(index)
            .cloned()
            .unwrap_or_else(|| REDACTED_ADDRESS.to_string()),
        _ if parts.len() > index => parts[index..].join(", "),
        _ => REDACTED_ADDRESS.to_string(),
    }
}

/// Keeps the first `octets` octets of an IPv4 address and zeros the rest
pub fn zero_octets(addr: Ipv4Addr, octets: u8) -> String {
    let keep = usize::from(octets.min(4));
    let mut parts = addr.octets();
    for octet in parts.iter_mut().skip(keep) {
        *octet = 0;
    }
    Ipv4Addr::from(parts).to_string()
}
