//! Conversion of loosely typed store rows into canonical readings and predictions.
//!
//! Store rows arrive as JSON objects whose fields may be missing, `null`,
//! numbers, or numeric strings. Nothing optional leaves this module: missing
//! numbers become `0.0` and a missing timestamp becomes the caller's fallback.

use crate::models::{Prediction, Reading};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};

/// One row as returned by the store
pub type RawRecord = Map<String, Value>;

pub const VOLTAGE_DECIMALS: i32 = 2;
pub const CURRENT_DECIMALS: i32 = 4;
pub const POWER_DECIMALS: i32 = 4;
pub const TOTAL_KWH_DECIMALS: i32 = 6;

const READING_NUMERIC_FIELDS: [&str; 4] = ["voltage", "current", "power", "total_kwh"];
const READING_TIME_FIELD: &str = "time";

const PREDICTION_NUMERIC_FIELDS: [&str; 2] = ["predicted_kwh", "predicted_bill"];
const PREDICTION_TIME_FIELD: &str = "created_at";

/// Round the exact decimal value of `value` to `places` decimals.
///
/// Exact midpoints go away from zero. Values whose scaled form would overflow
/// come back unchanged.
pub fn round_to(value: f64, places: i32) -> f64 {
    let places = places.max(0);
    let factor = 10f64.powi(places);
    if !value.is_finite() || !(value * factor).is_finite() {
        return value;
    }

    // A double sits exactly on a midpoint iff value * 2^(places + 1) is an odd integer
    let halves = value.abs() * 2f64.powi(places + 1);
    if halves.fract() == 0.0 && halves % 2.0 == 1.0 {
        return (value * factor).round() / factor;
    }

    format!("{:.*}", places as usize, value)
        .parse()
        .unwrap_or(value)
}

pub fn normalize_reading(record: &RawRecord, fallback_time: DateTime<Utc>) -> Reading {
    Reading {
        voltage: round_to(number_field(record, "voltage"), VOLTAGE_DECIMALS),
        current: round_to(number_field(record, "current"), CURRENT_DECIMALS),
        power: round_to(number_field(record, "power"), POWER_DECIMALS),
        total_kwh: round_to(number_field(record, "total_kwh"), TOTAL_KWH_DECIMALS),
        timestamp: time_field(record, READING_TIME_FIELD).unwrap_or(fallback_time),
    }
}

/// Predictions keep full precision; rounding happens when chart series are built
pub fn normalize_prediction(record: &RawRecord, fallback_time: DateTime<Utc>) -> Prediction {
    Prediction {
        created_at: time_field(record, PREDICTION_TIME_FIELD).unwrap_or(fallback_time),
        predicted_kwh: number_field(record, "predicted_kwh"),
        predicted_bill: number_field(record, "predicted_bill"),
    }
}

/// Names of reading fields that had to be defaulted
pub fn defaulted_reading_fields(record: &RawRecord) -> Vec<&'static str> {
    defaulted_fields(record, &READING_NUMERIC_FIELDS, READING_TIME_FIELD)
}

/// Names of prediction fields that had to be defaulted
pub fn defaulted_prediction_fields(record: &RawRecord) -> Vec<&'static str> {
    defaulted_fields(record, &PREDICTION_NUMERIC_FIELDS, PREDICTION_TIME_FIELD)
}

fn defaulted_fields(
    record: &RawRecord,
    numeric: &[&'static str],
    time: &'static str,
) -> Vec<&'static str> {
    let mut missing: Vec<&'static str> = numeric
        .iter()
        .copied()
        .filter(|key| parse_number(record.get(*key)).is_none())
        .collect();

    if time_field(record, time).is_none() {
        missing.push(time);
    }

    missing
}

fn number_field(record: &RawRecord, key: &str) -> f64 {
    parse_number(record.get(key)).unwrap_or(0.0)
}

fn parse_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    number.is_finite().then_some(number)
}

fn time_field(record: &RawRecord, key: &str) -> Option<DateTime<Utc>> {
    match record.get(key)? {
        Value::String(s) => parse_timestamp(s),
        _ => None,
    }
}

/// Accepts RFC 3339, Postgres `timestamptz` text, and naive ISO-8601 (read as UTC)
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    None
}
