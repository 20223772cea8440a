pub mod loader;

pub use loader::{load_telemetry, TelemetrySource};

use std::path::PathBuf;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

/// One flat measurement entry from the telemetry file.
///
/// Decoding is permissive: unknown keys are ignored, a missing or
/// non-string `region` leaves the record unassigned, and numeric fields
/// that are missing, null or unparseable fall back to `0.0`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TelemetryRecord {
    #[serde(default, deserialize_with = "lenient_region")]
    pub region: Option<String>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub latency_ms: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub uptime_pct: f64,
}

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("telemetry file not found on server ({})", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read telemetry file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("telemetry file {} is not a valid record array: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn lenient_region<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce_f64(&Value::deserialize(deserializer)?))
}

fn coerce_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> TelemetryRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn decodes_well_formed_record() {
        let r = decode(r#"{"region":"us-east","latency_ms":120.5,"uptime_pct":99.9}"#);
        assert_eq!(r.region.as_deref(), Some("us-east"));
        assert_eq!(r.latency_ms, 120.5);
        assert_eq!(r.uptime_pct, 99.9);
    }

    #[test]
    fn missing_and_null_numbers_become_zero() {
        let r = decode(r#"{"region":"eu-west","latency_ms":null}"#);
        assert_eq!(r.latency_ms, 0.0);
        assert_eq!(r.uptime_pct, 0.0);
    }

    #[test]
    fn integer_and_numeric_string_values_are_accepted() {
        let r = decode(r#"{"region":"a","latency_ms":200,"uptime_pct":" 98.5 "}"#);
        assert_eq!(r.latency_ms, 200.0);
        assert_eq!(r.uptime_pct, 98.5);
    }

    #[test]
    fn garbage_numbers_fall_back_to_zero() {
        let r = decode(r#"{"region":"a","latency_ms":"fast","uptime_pct":[1,2]}"#);
        assert_eq!(r.latency_ms, 0.0);
        assert_eq!(r.uptime_pct, 0.0);
    }

    #[test]
    fn booleans_count_as_one_and_zero() {
        let r = decode(r#"{"region":"a","latency_ms":true,"uptime_pct":false}"#);
        assert_eq!(r.latency_ms, 1.0);
        assert_eq!(r.uptime_pct, 0.0);
    }

    #[test]
    fn non_string_region_is_unassigned_and_extra_keys_ignored() {
        let r = decode(r#"{"region":42,"latency_ms":1,"host":"db-1","tags":{"a":1}}"#);
        assert_eq!(r.region, None);
        assert_eq!(r.latency_ms, 1.0);
    }

    #[test]
    fn not_found_message_names_the_path() {
        let err = TelemetryError::NotFound {
            path: PathBuf::from("data/telemetry.json"),
        };
        assert_eq!(
            err.to_string(),
            "telemetry file not found on server (data/telemetry.json)"
        );
    }
}
