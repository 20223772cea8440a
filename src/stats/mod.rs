pub mod percentiles;

pub use percentiles::{percentile, percentile_95};

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::telemetry::TelemetryRecord;

/// Statistics for one requested region. The averages and p95 are `None`
/// (serialized as `null`) when the region has no records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionStats {
    pub avg_latency: Option<f64>,
    pub p95_latency: Option<f64>,
    pub avg_uptime: Option<f64>,
    pub breaches: u64,
}

impl RegionStats {
    /// Entry for a region absent from the telemetry set.
    pub fn no_data() -> Self {
        Self {
            avg_latency: None,
            p95_latency: None,
            avg_uptime: None,
            breaches: 0,
        }
    }

    fn from_records(records: &[&TelemetryRecord], threshold_ms: f64) -> Self {
        if records.is_empty() {
            return Self::no_data();
        }

        let latencies: Vec<f64> = records.iter().map(|r| r.latency_ms).collect();
        let uptimes: Vec<f64> = records.iter().map(|r| r.uptime_pct).collect();
        let breaches = latencies.iter().filter(|&&v| v > threshold_ms).count() as u64;

        Self {
            avg_latency: Some(round3(mean(&latencies))),
            p95_latency: Some(round3(percentile_95(&latencies))),
            avg_uptime: Some(round3(mean(&uptimes))),
            breaches,
        }
    }
}

/// Build one entry per requested region, keyed in first-request order.
/// Region matching is exact and case-sensitive; duplicates collapse.
pub fn aggregate(
    records: &[TelemetryRecord],
    regions: &[String],
    threshold_ms: f64,
) -> IndexMap<String, RegionStats> {
    let mut by_region: HashMap<&str, Vec<&TelemetryRecord>> = HashMap::new();
    for record in records {
        if let Some(region) = record.region.as_deref() {
            by_region.entry(region).or_default().push(record);
        }
    }

    let mut out = IndexMap::with_capacity(regions.len());
    for region in regions {
        if out.contains_key(region) {
            continue;
        }
        let stats = by_region
            .get(region.as_str())
            .map(|group| RegionStats::from_records(group, threshold_ms))
            .unwrap_or_else(RegionStats::no_data);
        out.insert(region.clone(), stats);
    }
    out
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Round to 3 decimal places from the exact binary value, exact ties to
/// even. Magnitudes of 1e15 and up carry no fractional digits and are
/// returned as is, as are non-finite values.
pub fn round3(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= 1e15 {
        return value;
    }
    format!("{value:.3}").parse().unwrap_or(value)
}
