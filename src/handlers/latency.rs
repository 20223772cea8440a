use axum::{extract::State, Json};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::stats::{self, RegionStats};
use crate::AppState;

use super::{AppError, ValidJson};

// ─── Request / response types ────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct Query {
    /// Regions to report on; may be empty or contain duplicates
    pub regions: Vec<String>,
    /// A latency strictly above this counts as a breach
    pub threshold_ms: f64,
}

#[derive(Debug, Serialize)]
pub struct LatencyResponse {
    pub results: IndexMap<String, RegionStats>,
}

// ─── POST /api/latency ───────────────────────────────────────────

pub async fn latency_check(
    State(state): State<Arc<AppState>>,
    ValidJson(query): ValidJson<Query>,
) -> Result<Json<LatencyResponse>, AppError> {
    let records = state.telemetry.load().await?;

    let results = stats::aggregate(&records, &query.regions, query.threshold_ms);
    tracing::debug!(
        regions = query.regions.len(),
        records = records.len(),
        threshold_ms = query.threshold_ms,
        "latency aggregated"
    );

    Ok(Json(LatencyResponse { results }))
}
