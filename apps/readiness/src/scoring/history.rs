use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::factor::ScoreResult;
use crate::models::lenient;

/// One past readiness calculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreHistoryEntry {
    #[serde(deserialize_with = "lenient::count")]
    pub score: u32,
    #[serde(deserialize_with = "lenient::score_map")]
    pub breakdown: BTreeMap<String, f64>,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub calculated_at: Option<DateTime<Utc>>,
}

/// Appends `result` to `history`, keeping only the newest `cap` entries.
/// The input history is left untouched.
pub fn record_score(
    history: &[ScoreHistoryEntry],
    result: &ScoreResult,
    now: DateTime<Utc>,
    cap: usize,
) -> Vec<ScoreHistoryEntry> {
    let cap = cap.max(1);
    let keep = history.len().saturating_sub(cap - 1);

    let mut updated = Vec::with_capacity(cap.min(history.len() + 1));
    updated.extend_from_slice(&history[keep..]);
    updated.push(ScoreHistoryEntry {
        score: result.total,
        breakdown: result.breakdown.clone(),
        calculated_at: Some(now),
    });
    updated
}
