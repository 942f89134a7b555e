//! One-call recompute pass for callers that run the whole engine after an
//! activity change. Nothing here is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::EngineConfig;
use crate::goals::{sync_snapshot_goals, GoalSyncOutcome};
use crate::models::StudentSnapshot;
use crate::scoring::{
    calculate_readiness_score, detect_score_change, record_score, ScoreChange, ScoreHistoryEntry,
    ScoreResult,
};
use crate::streak::{calculate_streak_with_offset, StreakResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentMetrics {
    pub score: ScoreResult,
    pub streak: StreakResult,
    /// Present when the score moved enough to be worth surfacing.
    pub score_change: Option<ScoreChange>,
    pub score_history: Vec<ScoreHistoryEntry>,
    pub goals: GoalSyncOutcome,
}

/// Recomputes streak, readiness score and goal progress for one student.
///
/// The fresh streak feeds the score's streak bonus, and the score is compared
/// against the snapshot's stored `readiness_score`.
pub fn refresh_student(
    snapshot: &StudentSnapshot,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> StudentMetrics {
    let streak = calculate_streak_with_offset(snapshot, now, config.day_offset());

    let current = StudentSnapshot {
        streak_days: streak.streak_days,
        last_active_at: streak.last_active_at.or(snapshot.last_active_at),
        ..snapshot.clone()
    };

    let score = calculate_readiness_score(Some(&current), now, config.recent_window_days);
    let score_change = detect_score_change(snapshot.readiness_score, score.total);
    let score_history = record_score(
        &snapshot.score_history,
        &score,
        now,
        config.score_history_cap,
    );
    let goals = sync_snapshot_goals(&current, now);

    info!(
        score = score.total,
        streak_days = streak.streak_days,
        goals_changed = goals.changes.len(),
        "Refreshed student metrics"
    );

    StudentMetrics {
        score,
        streak,
        score_change,
        score_history,
        goals,
    }
}
