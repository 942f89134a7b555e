//! Readiness score over a student's manually-entered and synced activity.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use super::factor::{
    fold_factors, CompositeFactor, Curve, CurveFactor, Rounding, ScoreFactor, ScoreResult,
};
use crate::models::{StudentSnapshot, Trend};

/// What the manual-activity factors read: the snapshot plus the clock they
/// measure "recent" against.
pub struct ScoringContext<'a> {
    pub snapshot: &'a StudentSnapshot,
    pub now: DateTime<Utc>,
    pub recent_window_days: i64,
}

impl ScoringContext<'_> {
    fn recent_logs(&self) -> usize {
        // A window too wide to represent reaches back to every log.
        let since = Duration::try_days(self.recent_window_days)
            .and_then(|window| self.now.checked_sub_signed(window));
        self.snapshot
            .coding_logs
            .iter()
            .filter_map(|log| log.date)
            .filter(|d| since.map_or(true, |start| *d >= start) && *d <= self.now)
            .count()
    }

    fn interview_sessions(&self) -> u32 {
        self.snapshot
            .interview
            .as_ref()
            .map(|i| i.completed_sessions)
            .unwrap_or(0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Signals
// ────────────────────────────────────────────────────────────────────────────

fn project_signal(ctx: &ScoringContext<'_>) -> f64 {
    ctx.snapshot.projects.len() as f64 + 0.5 * ctx.snapshot.verified_projects() as f64
}

fn consistency_signal(ctx: &ScoringContext<'_>) -> f64 {
    let snapshot = ctx.snapshot;
    let synced = [&snapshot.leetcode, &snapshot.hackerrank]
        .into_iter()
        .flatten()
        .map(|stats| stats.recent_activity.last30_days as usize);
    std::iter::once(ctx.recent_logs()).chain(synced).max().unwrap_or(0) as f64
}

fn problems_signal(ctx: &ScoringContext<'_>) -> f64 {
    (ctx.snapshot.logged_problems_solved() + ctx.snapshot.synced_problems_solved()) as f64
}

fn commits_signal(ctx: &ScoringContext<'_>) -> f64 {
    ctx.snapshot.github.as_ref().map_or(0.0, |g| g.total_commits as f64)
}

fn repos_signal(ctx: &ScoringContext<'_>) -> f64 {
    ctx.snapshot.github.as_ref().map_or(0.0, |g| g.public_repos as f64)
}

fn stars_signal(ctx: &ScoringContext<'_>) -> f64 {
    ctx.snapshot.github.as_ref().map_or(0.0, |g| g.total_stars as f64)
}

fn contribution_streak_signal(ctx: &ScoringContext<'_>) -> f64 {
    ctx.snapshot
        .github
        .as_ref()
        .map_or(0.0, |g| g.contribution_streak as f64)
}

fn certification_signal(ctx: &ScoringContext<'_>) -> f64 {
    let snapshot = ctx.snapshot;
    snapshot.certifications.len() as f64
        + 0.5 * snapshot.verified_certifications() as f64
        + snapshot.secondary_platform_certificates() as f64
}

fn event_signal(ctx: &ScoringContext<'_>) -> f64 {
    let podium = ctx.snapshot.events.iter().filter(|e| e.is_podium()).count();
    ctx.snapshot.events.len() as f64 + 0.5 * podium as f64
}

fn diversity_signal(ctx: &ScoringContext<'_>) -> f64 {
    ctx.snapshot.active_platforms().len() as f64
}

fn skill_radar_signal(ctx: &ScoringContext<'_>) -> f64 {
    let values: Vec<f64> = ctx
        .snapshot
        .skill_radar
        .values()
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 100.0))
        .collect();
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn skill_count_signal(ctx: &ScoringContext<'_>) -> f64 {
    ctx.snapshot.skills.len() as f64
}

fn interview_average_signal(ctx: &ScoringContext<'_>) -> f64 {
    match &ctx.snapshot.interview {
        Some(interview) if interview.completed_sessions > 0 => interview.avg_score,
        _ => 0.0,
    }
}

fn interview_sessions_signal(ctx: &ScoringContext<'_>) -> f64 {
    ctx.interview_sessions() as f64
}

fn interview_trend_signal(ctx: &ScoringContext<'_>) -> f64 {
    if ctx.interview_sessions() == 0 {
        return 0.0;
    }
    match ctx.snapshot.interview.as_ref().map(|i| i.recent_trend) {
        Some(Trend::Improving) => 2.0,
        Some(Trend::Stable) => 1.0,
        _ => 0.0,
    }
}

fn streak_signal(ctx: &ScoringContext<'_>) -> f64 {
    ctx.snapshot.streak_days as f64
}

// ────────────────────────────────────────────────────────────────────────────
// Factor table
// ────────────────────────────────────────────────────────────────────────────

/// The manual-activity factors in breakdown order. Caps sum past 100; the
/// fold clamps the total.
#[rustfmt::skip]
pub fn readiness_factors<'a>() -> Vec<Box<dyn ScoreFactor<ScoringContext<'a>> + 'a>> {
    use Curve::{Linear, Ratio, Saturating};

    vec![
        Box::new(CurveFactor::new("projects", 20.0, Saturating { scale: 3.0 }, project_signal)),
        Box::new(CurveFactor::new("codingConsistency", 10.0, Saturating { scale: 8.0 }, consistency_signal)),
        Box::new(CurveFactor::new("problemsSolved", 10.0, Saturating { scale: 80.0 }, problems_signal)),
        Box::new(CompositeFactor::new("github", 15.0, Rounding::Final, vec![
            CurveFactor::new("commits", 6.0, Saturating { scale: 120.0 }, commits_signal),
            CurveFactor::new("repositories", 4.0, Saturating { scale: 4.0 }, repos_signal),
            CurveFactor::new("stars", 2.0, Saturating { scale: 15.0 }, stars_signal),
            CurveFactor::new("contributionStreak", 3.0, Saturating { scale: 10.0 }, contribution_streak_signal),
        ])),
        Box::new(CurveFactor::new("certifications", 15.0, Saturating { scale: 2.5 }, certification_signal)),
        Box::new(CurveFactor::new("events", 10.0, Saturating { scale: 3.0 }, event_signal)),
        Box::new(CurveFactor::new("platformDiversity", 10.0, Saturating { scale: 2.0 }, diversity_signal)),
        Box::new(CurveFactor::new("skillRadar", 10.0, Ratio { max: 100.0 }, skill_radar_signal)),
        Box::new(CurveFactor::new("skillCount", 10.0, Saturating { scale: 5.0 }, skill_count_signal)),
        Box::new(CompositeFactor::new("interviewPractice", 10.0, Rounding::Final, vec![
            CurveFactor::new("averageScore", 6.0, Ratio { max: 100.0 }, interview_average_signal),
            CurveFactor::new("sessions", 2.0, Saturating { scale: 4.0 }, interview_sessions_signal),
            CurveFactor::new("trend", 2.0, Linear { per_unit: 1.0 }, interview_trend_signal),
        ])),
        Box::new(CurveFactor::new("streakBonus", 5.0, Linear { per_unit: 0.5 }, streak_signal)),
    ]
}

/// Manual-activity readiness score. A missing snapshot scores `{0, {}}`.
pub fn calculate_readiness_score(
    snapshot: Option<&StudentSnapshot>,
    now: DateTime<Utc>,
    recent_window_days: i64,
) -> ScoreResult {
    let Some(snapshot) = snapshot else {
        return ScoreResult::default();
    };

    let ctx = ScoringContext {
        snapshot,
        now,
        recent_window_days: recent_window_days.max(0),
    };
    let result = fold_factors(&readiness_factors(), &ctx, Rounding::Final);

    debug!(
        total = result.total,
        factors = result.breakdown.len(),
        "Calculated readiness score"
    );
    result
}
