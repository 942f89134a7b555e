//! Auto-tracked goal progress.
//!
//! Sync is a pure transform: it takes the stored goals and the student's
//! activity counts and returns updated copies plus a change-set. Persisting
//! the result is left to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{AutoTrack, Goal, GoalStatus, StudentSnapshot};

/// Activity counts that auto-tracked goals measure against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityCounts {
    pub projects: u64,
    pub certifications: u64,
    pub coding_problems: u64,
    pub coding_logs: u64,
    pub skills: u64,
}

impl ActivityCounts {
    pub fn from_snapshot(snapshot: &StudentSnapshot) -> Self {
        let synced = snapshot.synced_problems_solved();
        ActivityCounts {
            projects: snapshot.projects.len() as u64,
            certifications: snapshot.certifications.len() as u64,
            coding_problems: if synced > 0 {
                synced
            } else {
                snapshot.logged_problems_solved()
            },
            coding_logs: snapshot.coding_logs.len() as u64,
            skills: snapshot.skills.len().max(snapshot.skill_radar.len()) as u64,
        }
    }

    pub fn value_for(&self, track: AutoTrack) -> Option<u64> {
        match track {
            AutoTrack::None => None,
            AutoTrack::Projects => Some(self.projects),
            AutoTrack::Certifications => Some(self.certifications),
            AutoTrack::CodingProblems => Some(self.coding_problems),
            AutoTrack::CodingLogs => Some(self.coding_logs),
            AutoTrack::Skills => Some(self.skills),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalChange {
    pub goal_id: String,
    pub previous_value: f64,
    pub current_value: f64,
    pub previous_progress: u32,
    pub progress: u32,
    pub previous_status: GoalStatus,
    pub status: GoalStatus,
    /// True when this sync moved the goal into `completed`.
    pub completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalSyncOutcome {
    pub goals: Vec<Goal>,
    pub changes: Vec<GoalChange>,
}

impl GoalSyncOutcome {
    /// Whether any goal needs to be written back.
    pub fn changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Recomputes one goal. Untracked and abandoned goals come back unchanged.
pub fn sync_goal(goal: &Goal, counts: &ActivityCounts, now: DateTime<Utc>) -> Goal {
    if goal.is_frozen() {
        return goal.clone();
    }
    let Some(current) = counts.value_for(goal.auto_track) else {
        return goal.clone();
    };

    let mut updated = goal.clone();
    updated.current_value = current as f64;

    let Some(target) = goal.valid_target() else {
        return updated;
    };

    let progress = (100.0 * updated.current_value / target).min(100.0).round() as u32;
    updated.progress = progress;
    updated.status = GoalStatus::from_progress(progress);
    updated.completed_at = match updated.status {
        GoalStatus::Completed => goal.completed_at.or(Some(now)),
        _ => None,
    };
    updated
}

pub fn sync_goals(goals: &[Goal], counts: &ActivityCounts, now: DateTime<Utc>) -> GoalSyncOutcome {
    let mut outcome = GoalSyncOutcome {
        goals: Vec::with_capacity(goals.len()),
        changes: Vec::new(),
    };

    for goal in goals {
        let updated = sync_goal(goal, counts, now);
        if persisted_fields_differ(goal, &updated) {
            outcome.changes.push(GoalChange {
                goal_id: goal.id.clone(),
                previous_value: goal.current_value,
                current_value: updated.current_value,
                previous_progress: goal.progress,
                progress: updated.progress,
                previous_status: goal.status,
                status: updated.status,
                completed: goal.status != GoalStatus::Completed
                    && updated.status == GoalStatus::Completed,
            });
        }
        outcome.goals.push(updated);
    }

    debug!(
        goals = goals.len(),
        changed = outcome.changes.len(),
        "Synced auto-tracked goals"
    );
    outcome
}

/// Syncs the snapshot's own goal list against its own activity.
pub fn sync_snapshot_goals(snapshot: &StudentSnapshot, now: DateTime<Utc>) -> GoalSyncOutcome {
    sync_goals(&snapshot.goals, &ActivityCounts::from_snapshot(snapshot), now)
}

fn persisted_fields_differ(before: &Goal, after: &Goal) -> bool {
    before.current_value != after.current_value
        || before.progress != after.progress
        || before.status != after.status
        || before.completed_at != after.completed_at
}
