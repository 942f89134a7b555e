//! Consecutive-day engagement streak.
//!
//! Every qualifying activity contributes its calendar day. The streak is the
//! run of consecutive days ending at the most recent one, and only counts if
//! that day is today or yesterday.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::StudentSnapshot;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakResult {
    pub streak_days: u32,
    /// Latest qualifying activity. Still reported when the streak has lapsed.
    pub last_active_at: Option<DateTime<Utc>>,
}

impl StreakResult {
    pub fn is_active(&self) -> bool {
        self.streak_days > 0
    }
}

/// Timestamps of every qualifying activity, one per item or synced block.
pub fn activity_timestamps(snapshot: &StudentSnapshot) -> Vec<DateTime<Utc>> {
    let synced = [
        snapshot.github.as_ref().and_then(|g| g.last_synced_at),
        snapshot.leetcode.as_ref().and_then(|s| s.last_synced_at),
        snapshot.hackerrank.as_ref().and_then(|s| s.last_synced_at),
        snapshot.interview.as_ref().and_then(|i| i.last_session_at),
        snapshot.last_active_at,
    ];

    snapshot
        .coding_logs
        .iter()
        .filter_map(|log| log.date)
        .chain(snapshot.projects.iter().filter_map(|p| p.activity_at()))
        .chain(snapshot.certifications.iter().filter_map(|c| c.activity_at()))
        .chain(snapshot.events.iter().filter_map(|e| e.date))
        .chain(synced.into_iter().flatten())
        .collect()
}

/// Streak with calendar days taken in UTC.
pub fn calculate_streak(snapshot: &StudentSnapshot, now: DateTime<Utc>) -> StreakResult {
    calculate_streak_with_offset(snapshot, now, Utc.fix())
}

/// Streak with calendar days taken at `offset` from UTC.
pub fn calculate_streak_with_offset(
    snapshot: &StudentSnapshot,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> StreakResult {
    streak_from_timestamps(&activity_timestamps(snapshot), now, offset)
}

pub fn streak_from_timestamps(
    timestamps: &[DateTime<Utc>],
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> StreakResult {
    // Latest timestamp per distinct day; same-day activity counts once.
    // Future-dated activity is treated as happening now.
    let mut days: BTreeMap<NaiveDate, DateTime<Utc>> = BTreeMap::new();
    for ts in timestamps.iter().map(|ts| (*ts).min(now)) {
        let day = ts.with_timezone(&offset).date_naive();
        days.entry(day)
            .and_modify(|latest| *latest = (*latest).max(ts))
            .or_insert(ts);
    }

    let Some((&most_recent, &last_active_at)) = days.iter().next_back() else {
        return StreakResult::default();
    };

    let today = now.with_timezone(&offset).date_naive();
    if (today - most_recent).num_days() > 1 {
        debug!(%most_recent, %today, "Streak lapsed");
        return StreakResult {
            streak_days: 0,
            last_active_at: Some(last_active_at),
        };
    }

    // Walk back from the most recent day while each day directly precedes
    // the last one counted.
    let mut streak_days = 0u32;
    let mut cursor = most_recent;
    for &day in days.keys().rev() {
        match (cursor - day).num_days() {
            0 => streak_days += 1,
            1 => {
                streak_days += 1;
                cursor = day;
            }
            _ => break,
        }
    }

    debug!(streak_days, %most_recent, "Calculated streak");
    StreakResult {
        streak_days,
        last_active_at: Some(last_active_at),
    }
}
