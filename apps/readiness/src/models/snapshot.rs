use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::goal::Goal;
use super::lenient;
use crate::scoring::history::ScoreHistoryEntry;

/// A student's raw activity record as loaded by the caller.
///
/// Every field is optional on the wire. Missing or malformed values fall back
/// to empty/zero so that any JSON object yields a usable snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentSnapshot {
    #[serde(deserialize_with = "lenient::list")]
    pub projects: Vec<Project>,
    #[serde(deserialize_with = "lenient::list")]
    pub certifications: Vec<Certification>,
    #[serde(deserialize_with = "lenient::list")]
    pub events: Vec<Event>,
    #[serde(deserialize_with = "lenient::list")]
    pub coding_logs: Vec<CodingLog>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub skills: Vec<String>,
    /// Self-reported proficiency per skill, 0–100.
    #[serde(deserialize_with = "lenient::score_map")]
    pub skill_radar: BTreeMap<String, f64>,
    #[serde(deserialize_with = "lenient::optional_object")]
    pub github: Option<GithubStats>,
    #[serde(deserialize_with = "lenient::optional_object")]
    pub leetcode: Option<CodingPlatformStats>,
    /// Secondary competitive-programming platform; its certificates count
    /// toward the certification factor.
    #[serde(deserialize_with = "lenient::optional_object")]
    pub hackerrank: Option<CodingPlatformStats>,
    #[serde(deserialize_with = "lenient::optional_object")]
    pub interview: Option<InterviewStats>,
    #[serde(deserialize_with = "lenient::count")]
    pub streak_days: u32,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub last_active_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::count")]
    pub readiness_score: u32,
    #[serde(deserialize_with = "lenient::list")]
    pub score_history: Vec<ScoreHistoryEntry>,
    #[serde(deserialize_with = "lenient::list")]
    pub goals: Vec<Goal>,
}

impl StudentSnapshot {
    pub fn verified_projects(&self) -> usize {
        self.projects.iter().filter(|p| p.verified).count()
    }

    pub fn verified_certifications(&self) -> usize {
        self.certifications.iter().filter(|c| c.verified).count()
    }

    pub fn logged_problems_solved(&self) -> u64 {
        self.coding_logs
            .iter()
            .map(|log| u64::from(log.problems_solved))
            .sum()
    }

    /// Combined `total_solved` across both synced competitive-programming blocks.
    pub fn synced_problems_solved(&self) -> u64 {
        [&self.leetcode, &self.hackerrank]
            .into_iter()
            .flatten()
            .map(|stats| u64::from(stats.total_solved))
            .sum()
    }

    pub fn secondary_platform_certificates(&self) -> usize {
        self.hackerrank
            .as_ref()
            .map(|stats| stats.certifications.len())
            .unwrap_or(0)
    }

    /// Distinct platforms with evidence of use: manual log platforms plus any
    /// synced block that carries data.
    pub fn active_platforms(&self) -> BTreeSet<String> {
        let mut platforms: BTreeSet<String> = self
            .coding_logs
            .iter()
            .map(|log| log.platform.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();

        if self
            .github
            .as_ref()
            .is_some_and(|g| g.public_repos > 0 || g.total_commits > 0)
        {
            platforms.insert("github".to_string());
        }
        if self.leetcode.as_ref().is_some_and(CodingPlatformStats::has_activity) {
            platforms.insert("leetcode".to_string());
        }
        if self.hackerrank.as_ref().is_some_and(CodingPlatformStats::has_activity) {
            platforms.insert("hackerrank".to_string());
        }
        platforms
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    #[serde(deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::flag")]
    pub verified: bool,
}

impl Project {
    pub fn activity_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at.or(self.created_at)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certification {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub provider: String,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub issued_date: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::flag")]
    pub verified: bool,
}

impl Certification {
    pub fn activity_at(&self) -> Option<DateTime<Utc>> {
        self.issued_date.or(self.created_at)
    }
}

const PODIUM_OUTCOMES: &[&str] = &["winner", "runner", "finalist", "podium", "1st", "2nd", "3rd"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub date: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub outcome: Option<String>,
}

impl Event {
    pub fn is_podium(&self) -> bool {
        self.outcome.as_deref().is_some_and(|outcome| {
            let outcome = outcome.to_lowercase();
            PODIUM_OUTCOMES.iter().any(|word| outcome.contains(word))
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodingLog {
    #[serde(deserialize_with = "lenient::timestamp")]
    pub date: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::text")]
    pub platform: String,
    #[serde(deserialize_with = "lenient::count")]
    pub minutes_spent: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub problems_solved: u32,
}

/// Version-control host statistics, populated by an external fetcher.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GithubStats {
    #[serde(deserialize_with = "lenient::count")]
    pub public_repos: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub total_stars: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub total_forks: u32,
    #[serde(deserialize_with = "lenient::string_list")]
    pub languages: Vec<String>,
    #[serde(deserialize_with = "lenient::count")]
    pub total_commits: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub commits_last_30_days: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub contribution_streak: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub pull_requests: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub merged_pull_requests: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub issues_opened: u32,
    /// Repositories owned by others that received contributions.
    #[serde(deserialize_with = "lenient::count")]
    pub contributed_repos: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub followers: u32,
    #[serde(deserialize_with = "lenient::flag")]
    pub has_bio: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub has_profile_readme: bool,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl GithubStats {
    pub fn distinct_languages(&self) -> usize {
        self.languages
            .iter()
            .map(|l| l.trim().to_lowercase())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecentActivity {
    #[serde(deserialize_with = "lenient::count")]
    pub last30_days: u32,
}

/// Competitive-programming platform statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodingPlatformStats {
    #[serde(deserialize_with = "lenient::count")]
    pub total_solved: u32,
    #[serde(deserialize_with = "lenient::object")]
    pub recent_activity: RecentActivity,
    /// Certificates awarded by the platform; only their count is scored.
    #[serde(deserialize_with = "lenient::list")]
    pub certifications: Vec<Value>,
    #[serde(deserialize_with = "lenient::number")]
    pub rating: f64,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl CodingPlatformStats {
    pub fn has_activity(&self) -> bool {
        self.total_solved > 0 || self.recent_activity.last30_days > 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
    #[default]
    Unknown,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Stable => "stable",
            Trend::Declining => "declining",
            Trend::Unknown => "unknown",
        }
    }
}

impl FromStr for Trend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "improving" => Ok(Trend::Improving),
            "stable" => Ok(Trend::Stable),
            "declining" => Ok(Trend::Declining),
            other => Err(format!("Invalid trend: {other}")),
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interview-practice statistics from the practice subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterviewStats {
    #[serde(deserialize_with = "lenient::count")]
    pub completed_sessions: u32,
    /// Average session score, 0–100.
    #[serde(deserialize_with = "lenient::number")]
    pub avg_score: f64,
    #[serde(deserialize_with = "lenient::parsed")]
    pub recent_trend: Trend,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub last_session_at: Option<DateTime<Utc>>,
}
