use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lenient;

/// Which activity count drives a goal's progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoTrack {
    #[default]
    None,
    Projects,
    Certifications,
    CodingProblems,
    CodingLogs,
    Skills,
}

impl AutoTrack {
    pub fn as_str(&self) -> &'static str {
        match self {
            AutoTrack::None => "none",
            AutoTrack::Projects => "projects",
            AutoTrack::Certifications => "certifications",
            AutoTrack::CodingProblems => "coding_problems",
            AutoTrack::CodingLogs => "coding_logs",
            AutoTrack::Skills => "skills",
        }
    }

    pub fn is_tracked(&self) -> bool {
        *self != AutoTrack::None
    }
}

impl FromStr for AutoTrack {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "none" | "" => Ok(AutoTrack::None),
            "projects" => Ok(AutoTrack::Projects),
            "certifications" => Ok(AutoTrack::Certifications),
            "coding_problems" => Ok(AutoTrack::CodingProblems),
            "coding_logs" => Ok(AutoTrack::CodingLogs),
            "skills" => Ok(AutoTrack::Skills),
            other => Err(format!("Invalid auto-track source: {other}")),
        }
    }
}

impl fmt::Display for AutoTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Abandoned,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Pending => "pending",
            GoalStatus::InProgress => "in_progress",
            GoalStatus::Completed => "completed",
            GoalStatus::Abandoned => "abandoned",
        }
    }

    /// Status implied by a progress percentage.
    pub fn from_progress(progress: u32) -> Self {
        if progress >= 100 {
            GoalStatus::Completed
        } else if progress > 0 {
            GoalStatus::InProgress
        } else {
            GoalStatus::Pending
        }
    }
}

impl FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(GoalStatus::Pending),
            "in_progress" => Ok(GoalStatus::InProgress),
            "completed" => Ok(GoalStatus::Completed),
            "abandoned" => Ok(GoalStatus::Abandoned),
            other => Err(format!("Invalid goal status: {other}")),
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Goal {
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub unit: String,
    #[serde(deserialize_with = "lenient::parsed")]
    pub auto_track: AutoTrack,
    #[serde(deserialize_with = "lenient::number")]
    pub current_value: f64,
    #[serde(deserialize_with = "lenient::optional_number")]
    pub target_value: Option<f64>,
    /// Percentage complete, 0–100.
    #[serde(deserialize_with = "lenient::count")]
    pub progress: u32,
    #[serde(deserialize_with = "lenient::parsed")]
    pub status: GoalStatus,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Goal {
    /// The target, if it is usable as a progress denominator.
    pub fn valid_target(&self) -> Option<f64> {
        self.target_value.filter(|t| t.is_finite() && *t > 0.0)
    }

    pub fn is_frozen(&self) -> bool {
        self.status == GoalStatus::Abandoned
    }
}
