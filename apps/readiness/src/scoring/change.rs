use serde::{Deserialize, Serialize};

/// Score moves smaller than this are noise and not reported.
const MIN_REPORTED_DELTA: i64 = 2;
const SIGNIFICANT_DELTA: i64 = 5;
const MAJOR_DELTA: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Increase,
    Decrease,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreChange {
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    pub delta: i64,
    pub reason: String,
}

/// Classifies a move between two readiness scores so callers can decide
/// whether it is worth surfacing. Returns `None` when `|delta| < 2`.
pub fn detect_score_change(old_score: u32, new_score: u32) -> Option<ScoreChange> {
    let delta = i64::from(new_score) - i64::from(old_score);
    let magnitude = delta.abs();
    if magnitude < MIN_REPORTED_DELTA {
        return None;
    }

    let (change_type, reason) = if delta > 0 {
        let reason = match magnitude {
            m if m >= MAJOR_DELTA => "Major improvement in placement readiness from recent activity",
            m if m >= SIGNIFICANT_DELTA => "Significant progress across your profile",
            _ => "Steady progress from consistent activity",
        };
        (ChangeType::Increase, reason)
    } else {
        let reason = match magnitude {
            m if m >= MAJOR_DELTA => "Score dropped after a long period of inactivity",
            m if m >= SIGNIFICANT_DELTA => "Reduced activity lowered your readiness score",
            _ => "Slight dip from lower recent activity",
        };
        (ChangeType::Decrease, reason)
    };

    Some(ScoreChange {
        change_type,
        delta,
        reason: reason.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_moves_are_ignored() {
        assert_eq!(detect_score_change(50, 51), None);
        assert_eq!(detect_score_change(50, 49), None);
        assert_eq!(detect_score_change(50, 50), None);
    }

    #[test]
    fn test_major_increase() {
        let change = detect_score_change(50, 65).unwrap();
        assert_eq!(change.change_type, ChangeType::Increase);
        assert_eq!(change.delta, 15);
        assert!(change.reason.to_lowercase().starts_with("major"));
    }

    #[test]
    fn test_major_decrease_mentions_inactivity() {
        let change = detect_score_change(70, 60).unwrap();
        assert_eq!(change.change_type, ChangeType::Decrease);
        assert_eq!(change.delta, -10);
        assert!(change.reason.contains("long period of inactivity"));
    }

    #[test]
    fn test_tier_boundaries() {
        assert!(detect_score_change(50, 52).unwrap().reason.starts_with("Steady"));
        assert!(detect_score_change(50, 55).unwrap().reason.starts_with("Significant"));
        assert!(detect_score_change(50, 46).unwrap().reason.starts_with("Slight"));
        assert!(detect_score_change(50, 45).unwrap().reason.starts_with("Reduced"));
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(detect_score_change(10, 30).unwrap()).unwrap();
        assert_eq!(value["type"], "increase");
        assert_eq!(value["delta"], 20);
    }
}
