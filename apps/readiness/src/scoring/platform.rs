//! Platform-only readiness score, built from synced version-control and
//! competitive-programming data rather than self-entered activity.
//!
//! Unlike the manual score, every sub-factor is rounded to whole points and
//! clamped before it is summed. The output also carries a ranked list of
//! recommendations and a qualitative tier.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::factor::{fold_factors, CompositeFactor, Curve, CurveFactor, Priority, Rounding};
use crate::models::{GithubStats, StudentSnapshot};

/// Fraction of a sub-factor's cap below which a recommendation is emitted.
const RECOMMENDATION_THRESHOLD: f64 = 0.5;

pub struct PlatformInput<'a> {
    pub snapshot: &'a StudentSnapshot,
    pub github: &'a GithubStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub factor: String,
    pub priority: Priority,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TierLevel {
    Excellent,
    Good,
    Fair,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
    #[serde(rename = "Getting Started")]
    GettingStarted,
}

impl TierLevel {
    pub fn from_score(total: u32) -> Self {
        match total {
            t if t >= 80 => TierLevel::Excellent,
            t if t >= 60 => TierLevel::Good,
            t if t >= 40 => TierLevel::Fair,
            t if t >= 20 => TierLevel::NeedsImprovement,
            _ => TierLevel::GettingStarted,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TierLevel::Excellent => "Excellent",
            TierLevel::Good => "Good",
            TierLevel::Fair => "Fair",
            TierLevel::NeedsImprovement => "Needs Improvement",
            TierLevel::GettingStarted => "Getting Started",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            TierLevel::Excellent => "Outstanding profile. You are well prepared for placements.",
            TierLevel::Good => "Strong profile with a few areas left to polish.",
            TierLevel::Fair => "Solid foundation. Work through the recommendations to stand out.",
            TierLevel::NeedsImprovement => "Your profile needs more consistent, visible activity.",
            TierLevel::GettingStarted => "Just getting started. Build projects and contribute regularly.",
        }
    }

    /// Presentation color token.
    pub fn color(&self) -> &'static str {
        match self {
            TierLevel::Excellent => "green",
            TierLevel::Good => "blue",
            TierLevel::Fair => "yellow",
            TierLevel::NeedsImprovement => "orange",
            TierLevel::GettingStarted => "red",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreTier {
    pub level: TierLevel,
    pub label: String,
    pub message: String,
    pub color: String,
}

impl From<TierLevel> for ScoreTier {
    fn from(level: TierLevel) -> Self {
        ScoreTier {
            level,
            label: level.label().to_string(),
            message: level.message().to_string(),
            color: level.color().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformScore {
    pub total: u32,
    pub breakdown: BTreeMap<String, f64>,
    pub recommendations: Vec<Recommendation>,
    pub tier: ScoreTier,
}

impl PlatformScore {
    fn empty() -> Self {
        PlatformScore {
            total: 0,
            breakdown: BTreeMap::new(),
            recommendations: Vec::new(),
            tier: TierLevel::GettingStarted.into(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Factor table
// ────────────────────────────────────────────────────────────────────────────

fn sub<'a>(
    name: &'static str,
    cap: f64,
    curve: Curve,
    signal: fn(&PlatformInput<'a>) -> f64,
    priority: Priority,
    message: &'static str,
) -> CurveFactor<PlatformInput<'a>> {
    CurveFactor::new(name, cap, curve, signal).with_advice(priority, message)
}

#[rustfmt::skip]
pub fn platform_factors<'a>() -> Vec<CompositeFactor<PlatformInput<'a>>> {
    vec![
        CompositeFactor::new(
            "repositoryQuality",
            30.0,
            Rounding::PerFactor,
            vec![
                sub("repositories", 10.0, Curve::Saturating { scale: 5.0 },
                    |i| i.github.public_repos as f64, Priority::High,
                    "Publish more of your projects as public repositories."),
                sub("stars", 8.0, Curve::Saturating { scale: 20.0 },
                    |i| i.github.total_stars as f64, Priority::Low,
                    "Polish READMEs and share your best repositories to earn stars."),
                sub("forks", 4.0, Curve::Saturating { scale: 10.0 },
                    |i| i.github.total_forks as f64, Priority::Low,
                    "Build reusable tools or templates that others will want to fork."),
                sub("languages", 5.0, Curve::Saturating { scale: 3.0 },
                    |i| i.github.distinct_languages() as f64, Priority::Medium,
                    "Show range by building in more than one language."),
                sub("recentCommits", 3.0, Curve::Saturating { scale: 10.0 },
                    |i| i.github.commits_last_30_days as f64, Priority::Medium,
                    "Keep your repositories active with regular commits."),
            ],
        ),
        CompositeFactor::new(
            "codingConsistency",
            25.0,
            Rounding::PerFactor,
            vec![
                sub("monthlyCommits", 10.0, Curve::Saturating { scale: 20.0 },
                    |i| i.github.commits_last_30_days as f64, Priority::High,
                    "Commit code several times a week to build a visible habit."),
                sub("contributionStreak", 8.0, Curve::Saturating { scale: 10.0 },
                    |i| i.github.contribution_streak as f64, Priority::Medium,
                    "Grow your contribution streak by coding a little every day."),
                sub("totalCommits", 7.0, Curve::Saturating { scale: 300.0 },
                    |i| i.github.total_commits as f64, Priority::Low,
                    "Accumulate commit history by working on long-running projects."),
            ],
        ),
        CompositeFactor::new(
            "openSource",
            25.0,
            Rounding::PerFactor,
            vec![
                sub("pullRequests", 10.0, Curve::Saturating { scale: 10.0 },
                    |i| i.github.pull_requests as f64, Priority::High,
                    "Open pull requests against open-source projects you use."),
                sub("mergedPullRequests", 7.0, Curve::Saturating { scale: 5.0 },
                    |i| i.github.merged_pull_requests as f64, Priority::Medium,
                    "Follow through on reviews so your pull requests get merged."),
                sub("issues", 4.0, Curve::Saturating { scale: 5.0 },
                    |i| i.github.issues_opened as f64, Priority::Low,
                    "Report bugs and suggest improvements through issues."),
                sub("externalRepositories", 4.0, Curve::Saturating { scale: 3.0 },
                    |i| i.github.contributed_repos as f64, Priority::Medium,
                    "Contribute to repositories beyond your own."),
            ],
        ),
        CompositeFactor::new(
            "profileStrength",
            20.0,
            Rounding::PerFactor,
            vec![
                sub("followers", 6.0, Curve::Saturating { scale: 25.0 },
                    |i| i.github.followers as f64, Priority::Low,
                    "Engage with the community to grow your follower base."),
                sub("bio", 3.0, Curve::Linear { per_unit: 3.0 },
                    |i| if i.github.has_bio { 1.0 } else { 0.0 }, Priority::High,
                    "Add a bio describing your interests and stack."),
                sub("profileReadme", 3.0, Curve::Linear { per_unit: 3.0 },
                    |i| if i.github.has_profile_readme { 1.0 } else { 0.0 }, Priority::Medium,
                    "Create a profile README that highlights your best work."),
                sub("competitiveProgramming", 8.0, Curve::Saturating { scale: 150.0 },
                    |i| i.snapshot.synced_problems_solved() as f64, Priority::Medium,
                    "Solve problems on competitive programming platforms and link them."),
            ],
        ),
    ]
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Platform-only readiness score.
///
/// `github` overrides the snapshot's own synced block when the caller holds
/// fresher data; with neither present the version-control factors score zero.
pub fn calculate_platform_score(
    snapshot: Option<&StudentSnapshot>,
    github: Option<&GithubStats>,
) -> PlatformScore {
    let Some(snapshot) = snapshot else {
        return PlatformScore::empty();
    };

    let fallback = GithubStats::default();
    let input = PlatformInput {
        snapshot,
        github: github.or(snapshot.github.as_ref()).unwrap_or(&fallback),
    };

    let factors = platform_factors();
    let result = fold_factors(&factors, &input, Rounding::PerFactor);
    let recommendations = collect_recommendations(&factors, &input);
    let tier = ScoreTier::from(TierLevel::from_score(result.total));

    debug!(
        total = result.total,
        tier = tier.label.as_str(),
        recommendations = recommendations.len(),
        "Calculated platform score"
    );

    PlatformScore {
        total: result.total,
        breakdown: result.breakdown,
        recommendations,
        tier,
    }
}

/// One recommendation per sub-factor scoring under the threshold, highest
/// priority first and declaration order within a priority.
fn collect_recommendations<'a>(
    composites: &[CompositeFactor<PlatformInput<'a>>],
    input: &PlatformInput<'a>,
) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = composites
        .iter()
        .flat_map(|composite| composite.part_scores(input))
        .filter(|(part, points)| *points < part.cap * RECOMMENDATION_THRESHOLD)
        .filter_map(|(part, _)| {
            part.advice.map(|advice| Recommendation {
                factor: part.name.to_string(),
                priority: advice.priority,
                message: advice.message.to_string(),
            })
        })
        .collect();
    recommendations.sort_by_key(|r| r.priority);
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CodingPlatformStats, RecentActivity};
    use proptest::prelude::*;
    use serde_json::json;

    fn strong_github() -> GithubStats {
        GithubStats {
            public_repos: 50,
            total_stars: 400,
            total_forks: 120,
            languages: ["Rust", "Go", "TypeScript", "Python", "C", "SQL", "Zig", "Java"]
                .map(String::from)
                .to_vec(),
            total_commits: 4_000,
            commits_last_30_days: 150,
            contribution_streak: 90,
            pull_requests: 120,
            merged_pull_requests: 80,
            issues_opened: 60,
            contributed_repos: 30,
            followers: 400,
            has_bio: true,
            has_profile_readme: true,
            last_synced_at: None,
        }
    }

    fn strong_snapshot() -> StudentSnapshot {
        StudentSnapshot {
            leetcode: Some(CodingPlatformStats {
                total_solved: 1_500,
                recent_activity: RecentActivity { last30_days: 40 },
                ..CodingPlatformStats::default()
            }),
            ..StudentSnapshot::default()
        }
    }

    #[test]
    fn test_missing_snapshot_scores_zero() {
        let result = calculate_platform_score(None, None);
        assert_eq!(result.total, 0);
        assert!(result.breakdown.is_empty());
        assert!(result.recommendations.is_empty());
        assert_eq!(result.tier.level, TierLevel::GettingStarted);
    }

    #[test]
    fn test_maxed_profile_scores_100() {
        let snapshot = strong_snapshot();
        let result = calculate_platform_score(Some(&snapshot), Some(&strong_github()));
        assert_eq!(result.total, 100);
        assert_eq!(result.breakdown["repositoryQuality"], 30.0);
        assert_eq!(result.breakdown["profileStrength"], 20.0);
        assert!(result.recommendations.is_empty());
        assert_eq!(result.tier.label, "Excellent");
        assert_eq!(result.tier.color, "green");
    }

    #[test]
    fn test_breakdown_is_whole_points_and_sums_to_total() {
        let github = GithubStats {
            public_repos: 3,
            total_stars: 4,
            commits_last_30_days: 7,
            contribution_streak: 2,
            pull_requests: 1,
            has_bio: true,
            ..GithubStats::default()
        };
        let snapshot = StudentSnapshot::default();
        let result = calculate_platform_score(Some(&snapshot), Some(&github));

        for points in result.breakdown.values() {
            assert_eq!(points.fract(), 0.0);
        }
        let sum: f64 = result.breakdown.values().sum();
        assert_eq!(sum as u32, result.total);
    }

    /// Everything wrong with a score's bounds, empty when it is well formed.
    fn bound_violations(score: &PlatformScore) -> Vec<String> {
        let caps: BTreeMap<&str, f64> = platform_factors()
            .iter()
            .map(|f| (f.name, f.cap))
            .collect();
        let mut violations = Vec::new();
        for (name, points) in &score.breakdown {
            match caps.get(name.as_str()) {
                Some(cap) if points.fract() == 0.0 && *points > 0.0 && points <= cap => {}
                Some(cap) => violations.push(format!("{name} scored {points} (cap {cap})")),
                None => violations.push(format!("unknown factor {name}")),
            }
        }
        let sum: f64 = score.breakdown.values().sum();
        if score.total > 100 || sum as u32 != score.total {
            violations.push(format!("total {} vs breakdown sum {sum}", score.total));
        }
        if score.tier.level != TierLevel::from_score(score.total) {
            violations.push(format!("tier {:?} for total {}", score.tier.level, score.total));
        }
        violations
    }

    #[test]
    fn test_extreme_inputs_stay_within_caps() {
        let payloads = [
            json!({"github": {}}),
            json!({
                "github": {
                    "publicRepos": 1e300,
                    "totalStars": "4294967296",
                    "totalForks": 1e12,
                    "languages": ["Rust", 7, null, "rust", "Go"],
                    "commitsLast30Days": 1e9,
                    "pullRequests": 1e9,
                    "mergedPullRequests": 1e9,
                    "followers": 1e9,
                    "hasBio": "verified",
                    "hasProfileReadme": 1
                },
                "leetcode": {"totalSolved": 1e12},
                "hackerrank": {"totalSolved": 1e12}
            }),
            json!({
                "github": {
                    "publicRepos": -5,
                    "totalCommits": "NaN",
                    "contributionStreak": "-inf",
                    "issuesOpened": [],
                    "hasBio": "nope"
                },
                "leetcode": {"totalSolved": -1}
            }),
        ];

        for payload in payloads {
            let snapshot: StudentSnapshot = serde_json::from_value(payload.clone()).unwrap();
            let score = calculate_platform_score(Some(&snapshot), None);
            let violations = bound_violations(&score);
            assert!(violations.is_empty(), "{payload}: {violations:?}");
        }
    }

    #[test]
    fn test_explicit_github_overrides_snapshot_block() {
        let snapshot = StudentSnapshot {
            github: Some(GithubStats::default()),
            ..StudentSnapshot::default()
        };
        let override_stats = strong_github();
        let with_override = calculate_platform_score(Some(&snapshot), Some(&override_stats));
        let without = calculate_platform_score(Some(&snapshot), None);
        assert!(with_override.total > without.total);
    }

    #[test]
    fn test_snapshot_github_used_when_no_override() {
        let snapshot = StudentSnapshot {
            github: Some(strong_github()),
            ..strong_snapshot()
        };
        assert_eq!(calculate_platform_score(Some(&snapshot), None).total, 100);
    }

    #[test]
    fn test_recommendations_ordered_by_priority() {
        let snapshot = StudentSnapshot::default();
        let result = calculate_platform_score(Some(&snapshot), None);

        // every sub-factor is at zero, so every one recommends
        assert_eq!(result.recommendations.len(), 16);
        let priorities: Vec<Priority> = result.recommendations.iter().map(|r| r.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
        assert_eq!(result.recommendations[0].factor, "repositories");
        assert_eq!(result.recommendations[1].factor, "monthlyCommits");
    }

    #[test]
    fn test_recommendation_clears_once_factor_is_strong() {
        let github = GithubStats {
            has_bio: true,
            ..GithubStats::default()
        };
        let snapshot = StudentSnapshot::default();
        let result = calculate_platform_score(Some(&snapshot), Some(&github));
        assert!(result.recommendations.iter().all(|r| r.factor != "bio"));
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(TierLevel::from_score(100), TierLevel::Excellent);
        assert_eq!(TierLevel::from_score(80), TierLevel::Excellent);
        assert_eq!(TierLevel::from_score(79), TierLevel::Good);
        assert_eq!(TierLevel::from_score(60), TierLevel::Good);
        assert_eq!(TierLevel::from_score(40), TierLevel::Fair);
        assert_eq!(TierLevel::from_score(20), TierLevel::NeedsImprovement);
        assert_eq!(TierLevel::from_score(19), TierLevel::GettingStarted);
        assert_eq!(TierLevel::from_score(0), TierLevel::GettingStarted);
    }

    #[test]
    fn test_tier_serializes_with_display_label() {
        let value = serde_json::to_value(ScoreTier::from(TierLevel::NeedsImprovement)).unwrap();
        assert_eq!(value["level"], "Needs Improvement");
        assert_eq!(value["color"], "orange");
    }

    proptest! {
        #[test]
        fn platform_breakdown_stays_within_caps(
            repos in any::<u32>(),
            stars in any::<u32>(),
            commits in any::<u32>(),
            recent_commits in any::<u32>(),
            pull_requests in any::<u32>(),
            merged in any::<u32>(),
            followers in any::<u32>(),
            flags in any::<(bool, bool)>(),
            solved in any::<u32>(),
        ) {
            let github = GithubStats {
                public_repos: repos,
                total_stars: stars,
                total_commits: commits,
                commits_last_30_days: recent_commits,
                pull_requests,
                merged_pull_requests: merged,
                followers,
                has_bio: flags.0,
                has_profile_readme: flags.1,
                ..GithubStats::default()
            };
            let snapshot = StudentSnapshot {
                hackerrank: Some(CodingPlatformStats {
                    total_solved: solved,
                    ..CodingPlatformStats::default()
                }),
                ..StudentSnapshot::default()
            };
            let score = calculate_platform_score(Some(&snapshot), Some(&github));
            let violations = bound_violations(&score);
            prop_assert!(violations.is_empty(), "{:?}", violations);
        }
    }
}
