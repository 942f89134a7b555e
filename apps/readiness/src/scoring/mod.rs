// Readiness scoring: the shared factor fold plus the two scoring variants,
// the score-change classifier and history bookkeeping.

pub mod change;
pub mod factor;
pub mod history;
pub mod platform;
pub mod readiness;

/// Upper bound of every readiness score.
pub const MAX_SCORE: f64 = 100.0;

pub use change::{detect_score_change, ChangeType, ScoreChange};
pub use factor::{Curve, Priority, ScoreFactor, ScoreResult};
pub use history::{record_score, ScoreHistoryEntry};
pub use platform::{calculate_platform_score, PlatformScore, Recommendation, ScoreTier, TierLevel};
pub use readiness::calculate_readiness_score;
