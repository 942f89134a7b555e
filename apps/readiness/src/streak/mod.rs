pub mod batch;
pub mod calculator;

pub use batch::{update_all_streaks, BatchSummary, StreakStore, StudentRecord};
pub use calculator::{calculate_streak, calculate_streak_with_offset, StreakResult};
