//! Derived student metrics: placement-readiness scoring, engagement streaks,
//! and auto-tracked goal progress.
//!
//! Every calculator is a synchronous, side-effect-free function over a
//! caller-owned [`StudentSnapshot`]. Persisting results is the caller's job;
//! the one async seam is [`streak::StreakStore`], used by the batch updater.

pub mod config;
pub mod errors;
pub mod goals;
pub mod models;
pub mod refresh;
pub mod scoring;
pub mod streak;

pub use config::EngineConfig;
pub use errors::MetricsError;
pub use models::StudentSnapshot;
pub use refresh::{refresh_student, StudentMetrics};
