pub mod goal;
pub mod lenient;
pub mod snapshot;

pub use goal::{AutoTrack, Goal, GoalStatus};
pub use snapshot::{
    Certification, CodingLog, CodingPlatformStats, Event, GithubStats, InterviewStats, Project,
    RecentActivity, StudentSnapshot, Trend,
};
