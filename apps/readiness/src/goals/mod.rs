pub mod inference;
pub mod sync;

pub use inference::{infer_auto_track, infer_unit};
pub use sync::{
    sync_goal, sync_goals, sync_snapshot_goals, ActivityCounts, GoalChange, GoalSyncOutcome,
};
