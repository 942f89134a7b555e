use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::calculator::{calculate_streak_with_offset, StreakResult};
use crate::errors::MetricsError;
use crate::models::StudentSnapshot;

/// Where recomputed streaks are written. Implemented by the caller's storage
/// layer; the engine never performs I/O itself.
#[async_trait]
pub trait StreakStore: Send + Sync {
    async fn save_streak(
        &self,
        student_id: Uuid,
        streak: &StreakResult,
    ) -> Result<(), MetricsError>;
}

#[derive(Debug, Clone)]
pub struct StudentRecord {
    pub id: Uuid,
    pub snapshot: StudentSnapshot,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub updated: usize,
    pub errors: usize,
    pub total_processed: usize,
}

/// Recomputes and saves every student's streak, one student at a time.
///
/// Records are pulled from `students` only as they are processed, so callers
/// can page them in lazily. Each save is awaited before the next student is
/// touched. A failed save is logged and counted; it never aborts the batch.
pub async fn update_all_streaks<I>(
    students: I,
    store: &dyn StreakStore,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> BatchSummary
where
    I: IntoIterator<Item = StudentRecord>,
{
    info!("Starting streak batch update");

    let mut summary = BatchSummary::default();
    for student in students {
        let streak = calculate_streak_with_offset(&student.snapshot, now, offset);
        match store.save_streak(student.id, &streak).await {
            Ok(()) => summary.updated += 1,
            Err(e) => {
                warn!(student_id = %student.id, error = %e, "Failed to save streak");
                summary.errors += 1;
            }
        }
        summary.total_processed += 1;
    }

    info!(
        updated = summary.updated,
        errors = summary.errors,
        total = summary.total_processed,
        "Streak batch update finished"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CodingLog;
    use chrono::{Duration, Offset, TimeZone};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct MemoryStore {
        saved: Mutex<Vec<(Uuid, StreakResult)>>,
        failing: HashSet<Uuid>,
    }

    #[async_trait]
    impl StreakStore for MemoryStore {
        async fn save_streak(
            &self,
            student_id: Uuid,
            streak: &StreakResult,
        ) -> Result<(), MetricsError> {
            if self.failing.contains(&student_id) {
                return Err(MetricsError::persistence(student_id, "connection reset"));
            }
            self.saved
                .lock()
                .map_err(|e| MetricsError::Internal(anyhow::anyhow!("poisoned: {e}")))?
                .push((student_id, *streak));
            Ok(())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn student(active_days: &[i64]) -> StudentRecord {
        StudentRecord {
            id: Uuid::new_v4(),
            snapshot: StudentSnapshot {
                coding_logs: active_days
                    .iter()
                    .map(|d| CodingLog {
                        date: Some(now() - Duration::days(*d)),
                        ..CodingLog::default()
                    })
                    .collect(),
                ..StudentSnapshot::default()
            },
        }
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    #[tokio::test]
    async fn test_saves_every_student_in_order() {
        init_tracing();
        let students = vec![student(&[0, 1]), student(&[]), student(&[3])];
        let store = MemoryStore::default();

        let summary = update_all_streaks(students.clone(), &store, now(), Utc.fix()).await;

        assert_eq!(
            summary,
            BatchSummary {
                updated: 3,
                errors: 0,
                total_processed: 3
            }
        );
        let saved = store.saved.lock().unwrap();
        let ids: Vec<Uuid> = saved.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, students.iter().map(|s| s.id).collect::<Vec<_>>());
        assert_eq!(saved[0].1.streak_days, 2);
        assert_eq!(saved[1].1, StreakResult::default());
        assert_eq!(saved[2].1.streak_days, 0);
        assert!(saved[2].1.last_active_at.is_some());
    }

    #[tokio::test]
    async fn test_failure_does_not_abort_batch() {
        init_tracing();
        let students = vec![student(&[0]), student(&[0]), student(&[0])];
        let store = MemoryStore {
            failing: HashSet::from([students[1].id]),
            ..MemoryStore::default()
        };

        let summary = update_all_streaks(students.clone(), &store, now(), Utc.fix()).await;

        assert_eq!(summary.updated, 2);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.total_processed, 3);
        let saved = store.saved.lock().unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[1].0, students[2].id);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let store = MemoryStore::default();
        let summary = update_all_streaks(Vec::new(), &store, now(), Utc.fix()).await;
        assert_eq!(summary, BatchSummary::default());
    }

    /// Records how many students had been loaded at the time of each save.
    struct LoadTrackingStore {
        loaded: Arc<AtomicUsize>,
        loaded_at_save: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl StreakStore for LoadTrackingStore {
        async fn save_streak(
            &self,
            _student_id: Uuid,
            _streak: &StreakResult,
        ) -> Result<(), MetricsError> {
            self.loaded_at_save
                .lock()
                .unwrap()
                .push(self.loaded.load(Ordering::SeqCst));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_students_are_loaded_one_at_a_time() {
        let loaded = Arc::new(AtomicUsize::new(0));
        let store = LoadTrackingStore {
            loaded: Arc::clone(&loaded),
            loaded_at_save: Mutex::new(Vec::new()),
        };
        let counter = Arc::clone(&loaded);
        let students = (0..4).map(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            student(&[0])
        });

        let summary = update_all_streaks(students, &store, now(), Utc.fix()).await;

        assert_eq!(summary.total_processed, 4);
        assert_eq!(*store.loaded_at_save.lock().unwrap(), vec![1, 2, 3, 4]);
    }
}
