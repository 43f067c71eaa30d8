use std::hash::{DefaultHasher, Hash, Hasher};

use chrono::NaiveDateTime;
use derive_more::Deref;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ExerciseID, OneRepMaxFormula, ReadError, Reps, UserID, Weight};

#[allow(async_fn_in_trait)]
pub trait TrainingSessionRepository {
    async fn read_training_sessions(&self) -> Result<Vec<TrainingSession>, ReadError>;
}

#[derive(Debug, Clone, Hash, PartialEq, Serialize, Deserialize)]
pub struct TrainingSession {
    pub id: TrainingSessionID,
    pub user_id: UserID,
    pub created_at: NaiveDateTime,
    pub exercises: Vec<WorkoutExercise>,
}

impl TrainingSession {
    /// Key for the chronological order of sessions.
    ///
    /// Sessions created at the same time are ordered by their ID.
    #[must_use]
    pub fn order_key(&self) -> (NaiveDateTime, TrainingSessionID) {
        (self.created_at, self.id)
    }

    /// Missing a user or exercises, so nothing can be derived from it.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        self.user_id.is_nil() || self.exercises.is_empty()
    }
}

#[derive(
    Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TrainingSessionID(Uuid);

impl TrainingSessionID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for TrainingSessionID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for TrainingSessionID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, Hash, PartialEq, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub exercise_id: ExerciseID,
    pub exercise_name: String,
    #[serde(default)]
    pub gif_url: Option<String>,
    pub sets: Vec<TrainingSet>,
}

impl WorkoutExercise {
    /// Sets which count for records and strength estimates.
    ///
    /// Warmup sets and sets without any completed repetition are left out.
    pub fn working_sets(&self) -> impl Iterator<Item = &TrainingSet> {
        self.sets.iter().filter(|s| s.is_working_set())
    }

    /// Highest estimated one-rep max of all working sets with a load.
    #[must_use]
    pub fn max_one_rep_max(&self, formula: OneRepMaxFormula) -> Option<f32> {
        self.working_sets()
            .filter_map(|s| s.one_rep_max(formula))
            .reduce(f32::max)
    }
}

#[derive(Debug, Clone, Hash, PartialEq, Serialize, Deserialize)]
pub struct TrainingSet {
    pub set_index: u32,
    pub reps: Option<Reps>,
    /// `None` for sets performed with bodyweight only.
    pub weight: Option<Weight>,
    #[serde(default)]
    pub warmup: bool,
}

impl TrainingSet {
    #[must_use]
    pub fn is_working_set(&self) -> bool {
        !self.warmup && self.reps.is_some_and(|r| u32::from(r) > 0)
    }

    #[must_use]
    pub fn one_rep_max(&self, formula: OneRepMaxFormula) -> Option<f32> {
        Some(formula.estimate(f32::from(self.weight?), u32::from(self.reps?)))
    }
}

/// Fingerprint of a session history.
///
/// Two histories with the same version are treated as identical by the caches of the
/// [`Service`](crate::Service).
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct HistoryVersion(u64);

impl HistoryVersion {
    #[must_use]
    pub fn of(training_sessions: &[TrainingSession]) -> Self {
        let mut hasher = DefaultHasher::new();
        training_sessions.hash(&mut hasher);
        Self(hasher.finish())
    }
}
