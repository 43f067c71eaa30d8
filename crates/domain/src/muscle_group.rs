use log::debug;
use serde::Serialize;

use crate::{
    ExerciseID, Gender, GroupScoring, MuscleGroup, Property, StandardsCatalog, StrengthInfo,
    strength_standard,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupExercise {
    pub exercise_id: ExerciseID,
    pub exercise_name: String,
    pub max_one_rep_max: f32,
    pub muscle_group: MuscleGroup,
    pub gif_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MuscleGroupData {
    pub group: MuscleGroup,
    /// `None` if no exercise of the group could be classified.
    pub strength: Option<StrengthInfo>,
    pub exercises: Vec<GroupExercise>,
}

impl MuscleGroupData {
    #[must_use]
    pub fn is_tracked(&self) -> bool {
        self.strength.is_some()
    }

    #[must_use]
    pub fn score(&self) -> Option<f32> {
        self.strength.as_ref().map(StrengthInfo::score)
    }
}

/// Classify a muscle group by the exercises assigned to it.
///
/// Exercises without standards or without a computable classification are kept in the result but
/// do not contribute to the level of the group.
#[must_use]
pub fn aggregate_muscle_group(
    catalog: &impl StandardsCatalog,
    group: MuscleGroup,
    exercises: Vec<GroupExercise>,
    gender: Option<Gender>,
    body_weight: Option<f32>,
    scoring: GroupScoring,
) -> MuscleGroupData {
    let scores = exercises
        .iter()
        .filter_map(|e| {
            strength_standard(
                catalog,
                &e.exercise_name,
                gender,
                body_weight,
                e.max_one_rep_max,
            )
        })
        .map(|info| info.score())
        .collect::<Vec<_>>();

    if scores.is_empty() {
        debug!("no classifiable exercises for muscle group {}", group.name());
    }

    MuscleGroupData {
        group,
        strength: scoring.combine(&scores).map(StrengthInfo::from_score),
        exercises,
    }
}

/// Classify all muscle groups.
///
/// The result contains every muscle group in a fixed order, including untracked groups.
#[must_use]
pub fn aggregate_muscle_groups(
    catalog: &impl StandardsCatalog,
    exercises: &[GroupExercise],
    gender: Option<Gender>,
    body_weight: Option<f32>,
    scoring: GroupScoring,
) -> Vec<MuscleGroupData> {
    MuscleGroup::iter()
        .map(|group| {
            aggregate_muscle_group(
                catalog,
                *group,
                exercises
                    .iter()
                    .filter(|e| e.muscle_group == *group)
                    .cloned()
                    .collect(),
                gender,
                body_weight,
                scoring,
            )
        })
        .collect()
}

/// Tracked muscle group with the lowest score.
///
/// On equal scores the group which comes first is returned.
#[must_use]
pub fn weakest_muscle_group(groups: &[MuscleGroupData]) -> Option<&MuscleGroupData> {
    groups
        .iter()
        .filter_map(|g| g.score().map(|score| (g, score)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(g, _)| g)
}
