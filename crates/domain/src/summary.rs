use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::{
    ExerciseID, GroupExercise, MuscleGroup, MuscleGroupData, Profile, ReadError, Settings,
    StandardsCatalog, StrengthInfo, TrainingSession, aggregate_muscle_groups,
    aggregate_overall_level, strength_standard, weakest_muscle_group,
};

#[allow(async_fn_in_trait)]
pub trait StrengthService {
    async fn get_strength_summary(&self) -> Result<StrengthSummary, ReadError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseStrength {
    pub exercise_id: ExerciseID,
    pub exercise_name: String,
    pub gif_url: Option<String>,
    pub max_one_rep_max: f32,
    /// `None` if the exercise has no strength standards.
    pub muscle_group: Option<MuscleGroup>,
    pub strength: Option<StrengthInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrengthSummary {
    pub exercises: Vec<ExerciseStrength>,
    pub muscle_groups: Vec<MuscleGroupData>,
    pub weakest_muscle_group: Option<MuscleGroup>,
    pub overall: Option<StrengthInfo>,
}

/// Best one-rep max of an exercise and the names it was logged under.
struct Best<'a> {
    one_rep_max: f32,
    /// Name of the latest session.
    name: &'a str,
    /// Latest name known to the catalog.
    standards_name: Option<&'a str>,
    gif_url: Option<&'a str>,
}

/// Classify the strength of a lifter based on their training history.
///
/// The best estimated one-rep max is determined for each exercise. If an exercise was performed
/// under different names, the name used in the latest session is reported, while the standards
/// are looked up by the latest name known to the catalog. Without gender or bodyweight in the
/// profile, all levels are `None`, but the one-rep maxes are still reported.
#[must_use]
pub fn strength_summary(
    training_sessions: &[TrainingSession],
    profile: &Profile,
    catalog: &impl StandardsCatalog,
    settings: Settings,
) -> StrengthSummary {
    let mut sessions = training_sessions
        .iter()
        .filter(|s| !s.exercises.is_empty())
        .collect::<Vec<_>>();
    sessions.sort_by_key(|s| s.order_key());

    let mut best: BTreeMap<ExerciseID, Best> = BTreeMap::new();

    for exercise in sessions.iter().flat_map(|s| &s.exercises) {
        if exercise.exercise_id.is_nil() {
            debug!("ignoring exercise \"{}\" without ID", exercise.exercise_name);
            continue;
        }
        let Some(one_rep_max) = exercise.max_one_rep_max(settings.formula) else {
            continue;
        };
        let entry = best.entry(exercise.exercise_id).or_insert(Best {
            one_rep_max,
            name: "",
            standards_name: None,
            gif_url: None,
        });
        entry.one_rep_max = entry.one_rep_max.max(one_rep_max);
        entry.name = exercise.exercise_name.as_str();
        entry.gif_url = exercise.gif_url.as_deref();
        if catalog.canonical_name(&exercise.exercise_name).is_some() {
            entry.standards_name = Some(exercise.exercise_name.as_str());
        }
    }

    let mut exercises = Vec::with_capacity(best.len());
    let mut group_exercises = Vec::new();
    for (exercise_id, b) in best {
        let standards_name = b.standards_name.unwrap_or(b.name);
        let muscle_group = catalog.muscle_group(standards_name);
        if let Some(muscle_group) = muscle_group {
            group_exercises.push(GroupExercise {
                exercise_id,
                exercise_name: standards_name.to_string(),
                max_one_rep_max: b.one_rep_max,
                muscle_group,
                gif_url: b.gif_url.map(str::to_string),
            });
        }
        exercises.push(ExerciseStrength {
            exercise_id,
            exercise_name: b.name.to_string(),
            gif_url: b.gif_url.map(str::to_string),
            max_one_rep_max: b.one_rep_max,
            muscle_group,
            strength: strength_standard(
                catalog,
                standards_name,
                profile.gender,
                profile.body_weight,
                b.one_rep_max,
            ),
        });
    }
    exercises.sort_by(|a, b| {
        a.exercise_name
            .cmp(&b.exercise_name)
            .then(a.exercise_id.cmp(&b.exercise_id))
    });

    let muscle_groups = aggregate_muscle_groups(
        catalog,
        &group_exercises,
        profile.gender,
        profile.body_weight,
        settings.group_scoring,
    );

    let overall = aggregate_overall_level(
        &exercises
            .iter()
            .filter_map(|e| e.strength)
            .collect::<Vec<_>>(),
    );

    StrengthSummary {
        weakest_muscle_group: weakest_muscle_group(&muscle_groups).map(|g| g.group),
        exercises,
        muscle_groups,
        overall,
    }
}
