use std::{collections::BTreeMap, fmt};

use log::debug;
use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::{
    ExerciseID, OneRepMaxFormula, ReadError, TrainingSession, TrainingSessionID, TrainingSet,
    UserID, Weight, WorkoutExercise,
};

#[allow(async_fn_in_trait)]
pub trait PersonalRecordService {
    async fn get_personal_records(&self, id: TrainingSessionID) -> Result<PrResult, ReadError>;
    async fn get_personal_records_for_feed(
        &self,
    ) -> Result<BTreeMap<TrainingSessionID, PrResult>, ReadError>;
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    HeaviestWeight,
    BestOneRepMax,
    MostReps,
}

impl RecordKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RecordKind::HeaviestWeight => "Heaviest Weight",
            RecordKind::BestOneRepMax => "Best 1RM",
            RecordKind::MostReps => "Most Reps",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A record is *current* as long as no later session of the same user exceeds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalRecord {
    pub kind: RecordKind,
    /// Sets of the exercise which achieved the record.
    pub set_indices: Vec<u32>,
    pub is_current: bool,
}

impl Serialize for PersonalRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PersonalRecord", 4)?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field("label", self.kind.label())?;
        state.serialize_field("set_indices", &self.set_indices)?;
        state.serialize_field("is_current", &self.is_current)?;
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseRecords {
    pub exercise_id: ExerciseID,
    pub exercise_name: String,
    pub records: Vec<PersonalRecord>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct PrResult {
    pub total_prs: usize,
    pub per_exercise: Vec<ExerciseRecords>,
}

impl PrResult {
    fn new(per_exercise: Vec<ExerciseRecords>) -> Self {
        Self {
            total_prs: per_exercise.iter().map(|e| e.records.len()).sum(),
            per_exercise,
        }
    }
}

/// Input of the PR evaluation of a single session.
///
/// `history` may contain sessions of other users and the evaluated session itself. Both are
/// ignored.
#[derive(Debug, Clone, Copy)]
pub struct PrContext<'a> {
    pub session: &'a TrainingSession,
    pub history: &'a [TrainingSession],
    pub formula: OneRepMaxFormula,
}

/// Determine the personal records achieved in a training session.
///
/// A set is a personal record (PR) if it beats all working sets of the same exercise which the
/// same user performed in earlier training sessions. Three kinds of records are distinguished:
///
/// - the heaviest weight,
/// - the best estimated one-rep max,
/// - the most reps at a given weight.
///
/// Bodyweight sets (sets without a weight) only compete for the most reps, in a separate bucket.
#[must_use]
pub fn compute_prs_for_session(context: &PrContext) -> PrResult {
    let session = context.session;

    if session.is_malformed() {
        debug!("skipping PR evaluation of malformed session {}", *session.id);
        return PrResult::default();
    }

    let mut before = Bests::default();
    let mut after = Bests::default();

    for other in context
        .history
        .iter()
        .filter(|s| s.user_id == session.user_id && s.id != session.id && !s.is_malformed())
    {
        if other.order_key() < session.order_key() {
            before.add_session(other, context.formula);
        } else {
            after.add_session(other, context.formula);
        }
    }

    find_candidates(session, &before, context.formula).into_result(&after, context.formula)
}

/// Determine the personal records of all training sessions.
///
/// Each session is evaluated against the other sessions of its user. The result is the same as
/// calling [`compute_prs_for_session`] for each session with all sessions as history, but the
/// history is traversed only twice.
#[must_use]
pub fn compute_prs_for_sessions(
    training_sessions: &[TrainingSession],
    formula: OneRepMaxFormula,
) -> BTreeMap<TrainingSessionID, PrResult> {
    let mut by_user: BTreeMap<UserID, Vec<&TrainingSession>> = BTreeMap::new();
    let mut results = BTreeMap::new();

    for session in training_sessions {
        if session.is_malformed() {
            debug!("skipping PR evaluation of malformed session {}", *session.id);
            results.insert(session.id, PrResult::default());
        } else {
            by_user.entry(session.user_id).or_default().push(session);
        }
    }

    for mut sessions in by_user.into_values() {
        sessions.sort_by_key(|s| s.order_key());

        let mut prefix = Bests::default();
        let candidates = sessions
            .iter()
            .map(|session| {
                let candidates = find_candidates(session, &prefix, formula);
                prefix.add_session(session, formula);
                candidates
            })
            .collect::<Vec<_>>();

        let mut suffix = Bests::default();
        for (session, candidates) in sessions.iter().zip(candidates).rev() {
            results.insert(session.id, candidates.into_result(&suffix, formula));
            suffix.add_session(session, formula);
        }
    }

    results
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum WeightBucket {
    Bodyweight,
    Load(u32),
}

impl WeightBucket {
    fn of(set: &TrainingSet) -> Self {
        set.weight
            .map_or(WeightBucket::Bodyweight, |w| WeightBucket::Load(w.key()))
    }
}

/// Best values of all working sets of an exercise.
///
/// Loads are compared by their [`Weight::key`], so loads which only differ by floating point
/// noise count as the same weight.
#[derive(Debug, Default)]
struct ExerciseBests {
    weight: Option<u32>,
    one_rep_max: Option<f32>,
    reps: BTreeMap<WeightBucket, u32>,
}

impl ExerciseBests {
    fn add_set(&mut self, set: &TrainingSet, formula: OneRepMaxFormula) {
        if !set.is_working_set() {
            return;
        }

        if let Some(weight) = weight_key(set) {
            self.weight = Some(self.weight.map_or(weight, |w| w.max(weight)));
        }

        if let Some(one_rep_max) = bucket_one_rep_max(set, formula) {
            self.one_rep_max = Some(self.one_rep_max.map_or(one_rep_max, |e| e.max(one_rep_max)));
        }

        let reps = set.reps.map_or(0, u32::from);
        let best = self.reps.entry(WeightBucket::of(set)).or_default();
        *best = (*best).max(reps);
    }

    fn is_beaten(&self, kind: RecordKind, set: &TrainingSet, formula: OneRepMaxFormula) -> bool {
        match kind {
            RecordKind::HeaviestWeight => weight_key(set)
                .is_some_and(|weight| self.weight.is_none_or(|best| weight > best)),
            RecordKind::BestOneRepMax => {
                bucket_one_rep_max(set, formula).is_some_and(|one_rep_max| {
                    self.one_rep_max.is_none_or(|best| one_rep_max > best)
                })
            }
            RecordKind::MostReps => {
                let reps = set.reps.map_or(0, u32::from);
                self.reps
                    .get(&WeightBucket::of(set))
                    .is_none_or(|best| reps > *best)
            }
        }
    }

    fn exceeds(&self, kind: RecordKind, set: &TrainingSet, formula: OneRepMaxFormula) -> bool {
        match kind {
            RecordKind::HeaviestWeight => self
                .weight
                .zip(weight_key(set))
                .is_some_and(|(best, weight)| best > weight),
            RecordKind::BestOneRepMax => self
                .one_rep_max
                .zip(bucket_one_rep_max(set, formula))
                .is_some_and(|(best, one_rep_max)| best > one_rep_max),
            RecordKind::MostReps => self
                .reps
                .get(&WeightBucket::of(set))
                .is_some_and(|best| *best > set.reps.map_or(0, u32::from)),
        }
    }
}

fn weight_key(set: &TrainingSet) -> Option<u32> {
    set.weight.map(Weight::key)
}

/// Estimated one-rep max of a set with its load rounded to the weight key.
fn bucket_one_rep_max(set: &TrainingSet, formula: OneRepMaxFormula) -> Option<f32> {
    #[allow(clippy::cast_precision_loss)]
    let weight = weight_key(set)? as f32 / 10.0;
    Some(formula.estimate(weight, u32::from(set.reps?)))
}

#[derive(Debug, Default)]
struct Bests(BTreeMap<ExerciseID, ExerciseBests>);

impl Bests {
    fn add_session(&mut self, session: &TrainingSession, formula: OneRepMaxFormula) {
        for exercise in &session.exercises {
            if exercise.exercise_id.is_nil() {
                continue;
            }
            let bests = self.0.entry(exercise.exercise_id).or_default();
            for set in &exercise.sets {
                bests.add_set(set, formula);
            }
        }
    }

    fn get(&self, exercise_id: ExerciseID) -> Option<&ExerciseBests> {
        self.0.get(&exercise_id)
    }
}

const KINDS: [RecordKind; 3] = [
    RecordKind::HeaviestWeight,
    RecordKind::BestOneRepMax,
    RecordKind::MostReps,
];

type Records<'a> = Vec<(RecordKind, Vec<&'a TrainingSet>)>;

/// Records of a session whose currentness is not yet known.
struct Candidates<'a>(Vec<(&'a WorkoutExercise, Records<'a>)>);

impl Candidates<'_> {
    fn into_result(self, later: &Bests, formula: OneRepMaxFormula) -> PrResult {
        PrResult::new(
            self.0
                .into_iter()
                .map(|(exercise, records)| {
                    let later = later.get(exercise.exercise_id);
                    ExerciseRecords {
                        exercise_id: exercise.exercise_id,
                        exercise_name: exercise.exercise_name.clone(),
                        records: records
                            .into_iter()
                            .map(|(kind, sets)| PersonalRecord {
                                kind,
                                set_indices: sets.iter().map(|s| s.set_index).collect(),
                                is_current: later.is_none_or(|later| {
                                    sets.iter().any(|set| !later.exceeds(kind, set, formula))
                                }),
                            })
                            .collect(),
                    }
                })
                .collect(),
        )
    }
}

fn find_candidates<'a>(
    session: &'a TrainingSession,
    earlier: &Bests,
    formula: OneRepMaxFormula,
) -> Candidates<'a> {
    let empty = ExerciseBests::default();

    Candidates(
        session
            .exercises
            .iter()
            .filter_map(|exercise| {
                if exercise.exercise_id.is_nil() {
                    debug!(
                        "skipping PR evaluation of exercise \"{}\" without ID",
                        exercise.exercise_name
                    );
                    return None;
                }
                let earlier = earlier.get(exercise.exercise_id).unwrap_or(&empty);
                let records = KINDS
                    .iter()
                    .filter_map(|kind| {
                        let sets = exercise
                            .working_sets()
                            .filter(|set| earlier.is_beaten(*kind, set, formula))
                            .collect::<Vec<_>>();
                        (!sets.is_empty()).then_some((*kind, sets))
                    })
                    .collect::<Vec<_>>();
                (!records.is_empty()).then_some((exercise, records))
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::Reps;

    use super::*;

    const BENCH_PRESS: u128 = 10;
    const PULL_UP: u128 = 11;

    fn set(set_index: u32, reps: u32, weight: Option<f32>) -> TrainingSet {
        TrainingSet {
            set_index,
            reps: Some(Reps::new(reps).unwrap()),
            weight: weight.map(|w| Weight::new(w).unwrap()),
            warmup: false,
        }
    }

    fn warmup(set_index: u32, reps: u32, weight: f32) -> TrainingSet {
        TrainingSet {
            warmup: true,
            ..set(set_index, reps, Some(weight))
        }
    }

    fn exercise(id: u128, name: &str, sets: Vec<TrainingSet>) -> WorkoutExercise {
        WorkoutExercise {
            exercise_id: id.into(),
            exercise_name: name.to_string(),
            gif_url: None,
            sets,
        }
    }

    fn session(id: u128, user: u128, day: u32, exercises: Vec<WorkoutExercise>) -> TrainingSession {
        TrainingSession {
            id: id.into(),
            user_id: user.into(),
            created_at: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(18, 0, 0)
                .unwrap(),
            exercises,
        }
    }

    fn bench_press(id: u128, day: u32, sets: Vec<TrainingSet>) -> TrainingSession {
        session(id, 1, day, vec![exercise(BENCH_PRESS, "Bench Press", sets)])
    }

    fn evaluate(session: &TrainingSession, history: &[TrainingSession]) -> PrResult {
        compute_prs_for_session(&PrContext {
            session,
            history,
            formula: OneRepMaxFormula::Epley,
        })
    }

    fn record(kind: RecordKind, set_indices: &[u32], is_current: bool) -> PersonalRecord {
        PersonalRecord {
            kind,
            set_indices: set_indices.to_vec(),
            is_current,
        }
    }

    fn kinds(result: &PrResult) -> Vec<RecordKind> {
        result
            .per_exercise
            .iter()
            .flat_map(|e| e.records.iter().map(|r| r.kind))
            .collect()
    }

    #[rstest]
    #[case(RecordKind::HeaviestWeight, "Heaviest Weight")]
    #[case(RecordKind::BestOneRepMax, "Best 1RM")]
    #[case(RecordKind::MostReps, "Most Reps")]
    fn test_record_kind_label(#[case] kind: RecordKind, #[case] expected: &str) {
        assert_eq!(kind.label(), expected);
        assert_eq!(kind.to_string(), expected);
    }

    #[test]
    fn test_personal_record_serialize() {
        assert_eq!(
            serde_json::to_string(&record(RecordKind::HeaviestWeight, &[0, 2], true)).unwrap(),
            r#"{"kind":"heaviest_weight","label":"Heaviest Weight","set_indices":[0,2],"is_current":true}"#
        );
    }

    #[test]
    fn test_first_session() {
        let first = bench_press(1, 1, vec![set(0, 5, Some(60.0)), set(1, 8, Some(50.0))]);
        assert_eq!(
            evaluate(&first, &[first.clone()]),
            PrResult {
                total_prs: 3,
                per_exercise: vec![ExerciseRecords {
                    exercise_id: BENCH_PRESS.into(),
                    exercise_name: String::from("Bench Press"),
                    records: vec![
                        record(RecordKind::HeaviestWeight, &[0, 1], true),
                        record(RecordKind::BestOneRepMax, &[0, 1], true),
                        record(RecordKind::MostReps, &[0, 1], true),
                    ],
                }],
            }
        );
    }

    #[test]
    fn test_bench_press_progression() {
        let history = vec![
            bench_press(1, 1, vec![set(0, 5, Some(60.0))]),
            bench_press(2, 8, vec![set(0, 5, Some(65.0))]),
        ];
        let result = evaluate(&history[1], &history);
        assert_eq!(result.total_prs, 3);
        assert_eq!(
            result.per_exercise[0].records,
            vec![
                record(RecordKind::HeaviestWeight, &[0], true),
                record(RecordKind::BestOneRepMax, &[0], true),
                record(RecordKind::MostReps, &[0], true),
            ]
        );
    }

    #[test]
    fn test_no_improvement() {
        let history = vec![
            bench_press(1, 1, vec![set(0, 5, Some(60.0))]),
            bench_press(2, 8, vec![set(0, 5, Some(60.0)), set(1, 3, Some(60.0))]),
        ];
        assert_eq!(evaluate(&history[1], &history), PrResult::default());
    }

    #[test]
    fn test_more_reps_at_lower_weight() {
        let history = vec![
            bench_press(1, 1, vec![set(0, 5, Some(60.0)), set(1, 8, Some(50.0))]),
            bench_press(2, 8, vec![set(0, 15, Some(50.0)), set(1, 6, Some(55.0))]),
        ];
        assert_eq!(
            evaluate(&history[1], &history).per_exercise[0].records,
            vec![
                record(RecordKind::BestOneRepMax, &[0], true),
                record(RecordKind::MostReps, &[0, 1], true),
            ]
        );
    }

    #[test]
    fn test_warmup_sets_are_ignored() {
        let history = vec![
            bench_press(1, 1, vec![set(0, 3, Some(100.0))]),
            bench_press(2, 8, vec![warmup(0, 10, 40.0), set(1, 3, Some(100.0))]),
        ];
        assert_eq!(evaluate(&history[1], &history), PrResult::default());

        let first = bench_press(3, 1, vec![warmup(0, 10, 40.0), set(1, 3, Some(100.0))]);
        let result = evaluate(&first, &[]);
        assert!(
            result
                .per_exercise
                .iter()
                .flat_map(|e| &e.records)
                .all(|r| r.set_indices == vec![1])
        );
    }

    #[test]
    fn test_warmup_sets_do_not_count_as_history() {
        let history = vec![
            bench_press(1, 1, vec![warmup(0, 1, 120.0), set(1, 5, Some(60.0))]),
            bench_press(2, 8, vec![set(0, 1, Some(100.0))]),
        ];
        assert_eq!(
            kinds(&evaluate(&history[1], &history)),
            vec![
                RecordKind::HeaviestWeight,
                RecordKind::BestOneRepMax,
                RecordKind::MostReps
            ]
        );
    }

    #[rstest]
    #[case::pounds_converted_differently(225.0 * 0.453_592_37, 225.0 / 2.204_622_6)]
    #[case::rounding_noise(60.0, 60.04)]
    fn test_same_weight_key(#[case] previous: f32, #[case] current: f32) {
        let history = vec![
            bench_press(1, 1, vec![set(0, 5, Some(previous))]),
            bench_press(2, 8, vec![set(0, 5, Some(current))]),
        ];
        assert_eq!(evaluate(&history[1], &history), PrResult::default());
        assert!(
            evaluate(&history[0], &history).per_exercise[0]
                .records
                .iter()
                .all(|r| r.is_current)
        );
    }

    #[test]
    fn test_bodyweight_sets() {
        let pull_ups =
            |id, day, sets| session(id, 1, day, vec![exercise(PULL_UP, "Pull Up", sets)]);
        let history = vec![
            pull_ups(1, 1, vec![set(0, 8, None), set(1, 5, Some(10.0))]),
            pull_ups(2, 8, vec![set(0, 9, None), set(1, 5, Some(10.0))]),
        ];
        assert_eq!(
            evaluate(&history[1], &history).per_exercise[0].records,
            vec![record(RecordKind::MostReps, &[0], true)]
        );
    }

    #[test]
    fn test_is_current() {
        let history = vec![
            bench_press(1, 1, vec![set(0, 5, Some(60.0))]),
            bench_press(2, 8, vec![set(0, 5, Some(70.0))]),
            bench_press(3, 15, vec![set(0, 5, Some(65.0)), set(1, 8, Some(60.0))]),
        ];
        assert_eq!(
            evaluate(&history[1], &history).per_exercise[0].records,
            vec![
                record(RecordKind::HeaviestWeight, &[0], true),
                record(RecordKind::BestOneRepMax, &[0], true),
                record(RecordKind::MostReps, &[0], true),
            ]
        );
        assert_eq!(
            evaluate(&history[0], &history).per_exercise[0].records,
            vec![
                record(RecordKind::HeaviestWeight, &[0], false),
                record(RecordKind::BestOneRepMax, &[0], false),
                record(RecordKind::MostReps, &[0], false),
            ]
        );
        assert_eq!(
            evaluate(&history[2], &history).per_exercise[0].records,
            vec![record(RecordKind::MostReps, &[0, 1], true)]
        );
    }

    #[test]
    fn test_idempotence() {
        let history = vec![
            bench_press(1, 1, vec![set(0, 5, Some(60.0))]),
            bench_press(2, 8, vec![set(0, 6, Some(62.5))]),
        ];
        assert_eq!(
            evaluate(&history[1], &history),
            evaluate(&history[1], &history)
        );
    }

    #[test]
    fn test_other_users_are_ignored() {
        let mut other = bench_press(1, 1, vec![set(0, 5, Some(150.0))]);
        other.user_id = 2.into();
        let session = bench_press(2, 8, vec![set(0, 5, Some(60.0))]);
        assert_eq!(evaluate(&session, &[other, session.clone()]).total_prs, 3);
    }

    #[test]
    fn test_exercises_are_distinguished_by_id() {
        let history = vec![
            bench_press(1, 1, vec![set(0, 5, Some(100.0)), set(1, 5, Some(60.0))]),
            session(
                2,
                1,
                8,
                vec![
                    exercise(BENCH_PRESS, "Bench Press", vec![set(0, 5, Some(60.0))]),
                    exercise(PULL_UP, "Pull Up", vec![set(0, 5, Some(60.0))]),
                ],
            ),
        ];
        let result = evaluate(&history[1], &history);
        assert_eq!(result.total_prs, 3);
        assert_eq!(
            result
                .per_exercise
                .iter()
                .map(|e| e.exercise_id)
                .collect::<Vec<_>>(),
            vec![ExerciseID::from(PULL_UP)]
        );
    }

    #[test]
    fn test_malformed_session() {
        let mut no_user = bench_press(1, 1, vec![set(0, 5, Some(60.0))]);
        no_user.user_id = UserID::nil();
        assert_eq!(evaluate(&no_user, &[]), PrResult::default());

        let no_exercises = session(2, 1, 1, vec![]);
        assert_eq!(evaluate(&no_exercises, &[]), PrResult::default());

        let no_exercise_id = session(
            3,
            1,
            1,
            vec![exercise(0, "Bench Press", vec![set(0, 5, Some(60.0))])],
        );
        assert_eq!(evaluate(&no_exercise_id, &[]), PrResult::default());
    }

    #[test]
    fn test_incomplete_sets() {
        let session = bench_press(
            1,
            1,
            vec![
                TrainingSet {
                    set_index: 0,
                    reps: None,
                    weight: Some(Weight::new(100.0).unwrap()),
                    warmup: false,
                },
                set(1, 0, Some(100.0)),
            ],
        );
        assert_eq!(evaluate(&session, &[]), PrResult::default());
    }

    #[test]
    fn test_compute_prs_for_sessions() {
        let mut other = bench_press(5, 3, vec![set(0, 5, Some(150.0))]);
        other.user_id = 2.into();
        let mut malformed = bench_press(6, 4, vec![set(0, 5, Some(150.0))]);
        malformed.user_id = UserID::nil();
        let sessions = vec![
            bench_press(3, 15, vec![set(0, 5, Some(65.0)), set(1, 8, Some(60.0))]),
            bench_press(1, 1, vec![set(0, 5, Some(60.0))]),
            other,
            malformed,
            bench_press(2, 8, vec![set(0, 5, Some(70.0)), warmup(1, 10, 40.0)]),
            bench_press(4, 15, vec![set(0, 5, Some(65.0))]),
        ];

        let results = compute_prs_for_sessions(&sessions, OneRepMaxFormula::Epley);

        assert_eq!(results.len(), sessions.len());
        for session in &sessions {
            assert_eq!(
                results[&session.id],
                evaluate(session, &sessions),
                "session {}",
                *session.id
            );
        }
    }
}
