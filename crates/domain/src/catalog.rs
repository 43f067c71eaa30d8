use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Gender, MuscleGroup, StrengthLevel};

/// Lookup of strength standards by exercise name.
///
/// Exercise names are matched after normalization: surrounding whitespace is removed, inner
/// whitespace is collapsed and the name is converted to lowercase. A fixed list of aliases maps
/// common alternative names onto the canonical name.
pub trait StandardsCatalog {
    /// Canonical name of the exercise, if the exercise has standards.
    fn canonical_name(&self, exercise_name: &str) -> Option<&str>;
    fn ladder(&self, exercise_name: &str, gender: Gender) -> Option<&Ladder>;
    fn muscle_group(&self, exercise_name: &str) -> Option<MuscleGroup>;

    fn has_strength_standards(&self, exercise_name: &str) -> bool {
        self.ladder(exercise_name, Gender::MALE).is_some()
            || self.ladder(exercise_name, Gender::FEMALE).is_some()
    }
}

impl<T: StandardsCatalog + ?Sized> StandardsCatalog for &T {
    fn canonical_name(&self, exercise_name: &str) -> Option<&str> {
        (**self).canonical_name(exercise_name)
    }

    fn ladder(&self, exercise_name: &str, gender: Gender) -> Option<&Ladder> {
        (**self).ladder(exercise_name, gender)
    }

    fn muscle_group(&self, exercise_name: &str) -> Option<MuscleGroup> {
        (**self).muscle_group(exercise_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LadderStep {
    pub level: StrengthLevel,
    pub multiplier: f32,
}

impl LadderStep {
    #[must_use]
    pub fn description(&self) -> &'static str {
        self.level.description()
    }
}

/// Six steps, one per strength level, with strictly increasing multipliers.
///
/// A multiplier is a ratio of one-rep max to bodyweight. A lifter reaches a level when their
/// ratio is at least the multiplier of that level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ladder {
    steps: [LadderStep; 6],
}

impl Ladder {
    /// Create a ladder from the multipliers of all levels, ordered from Beginner to World Class.
    pub fn new(multipliers: [f32; 6]) -> Result<Self, LadderError> {
        let ladder = Self::from_multipliers(multipliers);

        for step in &ladder.steps {
            if !step.multiplier.is_finite() || step.multiplier <= 0.0 {
                return Err(LadderError::NotPositive(step.level));
            }
        }

        for pair in ladder.steps.windows(2) {
            if pair[1].multiplier <= pair[0].multiplier {
                return Err(LadderError::NotIncreasing(pair[1].level, pair[0].level));
            }
        }

        Ok(ladder)
    }

    const fn from_multipliers(multipliers: [f32; 6]) -> Self {
        let levels = StrengthLevel::ALL;
        Self {
            steps: [
                LadderStep {
                    level: levels[0],
                    multiplier: multipliers[0],
                },
                LadderStep {
                    level: levels[1],
                    multiplier: multipliers[1],
                },
                LadderStep {
                    level: levels[2],
                    multiplier: multipliers[2],
                },
                LadderStep {
                    level: levels[3],
                    multiplier: multipliers[3],
                },
                LadderStep {
                    level: levels[4],
                    multiplier: multipliers[4],
                },
                LadderStep {
                    level: levels[5],
                    multiplier: multipliers[5],
                },
            ],
        }
    }

    #[must_use]
    pub fn steps(&self) -> &[LadderStep] {
        &self.steps
    }

    #[must_use]
    pub fn multiplier(&self, level: StrengthLevel) -> f32 {
        self.steps[usize::from(level.index()) - 1].multiplier
    }

    /// One-rep max needed to reach `level` at the given bodyweight.
    #[must_use]
    pub fn one_rep_max_for(&self, level: StrengthLevel, body_weight: f32) -> Option<f32> {
        if body_weight.is_finite() && body_weight > 0.0 {
            Some(self.multiplier(level) * body_weight)
        } else {
            None
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum LadderError {
    #[error("Multiplier of {0} must be a positive number")]
    NotPositive(StrengthLevel),
    #[error("Multiplier of {0} must be greater than multiplier of {1}")]
    NotIncreasing(StrengthLevel, StrengthLevel),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseStandards {
    pub name: String,
    pub muscle_group: MuscleGroup,
    pub male: Ladder,
    pub female: Ladder,
}

impl ExerciseStandards {
    #[must_use]
    pub fn ladder(&self, gender: Gender) -> &Ladder {
        match gender {
            Gender::FEMALE => &self.female,
            Gender::MALE => &self.male,
        }
    }
}

/// Table of strength standards.
///
/// [`Standards::builtin`] provides the standards for the supported lifts. Custom tables can be
/// assembled with [`Standards::insert`] and [`Standards::alias`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Standards {
    exercises: BTreeMap<String, ExerciseStandards>,
    aliases: BTreeMap<String, String>,
}

impl Standards {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builtin() -> &'static Standards {
        &BUILTIN_STANDARDS
    }

    pub fn insert(&mut self, standards: ExerciseStandards) {
        self.exercises
            .insert(normalize_exercise_name(&standards.name), standards);
    }

    /// Make `alias` resolve to the exercise named `name`.
    pub fn alias(&mut self, alias: &str, name: &str) {
        self.aliases
            .insert(normalize_exercise_name(alias), normalize_exercise_name(name));
    }

    pub fn exercises(&self) -> impl Iterator<Item = &ExerciseStandards> {
        self.exercises.values()
    }

    #[must_use]
    pub fn get(&self, exercise_name: &str) -> Option<&ExerciseStandards> {
        let key = normalize_exercise_name(exercise_name);
        self.exercises.get(&key).or_else(|| {
            self.aliases
                .get(&key)
                .and_then(|name| self.exercises.get(name))
        })
    }
}

impl StandardsCatalog for Standards {
    fn canonical_name(&self, exercise_name: &str) -> Option<&str> {
        self.get(exercise_name).map(|e| e.name.as_str())
    }

    fn ladder(&self, exercise_name: &str, gender: Gender) -> Option<&Ladder> {
        self.get(exercise_name).map(|e| e.ladder(gender))
    }

    fn muscle_group(&self, exercise_name: &str) -> Option<MuscleGroup> {
        self.get(exercise_name).map(|e| e.muscle_group)
    }
}

#[must_use]
pub fn normalize_exercise_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

struct BuiltinStandard {
    name: &'static str,
    muscle_group: MuscleGroup,
    male: [f32; 6],
    female: [f32; 6],
    aliases: &'static [&'static str],
}

static BUILTIN_STANDARDS: std::sync::LazyLock<Standards> = std::sync::LazyLock::new(|| {
    let mut standards = Standards::new();
    for builtin in &BUILTIN {
        standards.insert(ExerciseStandards {
            name: builtin.name.to_string(),
            muscle_group: builtin.muscle_group,
            male: Ladder::from_multipliers(builtin.male),
            female: Ladder::from_multipliers(builtin.female),
        });
        for alias in builtin.aliases {
            standards.alias(alias, builtin.name);
        }
    }
    standards
});

const BUILTIN: [BuiltinStandard; 12] = [
    BuiltinStandard {
        name: "Bench Press",
        muscle_group: MuscleGroup::Chest,
        male: [0.50, 0.75, 1.00, 1.25, 1.50, 2.00],
        female: [0.25, 0.40, 0.55, 0.75, 1.00, 1.25],
        aliases: &["Barbell Bench Press", "Flat Bench Press", "Bench"],
    },
    BuiltinStandard {
        name: "Incline Bench Press",
        muscle_group: MuscleGroup::Chest,
        male: [0.40, 0.60, 0.85, 1.10, 1.35, 1.70],
        female: [0.20, 0.30, 0.45, 0.60, 0.80, 1.00],
        aliases: &["Incline Barbell Bench Press", "Barbell Incline Bench Press"],
    },
    BuiltinStandard {
        name: "Squat",
        muscle_group: MuscleGroup::Legs,
        male: [0.75, 1.00, 1.25, 1.75, 2.25, 2.75],
        female: [0.50, 0.75, 1.00, 1.25, 1.75, 2.25],
        aliases: &["Back Squat", "Barbell Squat", "Barbell Back Squat"],
    },
    BuiltinStandard {
        name: "Front Squat",
        muscle_group: MuscleGroup::Legs,
        male: [0.60, 0.80, 1.00, 1.40, 1.80, 2.20],
        female: [0.40, 0.55, 0.75, 1.00, 1.30, 1.65],
        aliases: &["Barbell Front Squat"],
    },
    BuiltinStandard {
        name: "Leg Press",
        muscle_group: MuscleGroup::Legs,
        male: [1.00, 1.50, 2.25, 3.00, 3.75, 4.50],
        female: [0.75, 1.15, 1.75, 2.40, 3.10, 3.80],
        aliases: &["Machine Leg Press", "Sled Leg Press"],
    },
    BuiltinStandard {
        name: "Hip Thrust",
        muscle_group: MuscleGroup::Legs,
        male: [0.75, 1.00, 1.50, 2.00, 2.75, 3.50],
        female: [0.50, 0.75, 1.15, 1.60, 2.20, 2.80],
        aliases: &["Barbell Hip Thrust"],
    },
    BuiltinStandard {
        name: "Romanian Deadlift",
        muscle_group: MuscleGroup::Legs,
        male: [0.65, 0.85, 1.10, 1.50, 1.90, 2.30],
        female: [0.45, 0.60, 0.80, 1.10, 1.45, 1.80],
        aliases: &["RDL", "Barbell Romanian Deadlift"],
    },
    BuiltinStandard {
        name: "Deadlift",
        muscle_group: MuscleGroup::Back,
        male: [1.00, 1.25, 1.50, 2.00, 2.50, 3.00],
        female: [0.60, 0.85, 1.15, 1.50, 2.00, 2.50],
        aliases: &["Barbell Deadlift", "Conventional Deadlift"],
    },
    BuiltinStandard {
        name: "Barbell Row",
        muscle_group: MuscleGroup::Back,
        male: [0.50, 0.65, 0.85, 1.10, 1.35, 1.65],
        female: [0.30, 0.40, 0.55, 0.75, 0.95, 1.15],
        aliases: &["Bent Over Row", "Bent Over Barbell Row", "Pendlay Row"],
    },
    BuiltinStandard {
        name: "Lat Pulldown",
        muscle_group: MuscleGroup::Back,
        male: [0.50, 0.65, 0.85, 1.05, 1.30, 1.55],
        female: [0.30, 0.40, 0.55, 0.70, 0.90, 1.10],
        aliases: &["Cable Lat Pulldown", "Wide Grip Lat Pulldown"],
    },
    BuiltinStandard {
        name: "Overhead Press",
        muscle_group: MuscleGroup::Shoulders,
        male: [0.35, 0.50, 0.65, 0.85, 1.05, 1.30],
        female: [0.20, 0.30, 0.40, 0.55, 0.70, 0.90],
        aliases: &["OHP", "Military Press", "Barbell Overhead Press", "Standing Press"],
    },
    BuiltinStandard {
        name: "Barbell Curl",
        muscle_group: MuscleGroup::Arms,
        male: [0.20, 0.30, 0.45, 0.60, 0.80, 1.00],
        female: [0.10, 0.15, 0.25, 0.35, 0.45, 0.60],
        aliases: &["Barbell Bicep Curl", "Barbell Biceps Curl", "Curl"],
    },
];
