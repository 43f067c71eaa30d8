use std::{fmt, slice::Iter};

use serde::{Deserialize, Serialize};

use crate::{Gender, Ladder, Property, StandardsCatalog};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthLevel {
    Beginner = 1,
    Novice = 2,
    Intermediate = 3,
    Advanced = 4,
    Elite = 5,
    WorldClass = 6,
}

impl StrengthLevel {
    pub const ALL: [StrengthLevel; 6] = [
        StrengthLevel::Beginner,
        StrengthLevel::Novice,
        StrengthLevel::Intermediate,
        StrengthLevel::Advanced,
        StrengthLevel::Elite,
        StrengthLevel::WorldClass,
    ];

    /// Position of the level, starting at 1 for Beginner.
    #[must_use]
    pub fn index(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        StrengthLevel::ALL
            .iter()
            .find(|level| level.index() == index)
            .copied()
    }

    #[must_use]
    pub fn next(self) -> Option<Self> {
        StrengthLevel::from_index(self.index() + 1)
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            StrengthLevel::Beginner => "Stronger than 5% of lifters",
            StrengthLevel::Novice => "Stronger than 20% of lifters",
            StrengthLevel::Intermediate => "Stronger than 50% of lifters",
            StrengthLevel::Advanced => "Stronger than 80% of lifters",
            StrengthLevel::Elite => "Stronger than 95% of lifters",
            StrengthLevel::WorldClass => "Stronger than 99% of lifters",
        }
    }
}

impl Property for StrengthLevel {
    fn iter() -> Iter<'static, StrengthLevel> {
        StrengthLevel::ALL.iter()
    }

    fn name(self) -> &'static str {
        match self {
            StrengthLevel::Beginner => "Beginner",
            StrengthLevel::Novice => "Novice",
            StrengthLevel::Intermediate => "Intermediate",
            StrengthLevel::Advanced => "Advanced",
            StrengthLevel::Elite => "Elite",
            StrengthLevel::WorldClass => "World Class",
        }
    }
}

impl fmt::Display for StrengthLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Classification of a lifter against a strength standard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrengthInfo {
    pub level: StrengthLevel,
    /// Progress from the current level to the next level in percent.
    pub progress: f32,
    pub next_level: Option<StrengthLevel>,
}

impl StrengthInfo {
    const MAX_SCORE: f32 = 6.0;

    /// Level index plus the fractional progress, at most 6.
    #[must_use]
    pub fn score(&self) -> f32 {
        (f32::from(self.level.index()) + self.progress / 100.0).min(Self::MAX_SCORE)
    }

    /// Inverse of [`StrengthInfo::score`].
    ///
    /// Scores below 1 are clamped to Beginner without progress. Scores of 6 and above result in
    /// World Class with full progress.
    #[must_use]
    pub fn from_score(score: f32) -> Self {
        if score >= Self::MAX_SCORE {
            return Self::top();
        }

        let score = if score.is_finite() { score.max(1.0) } else { 1.0 };
        let floor = score.floor();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let level = StrengthLevel::from_index(floor as u8).unwrap_or(StrengthLevel::Beginner);

        Self {
            level,
            progress: clamp_progress((score - floor) * 100.0),
            next_level: level.next(),
        }
    }

    fn top() -> Self {
        Self {
            level: StrengthLevel::WorldClass,
            progress: 100.0,
            next_level: None,
        }
    }
}

/// Classify a lift of `one_rep_max` kg by a lifter of `body_weight` kg.
///
/// Returns `None` if the exercise has no standards or the profile data is insufficient. This is
/// never to be treated as Beginner.
#[must_use]
pub fn strength_standard(
    catalog: &impl StandardsCatalog,
    exercise_name: &str,
    gender: Option<Gender>,
    body_weight: Option<f32>,
    one_rep_max: f32,
) -> Option<StrengthInfo> {
    let gender = gender?;
    let body_weight = body_weight.filter(|bw| bw.is_finite() && *bw > 0.0)?;

    if !one_rep_max.is_finite() || one_rep_max < 0.0 {
        return None;
    }

    let ladder = catalog.ladder(exercise_name, gender)?;

    Some(classify(ladder, one_rep_max / body_weight))
}

/// Classify a bodyweight ratio against a ladder.
///
/// The current level is the highest level whose multiplier is not above the ratio. A ratio below
/// the first multiplier is Beginner with the progress measured from zero to the first multiplier.
#[must_use]
pub fn classify(ladder: &Ladder, ratio: f32) -> StrengthInfo {
    let steps = ladder.steps();

    let Some(current) = steps.iter().rposition(|step| step.multiplier <= ratio) else {
        return StrengthInfo {
            level: StrengthLevel::Beginner,
            progress: clamp_progress(ratio / steps[0].multiplier * 100.0),
            next_level: StrengthLevel::Beginner.next(),
        };
    };

    let Some(next) = steps.get(current + 1) else {
        return StrengthInfo::top();
    };

    let lower = steps[current].multiplier;

    StrengthInfo {
        level: steps[current].level,
        progress: clamp_progress((ratio - lower) / (next.multiplier - lower) * 100.0),
        next_level: Some(next.level),
    }
}

fn clamp_progress(progress: f32) -> f32 {
    if progress.is_finite() {
        progress.clamp(0.0, 100.0)
    } else {
        0.0
    }
}
