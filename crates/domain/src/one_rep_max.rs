use serde::{Deserialize, Serialize};

/// Maximum reps for which the Brzycki and Lander formulas are considered reliable.
///
/// Both formulas have a singularity (Brzycki at 37 reps, Lander at about 38 reps).
const MAX_RELIABLE_REPS: u32 = 15;

/// Formula for estimating the one-rep max from a submaximal set.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OneRepMaxFormula {
    /// `w × (1 + r/30)`
    #[default]
    Epley,
    /// `w × 36 / (37 − r)`
    Brzycki,
    /// `w × 100 / (101.3 − 2.67 × r)`
    Lander,
    /// Mean of Epley, Brzycki and Lander.
    Average,
}

impl OneRepMaxFormula {
    /// Estimate the one-rep max of a set.
    ///
    /// A single rep returns the weight unchanged. Zero reps are clamped to one. A weight that is
    /// zero, negative or not finite results in zero. The result is non-decreasing in both weight
    /// and reps.
    #[must_use]
    pub fn estimate(self, weight: f32, reps: u32) -> f32 {
        if !weight.is_finite() || weight <= 0.0 {
            return 0.0;
        }

        if reps <= 1 {
            return weight;
        }

        #[allow(clippy::cast_precision_loss)]
        let (r, capped) = (reps as f32, reps.min(MAX_RELIABLE_REPS) as f32);

        match self {
            OneRepMaxFormula::Epley => epley(weight, r),
            OneRepMaxFormula::Brzycki => brzycki(weight, capped),
            OneRepMaxFormula::Lander => lander(weight, capped),
            OneRepMaxFormula::Average => {
                (epley(weight, capped) + brzycki(weight, capped) + lander(weight, capped)) / 3.0
            }
        }
    }
}

/// Estimate the one-rep max using the Epley formula.
#[must_use]
pub fn estimate_one_rep_max(weight: f32, reps: u32) -> f32 {
    OneRepMaxFormula::Epley.estimate(weight, reps)
}

fn epley(weight: f32, reps: f32) -> f32 {
    weight * (1.0 + reps / 30.0)
}

fn brzycki(weight: f32, reps: f32) -> f32 {
    weight * 36.0 / (37.0 - reps)
}

fn lander(weight: f32, reps: f32) -> f32 {
    weight * 100.0 / (101.3 - 2.67 * reps)
}
