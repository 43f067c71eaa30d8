use crate::{GroupScoring, StrengthInfo};

/// Combine per-exercise or per-muscle-group classifications into one overall level.
///
/// The overall score is the mean of all scores (level index plus fractional progress). Returns
/// `None` if there is nothing to combine.
#[must_use]
pub fn aggregate_overall_level(levels: &[StrengthInfo]) -> Option<StrengthInfo> {
    let scores = levels.iter().map(StrengthInfo::score).collect::<Vec<_>>();
    GroupScoring::Average
        .combine(&scores)
        .map(StrengthInfo::from_score)
}
