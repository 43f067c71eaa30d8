use serde::{Deserialize, Serialize};

use crate::OneRepMaxFormula;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub formula: OneRepMaxFormula,
    pub group_scoring: GroupScoring,
}

/// How the scores of the exercises of a muscle group are combined.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupScoring {
    /// Mean of all exercise scores, which rewards balanced development.
    #[default]
    Average,
    /// Lowest exercise score.
    WeakestLink,
}

impl GroupScoring {
    /// Combine scores, ignoring values which are not finite.
    #[must_use]
    pub fn combine(self, scores: &[f32]) -> Option<f32> {
        let scores = scores
            .iter()
            .copied()
            .filter(|s| s.is_finite())
            .collect::<Vec<_>>();

        if scores.is_empty() {
            return None;
        }

        match self {
            GroupScoring::Average => {
                #[allow(clippy::cast_precision_loss)]
                Some(scores.iter().sum::<f32>() / scores.len() as f32)
            }
            GroupScoring::WeakestLink => scores.into_iter().reduce(f32::min),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_settings_default() {
        assert_eq!(
            Settings::default(),
            Settings {
                formula: OneRepMaxFormula::Epley,
                group_scoring: GroupScoring::Average,
            }
        );
    }

    #[rstest]
    #[case("{}", Settings::default())]
    #[case(
        r#"{"formula": "brzycki"}"#,
        Settings { formula: OneRepMaxFormula::Brzycki, ..Settings::default() }
    )]
    #[case(
        r#"{"formula": "average", "group_scoring": "weakest_link"}"#,
        Settings { formula: OneRepMaxFormula::Average, group_scoring: GroupScoring::WeakestLink }
    )]
    fn test_settings_deserialize(#[case] json: &str, #[case] expected: Settings) {
        assert_eq!(serde_json::from_str::<Settings>(json).unwrap(), expected);
    }

    #[test]
    fn test_settings_deserialize_unknown_formula() {
        assert!(serde_json::from_str::<Settings>(r#"{"formula": "wathan"}"#).is_err());
    }

    #[test]
    fn test_settings_serialize() {
        assert_eq!(
            serde_json::to_string(&Settings::default()).unwrap(),
            r#"{"formula":"epley","group_scoring":"average"}"#
        );
    }

    #[rstest]
    #[case(GroupScoring::Average, &[], None)]
    #[case(GroupScoring::Average, &[3.5], Some(3.5))]
    #[case(GroupScoring::Average, &[2.0, 4.0, 4.5], Some(3.5))]
    #[case(GroupScoring::Average, &[2.0, f32::NAN, 4.0], Some(3.0))]
    #[case(GroupScoring::WeakestLink, &[], None)]
    #[case(GroupScoring::WeakestLink, &[2.5, 4.0, 1.25], Some(1.25))]
    fn test_group_scoring_combine(
        #[case] scoring: GroupScoring,
        #[case] scores: &[f32],
        #[case] expected: Option<f32>,
    ) {
        assert_eq!(scoring.combine(scores), expected);
    }
}
