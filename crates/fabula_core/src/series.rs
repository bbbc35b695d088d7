//! Display series derived from the turn sequence.

use crate::{Turn, normalize};
use derive_getters::Getters;
use serde::Serialize;

/// Parallel chart series computed from a slice of turns.
///
/// Series are views: build them from the current turns every time they are
/// needed instead of storing them next to the turns.
///
/// # Examples
///
/// ```
/// use fabula_core::{Author, Turn, TurnSeries};
///
/// let turns = vec![Turn::new("s1", 1, Author::Ai, "...").with_scores(1.4, -0.2)];
/// let series = TurnSeries::from_turns(&turns);
///
/// assert_eq!(series.flow(), &vec![1.0]);
/// assert_eq!(series.entropy(), &vec![0.0]);
/// assert_eq!(series.labels(), &vec!["T1".to_string()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Getters)]
pub struct TurnSeries {
    /// Normalized flow score per turn
    flow: Vec<f64>,
    /// Normalized entropy score per turn
    entropy: Vec<f64>,
    /// `T<n>` label per turn
    labels: Vec<String>,
}

impl TurnSeries {
    /// Derive all three series in one pass.
    pub fn from_turns(turns: &[Turn]) -> Self {
        let mut series = Self {
            flow: Vec::with_capacity(turns.len()),
            entropy: Vec::with_capacity(turns.len()),
            labels: Vec::with_capacity(turns.len()),
        };
        for turn in turns {
            series.flow.push(normalize(turn.flow_score));
            series.entropy.push(normalize(turn.entropy_score));
            series.labels.push(turn.label());
        }
        series
    }

    /// Number of points in each series.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when there are no turns.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Normalized entropy of the most recent turn, 0 when there are none.
pub fn latest_entropy(turns: &[Turn]) -> f64 {
    turns
        .last()
        .map(|turn| normalize(turn.entropy_score))
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Author, PROVISIONAL_TURN};

    #[test]
    fn test_series_are_parallel() {
        let turns = vec![
            Turn::new("s1", 1, Author::Human, "a").with_scores(0.2, 0.9),
            Turn::new("s1", 2, Author::Ai, "b"),
            Turn::new("s1", PROVISIONAL_TURN, Author::Ai, "c").with_scores(f64::NAN, 7.0),
        ];
        let series = TurnSeries::from_turns(&turns);

        assert_eq!(series.len(), 3);
        assert_eq!(series.flow(), &vec![0.2, 0.0, 0.0]);
        assert_eq!(series.entropy(), &vec![0.9, 0.0, 1.0]);
        assert_eq!(series.labels(), &vec!["T1", "T2", "T-1"]);
    }

    #[test]
    fn test_latest_entropy() {
        assert_eq!(latest_entropy(&[]), 0.0);

        let turns = vec![
            Turn::new("s1", 1, Author::Human, "a").with_scores(0.0, 0.1),
            Turn::new("s1", 2, Author::Ai, "b").with_scores(0.0, 0.7),
        ];
        assert_eq!(latest_entropy(&turns), 0.7);
    }

    #[test]
    fn test_empty_series() {
        let series = TurnSeries::from_turns(&[]);
        assert!(series.is_empty());
    }
}
