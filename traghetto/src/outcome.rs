//! Features derived from previously assigned outcomes.

use crate::errors::{Result, TraghettoError};
use crate::feature::{Direction, Feature, Orientation};

pub const PREVIOUS_OUTCOME_NAME: &str = "PreviousOutcome";
pub const PREVIOUS_OUTCOMES_NAME: &str = "PreviousOutcomes";

const NGRAM_DELIMITER: &str = "_";

/// Trait for extractors of features from an outcome history.
pub trait OutcomeFeatureExtractor<O> {
    /// Extracts features from outcomes assigned so far in the current sequence.
    ///
    /// # Arguments
    ///
    /// * `history` - Outcomes in sequence order. The last element is the most recent one.
    ///
    /// # Returns
    ///
    /// Extracted features. An empty history yields no features.
    fn extract_features(&self, history: &[O]) -> Vec<Feature>;
}

/// Extractor of the most recent outcomes and their n-grams.
///
/// # Examples
///
/// ```
/// use traghetto::{DefaultOutcomeFeatureExtractor, OutcomeFeatureExtractor};
///
/// let extractor = DefaultOutcomeFeatureExtractor::default();
/// let features = extractor.extract_features(&["A", "B", "C", "D"]);
/// assert_eq!(5, features.len());
/// ```
#[derive(Clone, Debug)]
pub struct DefaultOutcomeFeatureExtractor {
    most_recent_outcome: u32,
    least_recent_outcome: u32,
    use_bigram: bool,
    use_trigram: bool,
    use_4gram: bool,
}

impl DefaultOutcomeFeatureExtractor {
    /// Creates a new extractor.
    ///
    /// # Arguments
    ///
    /// * `most_recent_outcome` - The nearest look-back distance. Must be at least 1.
    /// * `least_recent_outcome` - The farthest look-back distance. Must be at least
    ///                            `most_recent_outcome`.
    /// * `use_bigram` - Emits the last two outcomes as a feature.
    /// * `use_trigram` - Emits the last three outcomes as a feature.
    /// * `use_4gram` - Emits the last four outcomes as a feature.
    ///
    /// # Errors
    ///
    /// If invalid parameters are given, an error variant will be returned.
    pub fn new(
        most_recent_outcome: u32,
        least_recent_outcome: u32,
        use_bigram: bool,
        use_trigram: bool,
        use_4gram: bool,
    ) -> Result<Self> {
        if most_recent_outcome < 1 {
            return Err(TraghettoError::invalid_argument(
                "most_recent_outcome",
                "must be at least 1",
            ));
        }
        if least_recent_outcome < most_recent_outcome {
            return Err(TraghettoError::invalid_argument(
                "least_recent_outcome",
                format!("must be at least most_recent_outcome ({most_recent_outcome})"),
            ));
        }
        Ok(Self {
            most_recent_outcome,
            least_recent_outcome,
            use_bigram,
            use_trigram,
            use_4gram,
        })
    }

    fn ngram<O>(history: &[O], n: usize) -> Option<Feature>
    where
        O: ToString,
    {
        if history.len() < n {
            return None;
        }
        let values = history.iter().rev().take(n).map(ToString::to_string).collect();
        Some(Feature::window_ngram(
            PREVIOUS_OUTCOMES_NAME,
            Orientation::Left,
            Direction::LeftToRight,
            NGRAM_DELIMITER,
            1,
            values,
        ))
    }
}

impl Default for DefaultOutcomeFeatureExtractor {
    fn default() -> Self {
        Self {
            most_recent_outcome: 1,
            least_recent_outcome: 3,
            use_bigram: true,
            use_trigram: true,
            use_4gram: false,
        }
    }
}

impl<O> OutcomeFeatureExtractor<O> for DefaultOutcomeFeatureExtractor
where
    O: ToString,
{
    fn extract_features(&self, history: &[O]) -> Vec<Feature> {
        let mut features = vec![];
        for i in self.most_recent_outcome..=self.least_recent_outcome {
            let Some(pos) = usize::try_from(i)
                .ok()
                .and_then(|i| history.len().checked_sub(i))
            else {
                break;
            };
            features.push(Feature::window(
                PREVIOUS_OUTCOME_NAME,
                Orientation::Left,
                i,
                history[pos].to_string(),
            ));
        }
        for (enabled, n) in [(self.use_bigram, 2), (self.use_trigram, 3), (self.use_4gram, 4)] {
            if enabled {
                features.extend(Self::ngram(history, n));
            }
        }
        features
    }
}
