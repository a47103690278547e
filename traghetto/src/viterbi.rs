//! Sequential classification with outcome-history features.
//!
//! Despite the name, decoding is greedy: each token is classified once, left to right, and its
//! predicted outcome is fed back as history for the next token. No search over alternative
//! label sequences is performed.
//!
//! During training, history consists of gold outcomes, so the model learns transition features
//! conditioned on correct history. During classification, history consists of the driver's own
//! predictions.

use crate::errors::Result;
use crate::feature::Feature;
use crate::instance::{Instance, InstanceClassifier, InstanceWriter};
use crate::outcome::{DefaultOutcomeFeatureExtractor, OutcomeFeatureExtractor};

/// Outcomes assigned so far in the current sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct OutcomeHistory<O> {
    outcomes: Vec<O>,
}

impl<O> OutcomeHistory<O> {
    pub const fn new() -> Self {
        Self { outcomes: vec![] }
    }

    pub fn push(&mut self, outcome: O) {
        self.outcomes.push(outcome);
    }

    pub fn as_slice(&self) -> &[O] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn into_vec(self) -> Vec<O> {
        self.outcomes
    }
}

impl<O> Default for OutcomeHistory<O> {
    fn default() -> Self {
        Self::new()
    }
}

type BoxedExtractor<O> = Box<dyn OutcomeFeatureExtractor<O>>;

/// Appends features extracted from `history` to `features`.
fn augment<O>(
    extractors: &[BoxedExtractor<O>],
    history: &OutcomeHistory<O>,
    features: &[Feature],
) -> Vec<Feature> {
    let mut augmented = features.to_vec();
    for extractor in extractors {
        augmented.extend(extractor.extract_features(history.as_slice()));
    }
    augmented
}

fn default_extractors<O>() -> Vec<BoxedExtractor<O>>
where
    O: ToString,
{
    vec![Box::new(DefaultOutcomeFeatureExtractor::default())]
}

/// Writes training sequences with gold outcome-history features.
pub struct ViterbiDataWriter<O, W> {
    extractors: Vec<BoxedExtractor<O>>,
    writer: W,
}

impl<O, W> ViterbiDataWriter<O, W>
where
    O: Clone,
    W: InstanceWriter<O>,
{
    /// Creates a new data writer.
    ///
    /// # Arguments
    ///
    /// * `writer` - A writer that receives augmented instances.
    /// * `extractors` - Extractors of outcome-history features, applied in order.
    pub fn new(writer: W, extractors: Vec<BoxedExtractor<O>>) -> Self {
        Self { extractors, writer }
    }

    /// Writes one sequence.
    ///
    /// Each instance is augmented with features of the gold outcomes before it.
    ///
    /// # Returns
    ///
    /// The gold outcomes of the sequence.
    ///
    /// # Errors
    ///
    /// [`TraghettoError::NoInstanceOutcome`](crate::TraghettoError::NoInstanceOutcome) will be
    /// returned if an instance has no outcome; nothing is written in that case. Errors from
    /// the writer are returned as is, and the rest of the sequence is not written.
    pub fn write_sequence(&mut self, instances: &[Instance<O>]) -> Result<Vec<O>> {
        let outcomes = instances
            .iter()
            .map(Instance::outcome)
            .collect::<Result<Vec<_>>>()?;
        let mut history = OutcomeHistory::new();
        for (instance, outcome) in instances.iter().zip(outcomes) {
            let features = augment(&self.extractors, &history, &instance.features);
            self.writer.write(&Instance::new(features, outcome.clone()))?;
            history.push(outcome.clone());
        }
        Ok(history.into_vec())
    }

    pub const fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<O, W> ViterbiDataWriter<O, W>
where
    O: Clone + ToString + 'static,
    W: InstanceWriter<O>,
{
    /// Creates a new data writer with a [`DefaultOutcomeFeatureExtractor`].
    pub fn with_default_extractor(writer: W) -> Self {
        Self::new(writer, default_extractors())
    }
}

/// Labels sequences token by token, feeding predictions back as history.
pub struct ViterbiClassifier<O, C> {
    extractors: Vec<BoxedExtractor<O>>,
    classifier: C,
}

impl<O, C> ViterbiClassifier<O, C>
where
    C: InstanceClassifier<O>,
{
    /// Creates a new classifier.
    ///
    /// # Arguments
    ///
    /// * `classifier` - A per-token classifier.
    /// * `extractors` - Extractors of outcome-history features. They must match the ones used
    ///                  for training.
    pub fn new(classifier: C, extractors: Vec<BoxedExtractor<O>>) -> Self {
        Self {
            extractors,
            classifier,
        }
    }

    /// Classifies one sequence.
    ///
    /// # Arguments
    ///
    /// * `instances` - Features of each token without outcome-history features.
    ///
    /// # Returns
    ///
    /// Predicted outcomes, one per token.
    ///
    /// # Errors
    ///
    /// Errors from the classifier are returned as is. No partial result is returned.
    pub fn classify_sequence<F>(&self, instances: &[F]) -> Result<Vec<O>>
    where
        F: AsRef<[Feature]>,
        O: Clone,
    {
        let mut history = OutcomeHistory::new();
        for features in instances {
            let features = augment(&self.extractors, &history, features.as_ref());
            let outcome = self.classifier.classify_features(&features)?;
            history.push(outcome);
        }
        Ok(history.into_vec())
    }

    pub const fn classifier(&self) -> &C {
        &self.classifier
    }
}

impl<O, C> ViterbiClassifier<O, C>
where
    O: ToString + 'static,
    C: InstanceClassifier<O>,
{
    /// Creates a new classifier with a [`DefaultOutcomeFeatureExtractor`].
    pub fn with_default_extractor(classifier: C) -> Self {
        Self::new(classifier, default_extractors())
    }
}
