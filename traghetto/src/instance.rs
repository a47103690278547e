//! Instances and the boundaries to delegated writers and classifiers.
//!
//! [`DataWriter`] and [`Classifier`] receive encoded pairs. [`InstanceWriter`] and
//! [`InstanceClassifier`] receive features; [`EncodingDataWriter`] and [`EncodingClassifier`]
//! connect the two through a [`NameNumberEncoder`].

use std::path::Path;

use crate::encoder::{NameNumberEncoder, NameNumberPair};
use crate::errors::{Result, TraghettoError};
use crate::feature::Feature;

/// Features of one token with an optional outcome.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance<O> {
    pub features: Vec<Feature>,
    pub outcome: Option<O>,
}

impl<O> Instance<O> {
    pub fn new(features: Vec<Feature>, outcome: O) -> Self {
        Self {
            features,
            outcome: Some(outcome),
        }
    }

    pub fn unlabeled(features: Vec<Feature>) -> Self {
        Self {
            features,
            outcome: None,
        }
    }

    /// Gets the outcome.
    ///
    /// # Errors
    ///
    /// [`TraghettoError::NoInstanceOutcome`] will be returned if the instance has no outcome.
    pub fn outcome(&self) -> Result<&O> {
        self.outcome.as_ref().ok_or(TraghettoError::NoInstanceOutcome)
    }
}

/// Trait for writers of encoded training instances.
pub trait DataWriter<O> {
    fn write_training_instance(&mut self, features: Vec<NameNumberPair>, outcome: &O) -> Result<()>;
}

/// Trait for classifiers of encoded instances.
pub trait Classifier<O> {
    fn classify(&self, features: Vec<NameNumberPair>) -> Result<O>;
}

/// Trait for writers of training instances.
pub trait InstanceWriter<O> {
    fn write(&mut self, instance: &Instance<O>) -> Result<()>;
}

/// Trait for classifiers of feature lists.
pub trait InstanceClassifier<O> {
    fn classify_features(&self, features: &[Feature]) -> Result<O>;
}

impl<O, W> DataWriter<O> for &mut W
where
    W: DataWriter<O> + ?Sized,
{
    fn write_training_instance(
        &mut self,
        features: Vec<NameNumberPair>,
        outcome: &O,
    ) -> Result<()> {
        (**self).write_training_instance(features, outcome)
    }
}

impl<O, C> Classifier<O> for &C
where
    C: Classifier<O> + ?Sized,
{
    fn classify(&self, features: Vec<NameNumberPair>) -> Result<O> {
        (**self).classify(features)
    }
}

impl<O, W> InstanceWriter<O> for &mut W
where
    W: InstanceWriter<O> + ?Sized,
{
    fn write(&mut self, instance: &Instance<O>) -> Result<()> {
        (**self).write(instance)
    }
}

impl<O, C> InstanceClassifier<O> for &C
where
    C: InstanceClassifier<O> + ?Sized,
{
    fn classify_features(&self, features: &[Feature]) -> Result<O> {
        (**self).classify_features(features)
    }
}

/// Encodes instances and passes them to a [`DataWriter`].
///
/// The encoder grows its dictionary while new features are allowed.
pub struct EncodingDataWriter<D> {
    encoder: NameNumberEncoder,
    writer: D,
}

impl<D> EncodingDataWriter<D> {
    pub const fn new(encoder: NameNumberEncoder, writer: D) -> Self {
        Self { encoder, writer }
    }

    pub const fn encoder(&self) -> &NameNumberEncoder {
        &self.encoder
    }

    pub const fn writer(&self) -> &D {
        &self.writer
    }

    /// Writes the feature lookup file and returns the encoder and the writer.
    ///
    /// # Errors
    ///
    /// If the lookup file cannot be written, an error variant will be returned.
    pub fn finish<P>(self, output_dir: P) -> Result<(NameNumberEncoder, D)>
    where
        P: AsRef<Path>,
    {
        self.encoder.finalize_feature_set(output_dir)?;
        Ok((self.encoder, self.writer))
    }
}

impl<O, D> InstanceWriter<O> for EncodingDataWriter<D>
where
    D: DataWriter<O>,
{
    fn write(&mut self, instance: &Instance<O>) -> Result<()> {
        let outcome = instance.outcome()?;
        let pairs = self.encoder.encode_all(&instance.features)?;
        self.writer.write_training_instance(pairs, outcome)
    }
}

/// Encodes features with a frozen dictionary and passes them to a [`Classifier`].
pub struct EncodingClassifier<C> {
    encoder: NameNumberEncoder,
    classifier: C,
}

impl<C> EncodingClassifier<C> {
    pub const fn new(encoder: NameNumberEncoder, classifier: C) -> Self {
        Self {
            encoder,
            classifier,
        }
    }

    pub const fn encoder(&self) -> &NameNumberEncoder {
        &self.encoder
    }

    pub const fn classifier(&self) -> &C {
        &self.classifier
    }
}

impl<O, C> InstanceClassifier<O> for EncodingClassifier<C>
where
    C: Classifier<O>,
{
    fn classify_features(&self, features: &[Feature]) -> Result<O> {
        let pairs = self.encoder.encode_all_frozen(features)?;
        self.classifier.classify(pairs)
    }
}
