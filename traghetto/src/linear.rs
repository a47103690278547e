//! Multiclass linear model over encoded features.

use std::io::{Read, Write};

use bincode::{Decode, Encode};

use crate::encoder::NameNumberPair;
use crate::errors::{Result, TraghettoError};
use crate::instance::Classifier;

/// Per-class weights of a linear model.
///
/// Features are identified by their indices in the feature dictionary, so the model is used
/// with an encoder in compress mode.
#[derive(Clone, Debug, Decode, Encode, PartialEq)]
pub struct LinearModel {
    outcomes: Vec<String>,
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
}

impl LinearModel {
    /// Creates a new model.
    ///
    /// # Arguments
    ///
    /// * `outcomes` - Outcomes in class order.
    /// * `weights` - Weights indexed by feature and then by class.
    /// * `bias` - Bias of each class.
    ///
    /// # Errors
    ///
    /// [`TraghettoError::InvalidModel`] will be returned if there is no outcome or the
    /// dimensions do not match the number of outcomes.
    pub fn new(outcomes: Vec<String>, weights: Vec<Vec<f64>>, bias: Vec<f64>) -> Result<Self> {
        if outcomes.is_empty() {
            return Err(TraghettoError::invalid_model("model has no outcome"));
        }
        let n_classes = outcomes.len();
        if bias.len() != n_classes {
            return Err(TraghettoError::invalid_model(format!(
                "expected {n_classes} biases, found {}",
                bias.len()
            )));
        }
        if let Some((i, w)) = weights.iter().enumerate().find(|(_, w)| w.len() != n_classes) {
            return Err(TraghettoError::invalid_model(format!(
                "feature {i} has {} weights for {n_classes} outcomes",
                w.len()
            )));
        }
        Ok(Self {
            outcomes,
            weights,
            bias,
        })
    }

    pub fn outcomes(&self) -> &[String] {
        &self.outcomes
    }

    pub fn num_features(&self) -> usize {
        self.weights.len()
    }

    /// Exports the model data.
    ///
    /// # Errors
    ///
    /// When `wtr` generates an error, it will be returned as is.
    pub fn write<W>(&self, mut wtr: W) -> Result<()>
    where
        W: Write,
    {
        bincode::encode_into_std_write(self, &mut wtr, bincode::config::standard())?;
        wtr.flush()?;
        Ok(())
    }

    /// Creates a model from a reader.
    ///
    /// # Errors
    ///
    /// When `rdr` generates an error, it will be returned as is. If the decoded data is not a
    /// consistent model, [`TraghettoError::InvalidModel`] will be returned.
    pub fn read<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let model: Self = bincode::decode_from_std_read(&mut rdr, bincode::config::standard())?;
        Self::new(model.outcomes, model.weights, model.bias)
    }

    /// Computes the score of each class.
    ///
    /// Features outside the model are ignored.
    ///
    /// # Errors
    ///
    /// [`TraghettoError::InvalidArgument`] will be returned if a name is not a feature index.
    pub fn scores(&self, features: &[NameNumberPair]) -> Result<Vec<f64>> {
        let mut scores = self.bias.clone();
        for pair in features {
            let index: usize = pair.name.parse().map_err(|_| {
                TraghettoError::invalid_argument(
                    "features",
                    format!("{:?} is not a feature index", pair.name),
                )
            })?;
            if let Some(weights) = self.weights.get(index) {
                for (score, w) in scores.iter_mut().zip(weights) {
                    *score += w * pair.number;
                }
            }
        }
        Ok(scores)
    }

    /// Returns the outcome with the highest score. Ties go to the earlier class.
    ///
    /// # Errors
    ///
    /// See [`LinearModel::scores()`].
    pub fn predict(&self, features: &[NameNumberPair]) -> Result<&str> {
        let scores = self.scores(features)?;
        let mut best = 0;
        for (i, &score) in scores.iter().enumerate().skip(1) {
            if score > scores[best] {
                best = i;
            }
        }
        Ok(&self.outcomes[best])
    }
}

/// [`Classifier`] backed by a [`LinearModel`].
pub struct LinearClassifier {
    model: LinearModel,
}

impl LinearClassifier {
    pub const fn new(model: LinearModel) -> Self {
        Self { model }
    }

    pub const fn model(&self) -> &LinearModel {
        &self.model
    }
}

impl Classifier<String> for LinearClassifier {
    fn classify(&self, features: Vec<NameNumberPair>) -> Result<String> {
        Ok(self.model.predict(&features)?.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LinearModel {
        LinearModel::new(
            vec!["N".to_string(), "V".to_string(), "D".to_string()],
            vec![vec![1.0, 0.0, 0.0], vec![0.0, 2.0, 0.0], vec![0.0, 0.0, -1.0]],
            vec![0.0, 0.0, 0.5],
        )
        .unwrap()
    }

    #[test]
    fn test_new_invalid() {
        assert!(LinearModel::new(vec![], vec![], vec![]).is_err());
        assert!(LinearModel::new(vec!["A".to_string()], vec![], vec![0.0, 0.0]).is_err());

        let result = LinearModel::new(
            vec!["A".to_string(), "B".to_string()],
            vec![vec![0.0, 0.0], vec![1.0]],
            vec![0.0, 0.0],
        );
        assert_eq!(
            "InvalidModelError: feature 1 has 1 weights for 2 outcomes",
            &result.err().unwrap().to_string()
        );
    }

    #[test]
    fn test_scores() {
        let model = sample();
        let scores = model
            .scores(&[NameNumberPair::new("0", 1.0), NameNumberPair::new("1", 0.25)])
            .unwrap();

        assert_eq!(vec![1.0, 0.5, 0.5], scores);
    }

    #[test]
    fn test_predict() {
        let model = sample();

        assert_eq!("D", model.predict(&[]).unwrap());
        assert_eq!("N", model.predict(&[NameNumberPair::new("0", 1.0)]).unwrap());
        assert_eq!("V", model.predict(&[NameNumberPair::new("1", 1.0)]).unwrap());
    }

    #[test]
    fn test_predict_tie() {
        let model = LinearModel::new(
            vec!["A".to_string(), "B".to_string()],
            vec![],
            vec![0.0, 0.0],
        )
        .unwrap();

        assert_eq!("A", model.predict(&[]).unwrap());
    }

    #[test]
    fn test_unknown_index_ignored() {
        let model = sample();

        assert_eq!("D", model.predict(&[NameNumberPair::new("42", 10.0)]).unwrap());
    }

    #[test]
    fn test_non_index_name() {
        let model = sample();
        let result = model.predict(&[NameNumberPair::new("Word_cat", 1.0)]);

        assert_eq!(
            "InvalidArgumentError: features: \"Word_cat\" is not a feature index",
            &result.err().unwrap().to_string()
        );
    }

    #[test]
    fn test_write_read() {
        let model = sample();
        let mut buf = vec![];
        model.write(&mut buf).unwrap();
        let restored = LinearModel::read(buf.as_slice()).unwrap();

        assert_eq!(model, restored);
    }

    #[test]
    fn test_read_truncated() {
        let mut buf = vec![];
        sample().write(&mut buf).unwrap();
        buf.truncate(buf.len() / 2);

        assert!(LinearModel::read(buf.as_slice()).is_err());
    }

    #[test]
    fn test_classifier() {
        let classifier = LinearClassifier::new(sample());
        let outcome = classifier
            .classify(vec![NameNumberPair::new("1", 1.0)])
            .unwrap();

        assert_eq!("V", outcome);
        assert_eq!(3, classifier.model().outcomes().len());
    }
}
