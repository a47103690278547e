#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Traghetto
//!
//! Traghetto turns typed features into canonical name-number pairs and labels token sequences
//! with a per-token classifier, feeding previously assigned outcomes back as features.
//!
//! ## Examples
//!
//! ```
//! use traghetto::{
//!     EncodingClassifier, Feature, LinearClassifier, LinearModel, NameNumberEncoder,
//!     ViterbiClassifier,
//! };
//!
//! let mut encoder = NameNumberEncoder::new(true, false);
//! encoder.encode(&Feature::new("Word", "the")).unwrap();
//! encoder.encode(&Feature::new("Word", "cat")).unwrap();
//! encoder.freeze();
//!
//! let model = LinearModel::new(
//!     vec!["D".to_string(), "N".to_string()],
//!     vec![vec![1.0, 0.0], vec![0.0, 1.0]],
//!     vec![0.0, 0.0],
//! )
//! .unwrap();
//! let classifier = EncodingClassifier::new(encoder, LinearClassifier::new(model));
//! let viterbi = ViterbiClassifier::with_default_extractor(classifier);
//!
//! let sentence = vec![
//!     vec![Feature::new("Word", "the")],
//!     vec![Feature::new("Word", "cat")],
//! ];
//! assert_eq!(vec!["D", "N"], viterbi.classify_sequence(&sentence).unwrap());
//! ```
//!
//! Training with LIBLINEAR requires **crate feature** `train`. For more details, see
//! `LiblinearTrainer`.

mod dictionary;
mod encoder;
mod escape;
mod feature;
mod instance;
mod linear;
mod outcome;
mod training_data;
mod viterbi;

#[cfg(feature = "train")]
mod trainer;

pub mod errors;

pub use dictionary::Dictionary;
pub use encoder::{NameNumberEncoder, NameNumberPair, FEATURE_LOOKUP_FILE_NAME};
pub use errors::{Result, TraghettoError};
pub use escape::{escape, unescape};
pub use feature::{
    CountsFeature, Direction, Feature, FeatureValue, Orientation, PlainFeature, TypePathFeature,
    WindowFeature, WindowNGramFeature,
};
pub use instance::{
    Classifier, DataWriter, EncodingClassifier, EncodingDataWriter, Instance, InstanceClassifier,
    InstanceWriter,
};
pub use linear::{LinearClassifier, LinearModel};
pub use outcome::{
    DefaultOutcomeFeatureExtractor, OutcomeFeatureExtractor, PREVIOUS_OUTCOMES_NAME,
    PREVIOUS_OUTCOME_NAME,
};
pub use training_data::{
    format_training_line, parse_training_line, TrainingDataReader, TrainingDataWriter,
    TrainingLine,
};
pub use viterbi::{OutcomeHistory, ViterbiClassifier, ViterbiDataWriter};

#[cfg(feature = "train")]
pub use trainer::{LiblinearTrainer, SolverType};
