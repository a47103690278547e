use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::dictionary::Dictionary;
use crate::errors::{Result, TraghettoError};
use crate::escape::escape;
use crate::feature::{join_components, Feature, ReducedValue};

/// File name of the feature lookup file written by
/// [`NameNumberEncoder::finalize_feature_set()`].
pub const FEATURE_LOOKUP_FILE_NAME: &str = "feature-lookup.txt";

/// Encoded form of a feature.
#[derive(Clone, Debug, PartialEq)]
pub struct NameNumberPair {
    pub name: String,
    pub number: f64,
}

impl NameNumberPair {
    pub fn new<S>(name: S, number: f64) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            number,
        }
    }
}

/// Encoder from features to name-number pairs.
///
/// In compress mode, the canonical name of each pair is replaced with its index in a
/// [`Dictionary`]. New names are added to the dictionary while new features are allowed;
/// otherwise unknown names are dropped.
///
/// # Examples
///
/// ```
/// use traghetto::{Feature, NameNumberEncoder};
///
/// let mut encoder = NameNumberEncoder::new(true, false);
/// let pairs = encoder.encode(&Feature::new("Word", "cat")).unwrap();
/// assert_eq!("0", pairs[0].name);
///
/// encoder.freeze();
/// let pairs = encoder.encode(&Feature::new("Word", "dog")).unwrap();
/// assert!(pairs.is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct NameNumberEncoder {
    dictionary: Dictionary,
    compress: bool,
    sort: bool,
    allow_new_features: bool,
}

impl NameNumberEncoder {
    /// Creates a new encoder that accepts new features.
    ///
    /// # Arguments
    ///
    /// * `compress` - Replaces canonical names with dictionary indices.
    /// * `sort` - Writes the lookup file in ascending order of names.
    pub fn new(compress: bool, sort: bool) -> Self {
        Self {
            dictionary: Dictionary::new(),
            compress,
            sort,
            allow_new_features: true,
        }
    }

    /// Creates a frozen compressing encoder from a trained dictionary.
    pub fn from_dictionary(dictionary: Dictionary, sort: bool) -> Self {
        Self {
            dictionary,
            compress: true,
            sort,
            allow_new_features: false,
        }
    }

    /// Loads the lookup file written by [`NameNumberEncoder::finalize_feature_set()`].
    ///
    /// The returned encoder is frozen.
    ///
    /// # Errors
    ///
    /// If the lookup file cannot be read or is malformed, an error variant will be returned.
    pub fn load<P>(input_dir: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = input_dir.as_ref().join(FEATURE_LOOKUP_FILE_NAME);
        let dictionary = Dictionary::read(BufReader::new(File::open(path)?))?;
        Ok(Self::from_dictionary(dictionary, false))
    }

    pub const fn compress(&self) -> bool {
        self.compress
    }

    pub const fn sort(&self) -> bool {
        self.sort
    }

    pub const fn allow_new_features(&self) -> bool {
        self.allow_new_features
    }

    pub fn set_allow_new_features(&mut self, allow: bool) {
        self.allow_new_features = allow;
    }

    /// Stops adding new names to the dictionary.
    pub fn freeze(&mut self) {
        self.allow_new_features = false;
    }

    pub const fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Encodes a feature into zero or more pairs.
    ///
    /// # Errors
    ///
    /// [`TraghettoError::InvalidArgument`] will be returned if a numeric feature has no name.
    pub fn encode(&mut self, feature: &Feature) -> Result<Vec<NameNumberPair>> {
        let mut pairs = vec![];
        self.encode_into(feature, &mut pairs)?;
        Ok(pairs)
    }

    /// Encodes features in order, concatenating their pairs.
    pub fn encode_all(&mut self, features: &[Feature]) -> Result<Vec<NameNumberPair>> {
        let mut pairs = vec![];
        for feature in features {
            self.encode_into(feature, &mut pairs)?;
        }
        Ok(pairs)
    }

    /// Encodes a feature without modifying the dictionary.
    ///
    /// Unknown names are dropped in compress mode, regardless of
    /// [`NameNumberEncoder::allow_new_features()`].
    pub fn encode_frozen(&self, feature: &Feature) -> Result<Vec<NameNumberPair>> {
        let mut pairs = vec![];
        self.encode_frozen_into(feature, &mut pairs)?;
        Ok(pairs)
    }

    /// Encodes features in order without modifying the dictionary.
    pub fn encode_all_frozen(&self, features: &[Feature]) -> Result<Vec<NameNumberPair>> {
        let mut pairs = vec![];
        for feature in features {
            self.encode_frozen_into(feature, &mut pairs)?;
        }
        Ok(pairs)
    }

    fn encode_into(&mut self, feature: &Feature, pairs: &mut Vec<NameNumberPair>) -> Result<()> {
        if !self.allow_new_features {
            return self.encode_frozen_into(feature, pairs);
        }
        for (name, number) in canonical_pairs(feature)? {
            let name = if self.compress {
                self.dictionary.get_or_insert(&name)?.to_string()
            } else {
                name
            };
            pairs.push(NameNumberPair { name, number });
        }
        Ok(())
    }

    fn encode_frozen_into(&self, feature: &Feature, pairs: &mut Vec<NameNumberPair>) -> Result<()> {
        for (name, number) in canonical_pairs(feature)? {
            let name = if self.compress {
                match self.dictionary.get(&name) {
                    Some(id) => id.to_string(),
                    None => continue,
                }
            } else {
                name
            };
            pairs.push(NameNumberPair { name, number });
        }
        Ok(())
    }

    /// Writes the feature lookup file into `output_dir` in compress mode.
    ///
    /// Calling this again without encoding new features rewrites the same file.
    ///
    /// # Errors
    ///
    /// If the directory or the file cannot be written, an error variant will be returned.
    pub fn finalize_feature_set<P>(&self, output_dir: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        if !self.compress {
            return Ok(());
        }
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir)?;
        let f = File::create(output_dir.join(FEATURE_LOOKUP_FILE_NAME))?;
        self.dictionary.write(BufWriter::new(f), self.sort)
    }
}

/// Reduces a feature to literal canonical names and numbers.
fn canonical_pairs(feature: &Feature) -> Result<Vec<(String, f64)>> {
    let components = feature.name_components();
    let pairs = match feature.reduced_value() {
        ReducedValue::Text(text) => {
            let name = join_components(components.iter().map(|c| &**c).chain([text.as_str()]));
            if name.is_empty() {
                vec![]
            } else {
                vec![(name, 1.0)]
            }
        }
        ReducedValue::Number(number) => {
            let name = join_components(&components);
            if name.is_empty() {
                return Err(TraghettoError::invalid_argument(
                    "feature",
                    "numeric feature has no name",
                ));
            }
            vec![(name, number)]
        }
        ReducedValue::Counts(sub_counts) => sub_counts
            .iter()
            .filter_map(|(sub_value, &count)| {
                let sub_value = escape(sub_value);
                let name = join_components(components.iter().map(|c| &**c).chain([&*sub_value]));
                (!name.is_empty()).then(|| (name, f64::from(count)))
            })
            .collect(),
    };
    Ok(pairs)
}
