//! Feature model.
//!
//! Every feature kind reduces to a canonical name and a value at encoding time. The canonical
//! name is the `_`-join of the non-empty, escaped name components in a fixed order, so it only
//! depends on the structural fields of the feature.

use std::borrow::Cow;

use indexmap::IndexMap;

use crate::errors::{Result, TraghettoError};
use crate::escape::escape;

pub(crate) const NAME_SEPARATOR: char = '_';

/// Value carried by a feature.
#[derive(Clone, Debug, PartialEq)]
pub enum FeatureValue {
    /// A string value. It is joined into the canonical name.
    Nominal(String),

    /// A number. It becomes the numeric value of the encoded pair.
    Numeric(f64),

    /// A flag. Encoded as `true` or `false` in the canonical name.
    Boolean(bool),
}

impl FeatureValue {
    /// Returns the textual form of the value.
    pub fn to_text(&self) -> Cow<str> {
        match self {
            Self::Nominal(s) => Cow::Borrowed(s),
            Self::Numeric(n) => Cow::Owned(n.to_string()),
            Self::Boolean(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        }
    }
}

impl From<String> for FeatureValue {
    fn from(s: String) -> Self {
        Self::Nominal(s)
    }
}

impl From<&str> for FeatureValue {
    fn from(s: &str) -> Self {
        Self::Nominal(s.to_string())
    }
}

impl From<bool> for FeatureValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i32> for FeatureValue {
    fn from(n: i32) -> Self {
        Self::Numeric(f64::from(n))
    }
}

impl From<u32> for FeatureValue {
    fn from(n: u32) -> Self {
        Self::Numeric(f64::from(n))
    }
}

impl From<i64> for FeatureValue {
    fn from(n: i64) -> Self {
        Self::Numeric(n as f64)
    }
}

impl From<f32> for FeatureValue {
    fn from(n: f32) -> Self {
        Self::Numeric(f64::from(n))
    }
}

impl From<f64> for FeatureValue {
    fn from(n: f64) -> Self {
        Self::Numeric(n)
    }
}

/// Side of a window relative to the focus.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Orientation {
    Left,
    Right,
    Middle,
    MiddleReverse,
}

impl Orientation {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Left => "L",
            Self::Right => "R",
            Self::Middle => "M",
            Self::MiddleReverse => "MR",
        }
    }
}

/// Reading direction of an n-gram.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

impl Direction {
    pub const fn code(self) -> &'static str {
        match self {
            Self::LeftToRight => "L2R",
            Self::RightToLeft => "R2L",
        }
    }
}

/// A feature with an optional name and a value.
#[derive(Clone, Debug, PartialEq)]
pub struct PlainFeature {
    pub name: Option<String>,
    pub value: FeatureValue,
}

/// A feature extracted along a type path. The path is inserted after the name.
#[derive(Clone, Debug, PartialEq)]
pub struct TypePathFeature {
    pub name: Option<String>,
    pub type_path: String,
    pub value: FeatureValue,
}

/// A feature taken from a window around the focus.
///
/// The position is inserted after the name as a token like `L3`, or `MR3OOB2` when the
/// position fell `out_of_bounds` places outside of the sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowFeature {
    pub name: Option<String>,
    pub orientation: Orientation,
    pub offset: u32,
    pub out_of_bounds: u32,
    pub value: FeatureValue,
}

impl WindowFeature {
    fn position_token(&self) -> String {
        let mut token = format!("{}{}", self.orientation.code(), self.offset);
        if self.out_of_bounds != 0 {
            token.push_str(&format!("OOB{}", self.out_of_bounds));
        }
        token
    }
}

/// An n-gram of consecutive values taken from a window.
///
/// The name embeds the position, the size, and the direction, e.g. `PreviousOutcomes_L1_3gram_L2R`.
/// The value is the escaped parts joined with `delimiter`.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowNGramFeature {
    pub name: Option<String>,
    pub orientation: Orientation,
    pub direction: Direction,
    pub delimiter: String,
    pub offset: u32,
    pub values: Vec<String>,
}

impl WindowNGramFeature {
    /// The n-gram size.
    pub fn size(&self) -> usize {
        self.values.len()
    }
}

/// Frequencies of sub-values under a single name.
///
/// Encoded into one pair per sub-value, in insertion order.
#[derive(Clone, Debug, PartialEq)]
pub struct CountsFeature {
    pub name: Option<String>,
    pub sub_counts: IndexMap<String, u32>,
}

impl CountsFeature {
    /// Counts the values of features produced by a sub-extractor.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the resulting feature.
    /// * `features` - Features that share a single canonical name.
    ///
    /// # Errors
    ///
    /// [`TraghettoError::MixedFeatureNames`] will be returned if `features` carry more than one
    /// distinct canonical name, and [`TraghettoError::InvalidArgument`] if one of them is itself
    /// a counts feature.
    pub fn from_features<S, I>(name: S, features: I) -> Result<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = Feature>,
    {
        let mut base_name: Option<String> = None;
        let mut sub_counts = IndexMap::new();
        for feature in features {
            let feature_name = feature.name().unwrap_or_default();
            let base = base_name.get_or_insert_with(|| feature_name.clone());
            if *base != feature_name {
                return Err(TraghettoError::mixed_feature_names(base.as_str(), feature_name));
            }
            let text = feature.value_text().ok_or_else(|| {
                TraghettoError::invalid_argument("features", "counts feature cannot be nested")
            })?;
            *sub_counts.entry(text).or_insert(0) += 1;
        }
        Ok(Self {
            name: Some(name.into()),
            sub_counts,
        })
    }
}

/// A feature.
#[derive(Clone, Debug, PartialEq)]
pub enum Feature {
    Plain(PlainFeature),
    TypePath(TypePathFeature),
    Window(WindowFeature),
    WindowNGram(WindowNGramFeature),
    Counts(CountsFeature),
}

/// Value part of a feature after reduction.
pub(crate) enum ReducedValue<'a> {
    /// Escaped text to be joined into the name.
    Text(String),
    Number(f64),
    Counts(&'a IndexMap<String, u32>),
}

impl Feature {
    /// Creates a plain feature.
    ///
    /// # Examples
    ///
    /// ```
    /// use traghetto::Feature;
    ///
    /// let f = Feature::new("hello=goodbye", "two=2");
    /// assert_eq!(Some("hello%U003Dgoodbye".to_string()), f.name());
    /// ```
    pub fn new<S, V>(name: S, value: V) -> Self
    where
        S: Into<String>,
        V: Into<FeatureValue>,
    {
        Self::Plain(PlainFeature {
            name: Some(name.into()),
            value: value.into(),
        })
    }

    /// Creates a plain feature without a name.
    pub fn unnamed<V>(value: V) -> Self
    where
        V: Into<FeatureValue>,
    {
        Self::Plain(PlainFeature {
            name: None,
            value: value.into(),
        })
    }

    pub fn type_path<S, P, V>(name: S, type_path: P, value: V) -> Self
    where
        S: Into<String>,
        P: Into<String>,
        V: Into<FeatureValue>,
    {
        Self::TypePath(TypePathFeature {
            name: Some(name.into()),
            type_path: type_path.into(),
            value: value.into(),
        })
    }

    pub fn window<S, V>(name: S, orientation: Orientation, offset: u32, value: V) -> Self
    where
        S: Into<String>,
        V: Into<FeatureValue>,
    {
        Self::Window(WindowFeature {
            name: Some(name.into()),
            orientation,
            offset,
            out_of_bounds: 0,
            value: value.into(),
        })
    }

    pub fn window_ngram<S, D>(
        name: S,
        orientation: Orientation,
        direction: Direction,
        delimiter: D,
        offset: u32,
        values: Vec<String>,
    ) -> Self
    where
        S: Into<String>,
        D: Into<String>,
    {
        Self::WindowNGram(WindowNGramFeature {
            name: Some(name.into()),
            orientation,
            direction,
            delimiter: delimiter.into(),
            offset,
            values,
        })
    }

    pub fn counts<S>(name: S, sub_counts: IndexMap<String, u32>) -> Self
    where
        S: Into<String>,
    {
        Self::Counts(CountsFeature {
            name: Some(name.into()),
            sub_counts,
        })
    }

    /// Returns the canonical name, or `None` if every name component is empty.
    pub fn name(&self) -> Option<String> {
        Some(join_components(self.name_components())).filter(|name| !name.is_empty())
    }

    /// Escaped name components in declared order. Empty components are kept here and dropped
    /// by [`join_components()`].
    pub(crate) fn name_components(&self) -> Vec<Cow<str>> {
        match self {
            Self::Plain(f) => vec![escaped_name(&f.name)],
            Self::TypePath(f) => vec![escaped_name(&f.name), escape(&f.type_path)],
            Self::Window(f) => vec![escaped_name(&f.name), Cow::Owned(f.position_token())],
            Self::WindowNGram(f) => vec![
                escaped_name(&f.name),
                Cow::Owned(format!("{}{}", f.orientation.code(), f.offset)),
                Cow::Owned(format!("{}gram", f.size())),
                Cow::Borrowed(f.direction.code()),
            ],
            Self::Counts(f) => vec![escaped_name(&f.name)],
        }
    }

    pub(crate) fn reduced_value(&self) -> ReducedValue {
        match self {
            Self::Plain(f) => reduce_value(&f.value),
            Self::TypePath(f) => reduce_value(&f.value),
            Self::Window(f) => reduce_value(&f.value),
            Self::WindowNGram(f) => {
                let parts: Vec<Cow<str>> = f.values.iter().map(|v| escape(v)).collect();
                ReducedValue::Text(parts.join(f.delimiter.as_str()))
            }
            Self::Counts(f) => ReducedValue::Counts(&f.sub_counts),
        }
    }

    /// Raw text of the value, used to count sub-values.
    fn value_text(&self) -> Option<String> {
        match self {
            Self::Plain(f) => Some(f.value.to_text().into_owned()),
            Self::TypePath(f) => Some(f.value.to_text().into_owned()),
            Self::Window(f) => Some(f.value.to_text().into_owned()),
            Self::WindowNGram(f) => Some(f.values.join(f.delimiter.as_str())),
            Self::Counts(_) => None,
        }
    }
}

fn escaped_name(name: &Option<String>) -> Cow<str> {
    name.as_deref().map_or(Cow::Borrowed(""), escape)
}

fn reduce_value(value: &FeatureValue) -> ReducedValue<'static> {
    match value {
        FeatureValue::Numeric(n) => ReducedValue::Number(*n),
        value => ReducedValue::Text(escape(&value.to_text()).into_owned()),
    }
}

/// Joins non-empty components with `_`.
pub(crate) fn join_components<I, S>(components: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result = String::new();
    for component in components {
        let component = component.as_ref();
        if component.is_empty() {
            continue;
        }
        if !result.is_empty() {
            result.push(NAME_SEPARATOR);
        }
        result.push_str(component);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name() {
        assert_eq!(Some("hello".to_string()), Feature::new("hello", "x").name());
        assert_eq!(None, Feature::new("", "x").name());
        assert_eq!(None, Feature::unnamed("x").name());
    }

    #[test]
    fn test_plain_name_escaped() {
        let f = Feature::new("a_b", 1);
        assert_eq!(Some("a%U005Fb".to_string()), f.name());
    }

    #[test]
    fn test_type_path_name() {
        let f = Feature::type_path("Token", "pos", "NN");
        assert_eq!(Some("Token_pos".to_string()), f.name());

        let f = Feature::type_path("", "part_of/speech", "NN");
        assert_eq!(Some("part%U005Fof/speech".to_string()), f.name());
    }

    #[test]
    fn test_window_name() {
        let f = Feature::window("Word", Orientation::Left, 3, "cat");
        assert_eq!(Some("Word_L3".to_string()), f.name());

        let f = Feature::Window(WindowFeature {
            name: Some("Word".to_string()),
            orientation: Orientation::MiddleReverse,
            offset: 3,
            out_of_bounds: 2,
            value: "<OOB>".into(),
        });
        assert_eq!(Some("Word_MR3OOB2".to_string()), f.name());
    }

    #[test]
    fn test_window_ngram_name() {
        let f = Feature::window_ngram(
            "PreviousOutcomes",
            Orientation::Left,
            Direction::LeftToRight,
            "_",
            1,
            vec!["D".to_string(), "C".to_string(), "B".to_string()],
        );
        assert_eq!(Some("PreviousOutcomes_L1_3gram_L2R".to_string()), f.name());
    }

    #[test]
    fn test_window_ngram_value_parts_escaped() {
        let f = Feature::window_ngram(
            "W",
            Orientation::Right,
            Direction::RightToLeft,
            "_",
            2,
            vec!["B-PER".to_string(), "I_X".to_string()],
        );
        match f.reduced_value() {
            ReducedValue::Text(t) => assert_eq!("B-PER_I%U005FX", t),
            _ => panic!("unexpected value"),
        }
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(FeatureValue::Numeric(4.0), FeatureValue::from(4));
        assert_eq!(FeatureValue::Numeric(42.0), FeatureValue::from(42i64));
        assert_eq!(FeatureValue::Numeric(5.0), FeatureValue::from(5.0f32));
        assert_eq!(FeatureValue::Boolean(true), FeatureValue::from(true));
        assert_eq!(FeatureValue::Nominal("x".to_string()), FeatureValue::from("x"));
    }

    #[test]
    fn test_counts_from_features() {
        let features = vec![
            Feature::new("Word", "the"),
            Feature::new("Word", "cat"),
            Feature::new("Word", "the"),
        ];
        let counts = CountsFeature::from_features("Count_Word", features).unwrap();

        let mut expected = IndexMap::new();
        expected.insert("the".to_string(), 2);
        expected.insert("cat".to_string(), 1);
        assert_eq!(expected, counts.sub_counts);
        assert_eq!(Some("Count_Word".to_string()), counts.name);
    }

    #[test]
    fn test_counts_from_features_mixed_names() {
        let features = vec![Feature::new("Word", "the"), Feature::new("Lemma", "cat")];
        let result = CountsFeature::from_features("Count", features);

        assert_eq!(
            "MixedFeatureNamesError: expected all features to be named \"Word\", found \"Lemma\"",
            &result.err().unwrap().to_string()
        );
    }

    #[test]
    fn test_counts_from_features_nested() {
        let inner = Feature::counts("Inner", IndexMap::new());
        assert!(CountsFeature::from_features("Outer", vec![inner]).is_err());
    }

    #[test]
    fn test_join_components() {
        assert_eq!("a_b", join_components(["", "a", "", "b", ""]));
        assert_eq!("", join_components(Vec::<String>::new()));
    }
}
