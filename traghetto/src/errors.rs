//! Definition of errors.

use std::error::Error;
use std::fmt;

pub type Result<T, E = TraghettoError> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum TraghettoError {
    InvalidArgument(InvalidArgumentError),
    InvalidFormat(InvalidFormatError),
    InvalidModel(InvalidModelError),
    MixedFeatureNames(MixedFeatureNamesError),
    NoInstanceOutcome,
    CastError(std::num::TryFromIntError),
    DecodeError(bincode::error::DecodeError),
    EncodeError(bincode::error::EncodeError),
    IOError(std::io::Error),
}

impl TraghettoError {
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) fn invalid_format<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError { msg: msg.into() })
    }

    pub(crate) fn invalid_model<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidModel(InvalidModelError { msg: msg.into() })
    }

    pub(crate) fn mixed_feature_names<S, T>(expected: S, found: T) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        Self::MixedFeatureNames(MixedFeatureNamesError {
            expected: expected.into(),
            found: found.into(),
        })
    }
}

impl fmt::Display for TraghettoError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidArgument(e) => e.fmt(f),
            Self::InvalidFormat(e) => e.fmt(f),
            Self::InvalidModel(e) => e.fmt(f),
            Self::MixedFeatureNames(e) => e.fmt(f),
            Self::NoInstanceOutcome => write!(f, "NoInstanceOutcomeError: instance has no outcome"),
            Self::CastError(e) => e.fmt(f),
            Self::DecodeError(e) => e.fmt(f),
            Self::EncodeError(e) => e.fmt(f),
            Self::IOError(e) => e.fmt(f),
        }
    }
}

impl Error for TraghettoError {}

/// Error used when the argument is invalid.
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// Error used when a lookup file, a training-data line, or an escaped string is malformed.
#[derive(Debug)]
pub struct InvalidFormatError {
    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}", self.msg)
    }
}

impl Error for InvalidFormatError {}

/// Error used when the model is invalid.
#[derive(Debug)]
pub struct InvalidModelError {
    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidModelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidModelError: {}", self.msg)
    }
}

impl Error for InvalidModelError {}

/// Error used when features that must share a single name carry different names.
#[derive(Debug)]
pub struct MixedFeatureNamesError {
    /// The name established by the first feature.
    pub(crate) expected: String,

    /// The offending name.
    pub(crate) found: String,
}

impl fmt::Display for MixedFeatureNamesError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "MixedFeatureNamesError: expected all features to be named {:?}, found {:?}",
            self.expected, self.found
        )
    }
}

impl Error for MixedFeatureNamesError {}

impl From<std::num::TryFromIntError> for TraghettoError {
    fn from(error: std::num::TryFromIntError) -> Self {
        Self::CastError(error)
    }
}

impl From<bincode::error::DecodeError> for TraghettoError {
    fn from(error: bincode::error::DecodeError) -> Self {
        Self::DecodeError(error)
    }
}

impl From<bincode::error::EncodeError> for TraghettoError {
    fn from(error: bincode::error::EncodeError) -> Self {
        Self::EncodeError(error)
    }
}

impl From<std::io::Error> for TraghettoError {
    fn from(error: std::io::Error) -> Self {
        Self::IOError(error)
    }
}
