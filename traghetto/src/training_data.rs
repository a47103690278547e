//! Plain-text training data.
//!
//! Each instance is written as one line: the escaped outcome followed by space-separated
//! `<name>[=<value>]` tokens. The value suffix is omitted when the value is exactly 1.0, and an
//! instance without features is written as a single `null=0` token.

use std::io::{BufRead, Lines, Write};

use crate::encoder::NameNumberPair;
use crate::errors::{Result, TraghettoError};
use crate::escape::{escape, unescape};
use crate::instance::DataWriter;

const EMPTY_FEATURES_TOKEN: &str = "null=0";

/// Formats one training instance without the trailing line break.
///
/// # Errors
///
/// [`TraghettoError::InvalidArgument`] will be returned if the outcome is empty or a feature
/// name is empty or contains whitespace or `=`.
///
/// # Examples
///
/// ```
/// use traghetto::{format_training_line, NameNumberPair};
///
/// let line = format_training_line(
///     "NN",
///     &[NameNumberPair::new("Word_cat", 1.0), NameNumberPair::new("Length", 3.0)],
/// )
/// .unwrap();
/// assert_eq!("NN Word_cat Length=3", line);
/// ```
pub fn format_training_line(outcome: &str, features: &[NameNumberPair]) -> Result<String> {
    if outcome.is_empty() {
        return Err(TraghettoError::invalid_argument("outcome", "must not be empty"));
    }
    let mut line = escape(outcome).into_owned();
    if features.is_empty() {
        line.push(' ');
        line.push_str(EMPTY_FEATURES_TOKEN);
        return Ok(line);
    }
    for pair in features {
        if pair.name.is_empty() || pair.name.contains(|c: char| c == '=' || c.is_whitespace()) {
            return Err(TraghettoError::invalid_argument(
                "features",
                format!("{:?} cannot be written to training data", pair.name),
            ));
        }
        line.push(' ');
        line.push_str(&pair.name);
        if pair.number != 1.0 {
            line.push('=');
            line.push_str(&pair.number.to_string());
        }
    }
    Ok(line)
}

/// One parsed line of training data.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainingLine {
    pub outcome: String,
    pub features: Vec<NameNumberPair>,
}

/// Parses one line written by [`format_training_line()`].
///
/// # Errors
///
/// [`TraghettoError::InvalidFormat`] will be returned if the line is empty, the outcome has a
/// malformed escape sequence, or a value is not a number.
pub fn parse_training_line(line: &str) -> Result<TrainingLine> {
    let mut tokens = line.split_whitespace();
    let outcome = tokens
        .next()
        .ok_or_else(|| TraghettoError::invalid_format("training line is empty"))?;
    let outcome = unescape(outcome)?.into_owned();

    let tokens: Vec<&str> = tokens.collect();
    if tokens == [EMPTY_FEATURES_TOKEN] {
        return Ok(TrainingLine {
            outcome,
            features: vec![],
        });
    }
    let mut features = Vec::with_capacity(tokens.len());
    for token in tokens {
        let pair = match token.split_once('=') {
            Some((name, value)) => {
                let number = value.parse().map_err(|_| {
                    TraghettoError::invalid_format(format!("invalid value in {token:?}"))
                })?;
                NameNumberPair::new(name, number)
            }
            None => NameNumberPair::new(token, 1.0),
        };
        features.push(pair);
    }
    Ok(TrainingLine { outcome, features })
}

/// Data writer that emits the training-data line format.
pub struct TrainingDataWriter<W> {
    wtr: W,
    n_instances: usize,
}

impl<W> TrainingDataWriter<W>
where
    W: Write,
{
    pub const fn new(wtr: W) -> Self {
        Self {
            wtr,
            n_instances: 0,
        }
    }

    /// The number of instances written so far.
    pub const fn n_instances(&self) -> usize {
        self.n_instances
    }

    /// Flushes the underlying writer and returns it.
    ///
    /// # Errors
    ///
    /// When the writer fails to flush, the error will be returned as is.
    pub fn into_inner(mut self) -> Result<W> {
        self.wtr.flush()?;
        Ok(self.wtr)
    }
}

impl<O, W> DataWriter<O> for TrainingDataWriter<W>
where
    O: ToString,
    W: Write,
{
    fn write_training_instance(
        &mut self,
        features: Vec<NameNumberPair>,
        outcome: &O,
    ) -> Result<()> {
        let line = format_training_line(&outcome.to_string(), &features)?;
        writeln!(self.wtr, "{line}")?;
        self.n_instances += 1;
        Ok(())
    }
}

/// Iterator over the training lines of a reader. Blank lines are skipped.
pub struct TrainingDataReader<R> {
    lines: Lines<R>,
}

impl<R> TrainingDataReader<R>
where
    R: BufRead,
{
    pub fn new(rdr: R) -> Self {
        Self { lines: rdr.lines() }
    }
}

impl<R> Iterator for TrainingDataReader<R>
where
    R: BufRead,
{
    type Item = Result<TrainingLine>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            if !line.trim().is_empty() {
                return Some(parse_training_line(&line));
            }
        }
    }
}
