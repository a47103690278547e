use std::io::{BufRead, Write};

use hashbrown::HashMap;

use crate::errors::{Result, TraghettoError};

/// Bidirectional mapping between names and indices.
///
/// Indices are assigned in insertion order starting from 0.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dictionary {
    ids: HashMap<String, u32>,
    names: Vec<String>,
}

impl Dictionary {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the index of `name`, assigning the next index if it is unknown.
    ///
    /// # Errors
    ///
    /// [`TraghettoError::CastError`] will be returned if the number of entries exceeds
    /// `u32::MAX`.
    pub fn get_or_insert(&mut self, name: &str) -> Result<u32> {
        if let Some(&id) = self.ids.get(name) {
            return Ok(id);
        }
        let id = u32::try_from(self.names.len())?;
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        Ok(id)
    }

    /// Gets the index of `name` without modifying the dictionary.
    pub fn get(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }

    /// Gets the name assigned to `index`.
    pub fn name(&self, index: u32) -> Option<&str> {
        self.names.get(usize::try_from(index).ok()?).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in index order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Exports the dictionary as a lookup file.
    ///
    /// The first line is the number of entries, followed by one `<name>\t<index>` line per entry
    /// in index order, or in ascending order of names if `sort` is true.
    ///
    /// # Errors
    ///
    /// [`TraghettoError::InvalidArgument`] will be returned if a name contains a tab or a line
    /// break. When `wtr` generates an error, it will be returned as is.
    pub fn write<W>(&self, mut wtr: W, sort: bool) -> Result<()>
    where
        W: Write,
    {
        if let Some(name) = self.names.iter().find(|name| name.contains(['\t', '\n', '\r'])) {
            return Err(TraghettoError::invalid_argument(
                "name",
                format!("{name:?} cannot be written to a lookup file"),
            ));
        }
        let mut entries: Vec<(&str, usize)> = self
            .names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();
        if sort {
            entries.sort_unstable();
        }
        writeln!(wtr, "{}", entries.len())?;
        for (name, index) in entries {
            writeln!(wtr, "{name}\t{index}")?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Reads a lookup file written by [`Dictionary::write()`].
    ///
    /// # Errors
    ///
    /// [`TraghettoError::InvalidFormat`] will be returned if the count line is missing, the
    /// number of entries does not match it, or the indices are not a permutation of
    /// `0..count`. When `rdr` generates an error, it will be returned as is.
    pub fn read<R>(rdr: R) -> Result<Self>
    where
        R: BufRead,
    {
        let mut lines = rdr.lines();
        let count_line = lines
            .next()
            .ok_or_else(|| TraghettoError::invalid_format("lookup file is empty"))??;
        let count: usize = count_line.trim().parse().map_err(|_| {
            TraghettoError::invalid_format(format!("invalid entry count: {count_line:?}"))
        })?;

        // Entries are keyed by index, so the count line is never used to pre-allocate.
        let mut entries: HashMap<usize, String> = HashMap::new();
        for (i, line) in lines.enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let (name, index) = line.rsplit_once('\t').ok_or_else(|| {
                TraghettoError::invalid_format(format!("line {}: missing tab", i + 2))
            })?;
            let index: usize = index.parse().map_err(|_| {
                TraghettoError::invalid_format(format!("line {}: invalid index {index:?}", i + 2))
            })?;
            if index >= count {
                return Err(TraghettoError::invalid_format(format!(
                    "line {}: index {index} is out of range for {count} entries",
                    i + 2
                )));
            }
            if entries.insert(index, name.to_string()).is_some() {
                return Err(TraghettoError::invalid_format(format!(
                    "line {}: index {index} is assigned twice",
                    i + 2
                )));
            }
        }
        if entries.len() != count {
            return Err(TraghettoError::invalid_format(format!(
                "expected {count} entries, found {}",
                entries.len()
            )));
        }

        let mut dict = Self::new();
        for index in 0..count {
            let name = entries.remove(&index).ok_or_else(|| {
                TraghettoError::invalid_format(format!("index {index} is missing"))
            })?;
            let expected = dict.len();
            if dict.get_or_insert(&name)? as usize != expected {
                return Err(TraghettoError::invalid_format(format!(
                    "name {name:?} is assigned twice"
                )));
            }
        }
        Ok(dict)
    }
}
