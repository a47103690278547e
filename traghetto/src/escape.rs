//! Percent-style escaping of name components.
//!
//! A component is escaped before it is joined into a canonical name, so `_` only ever appears
//! in a canonical name as a separator. Every escaped character becomes `%U` followed by four
//! upper-case hexadecimal digits of its code point.

use std::borrow::Cow;
use std::fmt::Write;

use crate::errors::{Result, TraghettoError};

const ESCAPE_PREFIX: &str = "%U";
const ESCAPE_DIGITS: usize = 4;

#[inline]
fn needs_escape(c: char) -> bool {
    matches!(c, '%' | '_' | '=' | ':') || c.is_whitespace() || c.is_control()
}

/// Escapes a name component.
///
/// # Arguments
///
/// * `s` - A raw component.
///
/// # Returns
///
/// The escaped component. No allocation happens if nothing has to be escaped.
///
/// # Examples
///
/// ```
/// use traghetto::escape;
///
/// assert_eq!("hello%U003Dgoodbye", escape("hello=goodbye"));
/// assert_eq!("plain", escape("plain"));
/// ```
pub fn escape(s: &str) -> Cow<str> {
    if !s.chars().any(needs_escape) {
        return Cow::Borrowed(s);
    }
    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        if needs_escape(c) {
            // All escaped characters are below U+10000.
            write!(result, "{}{:04X}", ESCAPE_PREFIX, u32::from(c)).ok();
        } else {
            result.push(c);
        }
    }
    Cow::Owned(result)
}

/// Reverses [`escape()`].
///
/// # Errors
///
/// [`TraghettoError::InvalidFormat`] will be returned if `s` contains a truncated escape
/// sequence, a non-hexadecimal digit, or a code point that is not a valid character.
pub fn unescape(s: &str) -> Result<Cow<str>> {
    if !s.contains('%') {
        return Ok(Cow::Borrowed(s));
    }
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('%') {
        result.push_str(&rest[..pos]);
        let seq = &rest[pos..];
        if !seq.starts_with(ESCAPE_PREFIX) {
            return Err(TraghettoError::invalid_format(format!(
                "invalid escape sequence in {s:?}"
            )));
        }
        let digits = seq
            .get(ESCAPE_PREFIX.len()..ESCAPE_PREFIX.len() + ESCAPE_DIGITS)
            .filter(|d| d.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| {
                TraghettoError::invalid_format(format!("truncated escape sequence in {s:?}"))
            })?;
        let c = u32::from_str_radix(digits, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| {
                TraghettoError::invalid_format(format!("invalid code point %U{digits} in {s:?}"))
            })?;
        result.push(c);
        rest = &seq[ESCAPE_PREFIX.len() + ESCAPE_DIGITS..];
    }
    result.push_str(rest);
    Ok(Cow::Owned(result))
}
