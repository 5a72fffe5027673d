//! Name normalization for user-authored schema entities.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Upper bound for class/property names, in characters.
pub const MAX_NAME_CHARS: usize = 255;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Validation failures for user-entered names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameValidationError {
    /// Name is empty after trimming.
    Empty,
    /// Name exceeds `MAX_NAME_CHARS` after normalization.
    TooLong { max: usize, actual: usize },
}

impl Display for NameValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "name must not be blank"),
            Self::TooLong { max, actual } => {
                write!(f, "name is {actual} characters long; at most {max} allowed")
            }
        }
    }
}

impl Error for NameValidationError {}

/// Trims a name and collapses inner whitespace runs to one space.
///
/// # Errors
/// - `Empty` when nothing but whitespace was entered.
/// - `TooLong` when the normalized name exceeds `MAX_NAME_CHARS`.
pub fn normalize_name(raw: &str) -> Result<String, NameValidationError> {
    let collapsed = WHITESPACE_RE.replace_all(raw.trim(), " ");
    if collapsed.is_empty() {
        return Err(NameValidationError::Empty);
    }
    let actual = collapsed.chars().count();
    if actual > MAX_NAME_CHARS {
        return Err(NameValidationError::TooLong {
            max: MAX_NAME_CHARS,
            actual,
        });
    }
    Ok(collapsed.into_owned())
}
