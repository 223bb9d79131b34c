//! Free-text input checks for user-supplied design prompts.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Longest accepted free-text input, in characters.
pub const MAX_INPUT_LENGTH: usize = 1000;

// Markup that must never reach the generator or be echoed back into a page.
// Event handlers only count inside a tag, so "stone=emerald" is plain text.
static UNSAFE_MARKUP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<script|javascript:|<[^>]*\bon\w+\s*=|<iframe").expect("Invalid regex")
});

/// Why an input was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} exceeds {MAX_INPUT_LENGTH} characters")]
    TooLong { field: &'static str },

    #[error("{field} contains disallowed markup")]
    UnsafeMarkup { field: &'static str },
}

/// Check a required field: non-blank, bounded, no script-like markup.
///
/// # Errors
///
/// Returns the first rule the input breaks.
pub fn validate_required(field: &'static str, input: &str) -> Result<(), InputError> {
    if input.trim().is_empty() {
        return Err(InputError::Empty { field });
    }
    validate_input(field, input)
}

/// Check an optional free-text field. Blank input is accepted.
///
/// # Errors
///
/// Returns [`InputError::TooLong`] or [`InputError::UnsafeMarkup`].
pub fn validate_input(field: &'static str, input: &str) -> Result<(), InputError> {
    if input.chars().count() > MAX_INPUT_LENGTH {
        return Err(InputError::TooLong { field });
    }
    if UNSAFE_MARKUP_RE.is_match(input) {
        return Err(InputError::UnsafeMarkup { field });
    }
    Ok(())
}
