//! Account email addresses.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why a typed address was refused before any request was made.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email is required")]
    Empty,

    #[error("email must be at most {} characters", Email::MAX_LENGTH)]
    TooLong,

    /// Not `name@domain` with exactly one `@`.
    #[error("'{0}' is not an email address")]
    Malformed(String),
}

/// The address a user signs in or registers with.
///
/// Parsing only catches typos a login form would catch: surrounding
/// whitespace is dropped, and what remains must be `name@domain` with a
/// single `@` and no spaces. Whether the mailbox exists is the backend's call.
///
/// ```
/// use glamora_core::Email;
///
/// assert_eq!(Email::parse(" jane@glamora.app ").unwrap().as_str(), "jane@glamora.app");
/// assert!(Email::parse("jane").is_err());
/// assert!(Email::parse("jane@glamora@app").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// RFC 5321 path limit.
    pub const MAX_LENGTH: usize = 254;

    /// Parse what the user typed into the email field.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError`] for blank, overlong or malformed input.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(EmailError::Empty);
        }
        if input.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong);
        }

        let well_formed = input.split_once('@').is_some_and(|(name, domain)| {
            !name.is_empty() && !domain.is_empty() && !domain.contains('@')
        }) && !input.contains(char::is_whitespace);
        if !well_formed {
            return Err(EmailError::Malformed(input.to_owned()));
        }

        Ok(Self(input.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_addresses() {
        for input in ["jane@glamora.app", "jane.doe+rings@mail.example.co.uk", "a@b"] {
            assert_eq!(Email::parse(input).unwrap().as_str(), input);
        }
    }

    #[test]
    fn test_pasted_whitespace_is_dropped() {
        let email = Email::parse("  jane@glamora.app\n").unwrap();
        assert_eq!(email.to_string(), "jane@glamora.app");
    }

    #[test]
    fn test_blank_field() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
    }

    #[test]
    fn test_overlong() {
        let long = format!("{}@glamora.app", "j".repeat(250));
        assert_eq!(Email::parse(&long), Err(EmailError::TooLong));
    }

    #[test]
    fn test_typos_are_malformed() {
        for input in [
            "jane",
            "@glamora.app",
            "jane@",
            "jane@glamora@app",
            "jane doe@glamora.app",
        ] {
            assert!(
                matches!(Email::parse(input), Err(EmailError::Malformed(_))),
                "{input}"
            );
        }
    }

    #[test]
    fn test_sent_as_plain_string() {
        let email = Email::parse("jane@glamora.app").unwrap();
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"jane@glamora.app\"");
        let back: Email = serde_json::from_str("\"jane@glamora.app\"").unwrap();
        assert_eq!(back, email);
    }
}
