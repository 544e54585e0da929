use serde::{Deserialize, Serialize};
use std::fmt;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 30;

/// The principal a token speaks for. Nothing beyond the name is tracked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsernameError {
    #[error("\"username\" is required")]
    Missing,
    #[error("\"username\" is not allowed to be empty")]
    Empty,
    #[error("\"username\" length must be at least {} characters long", USERNAME_MIN_LEN)]
    TooShort,
    #[error(
        "\"username\" length must be less than or equal to {} characters long",
        USERNAME_MAX_LEN
    )]
    TooLong,
}

impl Username {
    /// Trims surrounding whitespace and checks the length in characters.
    pub fn parse(raw: &str) -> Result<Self, UsernameError> {
        let trimmed = raw.trim();
        let len = trimmed.chars().count();
        if len == 0 {
            return Err(UsernameError::Empty);
        }
        if len < USERNAME_MIN_LEN {
            return Err(UsernameError::TooShort);
        }
        if len > USERNAME_MAX_LEN {
            return Err(UsernameError::TooLong);
        }
        Ok(Username(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Username::parse(s)
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Username::parse(&value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_names_within_bounds() {
        assert_eq!(Username::parse("Tamara").unwrap().as_str(), "Tamara");
        assert_eq!(Username::parse("abc").unwrap().as_str(), "abc");
        assert!(Username::parse(&"x".repeat(30)).is_ok());
    }

    #[test]
    fn trims_before_measuring() {
        assert_eq!(Username::parse("  Jim  ").unwrap().as_str(), "Jim");
        assert_eq!(Username::parse("  ab  "), Err(UsernameError::TooShort));
        assert_eq!(Username::parse("   "), Err(UsernameError::Empty));
    }

    #[test]
    fn rejects_out_of_bounds() {
        let err = Username::parse("ab").unwrap_err();
        assert_eq!(err, UsernameError::TooShort);
        assert!(err.to_string().contains("\"username\""));
        assert_eq!(
            Username::parse(&"x".repeat(31)),
            Err(UsernameError::TooLong)
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert!(Username::parse("ტამარა").is_ok());
        assert_eq!(Username::parse("ტა"), Err(UsernameError::TooShort));
    }
}
