use crate::{Error, Result};
use std::fmt;

/// User description that has passed validation: trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trim surrounding whitespace and reject input with nothing left.
pub fn validate(raw: &str) -> Result<Prompt> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyPrompt);
    }
    Ok(Prompt(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_trims() {
        let prompt = validate("  a red bicycle \n").unwrap();
        assert_eq!(prompt.as_str(), "a red bicycle");
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert!(matches!(validate(""), Err(Error::EmptyPrompt)));
    }

    #[test]
    fn test_validate_rejects_whitespace_only() {
        assert!(matches!(validate("   \t\n"), Err(Error::EmptyPrompt)));
    }

    #[test]
    fn test_validate_keeps_inner_whitespace() {
        let prompt = validate("a  cat   on a mat").unwrap();
        assert_eq!(prompt.to_string(), "a  cat   on a mat");
    }
}
