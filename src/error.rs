//! Error types for BPE training, rule tables and decoding.

use std::{fmt, str::FromStr};

use indicatif::style::TemplateError;

use crate::types::{Symbol, SymbolPair};

/// Controls how UTF-8 decoding errors are handled.
///
/// Mirrors Python's `bytes.decode(errors=...)` semantics.
/// Corrupt symbol IDs always produce errors regardless of mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Raise an error on invalid UTF-8 like Python's "strict".
    Strict,
    /// Replace invalid UTF-8 sequences with U+FFFD (like Python's "replace").
    #[default]
    Replace,
}

impl FromStr for ErrorMode {
    type Err = ConfigError;

    /// Parses a Python-style error mode string ("strict" or "replace").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(Self::Strict),
            "replace" => Ok(Self::Replace),
            _ => Err(ConfigError::InvalidErrorMode(s.to_string())),
        }
    }
}

/// Errors raised while interpreting configuration values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Error mode string was neither "strict" nor "replace".
    InvalidErrorMode(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidErrorMode(s) => write!(
                f,
                "invalid error mode: {s:?} (expected \"strict\" or \"replace\")"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors that can occur during symbol decoding.
#[derive(Debug)]
pub enum DecodeError {
    /// Merged symbol ID has no rule; the ID stream and rule table are out of sync.
    CorruptTokenStream(Symbol),
    /// Decoded bytes are not valid UTF-8 (strict mode only).
    InvalidUtf8(std::string::FromUtf8Error),
    /// Progress bar template string was invalid.
    ProgressBarSetup(TemplateError),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CorruptTokenStream(s) => write!(f, "corrupt token stream: unknown symbol id {s}"),
            Self::InvalidUtf8(e) => write!(f, "invalid UTF-8 in decoded bytes: {e}"),
            Self::ProgressBarSetup(msg) => write!(f, "template parsing failed: {msg}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidUtf8(e) => Some(e),
            Self::ProgressBarSetup(e) => Some(e),
            Self::CorruptTokenStream(_) => None,
        }
    }
}

/// Errors that can occur during batch encoding.
#[derive(Debug)]
pub enum EncodeError {
    /// Progress bar template string was invalid.
    ProgressBarSetup(TemplateError),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProgressBarSetup(msg) => write!(f, "template parsing failed: {msg}"),
        }
    }
}

impl std::error::Error for EncodeError {}

/// Errors that can occur while running a configured training job.
#[derive(Debug)]
pub enum TrainError {
    /// Progress bar template string was invalid.
    ProgressBarSetup(TemplateError),
}

impl fmt::Display for TrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProgressBarSetup(msg) => write!(f, "template parsing failed: {msg}"),
        }
    }
}

impl std::error::Error for TrainError {}

impl From<TemplateError> for TrainError {
    fn from(e: TemplateError) -> Self {
        Self::ProgressBarSetup(e)
    }
}

/// Errors that can occur when rebuilding a rule table from merge history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// Merge IDs must run 256, 257, ... in history order.
    NonContiguousId { expected: Symbol, found: Symbol },
    /// The same pair was merged twice.
    DuplicatePair(SymbolPair),
    /// A pair refers to a symbol not yet created at that point in history.
    ForwardReference { pair: SymbolPair, new_id: Symbol },
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonContiguousId { expected, found } => {
                write!(f, "non-contiguous merge id: expected {expected}, found {found}")
            }
            Self::DuplicatePair(p) => write!(f, "pair ({}, {}) merged more than once", p.0, p.1),
            Self::ForwardReference { pair, new_id } => write!(
                f,
                "pair ({}, {}) for id {new_id} refers to a symbol created later",
                pair.0, pair.1
            ),
        }
    }
}

impl std::error::Error for RuleError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mode_parses_known_names() {
        assert_eq!("strict".parse::<ErrorMode>(), Ok(ErrorMode::Strict));
        assert_eq!("replace".parse::<ErrorMode>(), Ok(ErrorMode::Replace));
        assert_eq!(ErrorMode::default(), ErrorMode::Replace);
    }

    #[test]
    fn test_error_mode_rejects_unknown_name() {
        let err = "bogus".parse::<ErrorMode>().expect_err("unknown mode is rejected");
        assert_eq!(err, ConfigError::InvalidErrorMode("bogus".into()));
        assert_eq!(
            err.to_string(),
            r#"invalid error mode: "bogus" (expected "strict" or "replace")"#
        );
    }

    #[test]
    fn test_error_mode_is_case_sensitive() {
        assert!("Strict".parse::<ErrorMode>().is_err());
    }

    #[test]
    fn test_rule_error_display() {
        let err = RuleError::NonContiguousId { expected: 256, found: 258 };
        assert_eq!(err.to_string(), "non-contiguous merge id: expected 256, found 258");
        let err = RuleError::DuplicatePair(SymbolPair(97, 97));
        assert_eq!(err.to_string(), "pair (97, 97) merged more than once");
    }
}
