//! Error types for tree construction and parsing.
//!
//! [`BuildError`] reports a malformed command tree and is a programmer error.
//! [`ParseError`] reports a problem with user input; parsing collects these
//! instead of stopping at the first one. The `Display` output of
//! [`ParseError`] is the user-facing message.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::convert::ConvertError;
use crate::types::ParamType;

/// Errors raised while building a command tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// Positional parameter declared without a name.
    #[error("positional parameter must define a name")]
    MissingName,
    /// Short flag is not exactly one character.
    #[error("invalid short flag '{0}': expected a single character")]
    InvalidShortFlag(String),
    /// Long flag is empty or carries its own leading dash.
    #[error("invalid long flag '{0}'")]
    InvalidLongFlag(String),
    /// Declared default does not match the declared type.
    #[error("default for '{name}' is a {found}, expected {expected}")]
    DefaultTypeMismatch {
        name: String,
        expected: ParamType,
        found: &'static str,
    },
    /// Two parameters of one command share a name.
    #[error("duplicate parameter in command '{command}': {name}")]
    DuplicateParameter { command: String, name: String },
    /// Two flags of one command share a spelling.
    #[error("duplicate flag in command '{command}': {flag}")]
    DuplicateFlag { command: String, flag: String },
    /// Two children of one command share a name.
    #[error("duplicate subcommand in command '{command}': {name}")]
    DuplicateSubcommand { command: String, name: String },
}

/// Category of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    UnknownFlag,
    ConversionFailure,
    RepeatLimitExceeded,
    UnexpectedPositional,
    MissingRequired,
}

/// The parameter an error refers to, as the user would recognise it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// A flag, by the spelling the user typed (or its display name).
    Flag(String),
    /// A positional, by parameter name.
    Positional(String),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Flag(flag) => write!(f, "flag '{flag}'"),
            Target::Positional(name) => write!(f, "positional '{name}'"),
        }
    }
}

/// A problem found while binding tokens or validating the result.
///
/// # Examples
///
/// ```
/// use command_tree_core::{ErrorKind, ParseError, Target};
///
/// let err = ParseError::MissingRequired {
///     target: Target::Positional("input".into()),
/// };
/// assert_eq!(err.kind(), ErrorKind::MissingRequired);
/// assert_eq!(err.to_string(), "missing required positional 'input'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown flag '{flag}'")]
    UnknownFlag { flag: String },

    #[error("{}", conversion_message(.target, .reason))]
    ConversionFailure { target: Target, reason: ConvertError },

    #[error("flag '{flag}' may be supplied at most {limit} time(s)")]
    RepeatLimitExceeded { flag: String, limit: usize },

    #[error("unexpected positional argument '{value}'")]
    UnexpectedPositional { value: String },

    #[error("missing required {target}")]
    MissingRequired { target: Target },
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::UnknownFlag { .. } => ErrorKind::UnknownFlag,
            ParseError::ConversionFailure { .. } => ErrorKind::ConversionFailure,
            ParseError::RepeatLimitExceeded { .. } => ErrorKind::RepeatLimitExceeded,
            ParseError::UnexpectedPositional { .. } => ErrorKind::UnexpectedPositional,
            ParseError::MissingRequired { .. } => ErrorKind::MissingRequired,
        }
    }
}

/// A help path names a word that is not a child of the command reached so far.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command '{word}' for '{parent}'")]
pub struct UnknownCommand {
    /// Space-joined path of the deepest command that was found.
    pub parent: String,
    pub word: String,
}

fn conversion_message(target: &Target, reason: &ConvertError) -> String {
    match reason {
        ConvertError::MissingValue(expected) => {
            format!("missing value of type {expected} for {target}")
        }
        ConvertError::Invalid { raw, expected } => {
            format!("failed to convert '{raw}' to type {expected} for {target}")
        }
    }
}
