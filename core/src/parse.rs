//! Top-level parse: resolve, bind, validate.

use tracing::debug;

use crate::bind::bind;
use crate::error::ParseError;
use crate::resolve::resolve;
use crate::types::{Command, ValueMap};
use crate::validate::check_required;

/// Everything a caller needs after parsing one token list.
#[derive(Debug, Clone)]
pub struct ParseOutcome<'a> {
    /// The deepest command addressed by the tokens.
    pub command: &'a Command,
    /// Command names from the root down to `command`.
    pub path: Vec<&'a str>,
    /// Values for every parameter of `command`.
    pub values: ValueMap,
    /// Binding errors, or required-parameter errors when binding was clean.
    pub errors: Vec<ParseError>,
}

impl ParseOutcome<'_> {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Error messages in the order they were found.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Parses `tokens` against the tree rooted at `root`.
///
/// Required parameters are only checked when binding produced no errors, so
/// callers never see "missing" noise on top of malformed input.
///
/// # Examples
///
/// ```
/// use command_tree_core::*;
///
/// let say = Command::builder("say")
///     .add_parameters([
///         ParameterConfig::positional("input", ParamType::String)
///             .required()
///             .repeatable(0),
///         ParameterConfig::flag("repeat-count", ParamType::Number)
///             .with_short("n")
///             .with_default(1),
///     ])
///     .build()
///     .unwrap();
/// let root = Command::builder("app").add_subcommand(say).build().unwrap();
///
/// let outcome = parse(&root, &["say", "-n", "abc"]);
/// assert_eq!(outcome.command.name(), "say");
/// assert_eq!(
///     outcome.error_messages(),
///     vec!["failed to convert 'abc' to type number for flag '-n'"]
/// );
/// ```
pub fn parse<'a, S: AsRef<str>>(root: &'a Command, tokens: &[S]) -> ParseOutcome<'a> {
    let resolution = resolve(root, tokens);
    let command = resolution.command;
    debug!(
        command = command.name(),
        remaining = resolution.remaining.len(),
        "resolved command"
    );

    let (values, errors) = bind(command, resolution.remaining);
    let errors = if errors.is_empty() {
        check_required(command, &values)
    } else {
        debug!(
            count = errors.len(),
            "binding failed, skipping required-parameter check"
        );
        errors
    };

    ParseOutcome {
        command,
        path: resolution.path,
        values,
        errors,
    }
}
