//! Application: a root command plus release metadata, and dispatch.

use std::io::{self, Write};

use tracing::debug;

use crate::complete::complete;
use crate::error::UnknownCommand;
use crate::help::render_help;
use crate::parse::{ParseOutcome, parse};
use crate::resolve::resolve;
use crate::types::Command;

/// A complete command-line application.
///
/// Wraps the root [`Command`] by composition; every tree operation works on
/// that root.
///
/// # Examples
///
/// ```
/// use command_tree_core::*;
///
/// let root = Command::builder("greet")
///     .add_parameter(ParameterConfig::positional("name", ParamType::String).required())
///     .set_operation(|values| {
///         assert_eq!(values.get_str("name"), Some("world"));
///         Ok(())
///     })
///     .build()
///     .unwrap();
/// let app = Application::new(root, "1.2.0");
/// assert_eq!(app.version_string(), "greet 1.2.0");
///
/// let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());
/// let code = app.run(&["world"], &mut out, &mut err).unwrap();
/// assert_eq!(code, 0);
///
/// let code = app.run::<&str, _, _>(&[], &mut out, &mut err).unwrap();
/// assert_eq!(code, 1);
/// assert_eq!(String::from_utf8(err).unwrap(), "error: missing required positional 'name'\n");
/// ```
#[derive(Debug, Clone)]
pub struct Application {
    /// Display name, defaults to the root command's name.
    pub name: String,
    /// Release version (semver string).
    pub version: String,
    /// Optional one-line description.
    pub description: Option<String>,
    root: Command,
}

impl Application {
    pub fn new(root: Command, version: impl Into<String>) -> Self {
        Self {
            name: root.name().to_string(),
            version: version.into(),
            description: None,
            root,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn root(&self) -> &Command {
        &self.root
    }

    /// `"<name> <version>"`.
    pub fn version_string(&self) -> String {
        format!("{} {}", self.name, self.version)
    }

    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> ParseOutcome<'_> {
        parse(&self.root, tokens)
    }

    /// Help for the command addressed by `path`. Help for the root starts
    /// with the version line.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownCommand`] for the first word of `path` that is not a
    /// child of the command reached before it.
    pub fn help<S: AsRef<str>>(
        &self,
        path: &[S],
        topic: Option<&str>,
    ) -> Result<String, UnknownCommand> {
        let resolution = resolve(&self.root, path);
        if let Some(word) = resolution.remaining.first() {
            return Err(UnknownCommand {
                parent: resolution.path.join(" "),
                word: word.as_ref().to_string(),
            });
        }

        let body = render_help(resolution.command, &resolution.path, topic);
        if resolution.path.len() > 1 {
            return Ok(body);
        }
        Ok(match &self.description {
            Some(description) => format!("{}\n{description}\n\n{body}", self.version_string()),
            None => format!("{}\n\n{body}", self.version_string()),
        })
    }

    pub fn complete<S: AsRef<str>>(&self, words: &[S]) -> Vec<String> {
        complete(&self.root, words)
    }

    /// Parses `tokens` and dispatches to the resolved command's operation.
    ///
    /// Returns the process exit code: `1` when parsing fails (each error is
    /// written to `err` as `error: <message>`) or the operation fails; `0`
    /// otherwise. A command without an operation prints its help to `out`.
    ///
    /// # Errors
    ///
    /// Only I/O failures writing to `out` or `err`.
    pub fn run<S, O, E>(&self, tokens: &[S], out: &mut O, err: &mut E) -> io::Result<i32>
    where
        S: AsRef<str>,
        O: Write,
        E: Write,
    {
        let outcome = self.parse(tokens);
        if !outcome.is_ok() {
            for error in &outcome.errors {
                writeln!(err, "error: {error}")?;
            }
            return Ok(1);
        }

        let Some(operation) = outcome.command.operation() else {
            debug!(command = outcome.command.name(), "no operation bound, showing help");
            let help = render_help(outcome.command, &outcome.path, None);
            out.write_all(help.as_bytes())?;
            return Ok(0);
        };

        match operation.call(&outcome.values) {
            Ok(()) => Ok(0),
            Err(message) => {
                writeln!(err, "error: {message}")?;
                Ok(1)
            }
        }
    }
}
