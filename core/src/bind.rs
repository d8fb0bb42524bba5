//! Argument binding.
//!
//! Consumes the tokens left after tree resolution and fills the resolved
//! command's parameters. Tokens starting with `-` select flags; a flag takes
//! the next non-flag token as its value, or no value when followed by another
//! flag or the end of input. Every other token fills the positional under the
//! cursor. Errors are collected and binding always runs to the end of input.

use tracing::debug;

use crate::convert::convert;
use crate::error::{ParseError, Target};
use crate::types::{Command, Value, ValueMap};

const FLAG_MARKER: char = '-';

/// Seeds a value map with an entry for every parameter of `command`.
///
/// Repeatable parameters start as an empty list, scalars as their declared
/// default. Only `command`'s own parameters are seeded, not its children's.
///
/// # Examples
///
/// ```
/// use command_tree_core::*;
///
/// let cmd = Command::builder("say")
///     .add_parameters([
///         ParameterConfig::positional("input", ParamType::String).repeatable(0),
///         ParameterConfig::flag("repeat-count", ParamType::Number).with_default(1),
///         ParameterConfig::flag("prefix", ParamType::String),
///     ])
///     .build()
///     .unwrap();
///
/// let values = seed_defaults(&cmd);
/// assert_eq!(values.get("input"), Some(&Value::List(vec![])));
/// assert_eq!(values.get_number("repeat_count"), Some(1.0));
/// assert_eq!(values.get("prefix"), Some(&Value::Null));
/// ```
pub fn seed_defaults(command: &Command) -> ValueMap {
    let mut values = ValueMap::new();
    for param in command.parameters() {
        let seed = if param.is_repeatable() {
            Value::List(Vec::new())
        } else {
            param.default().clone()
        };
        values.insert(param.name(), seed);
    }
    values
}

/// Binds `tokens` to the parameters of `command`.
///
/// Starts from [`seed_defaults`] and returns the filled map together with
/// every error met along the way.
///
/// # Examples
///
/// ```
/// use command_tree_core::*;
///
/// let cmd = Command::builder("say")
///     .add_parameters([
///         ParameterConfig::positional("input", ParamType::String).repeatable(0),
///         ParameterConfig::flag("repeat-count", ParamType::Number).with_short("n"),
///     ])
///     .build()
///     .unwrap();
///
/// let (values, errors) = bind(&cmd, &["hello", "world", "-n", "5"]);
/// assert!(errors.is_empty());
/// assert_eq!(values.get_number("repeat_count"), Some(5.0));
/// assert_eq!(values.get_list("input").unwrap().len(), 2);
/// ```
pub fn bind<S: AsRef<str>>(command: &Command, tokens: &[S]) -> (ValueMap, Vec<ParseError>) {
    let mut binder = Binder::new(command);
    binder.consume(tokens);
    (binder.values, binder.errors)
}

#[derive(Debug, Clone, Copy)]
enum State<'t> {
    AwaitingToken,
    HoldingFlag(&'t str),
}

struct Binder<'a> {
    command: &'a Command,
    /// Index of the positional the next positional token binds to.
    cursor: usize,
    values: ValueMap,
    errors: Vec<ParseError>,
}

impl<'a> Binder<'a> {
    fn new(command: &'a Command) -> Self {
        Self {
            command,
            cursor: 0,
            values: seed_defaults(command),
            errors: Vec::new(),
        }
    }

    fn consume<'t, S: AsRef<str>>(&mut self, tokens: &'t [S]) {
        let mut state = State::AwaitingToken;

        for token in tokens {
            let token = token.as_ref();
            state = match (state, token.starts_with(FLAG_MARKER)) {
                (State::HoldingFlag(flag), true) => {
                    self.apply_flag(flag, None);
                    State::HoldingFlag(token)
                }
                (State::AwaitingToken, true) => State::HoldingFlag(token),
                (State::HoldingFlag(flag), false) => {
                    self.apply_flag(flag, Some(token));
                    State::AwaitingToken
                }
                (State::AwaitingToken, false) => {
                    self.apply_positional(token);
                    State::AwaitingToken
                }
            };
        }

        if let State::HoldingFlag(flag) = state {
            self.apply_flag(flag, None);
        }
    }

    fn apply_flag(&mut self, flag: &str, raw: Option<&str>) {
        debug!(flag, value = ?raw, "binding flag");
        if let Err(err) = self.store_flag(flag, raw) {
            debug!(%err, "flag rejected");
            self.errors.push(err);
        }
    }

    fn apply_positional(&mut self, token: &str) {
        debug!(cursor = self.cursor, token, "binding positional");
        if let Err(err) = self.store_positional(token) {
            debug!(%err, "positional rejected");
            self.errors.push(err);
        }
    }

    fn store_flag(&mut self, flag: &str, raw: Option<&str>) -> Result<(), ParseError> {
        let param = self
            .command
            .flag(flag)
            .ok_or_else(|| ParseError::UnknownFlag {
                flag: flag.to_string(),
            })?;
        let value = convert(param.param_type(), raw).map_err(|reason| {
            ParseError::ConversionFailure {
                target: Target::Flag(flag.to_string()),
                reason,
            }
        })?;

        if !param.is_repeatable() {
            // Last occurrence wins.
            self.values.insert(param.name(), value);
            return Ok(());
        }

        let list = self.values.list_mut(param.name());
        if let Some(limit) = param.limit() {
            if list.len() >= limit {
                return Err(ParseError::RepeatLimitExceeded {
                    flag: flag.to_string(),
                    limit,
                });
            }
        }
        list.push(value);
        Ok(())
    }

    fn store_positional(&mut self, token: &str) -> Result<(), ParseError> {
        let param = self
            .command
            .positional(self.cursor)
            .ok_or_else(|| ParseError::UnexpectedPositional {
                value: token.to_string(),
            })?;
        let value = convert(param.param_type(), Some(token)).map_err(|reason| {
            ParseError::ConversionFailure {
                target: Target::Positional(param.name().to_string()),
                reason,
            }
        })?;

        if !param.is_repeatable() {
            self.values.insert(param.name(), value);
            self.cursor += 1;
            return Ok(());
        }

        let list = self.values.list_mut(param.name());
        list.push(value);
        // Unbounded positionals keep the cursor forever.
        if param.limit().is_some_and(|limit| list.len() >= limit) {
            self.cursor += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::{ParamType, ParameterConfig};

    use super::*;

    fn say() -> Command {
        Command::builder("say")
            .add_parameters([
                ParameterConfig::positional("input", ParamType::String)
                    .required()
                    .repeatable(0),
                ParameterConfig::flag("repeat-count", ParamType::Number)
                    .with_short("n")
                    .with_default(1),
                ParameterConfig::flag("loud", ParamType::Boolean).with_short("l"),
                ParameterConfig::flag("tag", ParamType::String).repeatable(2),
            ])
            .build()
            .unwrap()
    }

    fn kinds(errors: &[ParseError]) -> Vec<ErrorKind> {
        errors.iter().map(ParseError::kind).collect()
    }

    #[test]
    fn test_flags_and_positionals_interleave() {
        let (values, errors) = bind(&say(), &["hello", "-n", "5", "world"]);
        assert!(errors.is_empty());
        assert_eq!(values.get_number("repeat_count"), Some(5.0));
        assert_eq!(
            values.get("input"),
            Some(&Value::List(vec!["hello".into(), "world".into()]))
        );
    }

    #[test]
    fn test_flag_followed_by_flag_is_valueless() {
        let (values, errors) = bind(&say(), &["-l", "-n", "2"]);
        assert!(errors.is_empty());
        assert_eq!(values.get_bool("loud"), Some(true));
        assert_eq!(values.get_number("repeat_count"), Some(2.0));
    }

    #[test]
    fn test_trailing_flag_is_flushed() {
        let (values, errors) = bind(&say(), &["hi", "--loud"]);
        assert!(errors.is_empty());
        assert_eq!(values.get_bool("loud"), Some(true));
    }

    #[test]
    fn test_trailing_valued_flag_reports_missing_value() {
        let (_, errors) = bind(&say(), &["hi", "-n"]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "missing value of type number for flag '-n'");
    }

    #[test]
    fn test_boolean_flag_swallows_next_token() {
        let (values, errors) = bind(&say(), &["-l", "false", "hi"]);
        assert!(errors.is_empty());
        assert_eq!(values.get_bool("loud"), Some(false));
        assert_eq!(values.get_list("input").map(<[Value]>::len), Some(1));
    }

    #[test]
    fn test_scalar_flag_last_write_wins() {
        let (values, errors) = bind(&say(), &["-n", "1", "--repeat-count", "2"]);
        assert!(errors.is_empty());
        assert_eq!(values.get_number("repeat_count"), Some(2.0));
    }

    #[test]
    fn test_repeat_limit_keeps_first_values() {
        let (values, errors) = bind(
            &say(),
            &["--tag", "a", "--tag", "b", "--tag", "c"],
        );
        assert_eq!(kinds(&errors), vec![ErrorKind::RepeatLimitExceeded]);
        assert_eq!(
            values.get("tag"),
            Some(&Value::List(vec!["a".into(), "b".into()]))
        );
    }

    #[test]
    fn test_errors_are_aggregated() {
        let (_, errors) = bind(&say(), &["-n", "abc", "--nope", "x", "-n", "def"]);
        assert_eq!(
            kinds(&errors),
            vec![
                ErrorKind::ConversionFailure,
                ErrorKind::UnknownFlag,
                ErrorKind::ConversionFailure,
            ]
        );
    }

    #[test]
    fn test_unexpected_positional() {
        let cmd = Command::builder("status").build().unwrap();
        let (_, errors) = bind(&cmd, &["extra"]);
        assert_eq!(
            errors,
            vec![ParseError::UnexpectedPositional {
                value: "extra".into()
            }]
        );
    }

    #[test]
    fn test_bounded_positional_advances_when_full() {
        let cmd = Command::builder("mv")
            .add_parameters([
                ParameterConfig::positional("pair", ParamType::Number).repeatable(2),
                ParameterConfig::positional("dest", ParamType::String),
            ])
            .build()
            .unwrap();
        let (values, errors) = bind(&cmd, &["1", "2", "out", "more"]);
        assert_eq!(
            values.get("pair"),
            Some(&Value::List(vec![Value::Number(1.0), Value::Number(2.0)]))
        );
        assert_eq!(values.get_str("dest"), Some("out"));
        assert_eq!(kinds(&errors), vec![ErrorKind::UnexpectedPositional]);
    }

    #[test]
    fn test_unbounded_positional_never_advances() {
        let cmd = Command::builder("cp")
            .add_parameters([
                ParameterConfig::positional("sources", ParamType::String).repeatable(0),
                ParameterConfig::positional("dest", ParamType::String),
            ])
            .build()
            .unwrap();
        let (values, errors) = bind(&cmd, &["a", "b", "c"]);
        assert!(errors.is_empty());
        assert_eq!(values.get_list("sources").map(<[Value]>::len), Some(3));
        assert_eq!(values.get("dest"), Some(&Value::Null));
    }

    #[test]
    fn test_positional_conversion_failure_names_parameter() {
        let cmd = Command::builder("sleep")
            .add_parameter(ParameterConfig::positional("seconds", ParamType::Number))
            .build()
            .unwrap();
        let (_, errors) = bind(&cmd, &["soon"]);
        assert_eq!(
            errors[0].to_string(),
            "failed to convert 'soon' to type number for positional 'seconds'"
        );
    }

    #[test]
    fn test_dash_tokens_are_always_flags() {
        let cmd = Command::builder("calc")
            .add_parameter(ParameterConfig::positional("operand", ParamType::Number))
            .build()
            .unwrap();
        for token in ["-5", "-", "--"] {
            let (values, errors) = bind(&cmd, &[token]);
            assert_eq!(
                errors,
                vec![ParseError::UnknownFlag {
                    flag: token.into()
                }],
                "token: {token}"
            );
            assert_eq!(values.get("operand"), Some(&Value::Null));
        }
    }

    #[test]
    fn test_seed_defaults_is_idempotent() {
        let cmd = say();
        assert_eq!(seed_defaults(&cmd), seed_defaults(&cmd));
    }
}
