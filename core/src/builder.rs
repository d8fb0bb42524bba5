//! Declarative construction of command trees.
//!
//! Configuration records ([`ParameterConfig`], [`CommandConfig`]) describe a
//! tree; [`CommandBuilder`] accumulates them and [`CommandBuilder::build`]
//! freezes the result into an immutable [`Command`]. Integrity violations are
//! reported as [`BuildError`]s.
//!
//! # Example
//!
//! ```
//! use command_tree_core::*;
//!
//! let say = Command::builder("say")
//!     .help("Print the input")
//!     .add_parameters([
//!         ParameterConfig::positional("input", ParamType::String)
//!             .required()
//!             .repeatable(0),
//!         ParameterConfig::flag("repeat-count", ParamType::Number)
//!             .with_short("n")
//!             .with_default(1),
//!     ])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(say.parameters().len(), 2);
//! assert!(say.flag("-n").is_some());
//!
//! // Two parameters spelling the same flag is a construction error.
//! let err = Command::builder("bad")
//!     .add_parameters([
//!         ParameterConfig::flag("name", ParamType::String).with_short("n"),
//!         ParameterConfig::flag("number", ParamType::Number).with_short("n"),
//!     ])
//!     .build()
//!     .unwrap_err();
//! assert!(matches!(err, BuildError::DuplicateFlag { .. }));
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::BuildError;
use crate::types::{Command, Operation, ParamType, Parameter, Value, ValueMap};
use crate::validate::unreachable_positionals;

fn default_max_cnt() -> i64 {
    1
}

fn is_default_max_cnt(max_cnt: &i64) -> bool {
    *max_cnt == 1
}

/// Declarative description of one parameter.
///
/// `long` and `short` are written without dashes. A parameter with neither is
/// positional and must carry a `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub default: Value,
    /// `1` for a scalar, `>1` for a bounded list, `<=0` for an unbounded list.
    #[serde(
        default = "default_max_cnt",
        skip_serializing_if = "is_default_max_cnt"
    )]
    pub max_cnt: i64,
}

impl ParameterConfig {
    /// An unnamed scalar parameter of the given type.
    pub fn new(param_type: ParamType) -> Self {
        Self {
            name: None,
            long: None,
            short: None,
            required: false,
            param_type,
            help: None,
            default: Value::Null,
            max_cnt: 1,
        }
    }

    /// A flag spelled `--long`.
    pub fn flag(long: &str, param_type: ParamType) -> Self {
        Self {
            long: Some(long.to_string()),
            ..Self::new(param_type)
        }
    }

    /// A positional parameter.
    pub fn positional(name: &str, param_type: ParamType) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::new(param_type)
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Adds the single-character spelling `-short`.
    pub fn with_short(mut self, short: &str) -> Self {
        self.short = Some(short.to_string());
        self
    }

    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the repeat bound; `0` means unbounded.
    pub fn repeatable(mut self, max_cnt: i64) -> Self {
        self.max_cnt = max_cnt;
        self
    }
}

impl Parameter {
    /// Builds a parameter, checking flag spellings and the default's type.
    ///
    /// The name defaults to `long` with hyphens turned into underscores, then
    /// to the short character.
    ///
    /// # Errors
    ///
    /// [`BuildError::InvalidShortFlag`], [`BuildError::InvalidLongFlag`],
    /// [`BuildError::MissingName`] or [`BuildError::DefaultTypeMismatch`].
    pub fn new(config: ParameterConfig) -> Result<Self, BuildError> {
        let long = match config.long {
            Some(long)
                if long.is_empty()
                    || long.starts_with('-')
                    || long.chars().any(char::is_whitespace) =>
            {
                return Err(BuildError::InvalidLongFlag(long));
            }
            other => other,
        };

        let short = match config.short {
            Some(short) => {
                let mut chars = short.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c != '-' && !c.is_whitespace() => Some(c),
                    _ => return Err(BuildError::InvalidShortFlag(short)),
                }
            }
            None => None,
        };

        let name = config
            .name
            .filter(|name| !name.trim().is_empty())
            .or_else(|| long.as_ref().map(|long| long.replace('-', "_")))
            .or_else(|| short.map(String::from))
            .ok_or(BuildError::MissingName)?;

        match &config.default {
            Value::Null => {}
            default if default.param_type() == Some(config.param_type) => {}
            default => {
                return Err(BuildError::DefaultTypeMismatch {
                    name,
                    expected: config.param_type,
                    found: default.type_name(),
                });
            }
        }

        Ok(Self {
            name,
            long,
            short,
            param_type: config.param_type,
            required: config.required,
            default: config.default,
            max_cnt: config.max_cnt,
            help: config.help,
        })
    }
}

/// Declarative description of one command node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(default, alias = "is_hidden")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
}

impl CommandConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// Accumulates a command's parameters, children and operation.
///
/// Nothing is checked until [`build`](Self::build).
#[derive(Debug)]
pub struct CommandBuilder {
    config: CommandConfig,
    parameters: Vec<ParameterConfig>,
    subcommands: Vec<Command>,
    operation: Option<Operation>,
}

impl Command {
    /// Starts building a command named `name`.
    pub fn builder(name: &str) -> CommandBuilder {
        CommandBuilder::from_config(CommandConfig::new(name))
    }
}

impl CommandBuilder {
    pub fn from_config(config: CommandConfig) -> Self {
        Self {
            config,
            parameters: Vec::new(),
            subcommands: Vec::new(),
            operation: None,
        }
    }

    pub fn help(mut self, help: &str) -> Self {
        self.config.help = Some(help.to_string());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.config.hidden = true;
        self
    }

    pub fn topic(mut self, topic: &str) -> Self {
        self.config.topics.push(topic.to_string());
        self
    }

    pub fn add_parameter(mut self, parameter: ParameterConfig) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn add_parameters(mut self, parameters: impl IntoIterator<Item = ParameterConfig>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    pub fn add_subcommand(mut self, command: Command) -> Self {
        self.subcommands.push(command);
        self
    }

    pub fn add_subcommands(mut self, commands: impl IntoIterator<Item = Command>) -> Self {
        self.subcommands.extend(commands);
        self
    }

    /// Binds the callback run when this command is the parse target.
    pub fn set_operation<F>(mut self, operation: F) -> Self
    where
        F: Fn(&ValueMap) -> Result<(), String> + Send + Sync + 'static,
    {
        self.operation = Some(Operation::new(operation));
        self
    }

    /// Freezes the accumulated description into a [`Command`].
    ///
    /// # Errors
    ///
    /// Returns the first integrity violation found: an empty name, an invalid
    /// parameter, or a duplicate parameter name, flag spelling or subcommand
    /// name.
    pub fn build(self) -> Result<Command, BuildError> {
        let CommandConfig {
            name,
            help,
            hidden,
            topics,
        } = self.config;
        if name.trim().is_empty() {
            return Err(BuildError::EmptyCommandName);
        }

        let mut parameters = Vec::with_capacity(self.parameters.len());
        let mut seen_names = HashSet::new();
        let mut flag_index = HashMap::new();
        let mut positional_index = Vec::new();
        for config in self.parameters {
            let parameter = Parameter::new(config)?;
            if !seen_names.insert(parameter.name.clone()) {
                return Err(BuildError::DuplicateParameter {
                    command: name,
                    name: parameter.name,
                });
            }

            let slot = parameters.len();
            if parameter.is_flag() {
                for key in parameter.flag_keys() {
                    if flag_index.contains_key(&key) {
                        return Err(BuildError::DuplicateFlag { command: name, flag: key });
                    }
                    flag_index.insert(key, slot);
                }
            } else {
                positional_index.push(slot);
            }
            parameters.push(parameter);
        }

        let mut subcommand_index = HashMap::new();
        for (slot, sub) in self.subcommands.iter().enumerate() {
            if subcommand_index.insert(sub.name.clone(), slot).is_some() {
                return Err(BuildError::DuplicateSubcommand {
                    command: name,
                    name: sub.name.clone(),
                });
            }
        }

        let command = Command {
            name,
            help,
            hidden,
            topics,
            parameters,
            flag_index,
            positional_index,
            subcommands: self.subcommands,
            subcommand_index,
            operation: self.operation,
        };

        let unreachable: Vec<&str> = unreachable_positionals(&command)
            .iter()
            .map(|p| p.name())
            .collect();
        if !unreachable.is_empty() {
            warn!(
                command = command.name(),
                ?unreachable,
                "positionals declared after an unbounded positional can never be bound"
            );
        }

        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_derived_from_long() {
        let param = Parameter::new(ParameterConfig::flag("dry-run", ParamType::Boolean)).unwrap();
        assert_eq!(param.name(), "dry_run");
    }

    #[test]
    fn test_name_derived_from_short() {
        let param =
            Parameter::new(ParameterConfig::new(ParamType::Boolean).with_short("v")).unwrap();
        assert_eq!(param.name(), "v");
        assert_eq!(param.display_name(), "-v");
    }

    #[test]
    fn test_explicit_name_wins() {
        let param = Parameter::new(
            ParameterConfig::flag("repeat-count", ParamType::Number).with_name("times"),
        )
        .unwrap();
        assert_eq!(param.name(), "times");
    }

    #[test]
    fn test_rejects_positional_without_name() {
        assert_eq!(
            Parameter::new(ParameterConfig::new(ParamType::String)),
            Err(BuildError::MissingName)
        );
    }

    #[test]
    fn test_rejects_multi_char_short() {
        assert_eq!(
            Parameter::new(ParameterConfig::flag("verbose", ParamType::Boolean).with_short("vv")),
            Err(BuildError::InvalidShortFlag("vv".into()))
        );
        assert_eq!(
            Parameter::new(ParameterConfig::new(ParamType::Boolean).with_short("-")),
            Err(BuildError::InvalidShortFlag("-".into()))
        );
    }

    #[test]
    fn test_rejects_dashed_long() {
        assert_eq!(
            Parameter::new(ParameterConfig::flag("--verbose", ParamType::Boolean)),
            Err(BuildError::InvalidLongFlag("--verbose".into()))
        );
    }

    #[test]
    fn test_rejects_mismatched_default() {
        let err = Parameter::new(
            ParameterConfig::flag("count", ParamType::Number).with_default("three"),
        )
        .unwrap_err();
        assert_eq!(
            err,
            BuildError::DefaultTypeMismatch {
                name: "count".into(),
                expected: ParamType::Number,
                found: "string",
            }
        );
    }

    #[test]
    fn test_rejects_duplicate_parameter_name() {
        let err = Command::builder("cmd")
            .add_parameters([
                ParameterConfig::positional("target", ParamType::String),
                ParameterConfig::flag("target", ParamType::String),
            ])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::DuplicateParameter {
                command: "cmd".into(),
                name: "target".into()
            }
        );
    }

    #[test]
    fn test_rejects_duplicate_subcommand() {
        let a = Command::builder("run").build().unwrap();
        let b = Command::builder("run").build().unwrap();
        let err = Command::builder("app")
            .add_subcommands([a, b])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::DuplicateSubcommand {
                command: "app".into(),
                name: "run".into()
            }
        );
    }

    #[test]
    fn test_rejects_empty_command_name() {
        assert_eq!(
            Command::builder("  ").build().unwrap_err(),
            BuildError::EmptyCommandName
        );
    }

    #[test]
    fn test_both_spellings_index_same_parameter() {
        let cmd = Command::builder("say")
            .add_parameter(
                ParameterConfig::flag("repeat-count", ParamType::Number).with_short("n"),
            )
            .build()
            .unwrap();
        assert_eq!(cmd.flag("-n"), cmd.flag("--repeat-count"));
        assert_eq!(cmd.flags().count(), 1);
    }

    #[test]
    fn test_unbounded_positional_not_last_still_builds() {
        let cmd = Command::builder("cp")
            .add_parameters([
                ParameterConfig::positional("sources", ParamType::String).repeatable(0),
                ParameterConfig::positional("dest", ParamType::String),
            ])
            .build()
            .unwrap();
        assert_eq!(cmd.positionals().count(), 2);
    }

    #[test]
    fn test_parameter_config_from_yaml_shape() {
        let config: ParameterConfig = serde_json::from_value(serde_json::json!({
            "long": "repeat-count",
            "short": "n",
            "type": "number",
            "default": 1
        }))
        .unwrap();
        assert_eq!(config.max_cnt, 1);
        assert_eq!(config.default, Value::Number(1.0));

        let bad = serde_json::from_value::<ParameterConfig>(serde_json::json!({
            "name": "x",
            "type": "integer"
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_command_config_accepts_is_hidden_alias() {
        let config: CommandConfig =
            serde_json::from_value(serde_json::json!({ "name": "debug", "is_hidden": true }))
                .unwrap();
        assert!(config.hidden);
    }
}
