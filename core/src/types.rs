//! Data model for command trees.
//!
//! A tree is made of [`Command`] nodes, each owning its declared
//! [`Parameter`]s and child commands. Parsing produces a [`ValueMap`] keyed by
//! parameter name. All of these types are read-only once built; construction
//! goes through [`CommandBuilder`](crate::CommandBuilder).

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Target;

/// Value type accepted by a parameter.
///
/// # Examples
///
/// ```
/// use command_tree_core::ParamType;
///
/// assert_eq!(ParamType::Number.to_string(), "number");
/// let parsed: ParamType = serde_json::from_str("\"boolean\"").unwrap();
/// assert_eq!(parsed, ParamType::Boolean);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Arbitrary text (the default).
    #[default]
    String,
    /// `true`/`false`; a flag given without a value means `true`.
    Boolean,
    /// Finite floating-point number.
    Number,
}

impl ParamType {
    /// Lowercase name used in messages and spec files.
    pub fn as_str(self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Boolean => "boolean",
            ParamType::Number => "number",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A converted parameter value.
///
/// Serialized untagged, so values read and write as plain JSON/YAML scalars
/// and arrays.
///
/// # Examples
///
/// ```
/// use command_tree_core::{ParamType, Value};
///
/// let v: Value = serde_json::from_str("5").unwrap();
/// assert_eq!(v, Value::Number(5.0));
/// assert_eq!(v.param_type(), Some(ParamType::Number));
/// assert_eq!(Value::Null.param_type(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// No value bound.
    #[default]
    Null,
    /// Boolean value.
    Boolean(bool),
    /// Numeric value.
    Number(f64),
    /// String value.
    String(String),
    /// Values collected for a repeatable parameter.
    List(Vec<Value>),
}

impl Value {
    /// Scalar type of this value, `None` for `Null` and lists.
    pub fn param_type(&self) -> Option<ParamType> {
        match self {
            Value::Boolean(_) => Some(ParamType::Boolean),
            Value::Number(_) => Some(ParamType::Number),
            Value::String(_) => Some(ParamType::String),
            Value::Null | Value::List(_) => None,
        }
    }

    /// Short name of the value's shape, used in construction errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "nil",
            Value::List(_) => "list",
            other => other.param_type().map_or("nil", ParamType::as_str),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("nil"),
            Value::Boolean(b) => write!(f, "{b}"),
            // Integral values print without a trailing `.0`.
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// Parameter values produced by binding, keyed by parameter name.
///
/// Every declared parameter of the resolved command has an entry, seeded
/// before any token is consumed: scalars hold their default (possibly
/// [`Value::Null`]), repeatables hold a list.
///
/// # Examples
///
/// ```
/// use command_tree_core::{Value, ValueMap};
///
/// let mut values = ValueMap::new();
/// values.insert("count", Value::Number(3.0));
/// values.insert("files", Value::List(vec![]));
///
/// assert_eq!(values.get_number("count"), Some(3.0));
/// assert!(values.is_present("count"));
/// assert!(!values.is_present("files"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueMap(BTreeMap<String, Value>);

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value stored under `name`, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_number)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn get_list(&self, name: &str) -> Option<&[Value]> {
        self.get(name).and_then(Value::as_list)
    }

    /// Returns `true` if `name` holds a non-null scalar or a non-empty list.
    pub fn is_present(&self, name: &str) -> bool {
        match self.get(name) {
            None | Some(Value::Null) => false,
            Some(Value::List(items)) => !items.is_empty(),
            Some(_) => true,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// List slot for a repeatable parameter, reset to an empty list if the
    /// slot holds anything else.
    pub(crate) fn list_mut(&mut self, name: &str) -> &mut Vec<Value> {
        let slot = self
            .0
            .entry(name.to_string())
            .or_insert_with(|| Value::List(Vec::new()));
        if !matches!(slot, Value::List(_)) {
            *slot = Value::List(Vec::new());
        }
        match slot {
            Value::List(items) => items,
            _ => unreachable!("slot was reset to a list"),
        }
    }
}

/// One argument slot of a command: a flag or a positional.
///
/// Built from a [`ParameterConfig`](crate::ParameterConfig) via
/// [`Parameter::new`]; immutable afterwards.
///
/// # Examples
///
/// ```
/// use command_tree_core::{Parameter, ParameterConfig, ParamType};
///
/// let param = Parameter::new(
///     ParameterConfig::flag("repeat-count", ParamType::Number).with_short("n"),
/// )
/// .unwrap();
///
/// assert_eq!(param.name(), "repeat_count");
/// assert!(param.is_flag());
/// assert_eq!(param.flag_keys(), vec!["-n".to_string(), "--repeat-count".to_string()]);
/// assert_eq!(param.display_name(), "--repeat-count");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub(crate) name: String,
    pub(crate) long: Option<String>,
    pub(crate) short: Option<char>,
    pub(crate) param_type: ParamType,
    pub(crate) required: bool,
    pub(crate) default: Value,
    pub(crate) max_cnt: i64,
    pub(crate) help: Option<String>,
}

impl Parameter {
    /// Key of this parameter in the [`ValueMap`].
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Long spelling without the leading `--`.
    pub fn long(&self) -> Option<&str> {
        self.long.as_deref()
    }

    /// Short spelling without the leading `-`.
    pub fn short(&self) -> Option<char> {
        self.short
    }

    pub fn param_type(&self) -> ParamType {
        self.param_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default(&self) -> &Value {
        &self.default
    }

    pub fn max_cnt(&self) -> i64 {
        self.max_cnt
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// A parameter with a long or short spelling is a flag.
    pub fn is_flag(&self) -> bool {
        self.long.is_some() || self.short.is_some()
    }

    pub fn is_positional(&self) -> bool {
        !self.is_flag()
    }

    /// Repeatable parameters bind to a list.
    pub fn is_repeatable(&self) -> bool {
        self.max_cnt != 1
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_cnt <= 0
    }

    /// Maximum number of values accepted, `None` when unbounded.
    pub fn limit(&self) -> Option<usize> {
        usize::try_from(self.max_cnt).ok().filter(|&n| n > 0)
    }

    /// Tokens that select this flag, short spelling first.
    pub fn flag_keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(2);
        if let Some(short) = self.short {
            keys.push(format!("-{short}"));
        }
        if let Some(long) = &self.long {
            keys.push(format!("--{long}"));
        }
        keys
    }

    /// Human-facing identity: `--long`, else `-s`, else the name.
    pub fn display_name(&self) -> String {
        match (&self.long, self.short) {
            (Some(long), _) => format!("--{long}"),
            (None, Some(short)) => format!("-{short}"),
            (None, None) => self.name.clone(),
        }
    }

    pub(crate) fn target(&self) -> Target {
        if self.is_flag() {
            Target::Flag(self.display_name())
        } else {
            Target::Positional(self.name.clone())
        }
    }
}

/// Callback bound to a command, invoked with the resolved values.
///
/// Shared and thread-safe so a built tree can be parsed from several threads
/// at once.
#[derive(Clone)]
pub struct Operation(Arc<dyn Fn(&ValueMap) -> Result<(), String> + Send + Sync>);

impl Operation {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&ValueMap) -> Result<(), String> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, values: &ValueMap) -> Result<(), String> {
        (self.0)(values)
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Operation(..)")
    }
}

/// A node of the command tree.
///
/// Holds the command's own parameters (in declaration order) with a flag
/// index and an ordered positional list, plus its children indexed by name.
///
/// # Examples
///
/// ```
/// use command_tree_core::{Command, ParameterConfig, ParamType};
///
/// let say = Command::builder("say")
///     .add_parameters([
///         ParameterConfig::positional("input", ParamType::String).repeatable(0),
///         ParameterConfig::flag("loud", ParamType::Boolean).with_short("l"),
///     ])
///     .build()
///     .unwrap();
/// let root = Command::builder("app").add_subcommand(say).build().unwrap();
///
/// let say = root.subcommand("say").unwrap();
/// assert_eq!(say.flag("-l").unwrap().name(), "loud");
/// assert_eq!(say.flag("--loud").unwrap().name(), "loud");
/// assert_eq!(say.positional(0).unwrap().name(), "input");
/// assert!(say.positional(1).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Command {
    pub(crate) name: String,
    pub(crate) help: Option<String>,
    pub(crate) hidden: bool,
    pub(crate) topics: Vec<String>,
    pub(crate) parameters: Vec<Parameter>,
    pub(crate) flag_index: HashMap<String, usize>,
    pub(crate) positional_index: Vec<usize>,
    pub(crate) subcommands: Vec<Command>,
    pub(crate) subcommand_index: HashMap<String, usize>,
    pub(crate) operation: Option<Operation>,
}

impl Command {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Hidden commands resolve normally but are left out of help listings
    /// and completions.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t == topic)
    }

    /// All declared parameters, in declaration order.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Looks up a flag by its full spelling (`-n` or `--repeat-count`).
    pub fn flag(&self, key: &str) -> Option<&Parameter> {
        self.flag_index.get(key).map(|&slot| &self.parameters[slot])
    }

    /// Flag parameters, each once, in declaration order.
    pub fn flags(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| p.is_flag())
    }

    /// Positional parameter at `index` (0-based binding order).
    pub fn positional(&self, index: usize) -> Option<&Parameter> {
        self.positional_index
            .get(index)
            .map(|&slot| &self.parameters[slot])
    }

    pub fn positionals(&self) -> impl Iterator<Item = &Parameter> {
        self.positional_index
            .iter()
            .map(|&slot| &self.parameters[slot])
    }

    pub fn subcommand(&self, name: &str) -> Option<&Command> {
        self.subcommand_index
            .get(name)
            .map(|&slot| &self.subcommands[slot])
    }

    /// Child commands in declaration order, hidden ones included.
    pub fn subcommands(&self) -> &[Command] {
        &self.subcommands
    }

    /// Child commands that appear in listings.
    pub fn visible_subcommands(&self) -> impl Iterator<Item = &Command> {
        self.subcommands.iter().filter(|c| !c.hidden)
    }

    pub fn operation(&self) -> Option<&Operation> {
        self.operation.as_ref()
    }
}
