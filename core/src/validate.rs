//! Post-binding validation and tree lints.
//!
//! [`check_required`] reports required parameters left without a value once
//! binding is done. [`unreachable_positionals`] finds positionals that can
//! never receive a token because an unbounded positional precedes them.
//!
//! # Examples
//!
//! ```
//! use command_tree_core::*;
//!
//! let cmd = Command::builder("say")
//!     .add_parameter(ParameterConfig::positional("input", ParamType::String).required())
//!     .build()
//!     .unwrap();
//!
//! let values = seed_defaults(&cmd);
//! let errors = check_required(&cmd, &values);
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].to_string(), "missing required positional 'input'");
//! ```

use crate::error::ParseError;
use crate::types::{Command, Parameter, ValueMap};

/// Reports every required parameter of `command` that is absent from
/// `values`, in declaration order.
///
/// A scalar is absent when it is null; a repeatable when its list is empty.
pub fn check_required(command: &Command, values: &ValueMap) -> Vec<ParseError> {
    command
        .parameters()
        .iter()
        .filter(|param| param.is_required() && !values.is_present(param.name()))
        .map(|param| ParseError::MissingRequired {
            target: param.target(),
        })
        .collect()
}

/// Positionals of `command` declared after an unbounded positional.
///
/// The binder never advances past an unbounded positional, so these can only
/// hold their defaults.
pub fn unreachable_positionals(command: &Command) -> Vec<&Parameter> {
    command
        .positionals()
        .skip_while(|param| !param.is_unbounded())
        .skip(1)
        .collect()
}
