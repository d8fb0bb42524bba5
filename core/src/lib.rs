//! Command-tree resolution and argument binding.
//!
//! This crate parses a flat list of tokens against a tree of commands:
//!
//! - [`resolve`] walks tokens down the tree to the deepest addressed
//!   [`Command`].
//! - [`bind`] fills that command's [`Parameter`]s from the remaining tokens,
//!   converting values and enforcing repeat bounds.
//! - [`check_required`] reports required parameters left empty.
//! - [`parse`] runs all three and returns a [`ParseOutcome`].
//!
//! Trees are built once with [`CommandBuilder`] from declarative
//! [`ParameterConfig`]/[`CommandConfig`] records and are read-only afterwards,
//! so one tree can serve any number of concurrent parses.
//!
//! # Example
//!
//! ```
//! use command_tree_core::*;
//!
//! let say = Command::builder("say")
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
//! let root = Command::builder("app").add_subcommand(say).build().unwrap();
//!
//! let outcome = parse(&root, &["say", "hello", "world", "-n", "5"]);
//! assert!(outcome.is_ok());
//! assert_eq!(outcome.command.name(), "say");
//! assert_eq!(outcome.values.get_number("repeat_count"), Some(5.0));
//! assert_eq!(
//!     outcome.values.get("input"),
//!     Some(&Value::List(vec!["hello".into(), "world".into()]))
//! );
//! ```

mod app;
mod bind;
mod builder;
mod complete;
mod convert;
mod error;
mod help;
mod parse;
mod resolve;
mod types;
mod validate;

pub use app::Application;
pub use bind::{bind, seed_defaults};
pub use builder::{CommandBuilder, CommandConfig, ParameterConfig};
pub use complete::complete;
pub use convert::{ConvertError, convert};
pub use error::{BuildError, ErrorKind, ParseError, Target, UnknownCommand};
pub use help::render_help;
pub use parse::{ParseOutcome, parse};
pub use resolve::{Resolution, resolve};
pub use types::*;
pub use validate::{check_required, unreachable_positionals};
