//! Declarative command-tree specs in JSON or YAML.
//!
//! This crate turns a spec file into a ready-to-use
//! [`Application`](command_tree_core::Application). Specs mirror the builder
//! records of `command-tree-core`: every command carries its name, help,
//! visibility, topics, parameters and subcommands, and the root additionally
//! carries the application's version and description.
//!
//! # Quick start
//!
//! ```
//! use command_tree_loader::{AppSpec, SpecFormat};
//!
//! let json = r#"{
//!     "name": "greet",
//!     "version": "0.1.0",
//!     "subcommands": [{
//!         "name": "say",
//!         "parameters": [
//!             { "name": "input", "type": "string", "required": true, "max_cnt": 0 }
//!         ]
//!     }]
//! }"#;
//! let app = AppSpec::parse(json, SpecFormat::Json).unwrap().build().unwrap();
//! let outcome = app.parse(&["say"]);
//! assert_eq!(outcome.error_messages(), vec!["missing required positional 'input'"]);
//! ```

mod error;
mod loader;
mod spec;

pub use error::{LoaderError, Result};
pub use loader::{SpecFormat, load_application};
pub use spec::{AppSpec, CommandSpec};
