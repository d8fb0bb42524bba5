//! Serializable command-tree specs.
//!
//! An [`AppSpec`] describes a whole application: release metadata plus the
//! root command's parameters and a recursive list of [`CommandSpec`]s. Both
//! reject unknown keys so typos in hand-written files surface early.
//!
//! # Example YAML
//!
//! ```yaml
//! name: greet
//! version: "1.2.0"
//! description: Friendly greetings
//! subcommands:
//!   - name: say
//!     help: Print the input
//!     topics: [basics]
//!     parameters:
//!       - name: input
//!         type: string
//!         required: true
//!         max_cnt: 0
//!       - long: repeat-count
//!         short: n
//!         type: number
//!         default: 1
//! ```

use command_tree_core::{Application, Command, CommandBuilder, CommandConfig, ParameterConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LoaderError, Result};

/// One command node and everything below it.
///
/// # Examples
///
/// ```
/// use command_tree_loader::CommandSpec;
///
/// let spec: CommandSpec = serde_json::from_str(r#"{
///     "name": "say",
///     "parameters": [{ "name": "input", "type": "string", "max_cnt": 0 }]
/// }"#).unwrap();
/// let command = spec.build().unwrap();
/// assert_eq!(command.positional(0).unwrap().name(), "input");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(default, alias = "is_hidden", skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<CommandSpec>,
}

impl CommandSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// The node-level configuration, without parameters or children.
    pub fn config(&self) -> CommandConfig {
        CommandConfig {
            name: self.name.clone(),
            help: self.help.clone(),
            hidden: self.hidden,
            topics: self.topics.clone(),
        }
    }

    /// Builds this node and all of its descendants.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Build`] naming the space-joined path of the
    /// first command that fails to build.
    pub fn build(&self) -> Result<Command> {
        self.build_at(&mut Vec::new())
    }

    fn build_at(&self, path: &mut Vec<String>) -> Result<Command> {
        path.push(self.name.clone());

        let mut subcommands = Vec::with_capacity(self.subcommands.len());
        for sub in &self.subcommands {
            subcommands.push(sub.build_at(path)?);
        }

        let command = CommandBuilder::from_config(self.config())
            .add_parameters(self.parameters.iter().cloned())
            .add_subcommands(subcommands)
            .build()
            .map_err(|source| LoaderError::Build {
                path: path.join(" "),
                source,
            })?;
        debug!(path = %path.join(" "), "built command");

        path.pop();
        Ok(command)
    }
}

/// A whole application: metadata plus the root command.
///
/// The root command takes the application's `name`.
///
/// # Examples
///
/// ```
/// use command_tree_loader::{AppSpec, SpecFormat};
///
/// let yaml = r#"
/// name: greet
/// version: "1.2.0"
/// subcommands:
///   - name: say
///     parameters:
///       - long: repeat-count
///         short: n
///         type: number
///         default: 1
/// "#;
/// let spec = AppSpec::parse(yaml, SpecFormat::Yaml).unwrap();
/// let app = spec.build().unwrap();
///
/// assert_eq!(app.version_string(), "greet 1.2.0");
/// let outcome = app.parse(&["say", "-n", "3"]);
/// assert_eq!(outcome.values.get_number("repeat_count"), Some(3.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppSpec {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Help text of the root command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<CommandSpec>,
}

impl AppSpec {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            description: None,
            help: None,
            parameters: Vec::new(),
            subcommands: Vec::new(),
        }
    }

    /// The root command as a [`CommandSpec`].
    pub fn root(&self) -> CommandSpec {
        CommandSpec {
            name: self.name.clone(),
            help: self.help.clone(),
            hidden: false,
            topics: Vec::new(),
            parameters: self.parameters.clone(),
            subcommands: self.subcommands.clone(),
        }
    }

    /// Builds the described [`Application`].
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Build`] if any command in the tree is
    /// malformed.
    pub fn build(&self) -> Result<Application> {
        let root = self.root().build()?;
        let app = Application::new(root, self.version.clone());
        Ok(match &self.description {
            Some(description) => app.with_description(description.clone()),
            None => app,
        })
    }
}
