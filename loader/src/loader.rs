//! Reading and writing spec files.
//!
//! The format is picked from the file extension: `.json` for JSON, `.yaml`
//! or `.yml` for YAML.
//!
//! ```no_run
//! use command_tree_loader::{AppSpec, load_application};
//!
//! // Deserialize only
//! let spec = AppSpec::load("greet.yaml").unwrap();
//! println!("{} has {} subcommands", spec.name, spec.subcommands.len());
//!
//! // Deserialize and build in one go
//! let app = load_application("greet.yaml").unwrap();
//! println!("{}", app.version_string());
//! ```

use std::fmt;
use std::path::Path;

use command_tree_core::Application;
use tracing::debug;

use crate::error::{LoaderError, Result};
use crate::spec::AppSpec;

/// Serialization format of a spec file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecFormat {
    Json,
    Yaml,
}

impl SpecFormat {
    /// Picks the format from `path`'s extension.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::UnsupportedFormat`] for any other extension,
    /// including none at all.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(LoaderError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Parses `json`, `yaml` or `yml`, ignoring case.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

impl fmt::Display for SpecFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        })
    }
}

impl AppSpec {
    /// Reads and deserializes a spec file.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::UnsupportedFormat`] for an unknown extension,
    /// [`LoaderError::IoError`] if the file cannot be read, or a JSON/YAML
    /// error if it does not describe an application.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = SpecFormat::from_path(path)?;
        let text = std::fs::read_to_string(path)?;
        let spec = Self::parse(&text, format)?;
        debug!(path = %path.display(), %format, commands = spec.subcommands.len(), "loaded spec");
        Ok(spec)
    }

    /// Deserializes a spec from text in the given format.
    pub fn parse(text: &str, format: SpecFormat) -> Result<Self> {
        Ok(match format {
            SpecFormat::Json => serde_json::from_str(text)?,
            SpecFormat::Yaml => serde_yaml::from_str(text)?,
        })
    }

    /// Serializes the spec; JSON output is pretty-printed.
    pub fn render(&self, format: SpecFormat) -> Result<String> {
        Ok(match format {
            SpecFormat::Json => serde_json::to_string_pretty(self)?,
            SpecFormat::Yaml => serde_yaml::to_string(self)?,
        })
    }

    /// Writes the spec to `path` in the format its extension names.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = self.render(SpecFormat::from_path(path)?)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

/// Loads a spec file and builds the application it describes.
///
/// # Errors
///
/// Everything [`AppSpec::load`] and [`AppSpec::build`] can return.
pub fn load_application(path: impl AsRef<Path>) -> Result<Application> {
    AppSpec::load(path)?.build()
}
