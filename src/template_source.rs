//! Template text resolution.
//!
//! The cloud-init template is either the copy embedded in the binary or a
//! user-supplied file. This module centralises that choice and the file
//! loading so the CLI and configuration paths stay consistent.

use thiserror::Error;
use tracing::debug;

use crate::files::{expand_tilde, read_to_string_ambient};
use crate::template::{Template, TemplateSyntaxError};

/// The cloud-init template shipped with dropkit.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/cloud-init.yaml.j2");

/// Errors raised while resolving template text.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum TemplateSourceError {
    /// Raised when a file path is empty or only whitespace.
    #[error("template file path must not be empty")]
    FilePathEmpty,
    /// Raised when a file resolves to empty or only whitespace.
    #[error("template file `{path}` must not be empty")]
    FileEmpty {
        /// Expanded path of the empty file.
        path: String,
    },
    /// Raised when reading the file fails.
    #[error("failed to read template file `{path}`: {message}")]
    FileRead {
        /// Expanded path that failed to read.
        path: String,
        /// Underlying error message.
        message: String,
    },
}

/// Where template text comes from.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum TemplateSource {
    /// The embedded [`DEFAULT_TEMPLATE`].
    #[default]
    Default,
    /// A template file; `~/` is expanded when loading.
    File(String),
}

impl TemplateSource {
    /// Chooses a file source when `path` is given, otherwise the default.
    #[must_use]
    pub fn from_path(path: Option<&str>) -> Self {
        path.map_or(Self::Default, |value| Self::File(value.to_owned()))
    }

    /// Human-readable description used in logs and reports.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Default => String::from("built-in template"),
            Self::File(path) => expand_tilde(path),
        }
    }

    /// Returns the template text.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateSourceError`] when the file path is empty, the file
    /// cannot be read, or its content is blank.
    pub fn load(&self) -> Result<String, TemplateSourceError> {
        let Self::File(path) = self else {
            return Ok(DEFAULT_TEMPLATE.to_owned());
        };

        if path.trim().is_empty() {
            return Err(TemplateSourceError::FilePathEmpty);
        }

        let expanded = expand_tilde(path);
        let content =
            read_to_string_ambient(&expanded).map_err(|message| TemplateSourceError::FileRead {
                path: expanded.clone(),
                message,
            })?;

        if content.trim().is_empty() {
            return Err(TemplateSourceError::FileEmpty { path: expanded });
        }

        debug!(path = %expanded, bytes = content.len(), "loaded template file");
        Ok(content)
    }
}

/// Parses the embedded default template.
///
/// # Errors
///
/// Returns [`TemplateSyntaxError`] if the embedded template is malformed.
pub fn default_template() -> Result<Template, TemplateSyntaxError> {
    Template::parse(DEFAULT_TEMPLATE)
}
