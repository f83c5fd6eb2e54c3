//! Configuration loading via `ortho-config`.

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::files::{expand_tilde, read_to_string_ambient};
use crate::params::BootstrapProfile;
use crate::template_source::TemplateSource;

/// Default location of the public key authorised on new machines.
pub const DEFAULT_SSH_KEYS_FILE: &str = "~/.ssh/id_ed25519.pub";

/// Identity and template settings derived from environment variables,
/// configuration files, and defaults.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "DROPKIT",
    discovery(
        app_name = "dropkit",
        env_var = "DROPKIT_CONFIG_PATH",
        config_file_name = "dropkit.toml",
        dotfile_name = ".dropkit.toml",
        project_file_name = "dropkit.toml"
    )
)]
pub struct DropkitConfig {
    /// Account created on the machine. Required.
    #[ortho_config(default = String::new())]
    pub username: String,
    /// Display name used for the account and git. Required.
    #[ortho_config(default = String::new())]
    pub full_name: String,
    /// Email used for git. Required.
    #[ortho_config(default = String::new())]
    pub email: String,
    /// File holding the public keys to authorise, one per line. Supports
    /// tilde expansion.
    #[ortho_config(default = DEFAULT_SSH_KEYS_FILE.to_owned())]
    pub ssh_keys_file: String,
    /// Whether to install Tailscale on first boot.
    #[ortho_config(default = false)]
    pub tailscale_enabled: bool,
    /// Custom template file; the built-in template is used when unset.
    pub template_path: Option<String>,
}

/// Per-invocation values that take precedence over loaded configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProfileOverrides {
    /// Replacement account name.
    pub username: Option<String>,
    /// Replacement display name.
    pub full_name: Option<String>,
    /// Replacement email.
    pub email: Option<String>,
    /// Explicit public keys; when non-empty the keys file is not read.
    pub ssh_keys: Vec<String>,
    /// Replacement Tailscale toggle.
    pub tailscale_enabled: Option<bool>,
    /// Replacement template file.
    pub template_path: Option<String>,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
    flag: &'static str,
}

impl FieldMetadata {
    const fn new(
        description: &'static str,
        env_var: &'static str,
        toml_key: &'static str,
        flag: &'static str,
    ) -> Self {
        Self {
            description,
            env_var,
            toml_key,
            flag,
        }
    }
}

impl DropkitConfig {
    fn require_field(value: &str, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "missing {}: pass {}, set {}, or add {} to dropkit.toml",
                metadata.description, metadata.flag, metadata.env_var, metadata.toml_key
            )));
        }
        Ok(())
    }

    /// Loads configuration without attempting to parse CLI arguments. Values
    /// merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("dropkit")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Applies per-invocation overrides on top of the loaded values.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &ProfileOverrides) -> Self {
        if let Some(username) = &overrides.username {
            self.username.clone_from(username);
        }
        if let Some(full_name) = &overrides.full_name {
            self.full_name.clone_from(full_name);
        }
        if let Some(email) = &overrides.email {
            self.email.clone_from(email);
        }
        if let Some(enabled) = overrides.tailscale_enabled {
            self.tailscale_enabled = enabled;
        }
        if let Some(path) = &overrides.template_path {
            self.template_path = Some(path.clone());
        }
        self
    }

    /// Performs semantic validation on required fields. Error messages name
    /// the CLI flag, environment variable, and configuration key that supply
    /// the missing value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required field is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::require_field(
            &self.username,
            &FieldMetadata::new("account username", "DROPKIT_USERNAME", "username", "--username"),
        )?;
        Self::require_field(
            &self.full_name,
            &FieldMetadata::new(
                "full name",
                "DROPKIT_FULL_NAME",
                "full_name",
                "--full-name",
            ),
        )?;
        Self::require_field(
            &self.email,
            &FieldMetadata::new("email address", "DROPKIT_EMAIL", "email", "--email"),
        )?;
        Ok(())
    }

    /// Builds the bootstrap profile for this configuration.
    ///
    /// Keys come from `explicit_keys` when it is non-empty, otherwise from
    /// [`DropkitConfig::ssh_keys_file`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when validation fails or the keys file cannot
    /// be read.
    pub fn to_profile(&self, explicit_keys: &[String]) -> Result<BootstrapProfile, ConfigError> {
        self.validate()?;
        let ssh_keys = if explicit_keys.is_empty() {
            self.read_ssh_keys()?
        } else {
            explicit_keys.to_vec()
        };

        if ssh_keys.is_empty() {
            warn!(
                username = %self.username,
                "no SSH public keys configured; the account will not accept key logins"
            );
        }

        Ok(BootstrapProfile {
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            ssh_keys,
            tailscale_enabled: self.tailscale_enabled,
        })
    }

    /// Returns where the template text should be loaded from.
    #[must_use]
    pub fn template_source(&self) -> TemplateSource {
        TemplateSource::from_path(self.template_path.as_deref())
    }

    fn read_ssh_keys(&self) -> Result<Vec<String>, ConfigError> {
        Self::require_field(
            &self.ssh_keys_file,
            &FieldMetadata::new(
                "SSH public keys file",
                "DROPKIT_SSH_KEYS_FILE",
                "ssh_keys_file",
                "--ssh-key",
            ),
        )?;
        let expanded = expand_tilde(&self.ssh_keys_file);
        let contents =
            read_to_string_ambient(&expanded).map_err(|message| ConfigError::SshKeysRead {
                path: expanded.clone(),
                message,
            })?;
        let keys = parse_public_keys(&contents);
        debug!(path = %expanded, count = keys.len(), "read SSH public keys");
        Ok(keys)
    }
}

/// Extracts public keys from `authorized_keys`-style text: one key per
/// non-blank line, skipping `#` comments, order preserved.
#[must_use]
pub fn parse_public_keys(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect()
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
    /// Raised when the SSH public keys file cannot be read.
    #[error("failed to read SSH public keys from `{path}`: {message}")]
    SshKeysRead {
        /// Expanded path that failed to read.
        path: String,
        /// Underlying error message.
        message: String,
    },
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
