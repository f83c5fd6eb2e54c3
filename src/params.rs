//! Typed parameter sets supplied to the template renderer.
//!
//! A [`Parameters`] value maps variable names to a small tagged union of
//! value shapes. [`BootstrapProfile`] carries the variables the shipped
//! cloud-init template understands and converts into a parameter set.

use std::collections::BTreeMap;
use std::fmt;

/// Variable holding the account name.
pub const USERNAME: &str = "username";
/// Variable holding the display name used for git configuration.
pub const FULL_NAME: &str = "full_name";
/// Variable holding the email used for git configuration.
pub const EMAIL: &str = "email";
/// Variable holding the authorised public keys.
pub const SSH_KEYS: &str = "ssh_keys";
/// Variable guarding the Tailscale installer block.
pub const TAILSCALE_ENABLED: &str = "tailscale_enabled";

/// A value bound to a template variable.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Value {
    /// Text substituted verbatim.
    String(String),
    /// Flag used to guard conditional blocks.
    Boolean(bool),
    /// Ordered list of strings iterated by loop blocks.
    Sequence(Vec<String>),
}

impl Value {
    /// Returns the shape of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Sequence(_) => ValueKind::Sequence,
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Self::Sequence(value)
    }
}

impl From<&[&str]> for Value {
    fn from(value: &[&str]) -> Self {
        Self::Sequence(value.iter().map(|item| (*item).to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Value {
    fn from(value: [&str; N]) -> Self {
        Self::Sequence(value.iter().map(|item| (*item).to_owned()).collect())
    }
}

/// Shape of a [`Value`], used in type mismatch diagnostics.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ValueKind {
    /// A string value.
    String,
    /// A boolean value.
    Boolean,
    /// A sequence of strings.
    Sequence,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Sequence => "sequence",
        };
        f.write_str(label)
    }
}

/// Variables supplied to a single render call.
///
/// Names iterate in lexical order so diagnostics are stable.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Parameters {
    values: BTreeMap<String, Value>,
}

impl Parameters {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`, returning the previous binding if any.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    /// Builder-style variant of [`Parameters::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Removes a binding, returning its value if present.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// Looks up the value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns `true` when `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when no variables are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// Per-machine identity rendered into the cloud-init document.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BootstrapProfile {
    /// Account name created on the machine.
    pub username: String,
    /// Display name, also used for `git config user.name`.
    pub full_name: String,
    /// Email used for `git config user.email`.
    pub email: String,
    /// Public keys authorised for the account, in order.
    pub ssh_keys: Vec<String>,
    /// Whether the Tailscale installer is included.
    pub tailscale_enabled: bool,
}

impl BootstrapProfile {
    /// Converts the profile into the parameter set understood by the
    /// default template.
    #[must_use]
    pub fn to_parameters(&self) -> Parameters {
        Parameters::new()
            .with(USERNAME, self.username.as_str())
            .with(FULL_NAME, self.full_name.as_str())
            .with(EMAIL, self.email.as_str())
            .with(SSH_KEYS, self.ssh_keys.clone())
            .with(TAILSCALE_ENABLED, self.tailscale_enabled)
    }
}

impl From<&BootstrapProfile> for Parameters {
    fn from(profile: &BootstrapProfile) -> Self {
        profile.to_parameters()
    }
}
