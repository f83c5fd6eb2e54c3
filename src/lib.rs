//! Core library for the dropkit bootstrap generator.
//!
//! The crate renders cloud-init documents for fresh development machines.
//! A small Jinja-style template engine ([`template`]) turns typed
//! [`Parameters`] into text, while [`config`] and [`template_source`] decide
//! where identity values and template text come from.

pub mod config;
pub mod files;
pub mod params;
pub mod template;
pub mod template_source;
pub mod test_support;

pub use config::{ConfigError, DropkitConfig, ProfileOverrides};
pub use params::{BootstrapProfile, Parameters, Value, ValueKind};
pub use template::{
    Location, RenderError, Template, TemplateError, TemplateSyntaxError, Usage, VariableUse,
    render_str,
};
pub use template_source::{
    DEFAULT_TEMPLATE, TemplateSource, TemplateSourceError, default_template,
};
