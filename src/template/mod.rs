//! Template parsing and rendering.
//!
//! Templates use a small, stable subset of Jinja syntax:
//!
//! - `{{ name }}` substitutes a variable verbatim,
//! - `{% if name %}…{% else %}…{% endif %}` includes a branch based on a
//!   boolean (`{% if not name %}` inverts it),
//! - `{% for item in name %}…{% endfor %}` repeats its body per element,
//! - `{# … #}` is a comment,
//! - a `-` inside any delimiter (`{%-`, `-%}`, …) strips adjacent whitespace.
//!
//! Unlike Jinja, a boolean substituted by a marker renders in lowercase
//! (`true` / `false`), matching YAML. Blocks nest at most
//! 256 levels deep; deeper templates are rejected when parsed.
//!
//! Parsing and rendering are separate steps. A [`Template`] is immutable once
//! parsed and can be rendered any number of times, from any number of
//! threads, with different [`Parameters`].

use std::str::FromStr;

use tracing::debug;

use crate::params::Parameters;

mod error;
mod lexer;
mod parser;
mod render;

pub use error::{Location, RenderError, TemplateError, TemplateSyntaxError};

use parser::Node;

/// A parsed template, ready to render.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Parses template text.
    ///
    /// Empty text is a valid template that renders to an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateSyntaxError`] when blocks are unbalanced or
    /// unterminated, a block keyword is unknown, or a marker is malformed.
    /// The error records the line and column of the offending token.
    pub fn parse(source: &str) -> Result<Self, TemplateSyntaxError> {
        let nodes = parser::parse(source)?;
        debug!(bytes = source.len(), nodes = nodes.len(), "parsed template");
        Ok(Self { nodes })
    }

    /// Renders the template against `params`.
    ///
    /// Output is the left-to-right concatenation of literal text and
    /// substituted values. Values are inserted exactly as supplied; nothing
    /// is trimmed or escaped.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UndefinedVariable`] when an evaluated reference
    /// is missing from `params`, or [`RenderError::TypeMismatch`] when a
    /// guard is not a boolean, a loop source is not a sequence, or a marker
    /// is bound to a sequence. No output is produced on failure.
    pub fn render(&self, params: &Parameters) -> Result<String, RenderError> {
        self.preflight(params)?;
        let rendered = render::render(&self.nodes, params)?;
        debug!(bytes = rendered.len(), "rendered template");
        Ok(rendered)
    }

    /// Checks the references every render evaluates: markers, guards, and
    /// loop sources outside any block body.
    ///
    /// # Errors
    ///
    /// Returns the [`RenderError`] that [`Template::render`] would raise for
    /// the first such reference that is missing or has the wrong shape.
    pub fn preflight(&self, params: &Parameters) -> Result<(), RenderError> {
        render::preflight(&self.nodes, params)
    }

    /// Lists the variables this template reads from its parameters.
    ///
    /// Loop bindings are excluded. Each `(name, usage)` pair is reported once,
    /// at its first appearance.
    #[must_use]
    pub fn variables(&self) -> Vec<VariableUse> {
        let mut found = Vec::new();
        collect_variables(&self.nodes, &mut Vec::new(), &mut found);
        found
    }
}

impl FromStr for Template {
    type Err = TemplateSyntaxError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Self::parse(source)
    }
}

/// Parses and renders `source` in one step.
///
/// # Errors
///
/// Returns [`TemplateError`] wrapping either the syntax or the render
/// failure.
pub fn render_str(source: &str, params: &Parameters) -> Result<String, TemplateError> {
    Ok(Template::parse(source)?.render(params)?)
}

/// How a template uses a variable.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Usage {
    /// Substituted by a marker.
    Scalar,
    /// Guards a conditional block.
    Guard,
    /// Iterated by a loop block.
    Sequence,
}

impl Usage {
    /// Short lowercase label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Guard => "guard",
            Self::Sequence => "sequence",
        }
    }
}

/// A variable reference reported by [`Template::variables`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VariableUse {
    /// Referenced name.
    pub name: String,
    /// How the name is used.
    pub usage: Usage,
    /// First place the name is used this way.
    pub location: Location,
}

fn collect_variables<'a>(nodes: &'a [Node], bound: &mut Vec<&'a str>, found: &mut Vec<VariableUse>) {
    for node in nodes {
        match node {
            Node::Text(_) => {}
            Node::Marker { name, location } => {
                note_variable(found, bound, name, Usage::Scalar, *location);
            }
            Node::If {
                guard,
                then_branch,
                else_branch,
                location,
            } => {
                note_variable(found, bound, &guard.name, Usage::Guard, *location);
                collect_variables(then_branch, bound, found);
                collect_variables(else_branch, bound, found);
            }
            Node::For {
                binding,
                sequence,
                body,
                location,
            } => {
                note_variable(found, bound, sequence, Usage::Sequence, *location);
                bound.push(binding);
                collect_variables(body, bound, found);
                bound.pop();
            }
        }
    }
}

fn note_variable(
    found: &mut Vec<VariableUse>,
    bound: &[&str],
    name: &str,
    usage: Usage,
    location: Location,
) {
    let already_seen = found
        .iter()
        .any(|seen| seen.name == name && seen.usage == usage);
    if bound.contains(&name) || already_seen {
        return;
    }
    found.push(VariableUse {
        name: name.to_owned(),
        usage,
        location,
    });
}
