//! Evaluates a parsed node tree against a parameter set.

use super::error::{Location, RenderError};
use super::parser::{Guard, Node};
use crate::params::{Parameters, Value, ValueKind};

/// A resolved variable, borrowed from the parameters or a loop binding.
#[derive(Clone, Copy, Debug)]
enum Binding<'a> {
    Text(&'a str),
    Flag(bool),
    Items(&'a [String]),
}

impl Binding<'_> {
    const fn kind(self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::String,
            Self::Flag(_) => ValueKind::Boolean,
            Self::Items(_) => ValueKind::Sequence,
        }
    }
}

/// Name resolution for one render call.
///
/// Loop bindings shadow parameters and are searched innermost first.
struct Scope<'a> {
    params: &'a Parameters,
    locals: Vec<(&'a str, &'a str)>,
}

impl<'a> Scope<'a> {
    const fn new(params: &'a Parameters) -> Self {
        Self {
            params,
            locals: Vec::new(),
        }
    }

    fn lookup(&self, name: &str, location: Location) -> Result<Binding<'a>, RenderError> {
        if let Some(&(_, item)) = self.locals.iter().rev().find(|(bound, _)| *bound == name) {
            return Ok(Binding::Text(item));
        }

        match self.params.get(name) {
            Some(Value::String(text)) => Ok(Binding::Text(text)),
            Some(Value::Boolean(flag)) => Ok(Binding::Flag(*flag)),
            Some(Value::Sequence(items)) => Ok(Binding::Items(items)),
            None => Err(RenderError::UndefinedVariable {
                name: name.to_owned(),
                location,
            }),
        }
    }

    fn marker_text(&self, name: &str, location: Location) -> Result<&'a str, RenderError> {
        match self.lookup(name, location)? {
            Binding::Text(text) => Ok(text),
            Binding::Flag(true) => Ok("true"),
            Binding::Flag(false) => Ok("false"),
            found @ Binding::Items(_) => Err(mismatch(name, ValueKind::String, found, location)),
        }
    }

    fn guard_holds(&self, guard: &Guard, location: Location) -> Result<bool, RenderError> {
        match self.lookup(&guard.name, location)? {
            Binding::Flag(flag) => Ok(flag != guard.negated),
            found => Err(mismatch(&guard.name, ValueKind::Boolean, found, location)),
        }
    }

    fn sequence(&self, name: &str, location: Location) -> Result<&'a [String], RenderError> {
        match self.lookup(name, location)? {
            Binding::Items(items) => Ok(items),
            found => Err(mismatch(name, ValueKind::Sequence, found, location)),
        }
    }
}

fn mismatch(name: &str, expected: ValueKind, found: Binding<'_>, location: Location) -> RenderError {
    RenderError::TypeMismatch {
        name: name.to_owned(),
        expected,
        found: found.kind(),
        location,
    }
}

/// Renders `nodes` into a fresh string.
pub(crate) fn render(nodes: &[Node], params: &Parameters) -> Result<String, RenderError> {
    let mut scope = Scope::new(params);
    let mut out = String::new();
    render_nodes(nodes, &mut scope, &mut out)?;
    Ok(out)
}

fn render_nodes<'a>(
    nodes: &'a [Node],
    scope: &mut Scope<'a>,
    out: &mut String,
) -> Result<(), RenderError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Marker { name, location } => out.push_str(scope.marker_text(name, *location)?),
            Node::If {
                guard,
                then_branch,
                else_branch,
                location,
            } => {
                let branch = if scope.guard_holds(guard, *location)? {
                    then_branch
                } else {
                    else_branch
                };
                render_nodes(branch, scope, out)?;
            }
            Node::For {
                binding,
                sequence,
                body,
                location,
            } => {
                let items = scope.sequence(sequence, *location)?;
                for item in items {
                    scope.locals.push((binding.as_str(), item.as_str()));
                    let rendered = render_nodes(body, scope, out);
                    scope.locals.pop();
                    rendered?;
                }
            }
        }
    }
    Ok(())
}

/// Checks references reached on every render: those outside any block body.
///
/// Block bodies are left to [`render`] so that a false guard never requires
/// the names inside its branch.
pub(crate) fn preflight(nodes: &[Node], params: &Parameters) -> Result<(), RenderError> {
    let scope = Scope::new(params);
    for node in nodes {
        match node {
            Node::Text(_) => {}
            Node::Marker { name, location } => {
                scope.marker_text(name, *location)?;
            }
            Node::If {
                guard, location, ..
            } => {
                scope.guard_holds(guard, *location)?;
            }
            Node::For {
                sequence, location, ..
            } => {
                scope.sequence(sequence, *location)?;
            }
        }
    }
    Ok(())
}
