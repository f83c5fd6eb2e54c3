//! Error types raised while parsing and rendering templates.

use std::fmt;

use thiserror::Error;

use crate::params::ValueKind;

/// Position of a token within template text.
///
/// Lines and columns are 1-based and count characters; `offset` is the byte
/// offset from the start of the text.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Location {
    /// Line number, starting at 1.
    pub line: usize,
    /// Column number in characters, starting at 1.
    pub column: usize,
    /// Byte offset from the start of the template text.
    pub offset: usize,
}

impl Location {
    /// Location of the first character of a template.
    pub const START: Self = Self {
        line: 1,
        column: 1,
        offset: 0,
    };
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Errors raised when template text is structurally malformed.
///
/// Every variant records where the offending token starts so authors can
/// jump straight to it.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum TemplateSyntaxError {
    /// An opening delimiter was never closed.
    #[error("unclosed `{opening}` at {location}: expected `{closing}`")]
    UnclosedTag {
        /// Opening delimiter, for example `{{`.
        opening: &'static str,
        /// Closing delimiter that was expected.
        closing: &'static str,
        /// Position of the opening delimiter.
        location: Location,
    },
    /// A marker did not contain exactly one variable name.
    #[error("malformed marker `{{{{ {marker} }}}}` at {location}: expected a single variable name")]
    MalformedMarker {
        /// Raw marker content between the delimiters.
        marker: String,
        /// Position of the marker.
        location: Location,
    },
    /// A block tag used a keyword the engine does not understand.
    #[error("unknown block keyword `{keyword}` at {location}")]
    UnknownKeyword {
        /// The unrecognised keyword.
        keyword: String,
        /// Position of the block tag.
        location: Location,
    },
    /// A known block keyword was followed by invalid arguments.
    #[error("malformed block `{{% {statement} %}}` at {location}: {reason}")]
    MalformedBlock {
        /// Raw statement between the delimiters.
        statement: String,
        /// What the parser expected instead.
        reason: &'static str,
        /// Position of the block tag.
        location: Location,
    },
    /// A closing or `else` tag appeared with no matching open block.
    #[error("unexpected `{keyword}` at {location}: no open block to close")]
    UnexpectedTag {
        /// The stray keyword.
        keyword: &'static str,
        /// Position of the stray tag.
        location: Location,
    },
    /// A closing tag did not match the innermost open block.
    #[error("mismatched `{found}` at {location}: expected `{expected}` for block opened at {opened_at}")]
    MismatchedEnd {
        /// Closing keyword the innermost block requires.
        expected: &'static str,
        /// Closing keyword that was found.
        found: &'static str,
        /// Position of the closing tag.
        location: Location,
        /// Position of the innermost open block.
        opened_at: Location,
    },
    /// An `if` block already had an `else` branch.
    #[error("duplicate `else` at {location} for block opened at {opened_at}")]
    DuplicateElse {
        /// Position of the second `else`.
        location: Location,
        /// Position of the `if` tag.
        opened_at: Location,
    },
    /// The text ended while a block was still open.
    #[error("unterminated `{keyword}` block opened at {location}: expected `{expected}`")]
    Unterminated {
        /// Keyword that opened the block.
        keyword: &'static str,
        /// Closing keyword that never appeared.
        expected: &'static str,
        /// Position of the opening tag.
        location: Location,
    },
    /// Blocks were nested deeper than the engine evaluates.
    #[error("block at {location} nests deeper than the limit of {limit} levels")]
    NestingTooDeep {
        /// Deepest nesting the parser accepts.
        limit: usize,
        /// Position of the first block past the limit.
        location: Location,
    },
}

impl TemplateSyntaxError {
    /// Returns the position of the offending token.
    #[must_use]
    pub const fn location(&self) -> Location {
        match self {
            Self::UnclosedTag { location, .. }
            | Self::MalformedMarker { location, .. }
            | Self::UnknownKeyword { location, .. }
            | Self::MalformedBlock { location, .. }
            | Self::UnexpectedTag { location, .. }
            | Self::MismatchedEnd { location, .. }
            | Self::DuplicateElse { location, .. }
            | Self::Unterminated { location, .. }
            | Self::NestingTooDeep { location, .. } => *location,
        }
    }
}

/// Errors raised while rendering a parsed template.
///
/// Rendering is all-or-nothing: when one of these is returned no output has
/// been produced.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum RenderError {
    /// A marker, guard, or loop referenced a name absent from the parameters.
    #[error("undefined variable `{name}` at {location}")]
    UndefinedVariable {
        /// Name that could not be resolved.
        name: String,
        /// Position of the reference.
        location: Location,
    },
    /// A variable was supplied with a shape the template cannot use there.
    #[error("variable `{name}` at {location} must be a {expected}, found a {found}")]
    TypeMismatch {
        /// Name of the offending variable.
        name: String,
        /// Kind of value the reference requires.
        expected: ValueKind,
        /// Kind of value that was supplied.
        found: ValueKind,
        /// Position of the reference.
        location: Location,
    },
}

impl RenderError {
    /// Returns the name of the variable that caused the failure.
    #[must_use]
    pub fn variable(&self) -> &str {
        match self {
            Self::UndefinedVariable { name, .. } | Self::TypeMismatch { name, .. } => name,
        }
    }
}

/// Errors raised by one-shot helpers that both parse and render.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum TemplateError {
    /// The template text is malformed.
    #[error("template syntax error: {0}")]
    Syntax(#[from] TemplateSyntaxError),
    /// Rendering failed against the supplied parameters.
    #[error("template render error: {0}")]
    Render(#[from] RenderError),
}
