//! Builds the node tree for a template from its token stream.

use super::error::{Location, TemplateSyntaxError};
use super::lexer::{Token, tokenize};

/// Deepest allowed nesting of `if` and `for` blocks.
///
/// Rendering walks blocks recursively, so the bound keeps evaluation within
/// the stack of the calling thread.
pub(crate) const MAX_NESTING_DEPTH: usize = 256;

/// A node of a parsed template.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Node {
    Text(String),
    Marker {
        name: String,
        location: Location,
    },
    If {
        guard: Guard,
        then_branch: Vec<Node>,
        else_branch: Vec<Node>,
        location: Location,
    },
    For {
        binding: String,
        sequence: String,
        body: Vec<Node>,
        location: Location,
    },
}

/// Condition of an `if` block.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Guard {
    pub(crate) name: String,
    pub(crate) negated: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum BlockKind {
    If,
    For,
}

impl BlockKind {
    const fn keyword(self) -> &'static str {
        match self {
            Self::If => "if",
            Self::For => "for",
        }
    }

    const fn end_keyword(self) -> &'static str {
        match self {
            Self::If => "endif",
            Self::For => "endfor",
        }
    }
}

enum Statement<'a> {
    If { name: &'a str, negated: bool },
    Else,
    EndIf,
    For { binding: &'a str, sequence: &'a str },
    EndFor,
}

/// A block that has been opened but not yet closed.
enum Frame {
    If {
        guard: Guard,
        then_branch: Vec<Node>,
        else_branch: Option<Vec<Node>>,
        location: Location,
    },
    For {
        binding: String,
        sequence: String,
        body: Vec<Node>,
        location: Location,
    },
}

impl Frame {
    const fn kind(&self) -> BlockKind {
        match self {
            Self::If { .. } => BlockKind::If,
            Self::For { .. } => BlockKind::For,
        }
    }

    const fn location(&self) -> Location {
        match self {
            Self::If { location, .. } | Self::For { location, .. } => *location,
        }
    }

    fn nodes_mut(&mut self) -> &mut Vec<Node> {
        match self {
            Self::If {
                else_branch: Some(branch),
                ..
            } => branch,
            Self::If { then_branch, .. } => then_branch,
            Self::For { body, .. } => body,
        }
    }

    fn into_node(self) -> Node {
        match self {
            Self::If {
                guard,
                then_branch,
                else_branch,
                location,
            } => Node::If {
                guard,
                then_branch,
                else_branch: else_branch.unwrap_or_default(),
                location,
            },
            Self::For {
                binding,
                sequence,
                body,
                location,
            } => Node::For {
                binding,
                sequence,
                body,
                location,
            },
        }
    }
}

/// Parses template text into a node tree.
///
/// # Errors
///
/// Returns [`TemplateSyntaxError`] describing the first structural problem.
pub(crate) fn parse(source: &str) -> Result<Vec<Node>, TemplateSyntaxError> {
    let mut root = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    for token in tokenize(source)? {
        match token {
            Token::Text(text) => push_node(active(&mut root, &mut stack), Node::Text(text.to_owned())),
            Token::Marker { content, location } => {
                if !is_variable_name(content) {
                    return Err(TemplateSyntaxError::MalformedMarker {
                        marker: content.to_owned(),
                        location,
                    });
                }
                push_node(
                    active(&mut root, &mut stack),
                    Node::Marker {
                        name: content.to_owned(),
                        location,
                    },
                );
            }
            Token::Block { content, location } => {
                match parse_statement(content, location)? {
                    Statement::If { name, negated } => open(
                        &mut stack,
                        Frame::If {
                            guard: Guard {
                                name: name.to_owned(),
                                negated,
                            },
                            then_branch: Vec::new(),
                            else_branch: None,
                            location,
                        },
                    )?,
                    Statement::For { binding, sequence } => open(
                        &mut stack,
                        Frame::For {
                            binding: binding.to_owned(),
                            sequence: sequence.to_owned(),
                            body: Vec::new(),
                            location,
                        },
                    )?,
                    Statement::Else => open_else(&mut stack, location)?,
                    Statement::EndIf => close(&mut root, &mut stack, BlockKind::If, location)?,
                    Statement::EndFor => close(&mut root, &mut stack, BlockKind::For, location)?,
                }
            }
        }
    }

    if let Some(frame) = stack.pop() {
        return Err(TemplateSyntaxError::Unterminated {
            keyword: frame.kind().keyword(),
            expected: frame.kind().end_keyword(),
            location: frame.location(),
        });
    }

    Ok(root)
}

/// Pushes a newly opened block, refusing to nest deeper than
/// [`MAX_NESTING_DEPTH`].
fn open(stack: &mut Vec<Frame>, frame: Frame) -> Result<(), TemplateSyntaxError> {
    if stack.len() >= MAX_NESTING_DEPTH {
        return Err(TemplateSyntaxError::NestingTooDeep {
            limit: MAX_NESTING_DEPTH,
            location: frame.location(),
        });
    }
    stack.push(frame);
    Ok(())
}

fn active<'s>(root: &'s mut Vec<Node>, stack: &'s mut [Frame]) -> &'s mut Vec<Node> {
    match stack.last_mut() {
        Some(frame) => frame.nodes_mut(),
        None => root,
    }
}

fn push_node(nodes: &mut Vec<Node>, node: Node) {
    if let Node::Text(text) = &node
        && let Some(Node::Text(previous)) = nodes.last_mut()
    {
        previous.push_str(text);
        return;
    }
    nodes.push(node);
}

fn open_else(stack: &mut [Frame], location: Location) -> Result<(), TemplateSyntaxError> {
    match stack.last_mut() {
        Some(Frame::If {
            else_branch,
            location: opened_at,
            ..
        }) => {
            if else_branch.is_some() {
                return Err(TemplateSyntaxError::DuplicateElse {
                    location,
                    opened_at: *opened_at,
                });
            }
            *else_branch = Some(Vec::new());
            Ok(())
        }
        Some(Frame::For { .. }) | None => Err(TemplateSyntaxError::UnexpectedTag {
            keyword: "else",
            location,
        }),
    }
}

fn close(
    root: &mut Vec<Node>,
    stack: &mut Vec<Frame>,
    found: BlockKind,
    location: Location,
) -> Result<(), TemplateSyntaxError> {
    let Some(frame) = stack.pop() else {
        return Err(TemplateSyntaxError::UnexpectedTag {
            keyword: found.end_keyword(),
            location,
        });
    };

    if frame.kind() != found {
        return Err(TemplateSyntaxError::MismatchedEnd {
            expected: frame.kind().end_keyword(),
            found: found.end_keyword(),
            location,
            opened_at: frame.location(),
        });
    }

    push_node(active(root, stack), frame.into_node());
    Ok(())
}

fn parse_statement(content: &str, location: Location) -> Result<Statement<'_>, TemplateSyntaxError> {
    let malformed = |reason: &'static str| TemplateSyntaxError::MalformedBlock {
        statement: content.to_owned(),
        reason,
        location,
    };

    let mut words = content.split_whitespace();
    let Some(keyword) = words.next() else {
        return Err(malformed("expected a block keyword"));
    };
    let args: Vec<&str> = words.collect();

    match (keyword, args.as_slice()) {
        ("if", ["not", name]) if is_variable_name(name) => Ok(Statement::If {
            name: *name,
            negated: true,
        }),
        ("if", [name]) if is_variable_name(name) => Ok(Statement::If {
            name: *name,
            negated: false,
        }),
        ("if", _) => Err(malformed("expected `if <name>` or `if not <name>`")),
        ("else", []) => Ok(Statement::Else),
        ("endif", []) => Ok(Statement::EndIf),
        ("for", [binding, "in", sequence])
            if is_variable_name(binding) && is_variable_name(sequence) =>
        {
            Ok(Statement::For {
                binding: *binding,
                sequence: *sequence,
            })
        }
        ("for", _) => Err(malformed("expected `for <item> in <name>`")),
        ("endfor", []) => Ok(Statement::EndFor),
        ("else" | "endif" | "endfor", _) => Err(malformed("closing tags take no arguments")),
        (other, _) => Err(TemplateSyntaxError::UnknownKeyword {
            keyword: other.to_owned(),
            location,
        }),
    }
}

/// Returns `true` for ASCII identifiers that are not reserved words.
pub(crate) fn is_variable_name(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        && !matches!(candidate, "not" | "in" | "true" | "false")
}
