//! Splits template text into literal runs, markers, and block tags.
//!
//! Comments are dropped here. Whitespace control (`{%-`, `-%}` and friends)
//! is also applied here, so the parser only ever sees the literal text that
//! should reach the output.

use super::error::{Location, TemplateSyntaxError};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum TagKind {
    Marker,
    Block,
    Comment,
}

impl TagKind {
    const fn from_opening(ch: char) -> Option<Self> {
        match ch {
            '{' => Some(Self::Marker),
            '%' => Some(Self::Block),
            '#' => Some(Self::Comment),
            _ => None,
        }
    }

    const fn opening(self) -> &'static str {
        match self {
            Self::Marker => "{{",
            Self::Block => "{%",
            Self::Comment => "{#",
        }
    }

    const fn closing(self) -> &'static str {
        match self {
            Self::Marker => "}}",
            Self::Block => "%}",
            Self::Comment => "#}",
        }
    }
}

/// A lexical unit of template text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Token<'a> {
    /// Literal text, already trimmed by any adjacent whitespace control.
    Text(&'a str),
    /// Content of a `{{ … }}` marker with surrounding whitespace removed.
    Marker {
        content: &'a str,
        location: Location,
    },
    /// Content of a `{% … %}` tag with surrounding whitespace removed.
    Block {
        content: &'a str,
        location: Location,
    },
}

/// Walks the source while tracking line and column.
struct Cursor<'a> {
    rest: &'a str,
    location: Location,
}

impl<'a> Cursor<'a> {
    const fn new(source: &'a str) -> Self {
        Self {
            rest: source,
            location: Location::START,
        }
    }

    fn take(&mut self, len: usize) -> &'a str {
        let (taken, remaining) = self.rest.split_at_checked(len).unwrap_or((self.rest, ""));
        for ch in taken.chars() {
            if ch == '\n' {
                self.location.line += 1;
                self.location.column = 1;
            } else {
                self.location.column += 1;
            }
        }
        self.location.offset += taken.len();
        self.rest = remaining;
        taken
    }

    fn eat(&mut self, ch: char) -> bool {
        if self.rest.starts_with(ch) {
            self.take(ch.len_utf8());
            true
        } else {
            false
        }
    }
}

/// Splits `source` into tokens.
///
/// # Errors
///
/// Returns [`TemplateSyntaxError::UnclosedTag`] when an opening delimiter has
/// no matching closing delimiter.
pub(crate) fn tokenize(source: &str) -> Result<Vec<Token<'_>>, TemplateSyntaxError> {
    let mut tokens = Vec::new();
    let mut cursor = Cursor::new(source);
    let mut trim_next = false;

    while let Some((text_len, kind)) = find_opening(cursor.rest) {
        let text = cursor.take(text_len);
        let location = cursor.location;
        cursor.take(kind.opening().len());
        let trim_before = cursor.eat('-');

        let Some(close) = cursor.rest.find(kind.closing()) else {
            return Err(TemplateSyntaxError::UnclosedTag {
                opening: kind.opening(),
                closing: kind.closing(),
                location,
            });
        };
        let raw = cursor.take(close);
        cursor.take(kind.closing().len());

        let (content, trim_after) = raw
            .strip_suffix('-')
            .map_or((raw, false), |stripped| (stripped, true));

        push_text(&mut tokens, text, trim_next, trim_before);
        trim_next = trim_after;

        match kind {
            TagKind::Marker => tokens.push(Token::Marker {
                content: content.trim(),
                location,
            }),
            TagKind::Block => tokens.push(Token::Block {
                content: content.trim(),
                location,
            }),
            TagKind::Comment => {}
        }
    }

    let tail = cursor.take(cursor.rest.len());
    push_text(&mut tokens, tail, trim_next, false);
    Ok(tokens)
}

fn find_opening(rest: &str) -> Option<(usize, TagKind)> {
    rest.match_indices('{').find_map(|(index, _)| {
        let next = rest.get(index + 1..)?.chars().next()?;
        TagKind::from_opening(next).map(|kind| (index, kind))
    })
}

fn push_text<'a>(tokens: &mut Vec<Token<'a>>, text: &'a str, trim_start: bool, trim_end: bool) {
    let leading = if trim_start { text.trim_start() } else { text };
    let trimmed = if trim_end { leading.trim_end() } else { leading };
    if !trimmed.is_empty() {
        tokens.push(Token::Text(trimmed));
    }
}
