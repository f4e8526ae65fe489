//! Token model for the byte-span token stream.

use std::borrow::Cow;

/// Half-open byte range into the markup buffer.
///
/// Invariant: `start <= end`. Spans are plain offsets; they never own or copy
/// the bytes they describe, so the buffer must outlive every span taken from it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must be <= end");
        Self { start, end }
    }

    pub fn len(self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Bytes covered by this span, or an empty slice if it falls outside `input`.
    pub fn slice(self, input: &[u8]) -> &[u8] {
        input.get(self.start..self.end).unwrap_or(&[])
    }
}

/// Tag attribute as lexed.
///
/// `name` is ASCII-lowercased. `value` is entity-decoded; a bare attribute
/// (`<input disabled>`) has no value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: Cow<'a, str>,
    pub value: Option<Cow<'a, str>>,
}

impl<'a> Attribute<'a> {
    pub fn new(name: impl Into<Cow<'a, str>>, value: Option<Cow<'a, str>>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn value_or_empty(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

/// One lexical token and the raw bytes it was lexed from.
///
/// Determinism contract:
/// - Tokens are produced in source order and their spans tile the input.
/// - Attributes on a `StartTag` are stored in encounter order; duplicates are
///   dropped after the first occurrence ("first-wins").
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    StartTag {
        /// ASCII-lowercased tag name.
        name: Cow<'a, str>,
        attrs: Vec<Attribute<'a>>,
        /// The byte before the closing `>` is `/`.
        self_closing: bool,
        span: Span,
    },
    EndTag {
        name: Cow<'a, str>,
        span: Span,
    },
    Text {
        span: Span,
    },
    Comment {
        span: Span,
    },
    Doctype {
        span: Span,
    },
}

impl Token<'_> {
    pub fn span(&self) -> Span {
        match self {
            Token::StartTag { span, .. }
            | Token::EndTag { span, .. }
            | Token::Text { span }
            | Token::Comment { span }
            | Token::Doctype { span } => *span,
        }
    }

    /// Tag name for start and end tags.
    pub fn name(&self) -> Option<&str> {
        match self {
            Token::StartTag { name, .. } | Token::EndTag { name, .. } => Some(name.as_ref()),
            _ => None,
        }
    }

    /// Short kind label used by logging and test snapshots.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Token::StartTag {
                self_closing: true, ..
            } => "SelfClosingTag",
            Token::StartTag { .. } => "StartTag",
            Token::EndTag { .. } => "EndTag",
            Token::Text { .. } => "Text",
            Token::Comment { .. } => "Comment",
            Token::Doctype { .. } => "Doctype",
        }
    }
}
