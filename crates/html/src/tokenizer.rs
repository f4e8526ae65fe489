//! Pull tokenizer over raw markup bytes.
//!
//! The tokenizer never copies the input: every token records the byte span it
//! was lexed from, and tag/attribute names borrow the input unless ASCII case
//! folding or lossy UTF-8 decoding forces an owned string.
//!
//! Lexing is lenient and modelled on a conventional HTML tokenizer:
//! - A `<` opens markup only when followed by an ASCII letter, `/`, `!` or `?`;
//!   any other `<` is text.
//! - Quoted attribute values are opaque, so `<` and `>` inside them never end a
//!   tag or start a new one.
//! - A start tag is self-closing when the byte before its final `>` is `/`.
//! - Content of raw-text elements (`script`, `style`, `textarea`, ...) is one
//!   text token up to the matching end tag.
//! - An unterminated tag at end of input ends the stream cleanly.
//!
//! Known limitations (intentional):
//! - No script-data escape states (`<!--` inside `<script>` is plain text).
//! - No encoding detection; non-UTF-8 bytes in names are replaced lossily.
//! - Only a narrow set of character references is decoded in attribute values.

use crate::entities::decode_entities;
use crate::tags::is_raw_text_element;
use crate::types::{Attribute, Span, Token};
use memchr::memchr;
use std::borrow::Cow;
use std::fmt;
use std::iter::FusedIterator;

/// Configuration for the tokenizer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenizerConfig {
    /// Upper bound on the raw length of a single token, in bytes.
    /// `None` disables the check.
    pub max_token_len: Option<usize>,
}

/// Lexical fault. Clean end of input is not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LexError {
    TokenTooLarge {
        start: usize,
        len: usize,
        limit: usize,
    },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::TokenTooLarge { start, len, limit } => write!(
                f,
                "token at byte {start} is {len} bytes long, exceeding the {limit}-byte limit"
            ),
        }
    }
}

impl std::error::Error for LexError {}

/// Pull-based tokenizer bound to one input buffer.
///
/// Invariant: token spans tile the input. Each token starts where the previous
/// one ended, beginning at offset 0. The stream stops early only at an
/// unterminated tag (clean end) or a lexical fault, after which it is fused.
pub struct Tokenizer<'a> {
    input: &'a [u8],
    config: TokenizerConfig,
    cursor: usize,
    /// Set after a raw-text start tag; the next token is its body.
    raw_text_tag: Option<Cow<'a, str>>,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, TokenizerConfig::default())
    }

    pub fn with_config(input: &'a [u8], config: TokenizerConfig) -> Self {
        Self {
            input,
            config,
            cursor: 0,
            raw_text_tag: None,
            failed: false,
        }
    }

    /// Byte offset where the next token will start.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Advance to the next token.
    ///
    /// Returns `Ok(None)` at the end of the stream and `Err` on a lexical
    /// fault; both are terminal.
    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, LexError> {
        if self.failed {
            return Ok(None);
        }
        let Some(token) = self.lex_next() else {
            self.cursor = self.input.len();
            return Ok(None);
        };
        let span = token.span();
        debug_assert_eq!(span.start, self.cursor, "token spans must tile the input");
        if let Some(limit) = self.config.max_token_len
            && span.len() > limit
        {
            self.failed = true;
            return Err(LexError::TokenTooLarge {
                start: span.start,
                len: span.len(),
                limit,
            });
        }
        self.cursor = span.end;
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(
            target: "html.tokenizer",
            "{} {:?} @{}..{}",
            token.kind_label(),
            token.name().unwrap_or(""),
            span.start,
            span.end
        );
        Ok(Some(token))
    }

    fn lex_next(&mut self) -> Option<Token<'a>> {
        let start = self.cursor;
        if start >= self.input.len() {
            return None;
        }
        if let Some(tag) = self.raw_text_tag.take() {
            let end = self.raw_text_end(start, &tag);
            if end > start {
                return Some(Token::Text {
                    span: Span::new(start, end),
                });
            }
        }
        if self.input[start] == b'<' && opens_markup(self.input, start) {
            return self.lex_markup(start);
        }
        Some(Token::Text {
            span: Span::new(start, self.text_end(start)),
        })
    }

    /// End of the text run starting at `start`: the next `<` that opens markup.
    fn text_end(&self, start: usize) -> usize {
        // The byte at `start` belongs to the run even if it is a literal `<`.
        let mut i = start + 1;
        while let Some(rel) = memchr(b'<', &self.input[i..]) {
            let lt = i + rel;
            if opens_markup(self.input, lt) {
                return lt;
            }
            i = lt + 1;
        }
        self.input.len()
    }

    fn lex_markup(&mut self, lt: usize) -> Option<Token<'a>> {
        let input = self.input;
        match input[lt + 1] {
            b'/' => match input.get(lt + 2) {
                // `</` at end of input stays text.
                None => Some(Token::Text {
                    span: Span::new(lt, input.len()),
                }),
                // `</>` produces no tag; keep its bytes as an empty comment.
                Some(b'>') => Some(Token::Comment {
                    span: Span::new(lt, lt + 3),
                }),
                Some(b) if b.is_ascii_alphabetic() => self.lex_tag(lt, lt + 2, true),
                Some(_) => Some(self.bogus_comment(lt, lt + 2)),
            },
            b'!' => Some(self.lex_declaration(lt)),
            b'?' => Some(self.bogus_comment(lt, lt + 1)),
            _ => self.lex_tag(lt, lt + 1, false),
        }
    }

    /// Lex a start or end tag. `name_start` is the first byte of the name.
    fn lex_tag(&mut self, lt: usize, name_start: usize, is_end: bool) -> Option<Token<'a>> {
        let input = self.input;
        let len = input.len();
        let mut i = name_start;
        while i < len && !is_tag_name_stop(input[i]) {
            i += 1;
        }
        let name = fold_name(&input[name_start..i]);
        let mut attrs: Vec<Attribute<'a>> = Vec::new();
        loop {
            while i < len && (is_html_space(input[i]) || input[i] == b'/') {
                i += 1;
            }
            if i >= len {
                return None;
            }
            if input[i] == b'>' {
                i += 1;
                break;
            }
            let (attr, next) = lex_attribute(input, i)?;
            i = next;
            if !is_end && !attrs.iter().any(|seen| seen.name == attr.name) {
                attrs.push(attr);
            }
        }

        let span = Span::new(lt, i);
        if is_end {
            return Some(Token::EndTag { name, span });
        }
        // `i - 2` is at least the first name byte: the shortest tag is `<a>`.
        let self_closing = input[i - 2] == b'/';
        // A trailing slash does not cancel raw text: `<script/>` still swallows
        // everything up to `</script>`.
        if is_raw_text_element(&name) {
            self.raw_text_tag = Some(name.clone());
        }
        Some(Token::StartTag {
            name,
            attrs,
            self_closing,
            span,
        })
    }

    /// `<!--...-->`, `<!doctype ...>` or a bogus `<!...>` comment.
    fn lex_declaration(&self, lt: usize) -> Token<'a> {
        let input = self.input;
        let rest = &input[lt..];
        if rest.starts_with(b"<!--") {
            let body = lt + 4;
            let end = match (input.get(body), input.get(body + 1)) {
                (Some(b'>'), _) => body + 1,
                (Some(b'-'), Some(b'>')) => body + 2,
                _ => comment_close(&input[body..]).map_or(input.len(), |rel| body + rel),
            };
            return Token::Comment {
                span: Span::new(lt, end),
            };
        }
        if rest.len() >= 9 && rest[..9].eq_ignore_ascii_case(b"<!doctype") {
            return Token::Doctype {
                span: Span::new(lt, self.past_next_gt(lt + 9)),
            };
        }
        self.bogus_comment(lt, lt + 2)
    }

    fn bogus_comment(&self, lt: usize, from: usize) -> Token<'a> {
        Token::Comment {
            span: Span::new(lt, self.past_next_gt(from)),
        }
    }

    /// Offset just past the next `>` at or after `from`, or end of input.
    fn past_next_gt(&self, from: usize) -> usize {
        let from = from.min(self.input.len());
        memchr(b'>', &self.input[from..]).map_or(self.input.len(), |rel| from + rel + 1)
    }

    /// Offset where the body of the raw-text element `tag` ends.
    fn raw_text_end(&self, start: usize, tag: &str) -> usize {
        let input = self.input;
        if tag == "plaintext" {
            return input.len();
        }
        let mut i = start;
        while let Some(rel) = memchr(b'<', &input[i..]) {
            let lt = i + rel;
            if is_raw_close_tag(input, lt, tag.as_bytes()) {
                return lt;
            }
            i = lt + 1;
        }
        input.len()
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

impl FusedIterator for Tokenizer<'_> {}

/// Collect every token of `input` with the default configuration.
pub fn tokenize(input: &[u8]) -> Result<Vec<Token<'_>>, LexError> {
    Tokenizer::new(input).collect()
}

fn opens_markup(input: &[u8], lt: usize) -> bool {
    matches!(
        input.get(lt + 1),
        Some(b) if b.is_ascii_alphabetic() || matches!(b, b'/' | b'!' | b'?')
    )
}

fn is_html_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0C)
}

fn is_tag_name_stop(b: u8) -> bool {
    b == b'>' || b == b'/' || is_html_space(b)
}

/// Lex one attribute starting at `i` (a byte that is not space, `/` or `>`).
///
/// Returns the attribute and the offset after it, or `None` if input ends
/// inside the attribute.
fn lex_attribute(input: &[u8], i: usize) -> Option<(Attribute<'_>, usize)> {
    let len = input.len();
    // The first byte always belongs to the name, including a leading `=`.
    let mut j = i + 1;
    while j < len && !matches!(input[j], b'=' | b'>' | b'/') && !is_html_space(input[j]) {
        j += 1;
    }
    let name = fold_name(&input[i..j]);

    let mut k = j;
    while k < len && is_html_space(input[k]) {
        k += 1;
    }
    if k >= len {
        return None;
    }
    if input[k] != b'=' {
        return Some((Attribute::new(name, None), k));
    }
    k += 1;
    while k < len && is_html_space(input[k]) {
        k += 1;
    }
    if k >= len {
        return None;
    }

    match input[k] {
        quote @ (b'"' | b'\'') => {
            let value_start = k + 1;
            let rel = memchr(quote, &input[value_start..])?;
            let value_end = value_start + rel;
            let value = decode_value(&input[value_start..value_end]);
            Some((Attribute::new(name, Some(value)), value_end + 1))
        }
        _ => {
            let value_start = k;
            while k < len && input[k] != b'>' && !is_html_space(input[k]) {
                k += 1;
            }
            if k >= len {
                return None;
            }
            let value = decode_value(&input[value_start..k]);
            Some((Attribute::new(name, Some(value)), k))
        }
    }
}

/// Tag and attribute names: lossy UTF-8, ASCII-lowercased.
fn fold_name(raw: &[u8]) -> Cow<'_, str> {
    let text = String::from_utf8_lossy(raw);
    if text.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(text.to_ascii_lowercase())
    } else {
        text
    }
}

fn decode_value(raw: &[u8]) -> Cow<'_, str> {
    decode_entities(String::from_utf8_lossy(raw))
}

/// Offset just past the `-->` (or `--!>`) closing a comment body.
fn comment_close(body: &[u8]) -> Option<usize> {
    let mut i = 0;
    while let Some(rel) = memchr(b'-', &body[i..]) {
        let pos = i + rel;
        let tail = &body[pos..];
        if tail.starts_with(b"-->") {
            return Some(pos + 3);
        }
        if tail.starts_with(b"--!>") {
            return Some(pos + 4);
        }
        i = pos + 1;
    }
    None
}

/// `</tag` (ASCII case-insensitive) followed by space, `/` or `>`.
fn is_raw_close_tag(input: &[u8], lt: usize, tag: &[u8]) -> bool {
    let name_start = lt + 2;
    let name_end = name_start + tag.len();
    input.get(lt + 1) == Some(&b'/')
        && input
            .get(name_start..name_end)
            .is_some_and(|name| name.eq_ignore_ascii_case(tag))
        && matches!(input.get(name_end), Some(&b) if is_tag_name_stop(b))
}
