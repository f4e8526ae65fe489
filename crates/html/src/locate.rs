//! Marked-element locator.
//!
//! Consumes a token stream, keeps an explicit stack of open elements, and
//! reports every element carrying the marker attribute together with the byte
//! span of its complete serialized form.
//!
//! Recovery policy for malformed nesting:
//! - An end tag closes the nearest open element with the same name. Any open
//!   elements above it are dropped without being reported, even when marked.
//! - An end tag with no open counterpart is ignored.
//! - Elements still open at end of input are dropped without being reported.
//!
//! None of these are errors. Only a lexical fault from the token stream is,
//! and it discards everything located so far.

use crate::stack::{OpenElementsStack, OpenFrame};
use crate::tags::is_void_element;
use crate::tokenizer::{LexError, Tokenizer, TokenizerConfig};
use crate::types::{Attribute, Span, Token};
use std::borrow::Cow;
use std::fmt;

/// Attribute whose presence flags an element for reporting.
pub const MARKER_ATTR: &str = "data-goradd";

/// Attribute whose value becomes `LocatedElement::id`.
pub const ID_ATTR: &str = "id";

/// A marked element and the span of its serialized form.
///
/// Invariant: `start < end`, and `input[start..end]` begins with `<` and ends
/// with `>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LocatedElement {
    /// Lowercase tag name.
    pub tag: String,
    /// Identifier attribute value, or empty.
    pub id: String,
    /// Offset of the `<` of the opening tag.
    pub start: usize,
    /// Offset just past the `>` of the closing tag (or of the tag itself for
    /// void and self-closing elements).
    pub end: usize,
}

impl LocatedElement {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// The element's bytes within the buffer it was located in.
    pub fn slice<'b>(&self, input: &'b [u8]) -> &'b [u8] {
        self.span().slice(input)
    }
}

/// Configuration for a locate run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocateConfig {
    /// Marker attribute name, compared ASCII case-insensitively.
    pub marker_attr: Cow<'static, str>,
    /// Identifier attribute name, compared ASCII case-insensitively.
    pub id_attr: Cow<'static, str>,
    pub tokenizer: TokenizerConfig,
}

impl Default for LocateConfig {
    fn default() -> Self {
        Self {
            marker_attr: Cow::Borrowed(MARKER_ATTR),
            id_attr: Cow::Borrowed(ID_ATTR),
            tokenizer: TokenizerConfig::default(),
        }
    }
}

/// Failure of a locate run. Partial results are never returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LocateError {
    Lex(LexError),
}

impl fmt::Display for LocateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocateError::Lex(err) => write!(f, "lexical fault: {err}"),
        }
    }
}

impl std::error::Error for LocateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LocateError::Lex(err) => Some(err),
        }
    }
}

impl From<LexError> for LocateError {
    fn from(err: LexError) -> Self {
        LocateError::Lex(err)
    }
}

/// Counters for the most recent run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LocatorStats {
    pub tokens: u64,
    pub frames_pushed: u64,
    pub max_depth: u32,
    pub unmatched_end_tags: u64,
    /// Frames dropped above a matched end tag.
    pub discarded_frames: u64,
    /// Marked frames among `discarded_frames`.
    pub discarded_marked: u64,
    /// Frames still open at end of input.
    pub unterminated_frames: u64,
    pub located: u64,
}

/// Stack-matching locator.
///
/// A `Locator` holds configuration and the stats of its last run only; all
/// scan state lives inside a single call, so runs never influence each other.
#[derive(Clone, Debug, Default)]
pub struct Locator {
    config: LocateConfig,
    stats: LocatorStats,
}

impl Locator {
    pub fn new(config: LocateConfig) -> Self {
        Self {
            config,
            stats: LocatorStats::default(),
        }
    }

    pub fn config(&self) -> &LocateConfig {
        &self.config
    }

    /// Counters of the most recent `run`/`locate` call.
    pub fn stats(&self) -> LocatorStats {
        self.stats
    }

    /// Tokenize `markup` with the configured tokenizer and locate marked elements.
    pub fn locate(&mut self, markup: &[u8]) -> Result<Vec<LocatedElement>, LocateError> {
        let tokens = Tokenizer::with_config(markup, self.config.tokenizer.clone());
        self.run(tokens)
    }

    /// Locate marked elements in an arbitrary token stream.
    ///
    /// Tokens must arrive in source order with non-overlapping spans. Results
    /// are in completion order: an element is reported when its closing
    /// boundary is seen, so nested marked elements precede their ancestors.
    pub fn run<'a, I>(&mut self, tokens: I) -> Result<Vec<LocatedElement>, LocateError>
    where
        I: IntoIterator<Item = Result<Token<'a>, LexError>>,
    {
        self.stats = LocatorStats::default();
        let mut stack = OpenElementsStack::default();
        let mut located = Vec::new();
        let mut cursor = 0usize;

        for token in tokens {
            let token = match token {
                Ok(token) => token,
                Err(err) => {
                    log::debug!(
                        target: "html.locate",
                        "lexical fault after byte {cursor}: {err}; dropping {} located element(s)",
                        located.len()
                    );
                    return Err(err.into());
                }
            };
            let span = token.span();
            debug_assert!(
                span.start >= cursor,
                "token spans must be monotonic: {}..{} after {cursor}",
                span.start,
                span.end
            );
            cursor = span.end;
            self.stats.tokens += 1;

            match token {
                Token::StartTag {
                    name,
                    attrs,
                    self_closing,
                    span,
                } => {
                    let (has_marker, id) = self.inspect_attrs(attrs);
                    if self_closing || is_void_element(&name) {
                        if has_marker {
                            self.emit(&mut located, name, id, span.start, span.end);
                        }
                        continue;
                    }
                    #[cfg(any(test, feature = "debug-stats"))]
                    log::trace!(
                        target: "html.locate",
                        "push <{name}> marked={has_marker} @{} depth={}",
                        span.start,
                        stack.len() + 1
                    );
                    stack.push(OpenFrame {
                        tag: name,
                        id,
                        has_marker,
                        start: span.start,
                    });
                    self.stats.frames_pushed += 1;
                }
                Token::EndTag { name, span } => {
                    let Some(closed) = stack.pop_until_including(&name) else {
                        #[cfg(any(test, feature = "debug-stats"))]
                        log::trace!(
                            target: "html.locate",
                            "ignore unmatched </{name}> @{}",
                            span.start
                        );
                        self.stats.unmatched_end_tags += 1;
                        continue;
                    };
                    if closed.discarded > 0 {
                        #[cfg(any(test, feature = "debug-stats"))]
                        log::trace!(
                            target: "html.locate",
                            "</{name}> @{} drops {} open frame(s), {} marked",
                            span.start,
                            closed.discarded,
                            closed.discarded_marked
                        );
                        self.stats.discarded_frames += closed.discarded as u64;
                        self.stats.discarded_marked += closed.discarded_marked as u64;
                    }
                    let frame = closed.frame;
                    if frame.has_marker {
                        self.emit(&mut located, frame.tag, frame.id, frame.start, span.end);
                    }
                }
                Token::Text { .. } | Token::Comment { .. } | Token::Doctype { .. } => {}
            }
        }

        self.stats.max_depth = stack.max_depth();
        let (unterminated, unterminated_marked) = stack.clear();
        self.stats.unterminated_frames = unterminated as u64;
        log::debug!(
            target: "html.locate",
            "located {} element(s) in {} token(s); {} unterminated ({} marked), {} unmatched end tag(s)",
            located.len(),
            self.stats.tokens,
            unterminated,
            unterminated_marked,
            self.stats.unmatched_end_tags
        );
        Ok(located)
    }

    /// Marker presence and identifier value. The first occurrence of each
    /// attribute wins.
    fn inspect_attrs<'a>(&self, attrs: Vec<Attribute<'a>>) -> (bool, Cow<'a, str>) {
        let mut has_marker = false;
        let mut id = None;
        for attr in attrs {
            if attr.name.eq_ignore_ascii_case(&self.config.marker_attr) {
                has_marker = true;
            } else if id.is_none() && attr.name.eq_ignore_ascii_case(&self.config.id_attr) {
                id = Some(attr.value.unwrap_or(Cow::Borrowed("")));
            }
        }
        (has_marker, id.unwrap_or(Cow::Borrowed("")))
    }

    fn emit(
        &mut self,
        located: &mut Vec<LocatedElement>,
        tag: Cow<'_, str>,
        id: Cow<'_, str>,
        start: usize,
        end: usize,
    ) {
        debug_assert!(start < end, "located span must be non-empty");
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "html.locate", "locate <{tag}> #{id} {start}..{end}");
        located.push(LocatedElement {
            tag: tag.into_owned(),
            id: id.into_owned(),
            start,
            end,
        });
        self.stats.located += 1;
    }
}

/// Locate every marked element in `markup` with the default configuration.
pub fn locate(markup: &[u8]) -> Result<Vec<LocatedElement>, LocateError> {
    Locator::default().locate(markup)
}

/// Locate every marked element in `markup` with an explicit configuration.
pub fn locate_with_config(
    markup: &[u8],
    config: &LocateConfig,
) -> Result<Vec<LocatedElement>, LocateError> {
    Locator::new(config.clone()).locate(markup)
}

#[cfg(test)]
mod tests {
    use super::{
        LocateConfig, LocateError, LocatedElement, Locator, LocatorStats, locate,
        locate_with_config,
    };
    use crate::tokenizer::{LexError, TokenizerConfig};
    use crate::types::{Attribute, Span, Token};
    use std::borrow::Cow;
    use std::error::Error;

    fn el(tag: &str, id: &str, start: usize, end: usize) -> LocatedElement {
        LocatedElement {
            tag: tag.to_string(),
            id: id.to_string(),
            start,
            end,
        }
    }

    fn find(markup: &str) -> Vec<LocatedElement> {
        locate(markup.as_bytes()).expect("locate should succeed")
    }

    fn assert_well_formed(markup: &str, located: &[LocatedElement]) {
        for element in located {
            let bytes = element.slice(markup.as_bytes());
            assert!(element.start < element.end, "empty span: {element:?}");
            assert_eq!(bytes.first(), Some(&b'<'), "span must open with '<': {element:?}");
            assert_eq!(bytes.last(), Some(&b'>'), "span must close with '>': {element:?}");
        }
    }

    #[test]
    fn single_marked_element_in_boilerplate() {
        let markup = "<!doctype html>\n<html>\n<body>\n  <div id=\"outer\" data-goradd=\"true\">Hello</div>\n</body>\n</html>";
        let located = find(markup);
        assert_eq!(located, vec![el("div", "outer", 32, 78)]);
        assert_well_formed(markup, &located);
    }

    #[test]
    fn unmarked_inner_element_is_not_reported() {
        let markup = "\n<div id=\"outer\" data-goradd=\"1\">\n  <span id=\"inner\">Text</span>\n</div>";
        assert_eq!(find(markup), vec![el("div", "outer", 1, 71)]);
    }

    #[test]
    fn void_and_self_closing_elements_span_one_tag() {
        let markup = "<input id=\"field1\" data-goradd=\"yes\" type=\"text\">\n<br id=\"br1\" data-goradd=\"line-break\" />\n<img id=\"pic1\" data-goradd=\"pic\" src=\"x.png\">";
        let located = find(markup);
        assert_eq!(
            located,
            vec![
                el("input", "field1", 0, 49),
                el("br", "br1", 50, 90),
                el("img", "pic1", 91, 136),
            ]
        );
        assert_well_formed(markup, &located);
    }

    #[test]
    fn quoted_pseudo_markup_is_inert() {
        let markup = "\n<div id=\"outer\" data-goradd=\"1\" title=\"<span data-goradd='no'> &lt;fake&gt; tag\">\n  Content here\n</div>";
        assert_eq!(find(markup), vec![el("div", "outer", 1, 104)]);
    }

    #[test]
    fn nested_marked_elements_complete_inner_first() {
        let markup = r#"<div data-goradd id=a><p data-goradd id=b>x</p></div>"#;
        let located = find(markup);
        assert_eq!(located, vec![el("p", "b", 22, 47), el("div", "a", 0, 53)]);
        assert_well_formed(markup, &located);
    }

    #[test]
    fn unmatched_end_tag_is_ignored() {
        let markup = r#"<div data-goradd id=a></span>x</div>"#;
        let mut locator = Locator::default();
        let located = locator.locate(markup.as_bytes()).expect("locate");
        assert_eq!(located, vec![el("div", "a", 0, 36)]);
        assert_eq!(locator.stats().unmatched_end_tags, 1);
    }

    #[test]
    fn mismatched_close_drops_marked_inner_frames() {
        let markup = r#"<section data-goradd id=s><b data-goradd id=inner>x</section><p data-goradd>y</p>"#;
        let mut locator = Locator::default();
        let located = locator.locate(markup.as_bytes()).expect("locate");
        assert_eq!(located, vec![el("section", "s", 0, 61), el("p", "", 61, 81)]);
        let stats = locator.stats();
        assert_eq!(stats.discarded_frames, 1);
        assert_eq!(stats.discarded_marked, 1);
    }

    #[test]
    fn unterminated_marked_element_is_dropped_silently() {
        let markup = r#"<br data-goradd id=ok><div data-goradd id=open>never closed"#;
        let mut locator = Locator::default();
        let located = locator.locate(markup.as_bytes()).expect("locate");
        assert_eq!(located, vec![el("br", "ok", 0, 22)]);
        assert_eq!(locator.stats().unterminated_frames, 1);
    }

    #[test]
    fn end_tag_closes_the_nearest_same_name_frame() {
        let markup = r#"<div data-goradd id=outer><div data-goradd id=inner>x</div></div>"#;
        assert_eq!(
            find(markup),
            vec![el("div", "inner", 26, 59), el("div", "outer", 0, 65)]
        );
    }

    #[test]
    fn raw_text_content_never_yields_elements() {
        let markup = r#"<script>var s = "<div data-goradd id=fake></div>";</script><p data-goradd id=real></p>"#;
        assert_eq!(find(markup), vec![el("p", "real", 59, 86)]);
    }

    #[test]
    fn uppercase_markup_matches_lowercase_names() {
        let markup = r#"<DIV DATA-GORADD ID=Up>x</div>"#;
        assert_eq!(find(markup), vec![el("div", "Up", 0, 30)]);
    }

    #[test]
    fn first_identifier_wins_and_bare_id_is_empty() {
        assert_eq!(
            find(r#"<i data-goradd id=one id=two></i>"#),
            vec![el("i", "one", 0, 33)]
        );
        assert_eq!(
            find(r#"<i data-goradd id></i>"#),
            vec![el("i", "", 0, 22)]
        );
    }

    #[test]
    fn identifier_is_entity_decoded() {
        assert_eq!(
            find(r#"<b data-goradd id="a&amp;b"></b>"#),
            vec![el("b", "a&b", 0, 32)]
        );
    }

    #[test]
    fn identifier_uses_full_reference_decoding() {
        assert_eq!(
            find(r#"<b data-goradd id="caf&eacute;">x</b>"#),
            vec![el("b", "café", 0, 37)]
        );
        assert_eq!(
            find(r#"<b data-goradd id="a&#65b">x</b>"#),
            vec![el("b", "aAb", 0, 32)]
        );
    }

    #[test]
    fn self_closing_raw_text_tag_hides_following_markup() {
        let markup = r#"<script src="a.js"/><div data-goradd id=hidden>x</div></script>"#;
        assert!(find(markup).is_empty());
    }

    #[test]
    fn no_marked_elements_is_an_empty_success() {
        assert!(find("<p>plain <b>markup</b></p>").is_empty());
        assert!(find("").is_empty());
    }

    #[test]
    fn locate_is_idempotent() {
        let markup = r#"<ul data-goradd><li data-goradd id=1>a<li>b</ul><hr data-goradd>"#;
        let first = find(markup);
        let second = find(markup);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn custom_marker_and_identifier_attributes() {
        let config = LocateConfig {
            marker_attr: Cow::Borrowed("data-slot"),
            id_attr: Cow::Borrowed("name"),
            ..LocateConfig::default()
        };
        let markup = r#"<div data-goradd id=x></div><div data-slot name=y id=z></div>"#;
        let located = locate_with_config(markup.as_bytes(), &config).expect("locate");
        assert_eq!(located, vec![el("div", "y", 28, 61)]);
    }

    #[test]
    fn lexical_fault_discards_partial_results() {
        let config = LocateConfig {
            tokenizer: TokenizerConfig {
                max_token_len: Some(24),
            },
            ..LocateConfig::default()
        };
        let markup = r#"<br data-goradd id=a><div title="this start tag is far too long" data-goradd></div>"#;
        let err = locate_with_config(markup.as_bytes(), &config).expect_err("must fault");
        let LocateError::Lex(lex) = &err;
        assert!(matches!(lex, LexError::TokenTooLarge { start: 21, .. }));
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("lexical fault: "));
    }

    #[test]
    fn run_accepts_any_token_source() {
        let tokens = vec![
            Ok(Token::StartTag {
                name: Cow::Borrowed("div"),
                attrs: vec![
                    Attribute::new("data-goradd", None),
                    Attribute::new("id", Some(Cow::Borrowed("synthetic"))),
                ],
                self_closing: false,
                span: Span::new(0, 5),
            }),
            Ok(Token::Text {
                span: Span::new(5, 9),
            }),
            Ok(Token::EndTag {
                name: Cow::Borrowed("div"),
                span: Span::new(9, 15),
            }),
        ];
        let mut locator = Locator::default();
        let located = locator.run(tokens).expect("run");
        assert_eq!(located, vec![el("div", "synthetic", 0, 15)]);
        assert_eq!(
            locator.stats(),
            LocatorStats {
                tokens: 3,
                frames_pushed: 1,
                max_depth: 1,
                located: 1,
                ..LocatorStats::default()
            }
        );
    }

    #[test]
    fn run_propagates_source_faults_without_partial_results() {
        let fault = LexError::TokenTooLarge {
            start: 4,
            len: 99,
            limit: 8,
        };
        let tokens = vec![
            Ok(Token::StartTag {
                name: Cow::Borrowed("br"),
                attrs: vec![Attribute::new("data-goradd", None)],
                self_closing: false,
                span: Span::new(0, 4),
            }),
            Err(fault),
        ];
        let mut locator = Locator::default();
        assert_eq!(locator.run(tokens), Err(LocateError::Lex(fault)));
        assert_eq!(locator.stats().located, 1);
    }
}
