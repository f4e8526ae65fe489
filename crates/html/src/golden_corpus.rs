#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Invariant {
    ExpectedElements,
    SpansBracketed,
    CompletionOrdered,
    Idempotent,
    SliceRelocates,
}

impl Invariant {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ExpectedElements => "expected elements",
            Self::SpansBracketed => "spans bracketed by < and >",
            Self::CompletionOrdered => "completion ordered",
            Self::Idempotent => "idempotent",
            Self::SliceRelocates => "slice relocates",
        }
    }
}

impl std::fmt::Display for Invariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum FixtureKind {
    Basic,
    Nesting,
    Void,
    Quoting,
    Markup,
    Rawtext,
    Recovery,
}

/// `(tag, id, start, end)` in completion order.
pub type ExpectedElement = (&'static str, &'static str, usize, usize);

#[derive(Clone, Copy, Debug)]
pub struct GoldenFixture {
    pub name: &'static str,
    pub input: &'static str,
    pub covers: &'static str,
    pub tags: &'static [&'static str],
    pub invariants: &'static [Invariant],
    pub expected: &'static [ExpectedElement],
    pub kind: FixtureKind,
}

const ALL: &[Invariant] = &[
    Invariant::ExpectedElements,
    Invariant::SpansBracketed,
    Invariant::CompletionOrdered,
    Invariant::Idempotent,
    Invariant::SliceRelocates,
];

const GOLDEN_CORPUS_V1: &[GoldenFixture] = &[
    GoldenFixture {
        name: "basic_document_boilerplate",
        input: "<!doctype html>\n<html>\n<body>\n  <div id=\"outer\" data-goradd=\"true\">Hello</div>\n</body>\n</html>",
        covers: "Single marked element inside ordinary document structure.",
        tags: &["basic", "doctype"],
        invariants: ALL,
        expected: &[("div", "outer", 32, 78)],
        kind: FixtureKind::Basic,
    },
    GoldenFixture {
        name: "nested_unmarked_child",
        input: "\n<div id=\"outer\" data-goradd=\"1\">\n  <span id=\"inner\">Text</span>\n</div>",
        covers: "Unmarked descendants are covered by the ancestor span but not reported.",
        tags: &["nesting", "unmarked"],
        invariants: ALL,
        expected: &[("div", "outer", 1, 71)],
        kind: FixtureKind::Nesting,
    },
    GoldenFixture {
        name: "nested_marked_siblings",
        input: "<ul data-goradd id=list><li data-goradd id=a>one</li><li data-goradd id=b>two</li></ul>",
        covers: "Marked children complete before their marked parent.",
        tags: &["nesting", "order"],
        invariants: ALL,
        expected: &[("li", "a", 24, 53), ("li", "b", 53, 82), ("ul", "list", 0, 87)],
        kind: FixtureKind::Nesting,
    },
    GoldenFixture {
        name: "void_and_self_closing",
        input: "<input id=\"field1\" data-goradd=\"yes\" type=\"text\">\n<br id=\"br1\" data-goradd=\"line-break\" />\n<img id=\"pic1\" data-goradd=\"pic\" src=\"x.png\">",
        covers: "Void and self-closing elements span exactly their own tag.",
        tags: &["void", "self-closing"],
        invariants: ALL,
        expected: &[
            ("input", "field1", 0, 49),
            ("br", "br1", 50, 90),
            ("img", "pic1", 91, 136),
        ],
        kind: FixtureKind::Void,
    },
    GoldenFixture {
        name: "self_closing_non_void",
        input: "<div data-goradd id=\"sc\" /><p>after</p>",
        covers: "A trailing slash completes a non-void element immediately.",
        tags: &["self-closing", "non-void"],
        invariants: ALL,
        expected: &[("div", "sc", 0, 27)],
        kind: FixtureKind::Void,
    },
    GoldenFixture {
        name: "quoted_pseudo_markup",
        input: "\n<div id=\"outer\" data-goradd=\"1\" title=\"<span data-goradd='no'> &lt;fake&gt; tag\">\n  Content here\n</div>",
        covers: "Markup-looking text inside a quoted value is not a tag.",
        tags: &["quoting", "entity"],
        invariants: ALL,
        expected: &[("div", "outer", 1, 104)],
        kind: FixtureKind::Quoting,
    },
    GoldenFixture {
        name: "single_quoted_and_unquoted_values",
        input: "<a data-goradd id='q' href=/x>link</a>",
        covers: "Single-quoted identifier next to an unquoted value containing '/'.",
        tags: &["quoting", "unquoted"],
        invariants: ALL,
        expected: &[("a", "q", 0, 38)],
        kind: FixtureKind::Quoting,
    },
    GoldenFixture {
        name: "decoded_identifier",
        input: "<b data-goradd id=\"x&lt;y\">x</b>",
        covers: "Identifier values are entity-decoded.",
        tags: &["quoting", "entity"],
        invariants: ALL,
        expected: &[("b", "x<y", 0, 32)],
        kind: FixtureKind::Quoting,
    },
    GoldenFixture {
        name: "mixed_case_names",
        input: "<SECTION Data-GoRadd ID=\"Mixed\">x</Section>",
        covers: "Tag and attribute names match case-insensitively; id keeps its case.",
        tags: &["case", "basic"],
        invariants: ALL,
        expected: &[("section", "Mixed", 0, 43)],
        kind: FixtureKind::Basic,
    },
    GoldenFixture {
        name: "comment_hides_markup",
        input: "<!-- <div data-goradd id=hidden></div> --><p data-goradd id=shown>x</p>",
        covers: "Elements inside comments are never reported.",
        tags: &["comment"],
        invariants: ALL,
        expected: &[("p", "shown", 42, 71)],
        kind: FixtureKind::Markup,
    },
    GoldenFixture {
        name: "doctype_and_processing_instruction",
        input: "<!DOCTYPE html><?xml version=\"1.0\"?><span data-goradd id=s>x</span>",
        covers: "Doctype and bogus comments are skipped.",
        tags: &["doctype", "bogus-comment"],
        invariants: ALL,
        expected: &[("span", "s", 36, 67)],
        kind: FixtureKind::Markup,
    },
    GoldenFixture {
        name: "literal_less_than_in_text",
        input: "<p data-goradd id=p>1 < 2 and a<-b</p>",
        covers: "A '<' not followed by a letter, '/', '!' or '?' is text.",
        tags: &["text", "literal-lt"],
        invariants: ALL,
        expected: &[("p", "p", 0, 38)],
        kind: FixtureKind::Markup,
    },
    GoldenFixture {
        name: "textarea_body_is_raw_text",
        input: "<textarea data-goradd id=t><b data-goradd id=no></b></textarea>",
        covers: "A marked raw-text element is reported; markup in its body is not.",
        tags: &["rawtext", "textarea"],
        invariants: ALL,
        expected: &[("textarea", "t", 0, 63)],
        kind: FixtureKind::Rawtext,
    },
    GoldenFixture {
        name: "self_closing_script_stays_raw",
        input: "<script src=\"a.js\"/><div data-goradd id=hidden>x</div></script><p data-goradd id=after>y</p>",
        covers: "A self-closing raw-text tag still makes its following text opaque up to the end tag.",
        tags: &["rawtext", "self-closing"],
        invariants: ALL,
        expected: &[("p", "after", 63, 92)],
        kind: FixtureKind::Rawtext,
    },
    GoldenFixture {
        name: "mismatched_close_drops_inner",
        input: "<div data-goradd id=outer><span data-goradd id=lost>x</div>",
        covers: "Open frames above a matched end tag are dropped even when marked.",
        tags: &["recovery", "mismatch"],
        invariants: ALL,
        expected: &[("div", "outer", 0, 59)],
        kind: FixtureKind::Recovery,
    },
    GoldenFixture {
        name: "unmatched_end_tags_ignored",
        input: "</p><em data-goradd id=e>x</em></b>",
        covers: "End tags with no open counterpart are skipped.",
        tags: &["recovery", "unmatched"],
        invariants: ALL,
        expected: &[("em", "e", 4, 31)],
        kind: FixtureKind::Recovery,
    },
    GoldenFixture {
        name: "unterminated_element_dropped",
        input: "<main data-goradd id=m><br data-goradd id=b>",
        covers: "Elements still open at end of input are not reported.",
        tags: &["recovery", "eof"],
        invariants: ALL,
        expected: &[("br", "b", 23, 44)],
        kind: FixtureKind::Recovery,
    },
];

pub fn fixtures() -> &'static [GoldenFixture] {
    GOLDEN_CORPUS_V1
}
