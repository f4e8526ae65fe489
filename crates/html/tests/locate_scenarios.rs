use html::golden_corpus::fixtures;
use html::{
    LexError, LocateConfig, LocateError, LocatedElement, Locator, TokenizerConfig, locate,
    locate_with_config,
};
use html_test_support::locate_cases::format_all;

const BOILERPLATE: &str = "<!doctype html>\n<html>\n<body>\n  <div id=\"outer\" data-goradd=\"true\">Hello</div>\n</body>\n</html>";
const NESTED: &str = "\n<div id=\"outer\" data-goradd=\"1\">\n  <span id=\"inner\">Text</span>\n</div>";
const SELF_CLOSING: &str = "<input id=\"field1\" data-goradd=\"yes\" type=\"text\">\n<br id=\"br1\" data-goradd=\"line-break\" />\n<img id=\"pic1\" data-goradd=\"pic\" src=\"x.png\">";
const TRICKY_TITLE: &str = "\n<div id=\"outer\" data-goradd=\"1\" title=\"<span data-goradd='no'> &lt;fake&gt; tag\">\n  Content here\n</div>";

fn lines(markup: &str) -> Vec<String> {
    format_all(&locate(markup.as_bytes()).expect("locate"))
}

#[test]
fn basic_scenario() {
    assert_eq!(lines(BOILERPLATE), vec!["div #outer 32..78"]);
}

#[test]
fn nested_scenario() {
    assert_eq!(lines(NESTED), vec!["div #outer 1..71"]);
}

#[test]
fn self_closing_scenario() {
    assert_eq!(
        lines(SELF_CLOSING),
        vec!["input #field1 0..49", "br #br1 50..90", "img #pic1 91..136"]
    );
}

#[test]
fn tricky_title_scenario() {
    assert_eq!(lines(TRICKY_TITLE), vec!["div #outer 1..104"]);
}

#[test]
fn located_slices_are_the_serialized_elements() {
    let located = locate(BOILERPLATE.as_bytes()).expect("locate");
    let slices: Vec<&[u8]> = located
        .iter()
        .map(|el| el.slice(BOILERPLATE.as_bytes()))
        .collect();
    assert_eq!(
        slices,
        vec![b"<div id=\"outer\" data-goradd=\"true\">Hello</div>".as_slice()]
    );
}

#[test]
fn replacing_spans_back_to_front_keeps_offsets_valid() {
    let located = locate(SELF_CLOSING.as_bytes()).expect("locate");
    let mut out = SELF_CLOSING.to_string();
    for el in located.iter().rev() {
        out.replace_range(el.start..el.end, &format!("[{}]", el.id));
    }
    assert_eq!(out, "[field1]\n[br1]\n[pic1]");
}

#[test]
fn concurrent_calls_are_independent() {
    let handles: Vec<_> = fixtures()
        .iter()
        .map(|fixture| {
            let input = fixture.input;
            std::thread::spawn(move || locate(input.as_bytes()))
        })
        .collect();
    for (fixture, handle) in fixtures().iter().zip(handles) {
        let located = handle.join().expect("thread").expect("locate");
        let expected: Vec<LocatedElement> = fixture
            .expected
            .iter()
            .map(|&(tag, id, start, end)| LocatedElement {
                tag: tag.to_string(),
                id: id.to_string(),
                start,
                end,
            })
            .collect();
        assert_eq!(located, expected, "fixture {}", fixture.name);
    }
}

#[test]
fn fault_reports_offset_and_limit() {
    let config = LocateConfig {
        tokenizer: TokenizerConfig {
            max_token_len: Some(32),
        },
        ..LocateConfig::default()
    };
    let err = locate_with_config(BOILERPLATE.as_bytes(), &config).expect_err("fault");
    assert_eq!(
        err,
        LocateError::Lex(LexError::TokenTooLarge {
            start: 32,
            len: 35,
            limit: 32,
        })
    );
}

#[test]
fn stats_describe_recovery() {
    let markup = "<div data-goradd><p data-goradd><b>x</div></i><section>";
    let mut locator = Locator::default();
    let located = locator.locate(markup.as_bytes()).expect("locate");
    assert_eq!(format_all(&located), vec!["div # 0..42"]);
    let stats = locator.stats();
    assert_eq!(stats.discarded_frames, 2);
    assert_eq!(stats.discarded_marked, 1);
    assert_eq!(stats.unmatched_end_tags, 1);
    assert_eq!(stats.unterminated_frames, 1);
    assert_eq!(stats.max_depth, 3);
    assert_eq!(stats.located, 1);
}
