use crate::escape_id;
use html::{LocateConfig, LocatedElement, TokenizerConfig, locate_with_config};
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

pub const LOCATE_CASES_FORMAT_V1: &str = "locate-cases-v1";

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LocateCaseManifest {
    format: String,
    cases: Vec<LocateCase>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    #[default]
    Ok,
    Fault,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocateCase {
    pub id: String,
    pub input: String,
    #[serde(default)]
    pub marker: Option<String>,
    #[serde(default)]
    pub id_attr: Option<String>,
    #[serde(default)]
    pub max_token_len: Option<usize>,
    #[serde(default)]
    pub status: CaseStatus,
    /// Expected `format_located` lines in completion order.
    #[serde(default)]
    pub expect: Vec<String>,
}

impl LocateCase {
    pub fn config(&self) -> LocateConfig {
        let defaults = LocateConfig::default();
        LocateConfig {
            marker_attr: self
                .marker
                .clone()
                .map_or(defaults.marker_attr, Cow::Owned),
            id_attr: self.id_attr.clone().map_or(defaults.id_attr, Cow::Owned),
            tokenizer: TokenizerConfig {
                max_token_len: self.max_token_len,
            },
        }
    }
}

/// One line per located element: `tag #id start..end`, id escaped.
pub fn format_located(element: &LocatedElement) -> String {
    format!(
        "{} #{} {}..{}",
        element.tag,
        escape_id(&element.id),
        element.start,
        element.end
    )
}

pub fn format_all(located: &[LocatedElement]) -> Vec<String> {
    located.iter().map(format_located).collect()
}

/// Run one manifest case; a lexical fault is returned as `Err` text.
pub fn run_case(case: &LocateCase) -> Result<Vec<String>, String> {
    locate_with_config(case.input.as_bytes(), &case.config())
        .map(|located| format_all(&located))
        .map_err(|err| err.to_string())
}

pub fn load_locate_cases(path: &Path) -> Vec<LocateCase> {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read locate cases TOML {path:?}: {err}"));
    let manifest: LocateCaseManifest = toml::from_str(&content)
        .unwrap_or_else(|err| panic!("failed to parse locate cases TOML {path:?}: {err}"));
    assert_eq!(
        manifest.format, LOCATE_CASES_FORMAT_V1,
        "unsupported locate cases format in {path:?}"
    );
    validate_cases(&manifest.cases, path);
    manifest.cases
}

fn validate_cases(cases: &[LocateCase], path: &Path) {
    assert!(!cases.is_empty(), "no locate cases in {path:?}");
    let mut seen = BTreeSet::new();
    for case in cases {
        assert!(
            !case.id.trim().is_empty(),
            "locate case id must be non-empty in {path:?}"
        );
        assert!(
            seen.insert(case.id.as_str()),
            "duplicate locate case id in {path:?}: {}",
            case.id
        );
        if case.status == CaseStatus::Fault {
            assert!(
                case.expect.is_empty(),
                "fault case must not list expected elements: {}",
                case.id
            );
            assert!(
                case.max_token_len.is_some(),
                "fault case needs max_token_len: {}",
                case.id
            );
        }
    }
}
