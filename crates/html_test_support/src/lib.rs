use std::fmt::Write;

const MISSING: &str = "<missing>";

/// Identifier text as the `markspan` text output prints it.
pub fn escape_id(id: &str) -> String {
    id.escape_debug().to_string()
}

/// Row-by-row comparison of two line lists. Matching rows are listed once;
/// mismatched rows are flagged with `!` and show both sides.
pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    let mut out = format!(
        "expected {} line(s), actual {} line(s)\n",
        expected.len(),
        actual.len()
    );
    for row in 0..expected.len().max(actual.len()) {
        let left = expected.get(row).map_or(MISSING, String::as_str);
        let right = actual.get(row).map_or(MISSING, String::as_str);
        if left == right {
            let _ = writeln!(out, "  {:>3}   {left}", row + 1);
        } else {
            let _ = writeln!(out, "! {:>3} - {left}", row + 1);
            let _ = writeln!(out, "      + {right}");
        }
    }
    out
}

#[cfg(feature = "locate")]
pub mod locate_cases;
