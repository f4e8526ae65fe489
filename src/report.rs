//! Output formats for located elements.

use clap::ValueEnum;
use html::LocatedElement;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// `tag #id start..end`
    #[default]
    Text,
    /// `tag<TAB>id<TAB>start<TAB>end`
    Tsv,
    /// One JSON object per line.
    Json,
}

#[derive(Serialize)]
struct JsonLine<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a str>,
    tag: &'a str,
    id: &'a str,
    start: usize,
    end: usize,
}

/// Writes one line per element. `path` prefixes each line when set.
pub fn write_located<W: Write>(
    out: &mut W,
    path: Option<&str>,
    located: &[LocatedElement],
    format: Format,
) -> io::Result<()> {
    for el in located {
        match format {
            Format::Text => {
                if let Some(path) = path {
                    write!(out, "{path}: ")?;
                }
                writeln!(out, "{} #{} {}..{}", el.tag, el.id.escape_debug(), el.start, el.end)?;
            }
            Format::Tsv => {
                if let Some(path) = path {
                    write!(out, "{path}\t")?;
                }
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}",
                    el.tag,
                    el.id.escape_debug(),
                    el.start,
                    el.end
                )?;
            }
            Format::Json => {
                let line = JsonLine {
                    path,
                    tag: &el.tag,
                    id: &el.id,
                    start: el.start,
                    end: el.end,
                };
                serde_json::to_writer(&mut *out, &line)?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}
