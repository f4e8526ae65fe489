use clap::Parser;
use html::{LocateConfig, LocateError, Locator, TokenizerConfig};
use mimalloc::MiMalloc;
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod report;

use report::{Format, write_located};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Print the byte spans of marked elements in HTML files.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Attribute that flags an element for reporting
    #[arg(long, value_name = "NAME", default_value = html::MARKER_ATTR)]
    marker: String,

    /// Attribute copied into the reported id
    #[arg(long = "id-attr", value_name = "NAME", default_value = html::ID_ATTR)]
    id_attr: String,

    /// Fail on any single token longer than N bytes
    #[arg(long = "max-token-len", value_name = "N")]
    max_token_len: Option<usize>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Input files; `-` reads standard input
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,
}

impl Cli {
    fn locate_config(&self) -> LocateConfig {
        LocateConfig {
            marker_attr: Cow::Owned(self.marker.clone()),
            id_attr: Cow::Owned(self.id_attr.clone()),
            tokenizer: TokenizerConfig {
                max_token_len: self.max_token_len,
            },
        }
    }
}

#[derive(Debug)]
enum FileError {
    Read(io::Error),
    Locate(LocateError),
    Write(io::Error),
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::Read(err) => write!(f, "read failed: {err}"),
            FileError::Locate(err) => write!(f, "{err}"),
            FileError::Write(err) => write!(f, "write failed: {err}"),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::Read(err) | FileError::Write(err) => Some(err),
            FileError::Locate(err) => Some(err),
        }
    }
}

fn read_input(path: &Path) -> io::Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf)?;
        return Ok(buf);
    }
    fs::read(path)
}

fn process_file<W: Write>(
    locator: &mut Locator,
    path: &Path,
    prefix: Option<&str>,
    format: Format,
    out: &mut W,
) -> Result<usize, FileError> {
    let markup = read_input(path).map_err(FileError::Read)?;
    let located = locator.locate(&markup).map_err(FileError::Locate)?;
    log::debug!(
        target: "markspan",
        "{}: {} byte(s), {:?}",
        path.display(),
        markup.len(),
        locator.stats()
    );
    write_located(out, prefix, &located, format).map_err(FileError::Write)?;
    Ok(located.len())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut locator = Locator::new(cli.locate_config());
    let multiple = cli.files.len() > 1;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failed = false;

    for path in &cli.files {
        let display = path.display().to_string();
        let prefix = multiple.then_some(display.as_str());
        match process_file(&mut locator, path, prefix, cli.format, &mut out) {
            Ok(count) => log::info!(target: "markspan", "{display}: {count} marked element(s)"),
            Err(err) => {
                failed = true;
                log::warn!(target: "markspan", "{display}: {err}");
                eprintln!("markspan: {display}: {err}");
                if let FileError::Write(_) = err {
                    break;
                }
            }
        }
    }

    if out.flush().is_err() {
        failed = true;
    }
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
