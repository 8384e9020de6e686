use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::debug;

use pastewise::{handle_paste, ClipboardPayload, CursorRegion, PasteSettings};

const STDIN_MARKER: &str = "-";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Normalize clipboard contents the way a paste into a Markdown note would.
#[derive(Parser, Debug)]
#[command(name = "pastewise", version, about)]
struct Args {
    /// File with the text/plain flavour ("-" for stdin)
    #[arg(long, value_name = "FILE")]
    text: Option<PathBuf>,

    /// File with the text/html flavour ("-" for stdin)
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Where the paste lands
    #[arg(long, value_enum, default_value_t = Region::Normal)]
    region: Region,

    /// Settings file (defaults to the user config directory)
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Region {
    Normal,
    InlineCode,
    CodeBlock,
}

impl From<Region> for CursorRegion {
    fn from(region: Region) -> Self {
        match region {
            Region::Normal => CursorRegion::Normal,
            Region::InlineCode => CursorRegion::InlineCode,
            Region::CodeBlock => CursorRegion::CodeBlock,
        }
    }
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let args = Args::parse();

    let stdin_users = [&args.text, &args.html]
        .iter()
        .filter(|p| p.as_deref() == Some(Path::new(STDIN_MARKER)))
        .count();
    if stdin_users > 1 {
        bail!("only one of --text and --html can read from stdin");
    }

    let settings = load_settings(args.settings.as_deref())?;
    let text = match &args.text {
        Some(path) => read_input(path)?,
        None => String::new(),
    };
    let mut payload = ClipboardPayload::new(text);
    if let Some(path) = &args.html {
        payload = payload.with_html(read_input(path)?);
    }

    match handle_paste(&settings, &payload, args.region.into()) {
        Some(output) => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.flush()?;
            Ok(ExitCode::SUCCESS)
        }
        None => Ok(ExitCode::from(2)),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_settings(path: Option<&Path>) -> Result<PasteSettings> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match PasteSettings::default_path() {
            Some(path) => path,
            None => return Ok(PasteSettings::default()),
        },
    };
    debug!(path = %path.display(), "loading settings");
    PasteSettings::load(&path)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new(STDIN_MARKER) {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
