#![deny(unsafe_code)]

//! filterlines CLI: keep or drop the lines of a file that match a search.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use filterlines_core::{
    run_filter, word_at, ContextInput, DocumentSource, FilterCommand, FilterRequest,
    GivenConfiguration, JsonFileStorage, LineEnding, PromptDefaults, RenderOutput, Settings,
    TextBuffer, TomlConfiguration,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Filter the lines of a text file by string or regex.
#[derive(Parser)]
#[command(name = "filterlines", version, about, long_about = None)]
struct Cli {
    /// Path to the TOML settings file.
    #[arg(long, default_value = "filterlines.toml")]
    config: PathBuf,

    /// Path to the JSON file holding the last search and context.
    #[arg(long, default_value = ".filterlines-state.json")]
    state: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Keep lines containing a string.
    IncludeString(FilterArgs),
    /// Keep lines matching a regex.
    IncludeRegex(FilterArgs),
    /// Keep lines not containing a string.
    ExcludeString(FilterArgs),
    /// Keep lines not matching a regex.
    ExcludeRegex(FilterArgs),
}

impl Commands {
    fn split(self) -> (FilterCommand, FilterArgs) {
        match self {
            Commands::IncludeString(args) => (FilterCommand::IncludeLinesWithString, args),
            Commands::IncludeRegex(args) => (FilterCommand::IncludeLinesWithRegex, args),
            Commands::ExcludeString(args) => (FilterCommand::ExcludeLinesWithString, args),
            Commands::ExcludeRegex(args) => (FilterCommand::ExcludeLinesWithRegex, args),
        }
    }
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// File to filter.
    file: PathBuf,

    /// Search text. Defaults to the preserved search or the word under --cursor.
    needle: Option<String>,

    /// Context lines: `N` or `BEFORE:AFTER`.
    #[arg(short = 'C', long)]
    context: Option<String>,

    /// Reuse the last context string when -C is not given.
    #[arg(long)]
    with_context: bool,

    /// Cursor position `LINE:COL` (0-based) used to suggest the search word.
    #[arg(long)]
    cursor: Option<Cursor>,

    /// Edit the file instead of writing a new document.
    #[arg(long)]
    in_place: bool,

    /// Where to write the new document (stdout by default).
    #[arg(short, long, conflicts_with = "in_place")]
    output: Option<PathBuf>,

    /// Prefix kept lines with their original line number.
    #[arg(short = 'n', long)]
    line_numbers: bool,

    /// Show context as indented blocks under each match.
    #[arg(long)]
    indent_context: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    line: usize,
    column: usize,
}

impl FromStr for Cursor {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (line, column) = s
            .split_once(':')
            .ok_or_else(|| format!("expected LINE:COL, got {s:?}"))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<usize>()
                .map_err(|e| format!("bad cursor component {v:?}: {e}"))
        };
        Ok(Cursor {
            line: parse(line)?,
            column: parse(column)?,
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<filterlines_core::Error>() {
                Some(core) => eprintln!("{}", core.user_message()),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let (command, args) = cli.command.split();
    let config = load_config(&cli.config, &args)?;
    let storage = JsonFileStorage::open(&cli.state)?;
    let defaults = PromptDefaults::new(&config, &storage);

    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let mut buffer = TextBuffer::new(text);

    let request = build_request(command, &args, &buffer, &defaults)?;
    info!(
        command = command.id(),
        needle = %request.needle,
        file = %args.file.display(),
        "filtering"
    );

    match run_filter(&mut buffer, &request, &config)? {
        RenderOutput::NewDocument(doc) => {
            if let Some(fold) = doc.fold {
                info!(?fold, "fold request");
            }
            let eol = buffer.line_break_style();
            match args.output.as_deref() {
                Some(path) => std::fs::write(path, &doc.content)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => write_terminated(std::io::stdout().lock(), &doc.content, eol)?,
            }
        }
        RenderOutput::InPlace { edits, fold } => {
            if let Some(fold) = fold {
                info!(?fold, "fold request");
            }
            std::fs::write(&args.file, buffer.text())
                .with_context(|| format!("writing {}", args.file.display()))?;
            debug!(edits, file = %args.file.display(), "rewrote file");
        }
    }

    defaults.remember(&request)?;
    Ok(())
}

/// Settings from the TOML file with command-line overrides on top.
fn load_config(path: &Path, args: &FilterArgs) -> Result<GivenConfiguration> {
    let file = TomlConfiguration::load(path)?;
    let mut settings = Settings::resolve(&file);
    if args.in_place {
        settings.create_new_tab = false;
    }
    if args.line_numbers {
        settings.line_numbers = true;
    }
    if args.indent_context {
        settings.indent_context = true;
    }
    debug!(?settings, "resolved settings");
    Ok(GivenConfiguration::new(settings))
}

fn build_request<S>(
    command: FilterCommand,
    args: &FilterArgs,
    buffer: &TextBuffer,
    defaults: &PromptDefaults<'_, GivenConfiguration, S>,
) -> Result<FilterRequest>
where
    S: filterlines_core::Storage + ?Sized,
{
    let needle = match &args.needle {
        Some(needle) => needle.clone(),
        None => {
            let word = args
                .cursor
                .filter(|c| c.line < buffer.line_count())
                .and_then(|c| word_at(buffer.line_text(c.line), c.column));
            let suggested = defaults.search(word);
            if suggested.is_empty() {
                bail!("no search text given; {}", command.prompt().trim_end());
            }
            info!(needle = %suggested, "using suggested search");
            suggested
        }
    };

    let context = match &args.context {
        Some(s) => ContextInput::Text(s.clone()),
        None if args.with_context => ContextInput::Text(defaults.context()),
        None => ContextInput::None,
    };

    Ok(command.request(needle).with_context(context))
}

/// Write `content` followed by one line break in the document's style.
fn write_terminated(mut out: impl Write, content: &str, eol: LineEnding) -> Result<()> {
    out.write_all(content.as_bytes())?;
    if !content.is_empty() {
        out.write_all(eol.as_str().as_bytes())?;
    }
    out.flush()?;
    Ok(())
}
