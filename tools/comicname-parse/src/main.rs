//! Comic filename parser CLI
//!
//! Parses comic archive filenames given as arguments (or one per line on
//! stdin) and prints one JSON object per line, or a new name per line when
//! a rename template is given.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};

use comicname_core::{FileRenamer, FilenameParser, ParsedFilename, ParserConfig, WordDictionary};

/// CLI arguments
#[derive(Parser)]
#[command(name = "comicname-parse")]
#[command(about = "Extract series, volume, issue and year from comic archive filenames")]
#[command(version)]
struct Cli {
    /// Filenames to parse; read from stdin, one per line, when omitted
    filenames: Vec<String>,

    /// Parser configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Word list used to split glued words (implies --split-words)
    #[arg(short, long)]
    dictionary: Option<PathBuf>,

    /// Split glued words such as "WonderWoman023"
    #[arg(short, long)]
    split_words: bool,

    /// Drop c2c markers from the series and remainder
    #[arg(long)]
    remove_c2c: bool,

    /// Drop FCBD / Free Comic Book Day markers from the series and remainder
    #[arg(long)]
    remove_fcbd: bool,

    /// Print a new name rendered from this template instead of JSON
    #[arg(short, long, value_name = "TEMPLATE")]
    rename: Option<String>,

    /// Zero padding of the issue number in renames
    #[arg(long, default_value_t = 3)]
    issue_padding: usize,

    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Serialize)]
struct ParseOutput<'a> {
    input: &'a str,
    #[serde(flatten)]
    parsed: ParsedFilename,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let parser = build_parser(&cli)?;
    let renamer = match &cli.rename {
        Some(template) => Some(
            FileRenamer::new()?
                .with_template(template.as_str())
                .with_issue_zero_padding(cli.issue_padding),
        ),
        None => None,
    };
    if let Some(renamer) = &renamer {
        debug!(template = renamer.template(), "rename template");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.filenames.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.context("Failed to read stdin")?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            emit(&mut out, &parser, renamer.as_ref(), line)?;
        }
    } else {
        for filename in &cli.filenames {
            emit(&mut out, &parser, renamer.as_ref(), filename)?;
        }
    }

    Ok(())
}

fn build_parser(cli: &Cli) -> Result<FilenameParser> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            ParserConfig::from_json(&json)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => ParserConfig::default(),
    };
    if cli.split_words || cli.dictionary.is_some() {
        config.split_words = true;
    }
    config.remove_c2c |= cli.remove_c2c;
    config.remove_fcbd |= cli.remove_fcbd;
    debug!(?config, "parser configuration");

    let mut parser = FilenameParser::new(config.clone())?;
    if config.split_words {
        let dictionary = match &cli.dictionary {
            Some(path) => WordDictionary::load(path)
                .with_context(|| format!("Failed to load dictionary {}", path.display()))?,
            None => WordDictionary::builtin(),
        };
        info!(words = dictionary.len(), "word splitting enabled");
        parser = parser.with_dictionary(Arc::new(dictionary));
    }
    Ok(parser)
}

fn emit(
    out: &mut impl Write,
    parser: &FilenameParser,
    renamer: Option<&FileRenamer>,
    input: &str,
) -> Result<()> {
    let parsed = parser.parse(input);

    match renamer {
        Some(renamer) => {
            let ext = Path::new(input)
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("");
            let name = renamer
                .determine_name(&parsed, ext)
                .context("Failed to render rename template")?;
            writeln!(out, "{name}")?;
        }
        None => {
            let output = ParseOutput { input, parsed };
            writeln!(out, "{}", serde_json::to_string(&output)?)?;
        }
    }
    Ok(())
}
