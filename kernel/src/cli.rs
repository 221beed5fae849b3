//! Command line front end for the `duplex` binary.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use duplex_differ::{DiffPart, difference, split_lines};
use tracing::info;

use crate::buffer::MemoryBuffer;
use crate::ids::DocumentId;
use crate::infrastructure::config::Settings;
use crate::manager::SessionManager;
use crate::session::{Direction, Side};

/// Parsed command line.
#[derive(Debug, Parser)]
#[command(
    name = "duplex",
    about = "Two-way line diff and merge for a pair of text files",
    version
)]
pub struct Cli {
    /// Configuration file layered over the built-in defaults.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// `duplex` subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the differences between two files.
    Diff(DiffArgs),

    /// Merge every difference in one direction and save the result.
    Resolve(ResolveArgs),
}

/// Arguments of `duplex diff`.
#[derive(Debug, Args)]
pub struct DiffArgs {
    /// First (left) file.
    pub left: PathBuf,
    /// Second (right) file.
    pub right: PathBuf,
    /// Emit the diff parts as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments of `duplex resolve`.
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// First (left) file.
    pub left: PathBuf,
    /// Second (right) file.
    pub right: PathBuf,
    /// Which way every region is copied.
    #[arg(long, value_enum)]
    pub direction: DirectionArg,
    /// Files to write back; defaults to the side receiving the merges.
    #[arg(long, value_enum)]
    pub save: Option<SaveArg>,
    /// Print the resulting texts instead of writing them.
    #[arg(long)]
    pub dry_run: bool,
}

/// `--direction` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DirectionArg {
    /// Copy left content into the right file.
    LeftToRight,
    /// Copy right content into the left file.
    RightToLeft,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::LeftToRight => Self::LeftToRight,
            DirectionArg::RightToLeft => Self::RightToLeft,
        }
    }
}

/// `--save` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SaveArg {
    /// Only the left file.
    Left,
    /// Only the right file.
    Right,
    /// Both files.
    Both,
}

impl SaveArg {
    fn sides(self) -> &'static [Side] {
        match self {
            Self::Left => &[Side::Left],
            Self::Right => &[Side::Right],
            Self::Both => &[Side::Left, Side::Right],
        }
    }
}

/// Runs `cli`, writing command output to `out`.
///
/// # Errors
///
/// Returns an error if a file cannot be read or written, or if the merge
/// session rejects an operation.
pub fn run(cli: &Cli, settings: &Settings, out: &mut impl Write) -> Result<()> {
    match &cli.command {
        Commands::Diff(args) => run_diff(args, out),
        Commands::Resolve(args) => run_resolve(args, settings, out),
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn run_diff(args: &DiffArgs, out: &mut impl Write) -> Result<()> {
    let parts = difference(&read(&args.left)?, &read(&args.right)?);

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &parts).context("Failed to encode diff")?;
        writeln!(out)?;
        return Ok(());
    }

    for part in &parts {
        match part {
            DiffPart::Equal { text } => write_lines(out, ' ', text)?,
            DiffPart::Change { inserted, deleted } => {
                write_lines(out, '-', deleted)?;
                write_lines(out, '+', inserted)?;
            }
        }
    }
    let changes = parts.iter().filter(|part| part.is_change()).count();
    info!(changes, "diff printed");
    Ok(())
}

fn write_lines(out: &mut impl Write, marker: char, text: &str) -> Result<()> {
    for line in split_lines(text) {
        writeln!(out, "{marker} {}", line.trim_end_matches(['\n', '\r']))?;
    }
    Ok(())
}

fn run_resolve(args: &ResolveArgs, settings: &Settings, out: &mut impl Write) -> Result<()> {
    let direction = Direction::from(args.direction);
    let (left_id, right_id) = (DocumentId::new(1), DocumentId::new(2));

    let mut manager = SessionManager::new(&settings.merge);
    let id = manager.begin_session(
        MemoryBuffer::new(left_id, read(&args.left)?),
        MemoryBuffer::new(right_id, read(&args.right)?),
    )?;
    manager.on_source_loaded(left_id)?;
    manager.on_source_loaded(right_id)?;

    let session = manager.session_mut(id)?;
    let total = session.regions().len();
    let mut merged = 0;
    while session.merge(direction)?.is_some() {
        merged += 1;
    }
    info!(%direction, merged, total, "regions merged");

    let sides = match args.save {
        Some(save) => save.sides().to_vec(),
        None => vec![direction.target()],
    };
    for side in &sides {
        let document = match side {
            Side::Left => left_id,
            Side::Right => right_id,
        };
        manager.on_before_persist(document)?;
    }

    let session = manager
        .on_closed(left_id)
        .context("Merge session was lost before saving")?;
    let (left, right) = session.into_buffers();
    let (left, right) = (left.into_string(), right.into_string());

    for side in sides {
        let (text, path) = match side {
            Side::Left => (&left, &args.left),
            Side::Right => (&right, &args.right),
        };
        if args.dry_run {
            writeln!(out, "==> {} <==", path.display())?;
            write!(out, "{text}")?;
        } else {
            fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "saved");
        }
    }

    writeln!(out, "merged {merged} of {total} regions {direction}")?;
    Ok(())
}
