use chx_diff::{diff_snapshots, SnapshotDelta};
use chx_index::{IndexConfig, IndexEntry};
use chx_types::{BaseRevision, FileStatus, VcsPath};
use colored::{ColoredString, Colorize};
use serde::Serialize;

use crate::cli::*;
use crate::input::load_index;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => IndexConfig::load(path)?,
        None => IndexConfig::default(),
    };
    tracing::debug!(?config, "index config loaded");

    match cli.command {
        Command::Status(args) => cmd_status(args, &config, cli.format),
        Command::Tree(args) => cmd_tree(args, &config, cli.format),
        Command::Diff(args) => cmd_diff(args, &config, cli.format),
    }
}

#[derive(Serialize)]
struct StatusRow<'a> {
    path: &'a VcsPath,
    status: FileStatus,
    owner: &'a str,
    revision: String,
}

impl<'a> From<&'a IndexEntry> for StatusRow<'a> {
    fn from(entry: &'a IndexEntry) -> Self {
        Self {
            path: &entry.path,
            status: entry.record.status,
            owner: entry.record.owner.name(),
            revision: entry.record.revision.to_string(),
        }
    }
}

fn cmd_status(args: StatusArgs, config: &IndexConfig, format: OutputFormat) -> anyhow::Result<()> {
    let index = load_index(&args.changes, config)?;
    print_entries(index.iter(), format)
}

fn cmd_tree(args: TreeArgs, config: &IndexConfig, format: OutputFormat) -> anyhow::Result<()> {
    let index = load_index(&args.changes, config)?;
    print_entries(index.under(&VcsPath::new(&args.path)), format)
}

fn cmd_diff(args: DiffArgs, config: &IndexConfig, format: OutputFormat) -> anyhow::Result<()> {
    let old = load_index(&args.old, config)?;
    let new = load_index(&args.new, config)?;
    let delta = diff_snapshots(&old, &new);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&delta)?),
        OutputFormat::Text => print_delta(&delta),
    }
    Ok(())
}

fn print_entries<'a>(
    entries: impl Iterator<Item = &'a IndexEntry>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let rows: Vec<StatusRow<'_>> = entries.map(StatusRow::from).collect();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("No tracked changes.");
            }
            for row in &rows {
                println!(
                    "{:<22} {}  {}",
                    paint_status(row.status),
                    row.path,
                    format!("{}@{}", row.owner, row.revision).dimmed()
                );
            }
        }
    }
    Ok(())
}

fn print_delta(delta: &SnapshotDelta) {
    if delta.is_empty() {
        println!("No changes.");
        return;
    }
    for base in &delta.removed {
        println!("{} {}", "-".red().bold(), describe(base));
    }
    for base in &delta.added {
        println!("{} {}", "+".green().bold(), describe(base));
    }
    for pair in &delta.modified {
        println!(
            "{} {} -> {}",
            "~".yellow().bold(),
            describe(&pair.before),
            format!("{}@{}", pair.after.owner, pair.after.revision).yellow()
        );
    }
    println!(
        "{} removed, {} added, {} modified",
        delta.removals(),
        delta.additions(),
        delta.modifications()
    );
}

fn describe(base: &BaseRevision) -> String {
    format!("{} ({}@{})", base.path, base.owner, base.revision)
}

fn paint_status(status: FileStatus) -> ColoredString {
    let id = status.id();
    match status {
        FileStatus::Added => id.green(),
        FileStatus::Deleted => id.red(),
        FileStatus::Modified => id.blue(),
        FileStatus::MergedWithConflicts => id.red().bold(),
        FileStatus::Unknown | FileStatus::Ignored => id.dimmed(),
        _ => id.normal(),
    }
}
