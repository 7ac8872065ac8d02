use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "chx",
    about = "Hierarchical change index: inspect snapshots and the deltas between them",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Index configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List every tracked path of a snapshot
    Status(StatusArgs),
    /// List the tracked paths under a directory
    Tree(TreeArgs),
    /// Show the delta between two snapshots
    Diff(DiffArgs),
}

#[derive(Args)]
pub struct StatusArgs {
    /// JSON change list
    pub changes: PathBuf,
}

#[derive(Args)]
pub struct TreeArgs {
    /// JSON change list
    pub changes: PathBuf,
    /// Directory to list
    pub path: String,
}

#[derive(Args)]
pub struct DiffArgs {
    /// Change list of the previous snapshot
    pub old: PathBuf,
    /// Change list of the new snapshot
    pub new: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_diff_with_globals() {
        let cli = Cli::try_parse_from([
            "chx", "diff", "old.json", "new.json", "--format", "json", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Command::Diff(args) => {
                assert_eq!(args.old, PathBuf::from("old.json"));
                assert_eq!(args.new, PathBuf::from("new.json"));
            }
            _ => panic!("expected diff"),
        }
    }

    #[test]
    fn tree_requires_path() {
        assert!(Cli::try_parse_from(["chx", "tree", "changes.json"]).is_err());
    }
}
