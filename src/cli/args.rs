//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Genealogy trees in memory: members, spouses, siblings, rendering and CSV export
#[derive(Parser, Debug)]
#[command(name = "famtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Print author and version
    #[arg(long)]
    pub info: bool,

    /// Directory holding .famtree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply a script of operations
    Run {
        /// Script file, one operation per line
        #[arg(value_hint = ValueHint::FilePath)]
        script: PathBuf,
        /// Report failing lines and continue
        #[arg(short, long)]
        keep_going: bool,
        /// Print the current tree afterwards
        #[arg(short, long)]
        tree: bool,
        /// Export the current tree as CSV afterwards
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        export: Option<PathBuf>,
    },

    /// Read operations interactively from stdin
    Shell,

    /// Show the current tree of a script as text tree
    Tree {
        /// Script file
        #[arg(value_hint = ValueHint::FilePath)]
        script: PathBuf,
    },

    /// Export the current tree of a script as CSV
    Export {
        /// Script file
        #[arg(value_hint = ValueHint::FilePath)]
        script: PathBuf,
        /// Target file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
