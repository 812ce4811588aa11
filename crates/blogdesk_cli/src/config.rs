//! Command-line arguments and derived configuration.
//!
//! Handles:
//! - Global flags (store, repository, push, logging)
//! - Subcommand definitions
//! - Defaults for the log directory

use anyhow::Result;
use blogdesk_core::{EditorConfig, ImportPolicy};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for the blog post editor
#[derive(Debug, Parser)]
#[command(name = "blogdesk")]
#[command(about = "Edit multilingual blog posts stored in one JSON file")]
#[command(version)]
pub struct Args {
    /// Path of the JSON data file
    #[arg(long, default_value = "blog_data.json")]
    pub store: PathBuf,

    /// Git repository holding the data file (defaults to its directory)
    #[arg(long)]
    pub repo: Option<PathBuf>,

    /// Commit and push the data file after saving
    #[arg(long)]
    pub push: bool,

    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,

    /// Directory for rolling log files
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Allow replacing a data file that failed to load
    #[arg(long)]
    pub force_overwrite: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List post summaries
    List,
    /// Create an empty project
    New { id: String },
    /// Rename a project
    Rename { id: String, new_id: String },
    /// Delete a project
    Delete { id: String },
    /// Manage translations
    #[command(subcommand)]
    Lang(LangCommand),
    /// Manage sections of one translation
    #[command(subcommand)]
    Section(SectionCommand),
    /// Update title and metadata of one translation
    Meta(MetaArgs),
    /// Render an HTML preview
    Preview {
        project: String,
        /// Language code; all languages when omitted
        #[arg(long)]
        lang: Option<String>,
        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Export one project to its own file
    Export {
        project: String,
        /// Output file; `<project>.json` when omitted
        #[arg(long)]
        out: Option<PathBuf>,
        /// Append a timestamp to the default file name
        #[arg(long)]
        timestamped: bool,
    },
    /// Import a project file
    Import {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = ConflictPolicy::Rename)]
        on_conflict: ConflictPolicy,
    },
    /// Rewrite the data file in the current schema
    Migrate,
    /// Commit and push the data file in the background
    Push,
}

#[derive(Debug, Subcommand)]
pub enum LangCommand {
    Add {
        project: String,
        code: String,
        /// Display name; looked up from the code when omitted
        #[arg(long, default_value = "")]
        name: String,
    },
    Remove { project: String, code: String },
}

#[derive(Debug, Subcommand)]
pub enum SectionCommand {
    Add {
        project: String,
        lang: String,
        #[arg(long, default_value = "section")]
        kind: String,
        #[arg(long, default_value = "")]
        title: String,
        /// Raw text; blank lines separate paragraphs
        #[arg(long, default_value = "")]
        body: String,
        /// Image entry as `SRC` or `SRC=ALT`; repeatable
        #[arg(long = "image")]
        images: Vec<String>,
        /// Insert position; appended when omitted
        #[arg(long, conflicts_with = "top")]
        index: Option<usize>,
        #[arg(long)]
        top: bool,
    },
    Remove {
        project: String,
        lang: String,
        index: usize,
    },
    Retype {
        project: String,
        lang: String,
        index: usize,
        kind: String,
    },
}

#[derive(Debug, ClapArgs)]
pub struct MetaArgs {
    pub project: String,
    pub lang: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConflictPolicy {
    /// Replace the existing project
    Override,
    /// Store under a timestamp-suffixed id
    Rename,
}

impl From<ConflictPolicy> for ImportPolicy {
    fn from(value: ConflictPolicy) -> Self {
        match value {
            ConflictPolicy::Override => ImportPolicy::Override,
            ConflictPolicy::Rename => ImportPolicy::RenameWithTimestamp,
        }
    }
}

/// Combined configuration from all sources
#[derive(Debug)]
pub struct Config {
    pub editor: EditorConfig,
    pub repo_dir: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
    pub force_overwrite: bool,
    pub command: Command,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let repo_dir = match args.repo {
            Some(repo) => repo,
            None => args
                .store
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        };

        let log_dir = match args.log_dir {
            Some(dir) => dir,
            None => dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("blogdesk")
                .join("logs"),
        };

        let mut editor = EditorConfig::with_store_path(args.store);
        editor.push_on_save = args.push;

        Ok(Config {
            editor,
            repo_dir,
            log_level: args.log_level,
            log_dir,
            force_overwrite: args.force_overwrite,
            command: args.command,
        })
    }
}
