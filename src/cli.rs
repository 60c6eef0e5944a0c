use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::api::Feed;

#[derive(Parser, Debug)]
#[command(name = "hn-term")]
#[command(about = "A terminal reader for Hacker News stories and comment threads", long_about = None)]
pub struct Cli {
    /// Custom config directory (default: ~/.config/hn-term)
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Enable verbose logging (prints log path, sets DEBUG level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Feed to open on startup: top, new, show, ask, jobs or saved
    #[arg(short, long, default_value = "top")]
    pub feed: Feed,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage saved stories
    Saved(SavedArgs),
}

#[derive(Args, Debug)]
pub struct SavedArgs {
    #[command(subcommand)]
    pub command: SavedCommands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SavedCommands {
    /// List saved stories, newest first
    List,
    /// Remove a story from the saved list
    Remove {
        /// Story id
        id: u64,
    },
}
