use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::LogDestination;

#[derive(Debug, Parser)]
#[command(name = "playlist-viewer", about = "Browse and watch YouTube playlists")]
pub struct Cli {
    /// Directory holding the persisted state and the log file.
    #[arg(
        long,
        env = "PLAYLIST_VIEWER_DATA_DIR",
        default_value = ".playlist_viewer",
        global = true
    )]
    pub data_dir: PathBuf,

    /// Catalog API base URL.
    #[arg(
        long,
        env = "PLAYLIST_VIEWER_API_BASE",
        default_value = playlist_engine::DEFAULT_API_BASE,
        global = true
    )]
    pub api_base: String,

    /// Per-request timeout for catalog calls.
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    #[arg(long, value_enum, default_value_t = LogDestination::File, global = true)]
    pub log_to: LogDestination,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Save the YouTube Data API key.
    SetKey { key: String },
    /// Load a playlist from its URL and add it to the library.
    Add { url: String },
    /// Show the library: favorites, recently watched, then everything else.
    List,
    /// Make a playlist the active one.
    Select { id: String },
    /// Remove a playlist from the library.
    Remove { id: String },
    /// Toggle the favorite marker on a playlist.
    Favorite { id: String },
    /// Record the watch position (zero-based video index) in a playlist.
    Progress { id: String, index: usize },
    /// Open a playlist and show how to play a video (defaults to where you left off).
    Watch { id: String, index: Option<usize> },
}
