use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vsense")]
#[command(version)]
#[command(about = "Save and inspect short-form videos with their engagement metrics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List saved videos, newest first
    List {
        /// Only videos from this platform (youtube, instagram, linkedin)
        #[arg(short, long)]
        platform: Option<String>,

        /// Show at most this many videos
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Export saved videos as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Import videos from a JSON export
    Import { file: String },

    /// Remove a saved video by url
    Remove { url: String },

    /// Remove every saved video
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Show counts per platform
    Stats,

    /// Print the record a saved page fixture would produce
    Inspect {
        fixture: String,

        /// Watch time to record, in seconds
        #[arg(long, default_value_t = 0)]
        watched: u64,
    },

    /// Run a page session against a fixture and press save once
    Save { fixture: String },

    /// Print version information
    Version,

    /// Manage platform adapters
    Platforms {
        #[command(subcommand)]
        action: Option<PlatformAction>,
    },
}

#[derive(Subcommand)]
pub enum PlatformAction {
    /// List platforms and whether they are enabled
    List,
    /// Enable a platform
    Enable { name: String },
    /// Disable a platform
    Disable { name: String },
}
