// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Path to configuration file (optional)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List notes with ID, name and first line of the description
    List {
        /// Output notes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render the board as a page and open it in the browser
    View,

    /// Create a note, optionally attaching an image
    Create {
        /// Note name, also the storage key of its image
        #[arg(short, long)]
        name: String,

        /// Note description
        #[arg(short, long)]
        description: String,

        /// Image file to attach
        #[arg(short, long, value_name = "FILE")]
        image: Option<PathBuf>,
    },

    /// Delete a note and its image
    Delete {
        /// Note ID to delete
        #[arg(value_name = "NOTE_ID")]
        note_id: String,
    },

    /// Store a session token issued by the identity provider
    Login {
        #[arg(long)]
        token: String,

        #[arg(long)]
        username: Option<String>,
    },

    /// Sign out, forgetting the stored session
    Logout,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
