use clap::{Parser, Subcommand};
use reps::api::SearchField;
use reps::model::{Familiarity, Importance};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "reps", bin_name = "reps", version)]
#[command(about = "Spaced-repetition tracker for coding practice problems", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (default: $REPS_HOME, then the platform data directory)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Track a problem, or record a review of one already tracked
    #[command(visible_alias = "review")]
    Add {
        /// Problem url
        url: String,

        /// How well you knew it: very-hard, hard, medium, easy, very-easy (or 1-5)
        #[arg(short, long)]
        familiarity: Familiarity,

        /// How much it matters: low, medium, high, critical (or 1-4)
        #[arg(short, long)]
        importance: Importance,

        /// Free-text note; replaces the stored note when given
        #[arg(short, long, default_value = "")]
        note: String,
    },

    /// Stop tracking a problem
    #[command(visible_alias = "rm")]
    Delete {
        /// Id or exact url
        target: String,
    },

    /// Revert the most recent add, review or delete
    Undo,

    /// Find problems by word prefixes in their url or note
    Search {
        /// Words to match; every word must match
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Where to look: url, note or any
        #[arg(long, default_value = "any")]
        field: SearchField,
    },

    /// The most urgent problems
    #[command(visible_alias = "ls")]
    Top {
        /// How many to show (default: the top_k setting)
        #[arg(short)]
        k: Option<usize>,
    },

    /// The single most urgent problem
    Next,

    /// Details of one problem
    Show {
        /// Id or exact url
        target: String,
    },

    /// Counts, due problems and the most urgent ones
    Summary,

    /// Get or set configuration
    Config {
        /// Configuration key
        key: Option<String>,

        /// Value to set
        value: Option<String>,
    },
}
