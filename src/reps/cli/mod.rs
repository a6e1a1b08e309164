//! # CLI Behavior
//!
//! This is **one possible UI client** for reps. It owns terminal I/O, exit
//! codes and formatting; everything else lives in the library.
//!
//! ## Everyday Use
//!
//! - `reps add <url> -f <familiarity> -i <importance> [-n <note>]` tracks a new
//!   problem. Running it again for the same url (or `reps review ...`) records
//!   a review graded by `-f`.
//! - `reps` with no arguments lists the most urgent problems, like `reps top`.
//! - `reps next` shows the single problem to practice now.
//! - `reps undo` reverts the last add, review or delete.
//!
//! Ratings accept names or ordinals: familiarity `very-hard`..`very-easy`
//! (1-5), importance `low`..`critical` (1-4).
//!
//! ## Data Directory
//!
//! `--data-dir`, else `$REPS_HOME`, else the platform data directory. It holds
//! `items.json`, `deltas.json` and `config.json`.
//!
//! ## Module Structure
//!
//! - `commands`: Context setup and per-command handlers
//! - `print`: Output formatting (lists, details, summary, messages)
//! - `setup`: Argument parsing via clap

mod commands;
mod print;
mod setup;

pub use commands::run;
