//! # Reps Architecture
//!
//! Reps is a **local spaced-repetition engine** for coding practice problems.
//! It tracks problems by url, schedules each one's next review with an
//! adaptive ease factor, ranks what to practice next and finds problems by
//! prefix search over their url and note. The library is UI-agnostic; the
//! `reps` binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs (id or url → ItemRef)                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One transaction per mutating command                     │
//! │  - Scheduler, ranker and tries do the real work             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - ReviewStore: cache, transaction lock, delta log          │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! From `api.rs` inward nothing writes to stdout/stderr or exits the process.
//! Diagnostics go through `tracing`; the binary decides where they end up.
//!
//! ## Time
//!
//! Dates come from a [`clock::Clock`] handed to the scheduler, so tests run on
//! a [`clock::FixedClock`] and never depend on the wall clock.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`store`]: Persistence, caching and the undo log
//! - [`model`]: `ReviewItem`, `Delta`, `ItemStore` and the rating enums
//! - [`scheduler`]: Review intervals, ease factors and priority scores
//! - [`ranker`]: Bounded top-k selection
//! - [`trie`] / [`tokenize`]: Prefix search index
//! - [`clock`]: Time source
//! - [`config`]: Configuration management
//! - [`logging`]: Tracing subscriber setup
//! - [`error`]: Error types

pub mod api;
pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod ranker;
pub mod scheduler;
pub mod store;
pub mod tokenize;
pub mod trie;
