//! # CLI Layer
//!
//! One UI client for reps. The only place in the codebase that knows about
//! stdout/stderr, exit codes and argument parsing.
//!
//! - `run()`: parse, build the context, dispatch
//! - `init_context()`: resolve the data directory, load config, start logging
//! - `handle_*()`: call the API and print the `CmdResult`

use super::print::{print_config, print_item, print_messages, print_ranked, print_summary};
use super::setup::{Cli, Commands};
use clap::Parser;
use directories::ProjectDirs;
use reps::api::{ConfigAction, ReviewApi, SearchField};
use reps::clock::SystemClock;
use reps::config::RepsConfig;
use reps::error::{RepsError, Result};
use reps::logging::init_tracing;
use reps::model::{Familiarity, Importance};
use reps::store::fs_backend::FsBackend;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Overrides the platform data directory.
const HOME_ENV: &str = "REPS_HOME";

struct AppContext {
    api: ReviewApi<FsBackend>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Add {
            url,
            familiarity,
            importance,
            note,
        }) => handle_add(&ctx, url, familiarity, importance, note),
        Some(Commands::Delete { target }) => handle_delete(&ctx, target),
        Some(Commands::Undo) => handle_undo(&ctx),
        Some(Commands::Search { query, field }) => handle_search(&ctx, query, field),
        Some(Commands::Top { k }) => handle_top(&ctx, k),
        Some(Commands::Next) => handle_next(&ctx),
        Some(Commands::Show { target }) => handle_show(&ctx, target),
        Some(Commands::Summary) => handle_summary(&ctx),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_top(&ctx, None),
    }
}

fn data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let dirs = ProjectDirs::from("dev", "reps", "reps")
        .ok_or_else(|| RepsError::Config("could not determine a data directory".to_string()))?;
    Ok(dirs.data_dir().to_path_buf())
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let dir = data_dir(cli)?;
    let config = RepsConfig::load(&dir)?;

    let mut log_config = config.log_config();
    if cli.verbose {
        log_config.log_level = "debug".to_string();
    }
    init_tracing(&log_config);
    debug!(data_dir = %dir.display(), "starting");

    let api = ReviewApi::new(FsBackend::new(&dir), &config, Arc::new(SystemClock))
        .with_config_dir(dir);
    Ok(AppContext { api })
}

fn handle_add(
    ctx: &AppContext,
    url: String,
    familiarity: Familiarity,
    importance: Importance,
    note: String,
) -> Result<()> {
    let result = ctx.api.upsert(&url, &note, familiarity, importance)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &AppContext, target: String) -> Result<()> {
    let result = ctx.api.delete(&target)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_undo(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.undo()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_search(ctx: &AppContext, query: Vec<String>, field: SearchField) -> Result<()> {
    let result = ctx.api.search(&query.join(" "), field)?;
    print_ranked(&result.listed_items, ctx.api.today());
    print_messages(&result.messages);
    Ok(())
}

fn handle_top(ctx: &AppContext, k: Option<usize>) -> Result<()> {
    let result = ctx.api.top(k)?;
    print_ranked(&result.listed_items, ctx.api.today());
    print_messages(&result.messages);
    Ok(())
}

fn handle_next(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.next()?;
    for ranked in &result.listed_items {
        print_item(&ranked.item, ctx.api.today());
    }
    Ok(())
}

fn handle_show(ctx: &AppContext, target: String) -> Result<()> {
    let result = ctx.api.show(&target)?;
    for item in &result.affected_items {
        print_item(item, ctx.api.today());
    }
    Ok(())
}

fn handle_summary(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.summary()?;
    if let Some(summary) = &result.summary {
        print_summary(summary);
    }
    if !result.listed_items.is_empty() {
        println!();
        print_ranked(&result.listed_items, ctx.api.today());
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.configure(action)?;
    if show_all {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}
