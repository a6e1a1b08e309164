use super::{CmdMessage, CmdResult, RankedItem};
use crate::error::Result;
use crate::model::ItemStore;
use crate::ranker::top_k_scored;
use crate::scheduler::Scheduler;
use crate::store::{ReviewStore, StorageBackend};
use crate::tokenize::unique_tokens;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Which indexed text a query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchField {
    Url,
    Note,
    #[default]
    Any,
}

impl FromStr for SearchField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "url" => Ok(SearchField::Url),
            "note" => Ok(SearchField::Note),
            "any" | "all" => Ok(SearchField::Any),
            other => Err(format!("unknown search field: {} (url, note, any)", other)),
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SearchField::Url => "url",
            SearchField::Note => "note",
            SearchField::Any => "any",
        })
    }
}

/// Items matching every query token as a prefix, most urgent first.
pub fn run<B: StorageBackend>(
    store: &ReviewStore<B>,
    scheduler: &Scheduler,
    query: &str,
    field: SearchField,
    limit: usize,
) -> Result<CmdResult> {
    let items = store.load_store()?;
    let hits = matching_ids(&items, query, field);
    debug!(query, %field, hits = hits.len(), "search");

    let today = scheduler.today();
    let candidates = hits.iter().filter_map(|id| items.get(*id));
    let ranked: Vec<RankedItem> = top_k_scored(candidates, limit, |item| {
        crate::scheduler::priority_score(item, today)
    })
    .into_iter()
    .map(|hit| RankedItem {
        item: hit.value.clone(),
        score: hit.score,
    })
    .collect();

    let mut result = CmdResult::default();
    if ranked.is_empty() {
        result.add_message(CmdMessage::info(format!("No matches for \"{}\"", query)));
    }
    Ok(result.with_listed_items(ranked))
}

/// Ids whose `field` text has a token starting with each query token.
///
/// Tokens below the index's minimum prefix length are dropped as long as one
/// usable token remains.
pub fn matching_ids(items: &ItemStore, query: &str, field: SearchField) -> BTreeSet<u64> {
    let min_len = items.url_trie().min_prefix_len();
    let tokens = unique_tokens(query);
    let (usable, short): (Vec<String>, Vec<String>) = tokens
        .into_iter()
        .partition(|t| t.chars().count() >= min_len);

    if usable.is_empty() {
        if !short.is_empty() {
            warn!(min_len, "every query token is shorter than the minimum prefix");
        }
        return BTreeSet::new();
    }
    if !short.is_empty() {
        debug!(skipped = ?short, "ignoring short query tokens");
    }

    let mut result: Option<BTreeSet<u64>> = None;
    for token in &usable {
        let ids = match field {
            SearchField::Url => items.url_trie().search_prefix(token),
            SearchField::Note => items.note_trie().search_prefix(token),
            SearchField::Any => {
                let mut ids = items.url_trie().search_prefix(token);
                ids.extend(items.note_trie().search_prefix(token));
                ids
            }
        };
        let narrowed = match result {
            Some(acc) => acc.intersection(&ids).copied().collect(),
            None => ids,
        };
        if narrowed.is_empty() {
            return narrowed;
        }
        result = Some(narrowed);
    }
    result.unwrap_or_default()
}
