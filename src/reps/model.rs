use crate::error::{RepsError, Result};
use crate::tokenize::unique_tokens;
use crate::trie::{Trie, DEFAULT_MIN_PREFIX_LEN};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// How well a problem was recalled, from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Familiarity {
    VeryHard,
    Hard,
    Medium,
    Easy,
    VeryEasy,
}

impl Familiarity {
    pub const ALL: [Familiarity; 5] = [
        Familiarity::VeryHard,
        Familiarity::Hard,
        Familiarity::Medium,
        Familiarity::Easy,
        Familiarity::VeryEasy,
    ];

    /// Zero-based position, usable as a lookup-table index.
    pub fn rank(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Familiarity::VeryHard => "very-hard",
            Familiarity::Hard => "hard",
            Familiarity::Medium => "medium",
            Familiarity::Easy => "easy",
            Familiarity::VeryEasy => "very-easy",
        }
    }
}

/// How much it matters to keep a problem fresh, from least to most.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Low,
    Medium,
    High,
    Critical,
}

impl Importance {
    pub const ALL: [Importance; 4] = [
        Importance::Low,
        Importance::Medium,
        Importance::High,
        Importance::Critical,
    ];

    pub fn rank(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Importance::Low => "low",
            Importance::Medium => "medium",
            Importance::High => "high",
            Importance::Critical => "critical",
        }
    }
}

fn normalize_label(s: &str) -> String {
    s.trim().to_lowercase().replace(|c: char| c == '_' || c == ' ', "-")
}

/// Accepts a name (`very-hard`, `VeryHard`, `very_hard`) or a 1-based ordinal.
impl FromStr for Familiarity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let label = normalize_label(s);
        if let Ok(n) = label.parse::<usize>() {
            return n
                .checked_sub(1)
                .and_then(|i| Familiarity::ALL.get(i).copied())
                .ok_or_else(|| format!("familiarity must be between 1 and 5, got {}", n));
        }
        Familiarity::ALL
            .into_iter()
            .find(|f| f.name() == label || f.name().replace('-', "") == label)
            .ok_or_else(|| format!("unknown familiarity: {}", s))
    }
}

impl FromStr for Importance {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let label = normalize_label(s);
        if let Ok(n) = label.parse::<usize>() {
            return n
                .checked_sub(1)
                .and_then(|i| Importance::ALL.get(i).copied())
                .ok_or_else(|| format!("importance must be between 1 and 4, got {}", n));
        }
        Importance::ALL
            .into_iter()
            .find(|i| i.name() == label)
            .ok_or_else(|| format!("unknown importance: {}", s))
    }
}

impl fmt::Display for Familiarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One tracked practice problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub id: u64,
    pub url: String,
    pub note: String,
    pub familiarity: Familiarity,
    pub importance: Importance,
    pub ease_factor: f64,
    pub review_count: u32,
    pub last_reviewed: NaiveDate,
    pub next_review: NaiveDate,
    pub created_at: NaiveDate,
}

impl ReviewItem {
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_review <= today
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.next_review < today
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaAction {
    Add,
    Update,
    Delete,
}

/// A reversible record of one committed mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    pub action: DeltaAction,
    #[serde(rename = "question_id")]
    pub item_id: u64,
    pub old_state: Option<ReviewItem>,
    pub new_state: Option<ReviewItem>,
    pub created_at: DateTime<Utc>,
}

impl Delta {
    pub fn add(item: ReviewItem, at: DateTime<Utc>) -> Self {
        Self {
            action: DeltaAction::Add,
            item_id: item.id,
            old_state: None,
            new_state: Some(item),
            created_at: at,
        }
    }

    pub fn update(old: ReviewItem, new: ReviewItem, at: DateTime<Utc>) -> Self {
        Self {
            action: DeltaAction::Update,
            item_id: new.id,
            old_state: Some(old),
            new_state: Some(new),
            created_at: at,
        }
    }

    pub fn delete(old: ReviewItem, at: DateTime<Utc>) -> Self {
        Self {
            action: DeltaAction::Delete,
            item_id: old.id,
            old_state: Some(old),
            new_state: None,
            created_at: at,
        }
    }
}

/// How a caller names an item: by id, or by its exact url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    Id(u64),
    Url(String),
}

impl FromStr for ItemRef {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty item reference".to_string());
        }
        match s.parse::<u64>() {
            Ok(id) => Ok(ItemRef::Id(id)),
            Err(_) => Ok(ItemRef::Url(s.to_string())),
        }
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemRef::Id(id) => write!(f, "#{}", id),
            ItemRef::Url(url) => f.write_str(url),
        }
    }
}

/// The authoritative item collection and its indexes.
///
/// `url_index` and the two tries are derived from `items`; only the first is
/// persisted, the tries are rebuilt after every load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemStore {
    pub max_id: u64,
    #[serde(rename = "questions")]
    items: BTreeMap<u64, ReviewItem>,
    url_index: HashMap<String, u64>,
    #[serde(skip)]
    url_trie: Trie,
    #[serde(skip)]
    note_trie: Trie,
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_PREFIX_LEN)
    }
}

impl ItemStore {
    pub fn new(min_prefix_len: usize) -> Self {
        Self {
            max_id: 0,
            items: BTreeMap::new(),
            url_index: HashMap::new(),
            url_trie: Trie::new(min_prefix_len),
            note_trie: Trie::new(min_prefix_len),
        }
    }

    /// Rebuilds the tries from `items` and checks the url index against them.
    pub fn rebuild_search_index(&mut self, min_prefix_len: usize) -> Result<()> {
        self.url_trie = Trie::new(min_prefix_len);
        self.note_trie = Trie::new(min_prefix_len);

        for (id, item) in &self.items {
            if item.id != *id {
                return Err(RepsError::Store(format!(
                    "item stored under id {} claims id {}",
                    id, item.id
                )));
            }
            if self.url_index.get(&item.url) != Some(id) {
                return Err(RepsError::Store(format!(
                    "url index does not point {} at item {}",
                    item.url, id
                )));
            }
        }
        if let Some(&highest) = self.items.keys().next_back() {
            if self.max_id < highest {
                return Err(RepsError::Store(format!(
                    "max_id {} is below existing item id {}",
                    self.max_id, highest
                )));
            }
        }
        if self.url_index.len() != self.items.len() {
            return Err(RepsError::Store(format!(
                "url index has {} entries for {} items",
                self.url_index.len(),
                self.items.len()
            )));
        }

        let items: Vec<ReviewItem> = self.items.values().cloned().collect();
        for item in &items {
            self.index_text(item);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&ReviewItem> {
        self.items.get(&id)
    }

    pub fn id_for_url(&self, url: &str) -> Option<u64> {
        self.url_index.get(url).copied()
    }

    pub fn get_by_url(&self, url: &str) -> Option<&ReviewItem> {
        self.id_for_url(url).and_then(|id| self.items.get(&id))
    }

    pub fn resolve(&self, target: &ItemRef) -> Option<&ReviewItem> {
        match target {
            ItemRef::Id(id) => self.get(*id),
            ItemRef::Url(url) => self.get_by_url(url),
        }
    }

    /// Items in ascending id order.
    pub fn items(&self) -> impl Iterator<Item = &ReviewItem> {
        self.items.values()
    }

    pub fn next_id(&self) -> u64 {
        self.max_id + 1
    }

    /// Inserts or replaces an item, keeping the url index and tries in step.
    /// `max_id` only ever grows.
    pub fn put(&mut self, item: ReviewItem) {
        if let Some(previous) = self.items.remove(&item.id) {
            self.unindex(&previous);
        }
        self.max_id = self.max_id.max(item.id);
        self.url_index.insert(item.url.clone(), item.id);
        self.index_text(&item);
        self.items.insert(item.id, item);
    }

    /// Removes an item and every index entry pointing at it. `max_id` is kept.
    pub fn remove(&mut self, id: u64) -> Option<ReviewItem> {
        let item = self.items.remove(&id)?;
        self.unindex(&item);
        Some(item)
    }

    pub fn url_trie(&self) -> &Trie {
        &self.url_trie
    }

    pub fn note_trie(&self) -> &Trie {
        &self.note_trie
    }

    fn index_text(&mut self, item: &ReviewItem) {
        for token in unique_tokens(&item.url) {
            self.url_trie.insert(&token, item.id);
        }
        for token in unique_tokens(&item.note) {
            self.note_trie.insert(&token, item.id);
        }
    }

    fn unindex(&mut self, item: &ReviewItem) {
        if self.url_index.get(&item.url) == Some(&item.id) {
            self.url_index.remove(&item.url);
        }
        for token in unique_tokens(&item.url) {
            self.url_trie.delete(&token, item.id);
        }
        for token in unique_tokens(&item.note) {
            self.note_trie.delete(&token, item.id);
        }
    }
}
