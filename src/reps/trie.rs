//! # Prefix Index
//!
//! A character trie mapping token prefixes to the ids of the items whose tokens
//! pass through them. Every node carries the ids of all tokens below it, so a
//! prefix lookup is a single walk with no subtree traversal.
//!
//! Ids are reference counted per node: an item indexed under both `hello` and
//! `help` passes through `h`, `he` and `hel` twice, and removing `hello` must
//! not drop it from `hel`. A node whose count map becomes empty has no live
//! token at or below it, so removal cuts the whole subtree off at the first
//! such node. That is the bottom-up cascade of "no children and not a
//! terminus" pruning, done in one downward pass without recursion.

use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_MIN_PREFIX_LEN: usize = 3;

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    /// id -> number of indexed tokens of that id passing through this node.
    ids: BTreeMap<u64, usize>,
    /// Ids for which this node completes a token.
    ends: BTreeSet<u64>,
}

impl TrieNode {
    fn count_nodes(&self) -> usize {
        let mut total = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            total += 1;
            stack.extend(node.children.values());
        }
        total
    }
}

impl Drop for TrieNode {
    fn drop(&mut self) {
        let mut stack: Vec<TrieNode> = std::mem::take(&mut self.children).into_values().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(std::mem::take(&mut node.children).into_values());
        }
    }
}

#[derive(Debug, Clone)]
pub struct Trie {
    root: TrieNode,
    min_prefix_len: usize,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_PREFIX_LEN)
    }
}

impl Trie {
    pub fn new(min_prefix_len: usize) -> Self {
        Self {
            root: TrieNode::default(),
            min_prefix_len,
        }
    }

    pub fn min_prefix_len(&self) -> usize {
        self.min_prefix_len
    }

    fn find(&self, token: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        for c in token.chars() {
            node = node.children.get(&c)?;
        }
        Some(node)
    }

    /// Whether `token` is indexed for `id` as a complete token.
    pub fn contains(&self, token: &str, id: u64) -> bool {
        self.find(token).is_some_and(|node| node.ends.contains(&id))
    }

    /// Indexes `token` for `id`. Returns `false` if the pair was already present.
    pub fn insert(&mut self, token: &str, id: u64) -> bool {
        if token.is_empty() || self.contains(token, id) {
            return false;
        }

        let mut node = &mut self.root;
        for c in token.chars() {
            node = node.children.entry(c).or_default();
            *node.ids.entry(id).or_insert(0) += 1;
        }
        node.ends.insert(id);
        true
    }

    /// Ids of every token starting with `prefix`.
    ///
    /// Prefixes shorter than the configured minimum match nothing.
    pub fn search_prefix(&self, prefix: &str) -> BTreeSet<u64> {
        if prefix.chars().count() < self.min_prefix_len {
            return BTreeSet::new();
        }
        match self.find(prefix) {
            Some(node) => node.ids.keys().copied().collect(),
            None => BTreeSet::new(),
        }
    }

    /// Removes `token` for `id`, pruning nodes no other token needs.
    /// Returns `false` if the pair was not indexed.
    pub fn delete(&mut self, token: &str, id: u64) -> bool {
        if !self.contains(token, id) {
            return false;
        }

        let chars: Vec<char> = token.chars().collect();
        let last = chars.len() - 1;
        let mut node = &mut self.root;

        for (depth, c) in chars.iter().enumerate() {
            let emptied = match node.children.get_mut(c) {
                Some(child) => {
                    release(&mut child.ids, id);
                    if depth == last {
                        child.ends.remove(&id);
                    }
                    child.ids.is_empty()
                }
                None => return false,
            };

            if emptied {
                node.children.remove(c);
                return true;
            }

            node = match node.children.get_mut(c) {
                Some(child) => child,
                None => return false,
            };
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.root.count_nodes()
    }
}

fn release(ids: &mut BTreeMap<u64, usize>, id: u64) {
    if let Some(count) = ids.get_mut(&id) {
        *count -= 1;
        if *count == 0 {
            ids.remove(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[u64]) -> BTreeSet<u64> {
        values.iter().copied().collect()
    }

    #[test]
    fn shared_token_collects_both_ids() {
        let mut trie = Trie::default();
        trie.insert("hello", 1);
        trie.insert("hello", 2);

        assert_eq!(trie.search_prefix("hel"), ids(&[1, 2]));

        trie.delete("hello", 1);
        assert_eq!(trie.search_prefix("hel"), ids(&[2]));

        trie.delete("hello", 2);
        assert!(trie.search_prefix("hel").is_empty());
        assert!(trie.is_empty());
        assert_eq!(trie.node_count(), 1);
    }

    #[test]
    fn short_prefixes_match_nothing() {
        let mut trie = Trie::new(3);
        trie.insert("graph", 4);
        assert!(trie.search_prefix("").is_empty());
        assert!(trie.search_prefix("g").is_empty());
        assert!(trie.search_prefix("gr").is_empty());
        assert_eq!(trie.search_prefix("gra"), ids(&[4]));
    }

    #[test]
    fn minimum_is_configurable() {
        let mut trie = Trie::new(1);
        trie.insert("dp", 9);
        assert_eq!(trie.search_prefix("d"), ids(&[9]));
    }

    #[test]
    fn missing_path_is_empty() {
        let mut trie = Trie::default();
        trie.insert("tree", 1);
        assert!(trie.search_prefix("trie").is_empty());
        assert!(trie.search_prefix("treehouse").is_empty());
    }

    #[test]
    fn full_token_is_its_own_prefix() {
        let mut trie = Trie::default();
        trie.insert("heap", 3);
        assert_eq!(trie.search_prefix("heap"), ids(&[3]));
    }

    #[test]
    fn delete_keeps_overlapping_tokens_of_same_id() {
        let mut trie = Trie::default();
        trie.insert("hello", 1);
        trie.insert("help", 1);

        assert!(trie.delete("hello", 1));
        assert_eq!(trie.search_prefix("hel"), ids(&[1]));
        assert_eq!(trie.search_prefix("help"), ids(&[1]));
        assert!(trie.search_prefix("hell").is_empty());
        // root + h, e, l, p
        assert_eq!(trie.node_count(), 5);
    }

    #[test]
    fn delete_keeps_terminus_that_is_a_prefix_of_another_token() {
        let mut trie = Trie::default();
        trie.insert("sum", 1);
        trie.insert("summary", 2);

        trie.delete("summary", 2);
        assert_eq!(trie.search_prefix("sum"), ids(&[1]));
        assert!(trie.contains("sum", 1));
        assert_eq!(trie.node_count(), 4);

        trie.delete("sum", 1);
        assert!(trie.is_empty());
    }

    #[test]
    fn delete_of_unknown_pair_is_a_noop() {
        let mut trie = Trie::default();
        trie.insert("stack", 1);
        assert!(!trie.delete("stack", 2));
        assert!(!trie.delete("sta", 1));
        assert!(!trie.delete("queue", 1));
        assert_eq!(trie.search_prefix("sta"), ids(&[1]));
    }

    #[test]
    fn insert_is_idempotent() {
        let mut trie = Trie::default();
        assert!(trie.insert("matrix", 5));
        assert!(!trie.insert("matrix", 5));
        trie.delete("matrix", 5);
        assert!(trie.is_empty());
    }

    #[test]
    fn long_tokens_prune_without_recursion() {
        let token: String = std::iter::repeat('a').take(10_000).collect();
        let mut trie = Trie::default();
        trie.insert(&token, 1);
        assert_eq!(trie.node_count(), 10_001);
        trie.delete(&token, 1);
        assert_eq!(trie.node_count(), 1);
    }
}
