//! # Top-K Ranker
//!
//! Selects the `k` highest-scoring candidates without sorting all of them. A
//! min-heap of capacity `k` holds the best seen so far with the weakest at the
//! root, so most candidates are rejected with a single comparison.
//!
//! Scores are `f64`, which has no total order, so the heap is a small
//! hand-rolled array heap comparing with `<` rather than `std`'s
//! `BinaryHeap`. Ties keep whichever candidate arrived first; callers that
//! need a stable order should feed candidates pre-sorted by a secondary key.

/// A candidate paired with its score while it sits in the heap.
#[derive(Debug, Clone)]
pub struct HeapItem<T> {
    pub score: f64,
    pub value: T,
}

struct MinHeap<T> {
    slots: Vec<HeapItem<T>>,
}

impl<T> MinHeap<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn min_score(&self) -> Option<f64> {
        self.slots.first().map(|item| item.score)
    }

    fn push(&mut self, item: HeapItem<T>) {
        self.slots.push(item);
        self.sift_up(self.slots.len() - 1);
    }

    fn replace_min(&mut self, item: HeapItem<T>) {
        self.slots[0] = item;
        self.sift_down(0);
    }

    fn pop_min(&mut self) -> Option<HeapItem<T>> {
        if self.slots.is_empty() {
            return None;
        }
        let last = self.slots.len() - 1;
        self.slots.swap(0, last);
        let min = self.slots.pop();
        self.sift_down(0);
        min
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.slots[pos].score < self.slots[parent].score {
                self.slots.swap(pos, parent);
                pos = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.slots.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut smallest = pos;
            if left < len && self.slots[left].score < self.slots[smallest].score {
                smallest = left;
            }
            if right < len && self.slots[right].score < self.slots[smallest].score {
                smallest = right;
            }
            if smallest == pos {
                break;
            }
            self.slots.swap(pos, smallest);
            pos = smallest;
        }
    }
}

/// The `k` highest-scoring candidates, best first, each with its score.
///
/// Runs in O(n log k). NaN scores never enter a full heap.
pub fn top_k_scored<T, I, F>(candidates: I, k: usize, mut score: F) -> Vec<HeapItem<T>>
where
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> f64,
{
    if k == 0 {
        return Vec::new();
    }

    let mut heap = MinHeap::with_capacity(k);
    for value in candidates {
        let score = score(&value);
        if heap.len() < k {
            heap.push(HeapItem { score, value });
        } else if heap.min_score().is_some_and(|min| score > min) {
            heap.replace_min(HeapItem { score, value });
        }
    }

    let mut ranked = Vec::with_capacity(heap.len());
    while let Some(item) = heap.pop_min() {
        ranked.push(item);
    }
    ranked.reverse();
    ranked
}

/// The `k` highest-scoring candidates, best first.
pub fn top_k<T, I, F>(candidates: I, k: usize, score: F) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> f64,
{
    top_k_scored(candidates, k, score)
        .into_iter()
        .map(|item| item.value)
        .collect()
}
