use proptest::prelude::*;

use reps::ranker::{top_k, top_k_scored};

proptest! {
    #[test]
    fn pt_top_k_matches_full_sort(
        scores in prop::collection::vec(-1_000_i32..1_000, 0..200),
        k in 0_usize..30,
    ) {
        let picked = top_k_scored(scores.iter().copied(), k, |s| *s as f64);

        let mut sorted = scores.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.truncate(k);

        let picked_scores: Vec<i32> = picked.iter().map(|h| h.value).collect();
        prop_assert_eq!(picked_scores, sorted);
        prop_assert!(picked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn pt_top_k_never_exceeds_k_or_input(
        values in prop::collection::vec(any::<u16>(), 0..100),
        k in 0_usize..150,
    ) {
        let picked = top_k(values.iter().copied(), k, |v| f64::from(*v));
        prop_assert_eq!(picked.len(), k.min(values.len()));
    }
}
