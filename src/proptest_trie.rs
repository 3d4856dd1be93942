use super::*;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn dictionary(min_words: usize, max_words: usize) -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-z]{3,9}".prop_map(String::from), min_words..max_words)
}

/// Lowercase words where every q is followed by u.
fn boggle_words(min_words: usize, max_words: usize) -> impl Strategy<Value = Vec<String>> {
    dictionary(min_words, max_words).prop_map(|words| {
        words
            .into_iter()
            .map(|w| w.replace('q', "qu"))
            .filter(|w| is_boggle_word(w))
            .collect()
    })
}

fn bucket_board() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        proptest::sample::subsequence(
            vec!['a', 'e', 'i', 'l', 'n', 'o', 'r', 's', 't'],
            1..=3,
        ),
        9,
    )
    .prop_map(|cells| {
        cells
            .into_iter()
            .map(|c| c.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join(" ")
    })
}

proptest! {
    #[test]
    fn test_inserted_words_are_found(words in dictionary(1, 40), probes in dictionary(0, 40)) {
        let mut trie = Trie::new();
        for w in &words {
            trie.add_word(w).unwrap();
        }
        let stored: BTreeSet<&str> = words.iter().map(String::as_str).collect();

        for w in &words {
            prop_assert!(trie.is_word(w));
        }
        for p in &probes {
            // qu and q spell the same path
            let canonical = |s: &str| s.replace("qu", "q");
            let expected = stored.iter().any(|s| canonical(s) == canonical(p));
            prop_assert_eq!(trie.is_word(p), expected);
        }
    }

    #[test]
    fn test_prefixes_of_single_word(word in "[a-p]{3,12}") {
        let mut trie = Trie::new();
        trie.add_word(&word).unwrap();
        for end in 0..word.len() {
            prop_assert!(!trie.is_word(&word[..end]));
        }
        prop_assert!(trie.is_word(&word));
    }

    #[test]
    fn test_compact_preserves_words(words in boggle_words(0, 60)) {
        let trie = Trie::from_words(&words);
        let dfs = CompactTrie::build(&trie, NodeArena::new()).unwrap();
        let bfs = CompactTrie::build_bfs(&trie, NodeArena::new()).unwrap();

        prop_assert_eq!(dfs.size(), trie.size());
        prop_assert_eq!(bfs.size(), trie.size());
        for w in &words {
            prop_assert!(dfs.is_word(w));
            prop_assert!(bfs.is_word(w));
        }
        prop_assert_eq!(dfs.words(), bfs.words());
        prop_assert_eq!(bfs.memory_usage(), bfs.arena().bytes_used());
    }

    #[test]
    fn test_bound_is_min_of_details(words in boggle_words(1, 60), board in bucket_board()) {
        let trie = Trie::from_words(&words);
        let mut bb = BucketBoggler::new(&trie, BoardSize::default());
        bb.parse_board(&board).unwrap();

        let bound = bb.simple_upper_bound();
        let details = *bb.details();
        prop_assert_eq!(bound, details.sum_union.min(details.max_nomark));
    }

    #[test]
    fn test_tree_prune_and_force(words in boggle_words(1, 60), board in bucket_board()) {
        let trie = Trie::from_words(&words);
        let mut bb = BucketBoggler::new(&trie, BoardSize::default());
        bb.set_build_tree(true);
        bb.parse_board(&board).unwrap();
        bb.simple_upper_bound();
        let max_nomark = bb.details().max_nomark;

        let mut tree = bb.take_tree().unwrap();
        let unpruned = tree.recompute_score();
        prop_assert_eq!(unpruned, max_nomark);

        tree.prune();
        let pruned_nodes = tree.node_count();
        prop_assert!(tree.recompute_score() <= unpruned);
        tree.prune();
        prop_assert_eq!(tree.node_count(), pruned_nodes);

        let bare = tree.clone();
        tree.attach_possibilities();
        for (cell, letter) in tree.possibilities().iter() {
            let forced = tree.score_with_force(cell, letter).unwrap();
            prop_assert!(forced <= unpruned);
            prop_assert_eq!(forced, bare.score_with_force(cell, letter).unwrap());
        }
    }

    #[test]
    fn test_num_reps(board in bucket_board()) {
        let mut bb = BucketBoard::new(BoardSize::default());
        bb.parse(&board).unwrap();
        let expected: u64 = board.split_whitespace().map(|c| c.len() as u64).product();
        prop_assert_eq!(bb.num_reps(), expected);
    }
}
