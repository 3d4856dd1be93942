//! Upper bounds for bucketed Boggle boards.
//!
//! A bucket board holds a set of candidate letters in every cell and so
//! stands for many concrete boards at once. This crate computes cheap upper
//! bounds on the best score any of those boards can reach, so a search can
//! discard whole classes of boards that cannot beat a known record.
//!
//! # Features
//!
//! - Mutable letter [`Trie`] with bucket collapsing
//! - Arena-packed, immutable [`CompactTrie`] for fast shared lookups
//! - [`BucketBoggler`] computing the sum-union and max-no-mark bounds
//! - [`BreakingTree`] for refining a bound by forcing single cells
//!
//! # Examples
//!
//! ```
//! use bucket_boggle::{BoardSize, BucketBoggler, CompactTrie, NodeArena};
//!
//! let dict = CompactTrie::from_words(["sea", "seat", "seats", "tea", "teas"], NodeArena::new())?;
//! let mut bb = BucketBoggler::new(dict.root(), BoardSize::default());
//! bb.parse_board("s e p e a u h t c")?;
//!
//! assert_eq!(bb.simple_upper_bound(), 4);
//! assert_eq!(bb.details().max_nomark, 6);
//! # Ok::<(), bucket_boggle::Error>(())
//! ```

mod arena;
mod bits;
mod board;
mod bound;
mod breaking;
mod compact;
mod error;
mod letters;
mod trie;

pub use arena::{DEFAULT_ARENA_BYTES, NodeArena, NodeIdx};
pub use board::{BoardSize, BucketBoard};
pub use bound::{BucketBoggler, ScoreDetails, TrieCursor};
pub use breaking::{BreakingNode, BreakingTree, NodeKind, Possibilities};
pub use compact::{CompactTrie, MemorySpan, PackedCursor, TrieDump};
pub use error::{Error, Result};
pub use letters::{
    AsLetters, LETTER_Q, Letters, MAX_WORD_LEN, MIN_WORD_LEN, NUM_LETTERS, is_boggle_word,
    letter_char, letter_index, letter_width, word_score,
};
pub use trie::Trie;

#[cfg(test)]
mod proptest_trie;
