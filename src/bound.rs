//! Upper bounds on the best score of any board a bucket board represents.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{BoardSize, BucketBoard};
use crate::breaking::{BreakingNode, BreakingTree, NodeKind, Possibilities};
use crate::compact::PackedCursor;
use crate::error::Result;
use crate::letters::{letter_width, word_score};
use crate::trie::Trie;

/// Read access to a trie node, shared by [`Trie`] and
/// [`CompactTrie`](crate::CompactTrie).
pub trait TrieCursor: Copy {
    fn ends_word(&self) -> bool;

    fn descend(&self, letter: u8) -> Option<Self>;

    /// Identity of the node, unique within one trie.
    fn key(&self) -> usize;
}

impl<'a> TrieCursor for &'a Trie {
    #[inline(always)]
    fn ends_word(&self) -> bool {
        Trie::ends_word(self)
    }

    #[inline(always)]
    fn descend(&self, letter: u8) -> Option<&'a Trie> {
        Trie::descend(*self, letter)
    }

    #[inline(always)]
    fn key(&self) -> usize {
        *self as *const Trie as usize
    }
}

impl<'a> TrieCursor for PackedCursor<'a> {
    #[inline(always)]
    fn ends_word(&self) -> bool {
        PackedCursor::ends_word(self)
    }

    #[inline(always)]
    fn descend(&self, letter: u8) -> Option<PackedCursor<'a>> {
        PackedCursor::descend(self, letter)
    }

    #[inline(always)]
    fn key(&self) -> usize {
        self.idx().index()
    }
}

/// The two relaxed bounds behind [`BucketBoggler::upper_bound`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDetails {
    /// Per cell the best candidate letter, words counted once per path.
    pub max_nomark: u32,
    /// Every distinct word reachable with any candidate letters, counted once.
    pub sum_union: u32,
}

impl ScoreDetails {
    pub fn bound(&self) -> u32 {
        self.max_nomark.min(self.sum_union)
    }
}

/// Bound engine for one bucket board against one dictionary.
///
/// # Examples
///
/// ```
/// use bucket_boggle::{BoardSize, BucketBoggler, Trie};
///
/// let trie = Trie::from_words(["sea", "seat", "seats", "tea", "teas"]);
/// let mut bb = BucketBoggler::new(&trie, BoardSize::default());
/// bb.parse_board("st z z e a s z z z").unwrap();
///
/// assert_eq!(bb.simple_upper_bound(), 2);
/// assert_eq!(bb.details().sum_union, 3);
/// assert_eq!(bb.details().max_nomark, 2);
/// ```
pub struct BucketBoggler<C> {
    root: C,
    board: BucketBoard,
    details: ScoreDetails,
    build_tree: bool,
    tree: Option<BreakingTree>,
    // letters of each cell, snapshotted per run
    letters: Vec<Vec<u8>>,
    used: u64,
    found: HashSet<usize>,
}

impl<C: TrieCursor> BucketBoggler<C> {
    pub fn new(root: C, size: BoardSize) -> Self {
        BucketBoggler {
            root,
            board: BucketBoard::new(size),
            details: ScoreDetails::default(),
            build_tree: false,
            tree: None,
            letters: Vec::new(),
            used: 0,
            found: HashSet::new(),
        }
    }

    pub fn parse_board(&mut self, text: &str) -> Result<()> {
        self.board.parse(text)
    }

    pub fn board(&self) -> &BucketBoard {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut BucketBoard {
        &mut self.board
    }

    pub fn cell(&self, i: usize) -> &str {
        self.board.cell(i)
    }

    pub fn cell_mut(&mut self, i: usize) -> &mut String {
        self.board.cell_mut(i)
    }

    pub fn num_reps(&self) -> u64 {
        self.board.num_reps()
    }

    pub fn details(&self) -> &ScoreDetails {
        &self.details
    }

    /// Build a [`BreakingTree`] on the next bound computation.
    pub fn set_build_tree(&mut self, build_tree: bool) {
        self.build_tree = build_tree;
    }

    pub fn tree(&self) -> Option<&BreakingTree> {
        self.tree.as_ref()
    }

    pub fn tree_mut(&mut self) -> Option<&mut BreakingTree> {
        self.tree.as_mut()
    }

    pub fn take_tree(&mut self) -> Option<BreakingTree> {
        self.tree.take()
    }

    pub fn possibilities(&self) -> Possibilities {
        Possibilities::from_board(&self.board)
    }

    pub fn num_possibilities(&self) -> usize {
        self.board.cells().map(str::len).sum()
    }

    /// The (cell, letter) pair numbered `i`; see [`Possibilities`].
    pub fn possibility(&self, i: usize) -> Option<(usize, u8)> {
        self.possibilities().get(i)
    }

    /// Attaches possibility masks to the current tree, if any.
    pub fn attach_possibilities(&mut self) -> bool {
        match self.tree.as_mut() {
            Some(tree) => {
                tree.attach_possibilities();
                true
            }
            None => false,
        }
    }

    pub fn simple_upper_bound(&mut self) -> u32 {
        self.upper_bound(u32::MAX)
    }

    /// Computes both bounds and returns the smaller.
    ///
    /// Stops early once both exceed `bailout`; the details then hold the
    /// partial sums reached so far.
    pub fn upper_bound(&mut self, bailout: u32) -> u32 {
        self.details = ScoreDetails::default();
        self.used = 0;
        self.found.clear();
        self.letters = (0..self.board.num_cells())
            .map(|i| self.board.letters(i).collect())
            .collect();

        let mut root = self.build_tree.then(|| BreakingNode::new(NodeKind::Root));
        for cell in 0..self.board.num_cells() {
            let (score, choice) = self.all_descents(cell, 0, self.root);
            self.details.max_nomark = self.details.max_nomark.saturating_add(score);
            if let (Some(root), Some(choice)) = (root.as_mut(), choice) {
                root.bound = root.bound.saturating_add(score);
                root.children.push(choice);
            }
            if self.details.max_nomark > bailout && self.details.sum_union > bailout {
                break;
            }
        }
        self.tree = root.map(|root| BreakingTree::new(root, self.possibilities()));

        debug!(
            board = %self.board,
            max_nomark = self.details.max_nomark,
            sum_union = self.details.sum_union,
            tree_nodes = self.tree.as_ref().map(BreakingTree::node_count),
            "computed bucket bound"
        );
        self.details.bound()
    }

    /// Best score over the candidate letters of `cell`.
    fn all_descents(&mut self, cell: usize, len: usize, node: C) -> (u32, Option<BreakingNode>) {
        let mut choice = self.build_tree.then(|| BreakingNode::new(NodeKind::Choice { cell }));
        let mut max_score = 0;
        for j in 0..self.letters[cell].len() {
            let letter = self.letters[cell][j];
            if let Some(child) = node.descend(letter) {
                let (score, letter_node) = self.dfs(cell, len + letter_width(letter), child, letter);
                max_score = max_score.max(score);
                if let (Some(choice), Some(letter_node)) = (choice.as_mut(), letter_node) {
                    choice.children.push(letter_node);
                }
            }
        }
        match choice {
            Some(mut choice) if !choice.children.is_empty() => {
                choice.bound = max_score;
                (max_score, Some(choice))
            }
            _ => (max_score, None),
        }
    }

    /// Score of the paths extending one chosen letter at `cell`.
    fn dfs(&mut self, cell: usize, len: usize, node: C, letter: u8) -> (u32, Option<BreakingNode>) {
        let mut tree_node = self
            .build_tree
            .then(|| BreakingNode::new(NodeKind::Letter { cell, letter }));
        let mut score: u32 = 0;

        self.used ^= 1 << cell;
        for k in 0..self.board.neighbors(cell).len() {
            let next = self.board.neighbors(cell)[k];
            if self.used & (1 << next) == 0 {
                let (child_score, choice) = self.all_descents(next, len, node);
                score = score.saturating_add(child_score);
                if let (Some(tree_node), Some(choice)) = (tree_node.as_mut(), choice) {
                    tree_node.children.push(choice);
                }
            }
        }

        let mut points = 0;
        if node.ends_word() {
            points = word_score(len);
            score = score.saturating_add(points);
            if self.found.insert(node.key()) {
                self.details.sum_union = self.details.sum_union.saturating_add(points);
            }
        }
        self.used ^= 1 << cell;

        if let Some(tree_node) = tree_node.as_mut() {
            tree_node.points = points;
            tree_node.bound = score;
        }
        (score, tree_node)
    }
}
