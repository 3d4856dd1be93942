//! Branch-and-bound tree over per-cell letter choices.
//!
//! The bound engine builds one of these while it computes the max-no-mark
//! bound. A [`BreakingNode`] is either the root (sums its children), a
//! choice over the letters of one cell (takes the best child), or one
//! chosen letter (its own points plus the sum of its children).

use std::collections::BTreeMap;
use std::ops::Range;

use tracing::trace;

use crate::bits::{any_in_range, set_bit, union_into, words_for};
use crate::board::BucketBoard;
use crate::error::{Error, Result};
use crate::letters::{NUM_LETTERS, letter_char};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Choice { cell: usize },
    Letter { cell: usize, letter: u8 },
}

#[derive(Clone, Debug)]
pub struct BreakingNode {
    pub kind: NodeKind,
    pub children: Vec<BreakingNode>,
    /// Cached bound over this subtree.
    pub bound: u32,
    /// Points scored by words ending at this node.
    pub points: u32,
    /// Possibilities reachable in this subtree, once attached.
    child_possibilities: Option<Box<[u64]>>,
}

impl BreakingNode {
    pub fn new(kind: NodeKind) -> Self {
        BreakingNode {
            kind,
            children: Vec::new(),
            bound: 0,
            points: 0,
            child_possibilities: None,
        }
    }

    /// Rebuilds every cached bound below and including this node.
    pub fn recompute_score(&mut self) -> u32 {
        let child_bounds = self.children.iter_mut().map(BreakingNode::recompute_score);
        self.bound = match self.kind {
            NodeKind::Choice { .. } => child_bounds.max().unwrap_or(0),
            NodeKind::Root | NodeKind::Letter { .. } => {
                child_bounds.fold(self.points, u32::saturating_add)
            }
        };
        self.bound
    }

    /// Drops subtrees with a zero bound. Returns whether this node still
    /// contributes anything.
    fn prune_children(&mut self) -> bool {
        self.children.retain_mut(BreakingNode::prune_children);
        self.bound > 0 || self.points > 0
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(BreakingNode::node_count).sum::<usize>()
    }

    /// Counts choice nodes by how many letters they branch over.
    pub fn choice_stats(&self, counts: &mut BTreeMap<usize, usize>) {
        if let NodeKind::Choice { .. } = self.kind {
            *counts.entry(self.children.len()).or_default() += 1;
        }
        for child in &self.children {
            child.choice_stats(counts);
        }
    }

    fn attach_possibilities(&mut self, possibilities: &Possibilities) -> &[u64] {
        let mut mask = vec![0u64; words_for(possibilities.len())].into_boxed_slice();
        if let NodeKind::Letter { cell, letter } = self.kind {
            if let Some(k) = possibilities.index_of(cell, letter) {
                set_bit(&mut mask, k);
            }
        }
        for child in &mut self.children {
            union_into(&mut mask, child.attach_possibilities(possibilities));
        }
        self.child_possibilities.insert(mask)
    }

    /// Whether the subtree can reach any possibility in `range`. Without
    /// attached masks every subtree is assumed to.
    fn touches(&self, range: &Range<usize>) -> bool {
        match &self.child_possibilities {
            Some(mask) => any_in_range(mask, range.start, range.end),
            None => true,
        }
    }

    fn score_with_force(&self, cell: usize, letter: u8, range: &Range<usize>) -> u32 {
        if !self.touches(range) {
            return self.bound;
        }
        match self.kind {
            NodeKind::Choice { cell: c } if c == cell => self
                .children
                .iter()
                .find(|child| matches!(child.kind, NodeKind::Letter { letter: l, .. } if l == letter))
                .map_or(0, |child| child.score_with_force(cell, letter, range)),
            NodeKind::Choice { .. } => self
                .children
                .iter()
                .map(|child| child.score_with_force(cell, letter, range))
                .max()
                .unwrap_or(0),
            NodeKind::Root | NodeKind::Letter { .. } => self
                .children
                .iter()
                .map(|child| child.score_with_force(cell, letter, range))
                .fold(self.points, u32::saturating_add),
        }
    }
}

/// Stable numbering of every (cell, letter) pair on a board, cell by cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Possibilities {
    pairs: Vec<(usize, u8)>,
    cell_starts: Vec<usize>,
}

impl Possibilities {
    pub fn from_board(board: &BucketBoard) -> Self {
        let mut pairs = Vec::new();
        let mut cell_starts = Vec::with_capacity(board.num_cells() + 1);
        for cell in 0..board.num_cells() {
            cell_starts.push(pairs.len());
            pairs.extend(board.letters(cell).map(|letter| (cell, letter)));
        }
        cell_starts.push(pairs.len());
        Possibilities { pairs, cell_starts }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The (cell, letter) pair numbered `i`.
    pub fn get(&self, i: usize) -> Option<(usize, u8)> {
        self.pairs.get(i).copied()
    }

    pub fn index_of(&self, cell: usize, letter: u8) -> Option<usize> {
        let range = self.cell_range(cell)?;
        self.pairs[range.clone()]
            .iter()
            .position(|&(_, l)| l == letter)
            .map(|p| range.start + p)
    }

    /// Numbers of all possibilities belonging to `cell`.
    pub fn cell_range(&self, cell: usize) -> Option<Range<usize>> {
        let start = *self.cell_starts.get(cell)?;
        let end = *self.cell_starts.get(cell + 1)?;
        Some(start..end)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.pairs.iter().copied()
    }
}

/// A breaking tree together with the possibility numbering of the board it
/// was built from.
#[derive(Clone, Debug)]
pub struct BreakingTree {
    root: BreakingNode,
    possibilities: Possibilities,
    masks_attached: bool,
}

impl BreakingTree {
    pub(crate) fn new(root: BreakingNode, possibilities: Possibilities) -> Self {
        BreakingTree {
            root,
            possibilities,
            masks_attached: false,
        }
    }

    pub fn root(&self) -> &BreakingNode {
        &self.root
    }

    pub fn bound(&self) -> u32 {
        self.root.bound
    }

    /// Recomputes cached bounds bottom up and returns the root's.
    pub fn recompute_score(&mut self) -> u32 {
        self.root.recompute_score()
    }

    /// Removes every subtree that cannot add to the bound. The root itself
    /// is always kept.
    pub fn prune(&mut self) -> &BreakingNode {
        let before = self.root.node_count();
        self.root.children.retain_mut(BreakingNode::prune_children);
        trace!(before, after = self.root.node_count(), "pruned breaking tree");
        &self.root
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    pub fn choice_stats(&self, counts: &mut BTreeMap<usize, usize>) {
        self.root.choice_stats(counts);
    }

    /// Records, on every node, which possibilities its subtree can reach,
    /// so forcing can skip subtrees the forced cell never touches.
    pub fn attach_possibilities(&mut self) {
        self.root.attach_possibilities(&self.possibilities);
        self.masks_attached = true;
    }

    pub fn has_possibility_masks(&self) -> bool {
        self.masks_attached
    }

    pub fn possibilities(&self) -> &Possibilities {
        &self.possibilities
    }

    /// Bound with `cell` restricted to `letter`. The tree is not modified.
    ///
    /// Fails if `cell` is not on the board or the board never offered
    /// `letter` there.
    pub fn score_with_force(&self, cell: usize, letter: u8) -> Result<u32> {
        let unknown = || Error::UnknownPossibility {
            cell,
            letter: if usize::from(letter) < NUM_LETTERS {
                letter_char(letter)
            } else {
                char::REPLACEMENT_CHARACTER
            },
        };
        self.possibilities
            .index_of(cell, letter)
            .ok_or_else(unknown)?;
        let range = self.possibilities.cell_range(cell).ok_or_else(unknown)?;
        Ok(self.root.score_with_force(cell, letter, &range))
    }

    /// [`score_with_force`](Self::score_with_force) by possibility number.
    pub fn score_with_possibility(&self, i: usize) -> Option<u32> {
        let (cell, letter) = self.possibilities.get(i)?;
        self.score_with_force(cell, letter).ok()
    }
}
