//! Immutable, arena-packed letter trie.
//!
//! A [`CompactTrie`] is built once from a [`Trie`] and never changes. Each
//! node is a 27-bit flag word (bit 26 ends a word, bits 0..26 say which
//! letters have children) plus a dense run of child indices: the child for
//! the k-th set letter bit sits in slot k of the run.

use std::collections::VecDeque;
use std::fmt;

use tracing::debug;

use crate::arena::{NodeArena, NodeIdx};
use crate::bits::{WORD_BIT, letter_count, letters_of, rank, set_letter, test_letter};
use crate::error::Result;
use crate::letters::{AsLetters, letter_char};
use crate::trie::Trie;

/// A read-only trie whose nodes live in a [`NodeArena`].
///
/// # Examples
///
/// ```
/// use bucket_boggle::{CompactTrie, NodeArena, Trie};
///
/// let trie = Trie::from_words(["sea", "seat", "tea"]);
/// let compact = CompactTrie::build_bfs(&trie, NodeArena::new()).unwrap();
///
/// assert!(compact.is_word("seat"));
/// assert!(!compact.is_word("se"));
/// assert_eq!(compact.size(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct CompactTrie {
    arena: NodeArena,
    root: NodeIdx,
}

/// Lowest and highest byte address covered by a subtree's node records.
///
/// A subtree rooted outside the arena reports an inverted span
/// (`low > high`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MemorySpan {
    pub low: usize,
    pub high: usize,
}

impl MemorySpan {
    const EMPTY: MemorySpan = MemorySpan {
        low: usize::MAX,
        high: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.low > self.high
    }

    pub fn len(&self) -> usize {
        self.high.saturating_sub(self.low)
    }

    fn merge(self, other: MemorySpan) -> MemorySpan {
        MemorySpan {
            low: self.low.min(other.low),
            high: self.high.max(other.high),
        }
    }
}

impl CompactTrie {
    /// Packs `trie` depth first: every node is followed by its first
    /// child's whole subtree.
    pub fn build(trie: &Trie, mut arena: NodeArena) -> Result<Self> {
        let root = pack_dfs(trie, &mut arena)?;
        debug!(
            nodes = arena.len(),
            bytes = arena.bytes_used(),
            "packed trie depth first"
        );
        Ok(CompactTrie { arena, root })
    }

    /// Packs `trie` breadth first, so parents and siblings sit close
    /// together in the arena. Logically identical to [`build`](Self::build).
    pub fn build_bfs(trie: &Trie, mut arena: NodeArena) -> Result<Self> {
        let root = allocate_for(trie, &mut arena)?;
        let mut todo = VecDeque::from([(trie, root)]);

        while let Some((src, dst)) = todo.pop_front() {
            for (slot, (letter, child)) in src.children().enumerate() {
                let packed = allocate_for(child, &mut arena)?;
                set_letter(&mut arena.get_node_mut(dst).bits, letter);
                arena.set_child(dst, slot, packed);
                todo.push_back((child, packed));
            }
        }

        debug!(
            nodes = arena.len(),
            bytes = arena.bytes_used(),
            "packed trie breadth first"
        );
        Ok(CompactTrie { arena, root })
    }

    /// Filters raw dictionary tokens and packs them breadth first.
    pub fn from_words<I, S>(words: I, arena: NodeArena) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let trie = Trie::from_words(words);
        Self::build_bfs(&trie, arena)
    }

    pub fn root(&self) -> PackedCursor<'_> {
        PackedCursor {
            trie: self,
            idx: self.root,
        }
    }

    /// Cursor at an arbitrary node index, or `None` if it is not in the arena.
    pub fn cursor_at(&self, idx: NodeIdx) -> Option<PackedCursor<'_>> {
        self.arena.contains(idx).then_some(PackedCursor { trie: self, idx })
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn is_word<K: AsLetters + ?Sized>(&self, word: &K) -> bool {
        let mut node = self.root();
        for letter in word.letters() {
            let Ok(letter) = letter else {
                return false;
            };
            match node.descend(letter) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.ends_word()
    }

    pub fn size(&self) -> usize {
        self.root().size()
    }

    pub fn memory_usage(&self) -> usize {
        self.root().memory_usage()
    }

    pub fn memory_span(&self) -> MemorySpan {
        self.root().memory_span()
    }

    /// Depth-first listing of every node, one line each.
    pub fn dump(&self) -> TrieDump<'_> {
        self.root().dump("")
    }

    /// All stored words in lexicographic letter order.
    pub fn words(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root(), String::new())];
        while let Some((node, prefix)) = stack.pop() {
            if node.ends_word() {
                out.push(prefix.clone());
            }
            let children: Vec<_> = node.children().collect();
            for (letter, child) in children.into_iter().rev() {
                let mut next = prefix.clone();
                next.push(letter_char(letter));
                stack.push((child, next));
            }
        }
        out
    }
}

fn allocate_for(trie: &Trie, arena: &mut NodeArena) -> Result<NodeIdx> {
    let idx = arena.allocate(trie.num_children())?;
    if trie.ends_word() {
        arena.get_node_mut(idx).bits |= WORD_BIT;
    }
    Ok(idx)
}

fn pack_dfs(trie: &Trie, arena: &mut NodeArena) -> Result<NodeIdx> {
    let idx = allocate_for(trie, arena)?;
    for (slot, (letter, child)) in trie.children().enumerate() {
        let packed = pack_dfs(child, arena)?;
        set_letter(&mut arena.get_node_mut(idx).bits, letter);
        arena.set_child(idx, slot, packed);
    }
    Ok(idx)
}

/// A position in a [`CompactTrie`].
#[derive(Copy, Clone)]
pub struct PackedCursor<'a> {
    trie: &'a CompactTrie,
    idx: NodeIdx,
}

impl fmt::Debug for PackedCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackedCursor")
            .field("idx", &self.idx)
            .field("bits", &format_args!("{:08X}", self.bits()))
            .finish()
    }
}

impl<'a> PackedCursor<'a> {
    pub fn idx(&self) -> NodeIdx {
        self.idx
    }

    #[inline(always)]
    fn bits(&self) -> u32 {
        self.trie.arena.get_node(self.idx).bits
    }

    #[inline(always)]
    pub fn ends_word(&self) -> bool {
        self.bits() & WORD_BIT != 0
    }

    #[inline(always)]
    pub fn starts_word(&self, letter: u8) -> bool {
        letter < 26 && test_letter(self.bits(), letter)
    }

    pub fn num_children(&self) -> usize {
        letter_count(self.bits())
    }

    #[inline(always)]
    pub fn descend(&self, letter: u8) -> Option<PackedCursor<'a>> {
        if !self.starts_word(letter) {
            return None;
        }
        let slot = rank(self.bits(), letter);
        Some(PackedCursor {
            trie: self.trie,
            idx: self.trie.arena.child_at(self.idx, slot),
        })
    }

    /// Children as `(letter, child)` pairs in letter order.
    pub fn children(&self) -> impl Iterator<Item = (u8, PackedCursor<'a>)> + use<'a> {
        let this = *self;
        letters_of(self.bits()).enumerate().map(move |(slot, letter)| {
            let idx = this.trie.arena.child_at(this.idx, slot);
            (letter, PackedCursor { trie: this.trie, idx })
        })
    }

    pub fn size(&self) -> usize {
        self.ends_word() as usize + self.children().map(|(_, c)| c.size()).sum::<usize>()
    }

    /// Bytes held by this node's record, its child run and all descendants.
    pub fn memory_usage(&self) -> usize {
        NodeArena::record_size(self.num_children())
            + self.children().map(|(_, c)| c.memory_usage()).sum::<usize>()
    }

    pub fn memory_span(&self) -> MemorySpan {
        let own = match self.trie.arena.address_of(self.idx) {
            Some(addr) => MemorySpan {
                low: addr,
                high: addr + size_of::<crate::arena::PackedNode>(),
            },
            None => return MemorySpan::EMPTY,
        };
        self.children()
            .map(|(_, c)| c.memory_span())
            .fold(own, MemorySpan::merge)
    }

    pub fn dump(&self, prefix: &str) -> TrieDump<'a> {
        TrieDump {
            node: *self,
            prefix: prefix.to_string(),
        }
    }
}

/// Lazy depth-first dump of a subtree; produced by [`CompactTrie::dump`].
pub struct TrieDump<'a> {
    node: PackedCursor<'a>,
    prefix: String,
}

impl fmt::Display for TrieDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![(self.node, self.prefix.clone())];
        while let Some((node, prefix)) = stack.pop() {
            let flag = if node.ends_word() { '+' } else { '-' };
            writeln!(f, "{flag}({:08X}) {prefix}", node.bits())?;
            let children: Vec<_> = node.children().collect();
            for (letter, child) in children.into_iter().rev() {
                let mut next = prefix.clone();
                next.push(letter_char(letter));
                stack.push((child, next));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn sample() -> Trie {
        Trie::from_words(["agriculture", "culture", "boggle", "tea", "sea", "teapot"])
    }

    #[test]
    fn test_preserves_words() {
        let trie = sample();
        for compact in [
            CompactTrie::build(&trie, NodeArena::new()).unwrap(),
            CompactTrie::build_bfs(&trie, NodeArena::new()).unwrap(),
        ] {
            assert_eq!(compact.size(), 6);
            for word in ["agriculture", "culture", "boggle", "tea", "sea", "teapot"] {
                assert!(compact.is_word(word), "{word}");
            }
            assert!(!compact.is_word("teap"));
            assert!(!compact.is_word("random"));
            assert!(!compact.is_word("cultur"));
            assert!(!compact.is_word("Tea"));
        }
    }

    #[test]
    fn test_dfs_and_bfs_agree() {
        let trie = sample();
        let dfs = CompactTrie::build(&trie, NodeArena::new()).unwrap();
        let bfs = CompactTrie::build_bfs(&trie, NodeArena::new()).unwrap();

        assert_eq!(dfs.words(), bfs.words());
        assert_eq!(
            bfs.words(),
            vec!["agriculture", "boggle", "culture", "sea", "tea", "teapot"]
        );
        assert_eq!(dfs.memory_usage(), bfs.memory_usage());
        assert_eq!(dfs.arena().len(), bfs.arena().len());
        assert_eq!(dfs.dump().to_string(), bfs.dump().to_string());
    }

    #[test]
    fn test_bfs_places_children_after_root() {
        let trie = sample();
        let bfs = CompactTrie::build_bfs(&trie, NodeArena::new()).unwrap();
        let root = bfs.root();
        assert_eq!(root.idx(), NodeIdx(0));
        let child_idx: Vec<NodeIdx> = root.children().map(|(_, c)| c.idx()).collect();
        // a, b, c, s, t
        assert_eq!(child_idx, (1..=5).map(NodeIdx).collect::<Vec<_>>());

        let dfs = CompactTrie::build(&trie, NodeArena::new()).unwrap();
        let first_two: Vec<NodeIdx> = dfs.root().children().take(2).map(|(_, c)| c.idx()).collect();
        // agriculture occupies 11 records before boggle starts
        assert_eq!(first_two, vec![NodeIdx(1), NodeIdx(12)]);
    }

    #[test]
    fn test_children_rank_mapping() {
        let trie = Trie::from_words(["abc", "azz", "mop"]);
        let compact = CompactTrie::build_bfs(&trie, NodeArena::new()).unwrap();
        let a = compact.root().descend(0).unwrap();
        let letters: Vec<u8> = a.children().map(|(l, _)| l).collect();
        assert_eq!(letters, vec![1, 25]);
        assert!(a.descend(25).unwrap().descend(25).unwrap().ends_word());
        assert!(a.descend(2).is_none());
        assert!(compact.root().descend(26).is_none());
    }

    #[test]
    fn test_qu_lookup() {
        let compact = CompactTrie::from_words(["quest", "quit"], NodeArena::new()).unwrap();
        assert!(compact.is_word("quest"));
        assert!(compact.is_word("quit"));
        let q = compact.root().descend(crate::letters::LETTER_Q).unwrap();
        assert!(!q.starts_word(b'u' - b'a'));
    }

    #[test]
    fn test_memory_usage() {
        let trie = Trie::from_words(["tea"]);
        let compact = CompactTrie::build(&trie, NodeArena::new()).unwrap();
        let expected = 3 * NodeArena::record_size(1) + NodeArena::record_size(0);
        assert_eq!(compact.memory_usage(), expected);
        assert_eq!(compact.arena().bytes_used(), expected);
    }

    #[test]
    fn test_memory_span() {
        let trie = sample();
        let compact = CompactTrie::build_bfs(&trie, NodeArena::new()).unwrap();
        let span = compact.memory_span();
        assert!(!span.is_empty());
        assert_eq!(
            span.len(),
            compact.arena().len() * size_of::<crate::arena::PackedNode>()
        );

        assert!(compact.cursor_at(NodeIdx(u32::MAX)).is_none());
        let stray = PackedCursor {
            trie: &compact,
            idx: NodeIdx(u32::MAX),
        };
        assert!(stray.memory_span().is_empty());
    }

    #[test]
    fn test_dump() {
        let trie = Trie::from_words(["tea"]);
        let compact = CompactTrie::build(&trie, NodeArena::new()).unwrap();
        let dump = compact.dump().to_string();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(
            lines,
            vec![
                "-(00080000) ",
                "-(00000010) t",
                "-(00000001) te",
                "+(04000000) tea",
            ]
        );
    }

    #[test]
    fn test_arena_too_small() {
        let trie = sample();
        let err = CompactTrie::build_bfs(&trie, NodeArena::with_capacity(64)).unwrap_err();
        assert!(matches!(err, Error::ArenaExhausted { .. }));
    }

    #[test]
    fn test_shared_between_threads() {
        let compact = CompactTrie::from_words(["sea", "tea"], NodeArena::new()).unwrap();
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..2)
                .map(|_| s.spawn(|| compact.is_word("sea") && compact.is_word("tea")))
                .collect();
            for h in handles {
                assert!(h.join().unwrap());
            }
        });
    }
}
