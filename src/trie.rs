use std::fmt;

use tracing::debug;

use crate::error::{Error, Result};
use crate::letters::{AsLetters, NUM_LETTERS, is_boggle_word, letter_index};

/// A mutable letter trie.
///
/// Each node owns up to 26 children, one per letter, a flag marking the end
/// of a word and an integer mark that callers may use to tag nodes after
/// construction. Words are read through [`Letters`](crate::Letters), so
/// `qu` is stored as a single `q` edge.
///
/// # Examples
///
/// ```
/// use bucket_boggle::Trie;
///
/// let mut trie = Trie::new();
/// trie.add_word("tea").unwrap();
/// trie.add_word("quest").unwrap();
///
/// assert!(trie.is_word("tea"));
/// assert!(!trie.is_word("te"));
/// assert!(trie.is_word("quest"));
/// assert_eq!(trie.size(), 2);
/// ```
pub struct Trie {
    children: [Option<Box<Trie>>; NUM_LETTERS],
    is_word: bool,
    mark: u32,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Trie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trie")
            .field("is_word", &self.is_word)
            .field("mark", &self.mark)
            .field("children", &self.num_children())
            .finish()
    }
}

impl Trie {
    /// Creates an empty node.
    pub fn new() -> Self {
        Trie {
            children: std::array::from_fn(|_| None),
            is_word: false,
            mark: 0,
        }
    }

    /// Builds a trie from raw dictionary tokens.
    ///
    /// Tokens failing [`is_boggle_word`] are skipped.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = Trie::new();
        let mut skipped = 0usize;
        for word in words {
            let word = word.as_ref();
            if !is_boggle_word(word) || trie.add_word(word).is_err() {
                skipped += 1;
            }
        }
        debug!(words = trie.size(), skipped, "built dictionary trie");
        trie
    }

    /// Inserts a word. An invalid byte leaves the trie untouched.
    pub fn add_word<K: AsLetters + ?Sized>(&mut self, word: &K) -> Result<()> {
        let path = word.letters_vec()?;
        let mut node = self;
        for letter in path {
            node = &mut **node.children[letter as usize].get_or_insert_with(|| Box::new(Trie::new()));
        }
        node.is_word = true;
        Ok(())
    }

    /// Exact lookup; false for any string containing a byte outside `a`..=`z`.
    pub fn is_word<K: AsLetters + ?Sized>(&self, word: &K) -> bool {
        let mut node = self;
        for letter in word.letters() {
            let Ok(letter) = letter else {
                return false;
            };
            match node.descend(letter) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.is_word
    }

    /// Whether this node ends a word.
    #[inline(always)]
    pub fn ends_word(&self) -> bool {
        self.is_word
    }

    pub fn set_is_word(&mut self) {
        self.is_word = true;
    }

    #[inline(always)]
    pub fn starts_word(&self, letter: u8) -> bool {
        self.descend(letter).is_some()
    }

    #[inline(always)]
    pub fn descend(&self, letter: u8) -> Option<&Trie> {
        self.children.get(letter as usize)?.as_deref()
    }

    pub fn descend_mut(&mut self, letter: u8) -> Option<&mut Trie> {
        self.children.get_mut(letter as usize)?.as_deref_mut()
    }

    pub fn mark(&self) -> u32 {
        self.mark
    }

    pub fn set_mark(&mut self, mark: u32) {
        self.mark = mark;
    }

    pub fn num_children(&self) -> usize {
        self.children.iter().filter(|c| c.is_some()).count()
    }

    /// Children in letter order.
    pub fn children(&self) -> impl Iterator<Item = (u8, &Trie)> + '_ {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_deref().map(|c| (i as u8, c)))
    }

    /// Number of words stored at or below this node.
    pub fn size(&self) -> usize {
        self.is_word as usize + self.children().map(|(_, c)| c.size()).sum::<usize>()
    }

    /// Collapses disjoint letter groups into single letters.
    ///
    /// Group `i` becomes letter `i` of the new trie, so with the groups
    /// `["ab", "cd", ...]` the word `tea` reads as `jca`. Paths through a
    /// letter that no group covers are dropped.
    pub fn collapse_buckets<S: AsRef<str>>(&self, groups: &[S]) -> Result<Trie> {
        if groups.len() > NUM_LETTERS {
            return Err(Error::invalid_buckets(format!(
                "{} groups for {} letters",
                groups.len(),
                NUM_LETTERS
            )));
        }

        let mut group_of = [None; NUM_LETTERS];
        for (g, group) in groups.iter().enumerate() {
            for &byte in group.as_ref().as_bytes() {
                let letter = letter_index(byte).ok_or_else(|| {
                    Error::invalid_buckets(format!("{:?} is not a letter", byte as char))
                })?;
                if group_of[letter as usize].replace(g as u8).is_some() {
                    return Err(Error::invalid_buckets(format!(
                        "{:?} appears in more than one group",
                        byte as char
                    )));
                }
            }
        }

        let mut out = Trie::new();
        collapse_into(self, &mut out, &group_of);
        Ok(out)
    }
}

fn collapse_into(src: &Trie, dst: &mut Trie, group_of: &[Option<u8>; NUM_LETTERS]) {
    if src.is_word {
        dst.is_word = true;
    }
    for (letter, child) in src.children() {
        if let Some(g) = group_of[letter as usize] {
            let next = dst.children[g as usize].get_or_insert_with(|| Box::new(Trie::new()));
            collapse_into(child, next, group_of);
        }
    }
}
