//! The 26-letter Boggle alphabet.
//!
//! Every place that turns text into trie edges goes through [`Letters`], so
//! the `qu` rule lives here and nowhere else: a `q` immediately followed by
//! a `u` is one `q` step, and the `u` is never an edge of its own.

use crate::error::{Error, Result};

/// Number of letters in the alphabet.
pub const NUM_LETTERS: usize = 26;

/// Index of `q`, which occupies two characters on the board.
pub const LETTER_Q: u8 = b'q' - b'a';

/// Shortest and longest words accepted from a dictionary.
pub const MIN_WORD_LEN: usize = 3;
pub const MAX_WORD_LEN: usize = 17;

const WORD_SCORES: [u32; MAX_WORD_LEN + 1] = [0, 0, 0, 1, 1, 2, 3, 5, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11];

/// Maps `a`..=`z` to `0..26`.
#[inline(always)]
pub fn letter_index(byte: u8) -> Option<u8> {
    byte.is_ascii_lowercase().then(|| byte - b'a')
}

#[inline(always)]
pub fn letter_char(letter: u8) -> char {
    (b'a' + letter) as char
}

/// Board characters a letter stands for.
#[inline(always)]
pub fn letter_width(letter: u8) -> usize {
    if letter == LETTER_Q { 2 } else { 1 }
}

/// Points for a word spelled with `len` board characters.
pub fn word_score(len: usize) -> u32 {
    WORD_SCORES[len.min(MAX_WORD_LEN)]
}

/// Dictionary filter: 3 to 17 lowercase letters, every `q` followed by `u`.
pub fn is_boggle_word(word: &str) -> bool {
    let bytes = word.as_bytes();
    if !(MIN_WORD_LEN..=MAX_WORD_LEN).contains(&bytes.len()) {
        return false;
    }
    bytes.iter().enumerate().all(|(i, &c)| {
        c.is_ascii_lowercase() && (c != b'q' || bytes.get(i + 1) == Some(&b'u'))
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Letter,
    AfterQ,
    Done,
}

/// Scanner from text to trie edges.
///
/// Yields one letter index per edge. After a `q` the scanner looks one byte
/// ahead and swallows a following `u`. An invalid byte yields
/// [`Error::InvalidLetter`] and ends the scan.
#[derive(Clone, Debug)]
pub struct Letters<'a> {
    rest: &'a [u8],
    state: State,
}

impl<'a> Letters<'a> {
    pub fn new(word: &'a str) -> Self {
        Letters {
            rest: word.as_bytes(),
            state: State::Letter,
        }
    }
}

impl Iterator for Letters<'_> {
    type Item = Result<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                State::Done => return None,
                State::AfterQ => {
                    if let Some((&b'u', rest)) = self.rest.split_first() {
                        self.rest = rest;
                    }
                    self.state = State::Letter;
                }
                State::Letter => {
                    let Some((&byte, rest)) = self.rest.split_first() else {
                        self.state = State::Done;
                        return None;
                    };
                    self.rest = rest;
                    let Some(letter) = letter_index(byte) else {
                        self.state = State::Done;
                        return Some(Err(Error::InvalidLetter(byte as char)));
                    };
                    if letter == LETTER_Q {
                        self.state = State::AfterQ;
                    }
                    return Some(Ok(letter));
                }
            }
        }
    }
}

/// Types that can be read as a sequence of trie edges.
pub trait AsLetters {
    fn letters(&self) -> Letters<'_>;

    /// Collects the edges, failing on the first invalid byte.
    fn letters_vec(&self) -> Result<Vec<u8>> {
        self.letters().collect()
    }
}

impl AsLetters for str {
    fn letters(&self) -> Letters<'_> {
        Letters::new(self)
    }
}

impl AsLetters for String {
    fn letters(&self) -> Letters<'_> {
        Letters::new(self)
    }
}

impl<T: AsLetters + ?Sized> AsLetters for &T {
    fn letters(&self) -> Letters<'_> {
        (**self).letters()
    }
}
