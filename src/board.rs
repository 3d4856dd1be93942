use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::letters::letter_index;

/// Board dimensions. Only [`BoardSize::new`] and [`FromStr`] build one, so
/// every size fits the used-cell mask.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoardSize {
    rows: usize,
    cols: usize,
}

impl BoardSize {
    /// Largest board the used-cell mask can track.
    pub const MAX_CELLS: usize = 64;

    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        let cells = rows.saturating_mul(cols);
        if cells == 0 {
            return Err(Error::invalid_board_size(format!("{rows}x{cols}")));
        }
        if cells > Self::MAX_CELLS {
            return Err(Error::BoardTooLarge { cells });
        }
        Ok(BoardSize { rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn num_cells(&self) -> usize {
        self.rows * self.cols
    }

    /// Row-major neighbour lists, including diagonals.
    fn neighbor_table(&self) -> Vec<Vec<usize>> {
        let (rows, cols) = (self.rows as isize, self.cols as isize);
        (0..self.num_cells())
            .map(|i| {
                let (r, c) = ((i / self.cols) as isize, (i % self.cols) as isize);
                let mut out = Vec::with_capacity(8);
                for dr in -1..=1 {
                    for dc in -1..=1 {
                        let (nr, nc) = (r + dr, c + dc);
                        if (dr, dc) != (0, 0) && (0..rows).contains(&nr) && (0..cols).contains(&nc) {
                            out.push((nr * cols + nc) as usize);
                        }
                    }
                }
                out
            })
            .collect()
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        BoardSize { rows: 3, cols: 3 }
    }
}

impl FromStr for BoardSize {
    type Err = Error;

    /// Two digits, rows then columns: `"33"` is 3x3, `"34"` is 3x4.
    fn from_str(s: &str) -> Result<Self> {
        match s.as_bytes() {
            [r @ b'1'..=b'9', c @ b'1'..=b'9'] => {
                BoardSize::new((r - b'0') as usize, (c - b'0') as usize)
            }
            _ => Err(Error::invalid_board_size(s)),
        }
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rows, self.cols)
    }
}

/// A board whose cells each hold a set of candidate letters.
///
/// # Examples
///
/// ```
/// use bucket_boggle::{BoardSize, BucketBoard};
///
/// let mut board = BucketBoard::new(BoardSize::default());
/// board.parse("a b c d e f g h i").unwrap();
/// assert_eq!(board.num_reps(), 1);
///
/// board.cell_mut(0).push_str("xy");
/// assert_eq!(board.cell(0), "axy");
/// assert_eq!(board.num_reps(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BucketBoard {
    size: BoardSize,
    cells: Vec<String>,
    neighbors: Vec<Vec<usize>>,
}

impl BucketBoard {
    /// A board of the given size with every cell empty.
    pub fn new(size: BoardSize) -> Self {
        BucketBoard {
            size,
            cells: vec![String::new(); size.num_cells()],
            neighbors: size.neighbor_table(),
        }
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Replaces every cell from whitespace separated tokens.
    ///
    /// On error the board keeps its previous contents.
    pub fn parse(&mut self, text: &str) -> Result<()> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() != self.num_cells() {
            return Err(Error::WrongCellCount {
                expected: self.num_cells(),
                found: tokens.len(),
            });
        }
        for (i, token) in tokens.iter().enumerate() {
            validate_cell(i, token)?;
        }
        for (cell, token) in self.cells.iter_mut().zip(tokens) {
            cell.clear();
            cell.push_str(token);
        }
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if `i` is not a cell of the board; see [`get_cell`](Self::get_cell).
    pub fn cell(&self, i: usize) -> &str {
        &self.cells[i]
    }

    /// Direct access to a cell's letters. Callers are trusted to keep them
    /// distinct lowercase letters; [`set_cell`](Self::set_cell) checks.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not a cell of the board; see
    /// [`get_cell_mut`](Self::get_cell_mut).
    pub fn cell_mut(&mut self, i: usize) -> &mut String {
        &mut self.cells[i]
    }

    pub fn get_cell(&self, i: usize) -> Option<&str> {
        self.cells.get(i).map(String::as_str)
    }

    pub fn get_cell_mut(&mut self, i: usize) -> Option<&mut String> {
        self.cells.get_mut(i)
    }

    pub fn set_cell(&mut self, i: usize, letters: &str) -> Result<()> {
        if i >= self.num_cells() {
            return Err(Error::CellOutOfRange {
                cell: i,
                cells: self.num_cells(),
            });
        }
        validate_cell(i, letters)?;
        self.cells[i].clear();
        self.cells[i].push_str(letters);
        Ok(())
    }

    pub fn cells(&self) -> impl Iterator<Item = &str> + '_ {
        self.cells.iter().map(String::as_str)
    }

    /// Letter indices of cell `i`, skipping anything outside `a`..=`z`.
    pub fn letters(&self, i: usize) -> impl Iterator<Item = u8> + '_ {
        self.cells[i].bytes().filter_map(letter_index)
    }

    pub fn neighbors(&self, i: usize) -> &[usize] {
        &self.neighbors[i]
    }

    /// Number of concrete boards this bucket board stands for.
    pub fn num_reps(&self) -> u64 {
        self.cells
            .iter()
            .map(|c| c.len() as u64)
            .fold(1u64, u64::saturating_mul)
    }
}

fn validate_cell(i: usize, letters: &str) -> Result<()> {
    if letters.is_empty() {
        return Err(Error::EmptyCell(i));
    }
    let mut seen = 0u32;
    for byte in letters.bytes() {
        let letter = letter_index(byte).ok_or(Error::InvalidLetter(byte as char))?;
        if seen & (1 << letter) != 0 {
            return Err(Error::DuplicateLetter {
                cell: i,
                letter: byte as char,
            });
        }
        seen |= 1 << letter;
    }
    Ok(())
}

impl fmt::Display for BucketBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(cell)?;
        }
        Ok(())
    }
}
