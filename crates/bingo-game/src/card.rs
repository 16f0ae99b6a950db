//! Card generation.

use std::ops::RangeInclusive;

use rand::seq::index;
use rand::Rng;
use serde::Serialize;

/// Rows and columns on a card.
pub const CARD_SIZE: usize = 5;

/// The center cell's value. It counts as covered from the first ball.
pub const FREE: u8 = 0;

const CENTER: usize = CARD_SIZE / 2;
const NUMBERS_PER_COLUMN: u8 = 15;

/// A player's 5×5 grid.
///
/// Column `c` holds five distinct numbers from
/// `c*15 + 1 ..= c*15 + 15`; the center cell is [`FREE`]. Since the
/// column ranges are disjoint, the 24 numbered cells are all distinct.
///
/// Serializes as a JSON array of rows, which is what the client script
/// renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Card {
    cells: [[u8; CARD_SIZE]; CARD_SIZE],
}

impl Card {
    /// The number range column `col` draws from.
    ///
    /// # Panics
    /// If `col >= CARD_SIZE`.
    pub fn column_range(col: usize) -> RangeInclusive<u8> {
        assert!(col < CARD_SIZE, "column {col} out of range");
        let start = col as u8 * NUMBERS_PER_COLUMN + 1;
        start..=start + NUMBERS_PER_COLUMN - 1
    }

    /// The grid, row-major.
    pub fn cells(&self) -> &[[u8; CARD_SIZE]; CARD_SIZE] {
        &self.cells
    }

    /// The value at `(row, col)`, or `None` off the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.cells.get(row)?.get(col).copied()
    }

    /// The 24 numbered cells, row by row.
    pub fn numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.cells.iter().flatten().copied().filter(|&n| n != FREE)
    }
}

/// Generates a fresh card using the thread-local RNG.
pub fn generate_card() -> Card {
    generate_card_with(&mut rand::rng())
}

/// Generates a card from the given RNG.
///
/// Each column samples five distinct numbers from its range without
/// replacement; the center is then overwritten with [`FREE`].
pub fn generate_card_with<R: Rng + ?Sized>(rng: &mut R) -> Card {
    let mut cells = [[FREE; CARD_SIZE]; CARD_SIZE];

    for col in 0..CARD_SIZE {
        let start = *Card::column_range(col).start();
        let picks = index::sample(rng, NUMBERS_PER_COLUMN as usize, CARD_SIZE);
        for (row, offset) in picks.iter().enumerate() {
            cells[row][col] = start + offset as u8;
        }
    }

    cells[CENTER][CENTER] = FREE;
    Card { cells }
}
