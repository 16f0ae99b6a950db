//! The cage and the win check.

use std::collections::HashSet;
use std::fmt;

use bingo_protocol::Ball;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::card::{Card, CARD_SIZE, FREE};

/// A completed line on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    /// Row `0..5`, top to bottom.
    Row(usize),
    /// Column `0..5`, left to right.
    Column(usize),
    /// Top-left to bottom-right.
    Diagonal,
    /// Top-right to bottom-left.
    AntiDiagonal,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row(i) => write!(f, "row {i}"),
            Self::Column(i) => write!(f, "column {i}"),
            Self::Diagonal => write!(f, "diagonal"),
            Self::AntiDiagonal => write!(f, "anti-diagonal"),
        }
    }
}

/// Picks a ball not yet in `drawn`, uniformly at random.
///
/// Returns `None` once all 75 balls are out. That is the normal end of
/// the cage, not an error.
pub fn draw_ball(drawn: &HashSet<Ball>) -> Option<Ball> {
    draw_ball_with(drawn, &mut rand::rng())
}

/// [`draw_ball`] with a caller-supplied RNG.
pub fn draw_ball_with<R: Rng + ?Sized>(
    drawn: &HashSet<Ball>,
    rng: &mut R,
) -> Option<Ball> {
    let remaining: Vec<Ball> =
        Ball::all().filter(|ball| !drawn.contains(ball)).collect();
    remaining.choose(rng).copied()
}

/// Returns `true` if `drawn` (plus the free center) covers a full row,
/// column, or either diagonal of `card`.
pub fn validate(card: &Card, drawn: &HashSet<Ball>) -> bool {
    winning_line(card, drawn).is_some()
}

/// The first completed line, checking rows, then columns, then the two
/// diagonals.
pub fn winning_line(card: &Card, drawn: &HashSet<Ball>) -> Option<Line> {
    let cells = card.cells();
    let covered = |row: usize, col: usize| {
        let value = cells[row][col];
        value == FREE || Ball::new(value).is_some_and(|b| drawn.contains(&b))
    };

    (0..CARD_SIZE)
        .find(|&r| (0..CARD_SIZE).all(|c| covered(r, c)))
        .map(Line::Row)
        .or_else(|| {
            (0..CARD_SIZE)
                .find(|&c| (0..CARD_SIZE).all(|r| covered(r, c)))
                .map(Line::Column)
        })
        .or_else(|| {
            (0..CARD_SIZE)
                .all(|i| covered(i, i))
                .then_some(Line::Diagonal)
        })
        .or_else(|| {
            (0..CARD_SIZE)
                .all(|i| covered(i, CARD_SIZE - 1 - i))
                .then_some(Line::AntiDiagonal)
        })
}
