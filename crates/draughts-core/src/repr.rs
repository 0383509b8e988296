use std::fmt::{self, Display};

use arrayvec::ArrayVec;
use draughts_bootstrap::{Color, Square, MAX_SQUARES};

/// Whether a piece is a man or has been promoted to a king.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Man,
    King,
}

/// A piece of a given color and role. Converts to and from the signed small-integer encoding used
/// at the FEN boundary (§3.2): -2 white king, -1 white man, +1 black man, +2 black king.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub role: Role,
}

impl Piece {
    pub const fn new(color: Color, role: Role) -> Self {
        Piece { color, role }
    }

    /// The signed piece code used by the FEN boundary: -2 white king, -1 white man, +1 black man,
    /// +2 black king.
    pub fn signed_code(self) -> i8 {
        match (self.color, self.role) {
            (Color::White, Role::King) => -2,
            (Color::White, Role::Man) => -1,
            (Color::Black, Role::Man) => 1,
            (Color::Black, Role::King) => 2,
        }
    }
}

/// The maximum number of squares a single capture chain could ever visit: bounded by the board's
/// playable-square count, since a piece can't revisit a square within one move.
pub const MAX_CHAIN: usize = MAX_SQUARES;

/// A move, as defined in §3.4: an ordered sequence of visited squares (the path a piece travels),
/// the unordered set of squares it captured along the way (empty for a quiet move), and whether
/// the piece promoted on arrival.
///
/// Two moves compare equal when their visited sequences match exactly and their captured sets
/// match as sets (order-independent) — matching the "no duplicates" guarantee in §4.D.3, which is
/// phrased in terms of (visited-sequence, captured-set) pairs, not captured-sequence order.
#[derive(Debug, Clone, Eq)]
pub struct Move {
    visited: ArrayVec<Square, MAX_CHAIN>,
    captured: ArrayVec<Square, MAX_CHAIN>,
    promoted: bool,
}

impl Move {
    /// A quiet move from `from` to `to`, with no captures.
    pub fn quiet(from: Square, to: Square, promoted: bool) -> Self {
        let mut visited = ArrayVec::new();
        visited.push(from);
        visited.push(to);

        Move {
            visited,
            captured: ArrayVec::new(),
            promoted,
        }
    }

    /// Builds a move from a complete visited path and captured set, as produced by the capture
    /// enumerator in §4.D.1. `visited` must have at least two elements.
    pub fn chain(visited: ArrayVec<Square, MAX_CHAIN>, captured: ArrayVec<Square, MAX_CHAIN>, promoted: bool) -> Self {
        debug_assert!(visited.len() >= 2, "a move must visit at least an origin and a destination");

        Move {
            visited,
            captured,
            promoted,
        }
    }

    pub fn origin(&self) -> Square {
        self.visited[0]
    }

    pub fn destination(&self) -> Square {
        *self.visited.last().expect("a move always visits at least two squares")
    }

    pub fn visited(&self) -> &[Square] {
        &self.visited
    }

    pub fn captured(&self) -> &[Square] {
        &self.captured
    }

    pub fn is_capture(&self) -> bool {
        !self.captured.is_empty()
    }

    pub fn promoted(&self) -> bool {
        self.promoted
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        if self.visited != other.visited || self.promoted != other.promoted {
            return false;
        }

        if self.captured.len() != other.captured.len() {
            return false;
        }

        let mut mine: ArrayVec<Square, MAX_CHAIN> = self.captured.clone();
        let mut theirs: ArrayVec<Square, MAX_CHAIN> = other.captured.clone();
        mine.sort_by_key(Square::as_index);
        theirs.sort_by_key(Square::as_index);

        mine == theirs
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = if self.is_capture() { 'x' } else { '-' };

        for (i, square) in self.visited.iter().enumerate() {
            if i > 0 {
                write!(f, "{separator}")?;
            }
            write!(f, "{square}")?;
        }

        Ok(())
    }
}
