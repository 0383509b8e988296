//! Board-agnostic primitives shared by the rest of the draughts engine: a bitboard over playable
//! squares, a playable-square index, a two-color enum, and the compile-time-generated Zobrist key
//! table. Nothing in this crate knows the rules of draughts; it would be equally at home
//! underneath a different dark-square board game.

mod bitboard;
mod color;
mod consts;
mod square;
mod zobrist;

pub use bitboard::BitBoard;
pub use color::Color;
pub use consts::MAX_SQUARES;
pub use square::{ParseSquareError, Square};
pub use zobrist::ZobristMap;

rustifact::use_symbols!(ZOBRIST);
