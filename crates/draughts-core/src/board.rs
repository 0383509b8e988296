//! The public board type (§6): validated push/pop over a [`Position`], FEN/PDN serialization, and
//! game-result queries. [`Position`] and [`crate::movegen`] know the rules; `Board` is the
//! validating façade that never leaves the underlying position partially mutated.

use std::fmt;

use draughts_bootstrap::{Color, Square};
use tracing::{debug, warn};

use crate::{
    error::{BoardError, EmptyStack, IllegalMove, ParseFenError, ParsePdnError},
    fen,
    movegen::{self, Moves},
    pdn,
    position::Position,
    repr::{Move, Piece, Role},
    variant::Variant,
};

/// The outcome of a game at its current position, per §6's `board.result()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    /// The game has not concluded.
    Ongoing,
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::Ongoing => "-",
        })
    }
}

/// A draughts board: a [`Position`] plus the validation `push`/`pop` needs to guarantee it is
/// never left in a partially-mutated state.
#[derive(Debug, Clone)]
pub struct Board {
    position: Position,
}

impl Board {
    /// The canonical starting position for `variant`.
    pub fn new(variant: Variant) -> Self {
        debug!(variant = variant.name, "new board");

        Board {
            position: Position::new(variant),
        }
    }

    /// Parses a FEN string into a board of the given variant (§4.F).
    pub fn from_fen(variant: Variant, fen_text: &str) -> Result<Self, ParseFenError> {
        match fen::parse(variant, fen_text) {
            Ok(position) => {
                debug!(variant = variant.name, "board parsed from FEN");
                Ok(Board { position })
            }
            Err(err) => {
                warn!(variant = variant.name, %err, "failed to parse FEN");
                Err(err)
            }
        }
    }

    /// Replays a PDN move list from `variant`'s starting position (§4.F).
    pub fn from_pdn(variant: Variant, pdn_text: &str) -> Result<Self, ParsePdnError> {
        let mut board = Board::new(variant);

        if let Err(err) = pdn::replay(&mut board, pdn_text) {
            warn!(variant = variant.name, %err, "failed to parse PDN");
            return Err(err);
        }

        Ok(board)
    }

    pub fn variant(&self) -> &Variant {
        self.position.variant()
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Direct mutable access to the underlying position, for collaborators (the search engine)
    /// that apply and revert moves without going through `push`/`pop`'s legality re-check on every
    /// call. A caller that leaves the position's move stack unbalanced breaks `Board`'s own
    /// invariant, not `Position`'s; see `draughts-search`'s make/unmake pairing (§5).
    pub fn position_mut(&mut self) -> &mut Position {
        &mut self.position
    }

    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move()
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.position.piece_at(square)
    }

    /// The legal moves available to the side to move (§4.D).
    pub fn legal_moves(&self) -> Moves {
        movegen::legal_moves(&self.position)
    }

    /// Applies `mv`, which must be a member of [`Board::legal_moves`]. Never partially mutates
    /// the board: rejection leaves the position untouched.
    pub fn push(&mut self, mv: &Move) -> Result<(), IllegalMove> {
        if self.legal_moves().iter().any(|legal| legal == mv) {
            self.position.make_move(mv);
            Ok(())
        } else {
            Err(IllegalMove {
                attempted: mv.clone(),
            })
        }
    }

    /// Parses `notation` as a single ply (`a-b` or `a x b [x c ...]`) and pushes it, resolving
    /// ambiguity against the legal moves of the current position (§4.F, §6).
    pub fn push_from_notation(&mut self, notation: &str) -> Result<(), BoardError> {
        let mv = pdn::parse_ply(&self.position, notation)?;
        self.push(&mv)?;
        Ok(())
    }

    /// Reverts the most recently applied move.
    pub fn pop(&mut self) -> Result<Move, EmptyStack> {
        self.position.unmake_move().ok_or(EmptyStack)
    }

    /// The FEN rendering of the current position (§4.F).
    pub fn fen(&self) -> String {
        fen::write(&self.position)
    }

    /// The PDN rendering of the game played so far (§4.F).
    pub fn pdn(&self) -> String {
        pdn::write(&self.position.move_history())
    }

    pub fn is_game_over(&self) -> bool {
        self.legal_moves().is_empty()
            || self.position.is_draw_by_halfmove_rule()
            || self.is_threefold_repetition()
    }

    /// The game's outcome at the current position (§4.D.4, §6).
    pub fn result(&self) -> GameResult {
        if self.legal_moves().is_empty() {
            return match self.side_to_move() {
                Color::White => GameResult::BlackWins,
                Color::Black => GameResult::WhiteWins,
            };
        }

        if self.position.is_draw_by_halfmove_rule() || self.is_threefold_repetition() {
            return GameResult::Draw;
        }

        GameResult::Ongoing
    }

    pub fn is_threefold_repetition(&self) -> bool {
        self.position.is_threefold_repetition()
    }

    /// A shallow copy: bitboards, counters, and hash, with an empty move stack (§6).
    pub fn copy(&self) -> Self {
        Board {
            position: self.position.shallow_copy(),
        }
    }

    /// Counts the reachable leaf positions `depth` plies from here, for perft-style test
    /// validation (§8). Not part of the external API surface (§6); exposed for test/bench use.
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut count = 0;
        for mv in moves.iter() {
            self.push(mv).expect("move drawn from legal_moves() is always legal");
            count += self.perft(depth - 1);
            self.pop().expect("just pushed a move");
        }

        count
    }
}

impl fmt::Display for Board {
    /// An ASCII diagram: one character per playable square in row-major order, wrapping after
    /// every rank. Pieces render as `w`/`W`/`b`/`B`; empty squares as `.`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let half_rank = self.variant().board_side as usize / 2;

        for s in 0..self.variant().squares() {
            let square = Square::from_index(s as u8);

            let cell = match self.piece_at(square) {
                Some(Piece { color: Color::White, role: Role::Man }) => 'w',
                Some(Piece { color: Color::White, role: Role::King }) => 'W',
                Some(Piece { color: Color::Black, role: Role::Man }) => 'b',
                Some(Piece { color: Color::Black, role: Role::King }) => 'B',
                None => '.',
            };

            if s > 0 && s % half_rank == 0 {
                writeln!(f)?;
            }
            write!(f, "{cell}")?;
        }

        Ok(())
    }
}
