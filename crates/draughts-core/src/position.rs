use std::sync::Arc;

use draughts_bootstrap::{BitBoard, Color, Square, ZOBRIST};

use crate::{
    cache::CacheHash,
    geometry::Geometry,
    repr::{Move, Piece, Role},
    variant::Variant,
};

fn piece_key(piece: Piece, square: Square) -> u64 {
    let table = match (piece.color, piece.role) {
        (Color::White, Role::Man) => &ZOBRIST.pieces.white_man,
        (Color::White, Role::King) => &ZOBRIST.pieces.white_king,
        (Color::Black, Role::Man) => &ZOBRIST.pieces.black_man,
        (Color::Black, Role::King) => &ZOBRIST.pieces.black_king,
    };

    table[square.as_index()]
}

fn side_key(color: Color) -> u64 {
    match color {
        Color::White => ZOBRIST.side.white_to_move,
        Color::Black => ZOBRIST.side.black_to_move,
    }
}

/// One ply's worth of state needed to restore a [`Position`] exactly, pushed onto the move stack
/// by [`Position::make_move`] and popped by [`Position::unmake_move`]. The bitboards, hash, and
/// halfmove clock are cheap to snapshot wholesale (a handful of `u64`s), so undo restores them
/// directly rather than re-deriving each field via an inverse XOR sequence — the result is the
/// same bit-identical position either way (§4.E).
#[derive(Debug, Clone)]
struct UndoRecord {
    mv: Move,
    pre_wm: BitBoard,
    pre_wk: BitBoard,
    pre_bm: BitBoard,
    pre_bk: BitBoard,
    pre_hash: u64,
    pre_halfmove_clock: u32,
    pre_repetition_len: usize,
}

/// The board-state half of the data model in §3.3: four bitboards, the side to move, draw-rule
/// counters, repetition history, and an incrementally-maintained Zobrist hash. Does not itself
/// know the legal-move rules (those live in [`crate::movegen`]); it only knows how to apply and
/// revert an already-decided [`Move`].
#[derive(Debug, Clone)]
pub struct Position {
    variant: Variant,
    geometry: Arc<Geometry>,
    wm: BitBoard,
    wk: BitBoard,
    bm: BitBoard,
    bk: BitBoard,
    side_to_move: Color,
    halfmove_clock: u32,
    hash: u64,
    repetition_history: Vec<u64>,
    move_stack: Vec<UndoRecord>,
}

impl Position {
    /// The canonical starting position for `variant`: men fill the first three ranks on each
    /// side's half of the board (dark squares only), with an empty gap between them, white to
    /// move.
    pub fn new(variant: Variant) -> Self {
        let geometry = Geometry::get(&variant);
        let squares = geometry.squares();
        let men_rows = variant.board_side as usize / 2 - 1;

        let mut wm = BitBoard::EMPTY;
        let mut bm = BitBoard::EMPTY;

        for s in 0..squares {
            let row_from_bottom = (variant.board_side as u8 - 1 - geometry.rank(Square::from_index(s as u8))) as usize;

            if row_from_bottom < men_rows {
                wm.toggle_bit(Square::from_index(s as u8));
            } else if (geometry.rank(Square::from_index(s as u8)) as usize) < men_rows {
                bm.toggle_bit(Square::from_index(s as u8));
            }
        }

        let mut position = Position {
            variant,
            geometry,
            wm,
            wk: BitBoard::EMPTY,
            bm,
            bk: BitBoard::EMPTY,
            side_to_move: Color::White,
            halfmove_clock: 0,
            hash: 0,
            repetition_history: Vec::new(),
            move_stack: Vec::new(),
        };

        position.hash = position.recompute_hash();
        position
    }

    /// Builds an empty position for `variant` (no pieces placed), white to move. Used by the FEN
    /// reader, which places pieces itself.
    pub fn empty(variant: Variant) -> Self {
        let geometry = Geometry::get(&variant);

        Position {
            variant,
            geometry,
            wm: BitBoard::EMPTY,
            wk: BitBoard::EMPTY,
            bm: BitBoard::EMPTY,
            bk: BitBoard::EMPTY,
            side_to_move: Color::White,
            halfmove_clock: 0,
            hash: 0,
            repetition_history: Vec::new(),
            move_stack: Vec::new(),
        }
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    pub fn geometry(&self) -> &Arc<Geometry> {
        &self.geometry
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn men(&self, color: Color) -> BitBoard {
        match color {
            Color::White => self.wm,
            Color::Black => self.bm,
        }
    }

    pub fn kings(&self, color: Color) -> BitBoard {
        match color {
            Color::White => self.wk,
            Color::Black => self.bk,
        }
    }

    pub fn all(&self, color: Color) -> BitBoard {
        self.men(color) + self.kings(color)
    }

    pub fn occupied(&self) -> BitBoard {
        self.wm + self.wk + self.bm + self.bk
    }

    pub fn empty_squares(&self) -> BitBoard {
        self.geometry.full_mask() - self.occupied()
    }

    pub fn piece_count(&self, color: Color) -> u32 {
        self.all(color).count_ones()
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        let bit = BitBoard::from(square);

        if (self.wm & bit) != BitBoard::EMPTY {
            Some(Piece::new(Color::White, Role::Man))
        } else if (self.wk & bit) != BitBoard::EMPTY {
            Some(Piece::new(Color::White, Role::King))
        } else if (self.bm & bit) != BitBoard::EMPTY {
            Some(Piece::new(Color::Black, Role::Man))
        } else if (self.bk & bit) != BitBoard::EMPTY {
            Some(Piece::new(Color::Black, Role::King))
        } else {
            None
        }
    }

    pub fn hash_key(&self) -> u64 {
        self.hash
    }

    pub fn move_stack_len(&self) -> usize {
        self.move_stack.len()
    }

    /// Places `piece` on `square`. Only meaningful on a position built via [`Position::empty`],
    /// before any move has been pushed; used by the FEN reader.
    pub fn place(&mut self, piece: Piece, square: Square) {
        let board = self.board_mut(piece.color, piece.role);
        board.toggle_bit(square);
        self.hash ^= piece_key(piece, square);
    }

    pub fn set_side_to_move(&mut self, color: Color) {
        if color != self.side_to_move {
            self.hash ^= side_key(self.side_to_move) ^ side_key(color);
            self.side_to_move = color;
        }
    }

    pub fn set_halfmove_clock(&mut self, clock: u32) {
        self.halfmove_clock = clock;
    }

    fn board_mut(&mut self, color: Color, role: Role) -> &mut BitBoard {
        match (color, role) {
            (Color::White, Role::Man) => &mut self.wm,
            (Color::White, Role::King) => &mut self.wk,
            (Color::Black, Role::Man) => &mut self.bm,
            (Color::Black, Role::King) => &mut self.bk,
        }
    }

    fn toggle_piece(&mut self, piece: Piece, square: Square) {
        self.board_mut(piece.color, piece.role).toggle_bit(square);
        self.hash ^= piece_key(piece, square);
    }

    fn recompute_hash(&self) -> u64 {
        let mut hash = 0u64;

        for square in self.wm.bits() {
            hash ^= piece_key(Piece::new(Color::White, Role::Man), square);
        }
        for square in self.wk.bits() {
            hash ^= piece_key(Piece::new(Color::White, Role::King), square);
        }
        for square in self.bm.bits() {
            hash ^= piece_key(Piece::new(Color::Black, Role::Man), square);
        }
        for square in self.bk.bits() {
            hash ^= piece_key(Piece::new(Color::Black, Role::King), square);
        }

        // The starting position (white to move) carries no side-key contribution at all; every
        // toggle since then XORs in *both* side keys at once (see `make_move`/`set_side_to_move`),
        // so an odd number of toggles — i.e. black to move — leaves both keys XORed in, not just
        // black's.
        if self.side_to_move == Color::Black {
            hash ^= side_key(Color::White) ^ side_key(Color::Black);
        }

        hash
    }

    /// Recomputes the hash from scratch and compares it to the incrementally-maintained one —
    /// the invariant asserted in §3.3 and tested directly in §8.
    pub fn hash_is_consistent(&self) -> bool {
        self.recompute_hash() == self.hash
    }

    /// Applies `mv`, trusting the caller that it is legal for the side to move (§4.E). The public,
    /// validating entry point is [`crate::Board::push`].
    pub fn make_move(&mut self, mv: &Move) {
        let side = self.side_to_move;
        let moving_piece = self
            .piece_at(mv.origin())
            .expect("make_move called with a move whose origin holds no piece");

        let record = UndoRecord {
            mv: mv.clone(),
            pre_wm: self.wm,
            pre_wk: self.wk,
            pre_bm: self.bm,
            pre_bk: self.bk,
            pre_hash: self.hash,
            pre_halfmove_clock: self.halfmove_clock,
            pre_repetition_len: self.repetition_history.len(),
        };

        // 1-2: remove the moving piece from its source square.
        self.toggle_piece(moving_piece, mv.origin());

        // 3: remove each captured piece.
        for &captured_square in mv.captured() {
            let captured_piece = self
                .piece_at(captured_square)
                .expect("captured square named by a move must hold an enemy piece");
            self.toggle_piece(captured_piece, captured_square);
        }

        // 4: place the moving piece at its destination, promoting if it lands on the promotion
        // row. Folding the promotion into one placement (rather than placing a man then
        // separately upgrading it) nets the identical hash, since the intermediate XORs would
        // cancel.
        let final_role = if moving_piece.role == Role::Man
            && self.geometry.promotion_row(side).get_bit(mv.destination())
        {
            Role::King
        } else {
            moving_piece.role
        };
        self.toggle_piece(Piece::new(side, final_role), mv.destination());

        // 5: toggle side to move.
        self.hash ^= side_key(side) ^ side_key(!side);
        self.side_to_move = !side;

        // 6: irreversible-move bookkeeping.
        let irreversible = mv.is_capture() || moving_piece.role == Role::Man;
        if irreversible {
            self.halfmove_clock = 0;
            self.repetition_history.clear();
        } else {
            self.halfmove_clock += 1;
        }
        self.repetition_history.push(self.hash);

        // 7.
        self.move_stack.push(record);
    }

    /// Reverts the most recently applied move, restoring the position bit-for-bit, or returns
    /// `None` if the move stack is empty.
    pub fn unmake_move(&mut self) -> Option<Move> {
        let record = self.move_stack.pop()?;

        self.wm = record.pre_wm;
        self.wk = record.pre_wk;
        self.bm = record.pre_bm;
        self.bk = record.pre_bk;
        self.hash = record.pre_hash;
        self.halfmove_clock = record.pre_halfmove_clock;
        self.repetition_history.truncate(record.pre_repetition_len);
        self.side_to_move = !self.side_to_move;

        Some(record.mv)
    }

    /// Whether the current hash has appeared at least three times in the repetition window since
    /// the last irreversible move (§4.D.4).
    pub fn is_threefold_repetition(&self) -> bool {
        self.repetition_history
            .iter()
            .filter(|&&h| h == self.hash)
            .count()
            >= 3
    }

    /// Whether the variant's k-moves draw-rule threshold has been reached.
    pub fn is_draw_by_halfmove_rule(&self) -> bool {
        matches!(self.variant.draw_rule_halfmoves, Some(limit) if self.halfmove_clock >= limit as u32)
    }

    /// Whether `square` holds no piece.
    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    /// The moves applied so far, oldest first, as recorded on the move stack. Used by
    /// `Board::pdn` to render a game's move list without threading a separate history alongside
    /// the position.
    pub fn move_history(&self) -> Vec<Move> {
        self.move_stack.iter().map(|record| record.mv.clone()).collect()
    }

    /// The move number a PDN rendering would currently be on: plies played so far, two per full
    /// move, one-based.
    pub fn fullmove_number(&self) -> u32 {
        self.move_stack.len() as u32 / 2 + 1
    }

    /// A shallow copy: bitboards, counters, and hash, with an empty move stack (§6: `Board.copy`).
    pub fn shallow_copy(&self) -> Self {
        Position {
            variant: self.variant,
            geometry: Arc::clone(&self.geometry),
            wm: self.wm,
            wk: self.wk,
            bm: self.bm,
            bk: self.bk,
            side_to_move: self.side_to_move,
            halfmove_clock: self.halfmove_clock,
            hash: self.hash,
            repetition_history: self.repetition_history.clone(),
            move_stack: Vec::new(),
        }
    }
}

impl CacheHash for Position {
    fn hash(&self) -> u64 {
        self.hash
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.wm == other.wm
            && self.wk == other.wk
            && self.bm == other.bm
            && self.bk == other.bk
            && self.side_to_move == other.side_to_move
            && self.halfmove_clock == other.halfmove_clock
            && self.hash == other.hash
    }
}
