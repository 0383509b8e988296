//! Legal move generation (§4.D): mandatory-capture enumeration by depth-first search over capture
//! chains, maximum-capture filtering, and quiet-move enumeration when no capture is available.

use arrayvec::ArrayVec;
use draughts_bootstrap::{BitBoard, Color, Square};

use crate::{
    geometry::{Diagonal, Geometry, Orthogonal, DIAGONALS, ORTHOGONALS},
    position::Position,
    repr::{Move, Piece, Role, MAX_CHAIN},
    variant::Variant,
};

/// The maximum number of distinct legal moves a position can offer. No known draughts position
/// under any supported variant comes close to this; it exists purely so move lists can live on the
/// stack (§4.D.5).
pub const MAX_MOVES: usize = 64;

pub type Moves = ArrayVec<Move, MAX_MOVES>;

/// The full legal move list for the side to move: capture chains if any capture is available
/// (filtered down to maximum-weight chains when the variant mandates it), quiet moves otherwise.
pub fn legal_moves(position: &Position) -> Moves {
    let captures = generate_captures(position);

    if captures.is_empty() {
        generate_quiet(position)
    } else if position.variant().must_capture_maximum {
        filter_to_maximum(position, captures)
    } else {
        captures
    }
}

pub fn is_capture_available(position: &Position) -> bool {
    !generate_captures(position).is_empty()
}

/// Working state for one in-progress capture-chain traversal, threaded through the recursive
/// search rather than mutating the board (captured pieces stay physically in place until the
/// whole move resolves, so the underlying bitboards never need to change mid-traversal).
struct CaptureFrame {
    origin: Square,
    visited: ArrayVec<Square, MAX_CHAIN>,
    captured: ArrayVec<Square, MAX_CHAIN>,
    captured_mask: BitBoard,
    landed_mask: BitBoard,
    current: Square,
    role: Role,
    promoted: bool,
}

impl CaptureFrame {
    fn start(square: Square, role: Role) -> Self {
        let mut visited = ArrayVec::new();
        visited.push(square);

        CaptureFrame {
            origin: square,
            visited,
            captured: ArrayVec::new(),
            captured_mask: BitBoard::EMPTY,
            landed_mask: BitBoard::EMPTY,
            current: square,
            role,
            promoted: false,
        }
    }

    fn extend(&self, captured_square: Square, landing_square: Square, promotes: bool) -> Self {
        let mut visited = self.visited.clone();
        visited.push(landing_square);

        let mut captured = self.captured.clone();
        captured.push(captured_square);

        CaptureFrame {
            origin: self.origin,
            visited,
            captured,
            captured_mask: self.captured_mask | BitBoard::from(captured_square),
            landed_mask: self.landed_mask | BitBoard::from(landing_square),
            current: landing_square,
            role: if promotes { Role::King } else { self.role },
            promoted: self.promoted || promotes,
        }
    }

    fn into_move(self) -> Move {
        Move::chain(self.visited, self.captured, self.promoted)
    }
}

fn generate_captures(position: &Position) -> Moves {
    let color = position.side_to_move();
    let mut out = Moves::new();

    for square in position.men(color).bits() {
        recurse_captures(position, color, CaptureFrame::start(square, Role::Man), &mut out);
    }
    for square in position.kings(color).bits() {
        recurse_captures(position, color, CaptureFrame::start(square, Role::King), &mut out);
    }

    out
}

fn enemy_at(position: &Position, color: Color, square: Square, frame: &CaptureFrame) -> bool {
    if frame.captured_mask.get_bit(square) {
        return false;
    }

    matches!(position.piece_at(square), Some(piece) if piece.color != color)
}

/// Squares currently blocking a landing: every occupied square except the chain's own origin,
/// which the moving piece has vacated for the duration of the move.
fn blockers(position: &Position, frame: &CaptureFrame) -> BitBoard {
    position.occupied() - BitBoard::from(frame.origin)
}

fn recurse_captures(position: &Position, color: Color, frame: CaptureFrame, out: &mut Moves) {
    let geometry = position.geometry();
    let flying = position.variant().flying_kings && frame.role == Role::King;
    let mut found_further = false;

    let diagonals = if frame.role == Role::Man && !position.variant().men_capture_backward {
        geometry.forward_diagonals(color).to_vec()
    } else {
        DIAGONALS.to_vec()
    };

    for dir in diagonals {
        found_further |= try_directions(position, color, geometry, &frame, dir, flying, out);
    }

    if position.variant().orthogonal_captures {
        for dir in ORTHOGONALS {
            found_further |= try_orthogonal(position, color, geometry, &frame, dir, flying, out);
        }
    }

    if !found_further && !frame.captured.is_empty() {
        out.push(frame.into_move());
    }
}

fn promotes_here(position: &Position, color: Color, role: Role, square: Square) -> bool {
    role == Role::Man && position.geometry().promotion_row(color).get_bit(square)
}

/// Tries every capture reachable from `frame.current` along diagonal `dir`: a single short jump
/// for a man or non-flying king, or (when the piece is a flying king) a slide to the first enemy
/// then a landing on any empty square beyond it.
fn try_directions(
    position: &Position,
    color: Color,
    geometry: &Geometry,
    frame: &CaptureFrame,
    dir: Diagonal,
    flying: bool,
    out: &mut Moves,
) -> bool {
    if flying {
        try_flying_diagonal(position, color, geometry, frame, dir, out)
    } else {
        try_short_diagonal(position, color, geometry, frame, dir, out)
    }
}

fn try_short_diagonal(
    position: &Position,
    color: Color,
    geometry: &Geometry,
    frame: &CaptureFrame,
    dir: Diagonal,
    out: &mut Moves,
) -> bool {
    let Some(mid) = geometry.step(dir, frame.current) else {
        return false;
    };
    if !enemy_at(position, color, mid, frame) {
        return false;
    }
    let Some(land) = geometry.step(dir, mid) else {
        return false;
    };

    try_land(position, color, geometry, frame, mid, land, out)
}

fn try_flying_diagonal(
    position: &Position,
    color: Color,
    geometry: &Geometry,
    frame: &CaptureFrame,
    dir: Diagonal,
    out: &mut Moves,
) -> bool {
    let blocked = blockers(position, frame);
    let mut jumped: Option<Square> = None;
    let mut found = false;

    for &square in geometry.ray(dir, frame.current) {
        if square == frame.origin {
            continue;
        }

        if !blocked.get_bit(square) {
            if let Some(mid) = jumped {
                found |= try_land(position, color, geometry, frame, mid, square, out);
            }
            continue;
        }

        if jumped.is_some() {
            break;
        }

        if enemy_at(position, color, square, frame) {
            jumped = Some(square);
        } else {
            break;
        }
    }

    found
}

fn try_orthogonal(
    position: &Position,
    color: Color,
    geometry: &Geometry,
    frame: &CaptureFrame,
    dir: Orthogonal,
    flying: bool,
    out: &mut Moves,
) -> bool {
    if flying {
        let blocked = blockers(position, frame);
        let mut jumped: Option<Square> = None;
        let mut found = false;

        for &square in geometry.ray_ortho(dir, frame.current) {
            if square == frame.origin {
                continue;
            }

            if !blocked.get_bit(square) {
                if let Some(mid) = jumped {
                    found |= try_land(position, color, geometry, frame, mid, square, out);
                }
                continue;
            }

            if jumped.is_some() {
                break;
            }

            if enemy_at(position, color, square, frame) {
                jumped = Some(square);
            } else {
                break;
            }
        }

        found
    } else {
        let Some(mid) = geometry.step_ortho(dir, frame.current) else {
            return false;
        };
        if !enemy_at(position, color, mid, frame) {
            return false;
        }
        let Some(land) = geometry.step_ortho(dir, mid) else {
            return false;
        };

        try_land(position, color, geometry, frame, mid, land, out)
    }
}

fn try_land(
    position: &Position,
    color: Color,
    _geometry: &Geometry,
    frame: &CaptureFrame,
    captured_square: Square,
    landing_square: Square,
    out: &mut Moves,
) -> bool {
    if frame.landed_mask.get_bit(landing_square) {
        return false;
    }

    let blocked = blockers(position, frame);
    if blocked.get_bit(landing_square) {
        return false;
    }

    let promotes = promotes_here(position, color, frame.role, landing_square);
    let next = frame.extend(captured_square, landing_square, promotes);

    if promotes && !position.variant().flying_on_promotion {
        // American/Russian-rule: the chain stops dead the instant a man reaches the promotion
        // row, even if a further capture would otherwise be available.
        out.push(next.into_move());
    } else {
        recurse_captures(position, color, next, out);
    }

    true
}

fn generate_quiet(position: &Position) -> Moves {
    let geometry = position.geometry();
    let color = position.side_to_move();
    let occupied = position.occupied();
    let mut out = Moves::new();

    for square in position.men(color).bits() {
        for dir in geometry.forward_diagonals(color) {
            if let Some(to) = geometry.step(dir, square) {
                if !occupied.get_bit(to) {
                    let promoted = geometry.promotion_row(color).get_bit(to);
                    out.push(Move::quiet(square, to, promoted));
                }
            }
        }
    }

    for square in position.kings(color).bits() {
        for dir in DIAGONALS {
            if position.variant().flying_kings {
                for &to in geometry.ray(dir, square) {
                    if occupied.get_bit(to) {
                        break;
                    }
                    out.push(Move::quiet(square, to, false));
                }
            } else if let Some(to) = geometry.step(dir, square) {
                if !occupied.get_bit(to) {
                    out.push(Move::quiet(square, to, false));
                }
            }
        }
    }

    out
}

/// Keeps only the chains tied for maximum captured-set cardinality (§4.D step 3), then — among
/// those — the ones tied for maximum capture weight, where a man is worth `1.0` and a king is
/// worth `variant.capture_weight_king` (Frisian's tie-break; every other variant leaves this at
/// `1.0`, making the weight pass a no-op). Weight only ever breaks ties *within* the max-cardinality
/// set (§4.D.2): a 3-man chain always beats a 2-king chain, even when 2 * capture_weight_king would
/// outweigh it.
fn filter_to_maximum(position: &Position, moves: Moves) -> Moves {
    let variant = position.variant();

    let Some(max_cardinality) = moves.iter().map(|mv| mv.captured().len()).max() else {
        return moves;
    };

    let weight = |mv: &Move| -> f32 {
        mv.captured()
            .iter()
            .map(|&square| match position.piece_at(square) {
                Some(Piece { role: Role::King, .. }) => variant.capture_weight_king,
                _ => 1.0,
            })
            .sum()
    };

    let longest: Moves = moves
        .into_iter()
        .filter(|mv| mv.captured().len() == max_cardinality)
        .collect();

    let max_weight = longest
        .iter()
        .map(weight)
        .fold(f32::MIN, f32::max);

    longest.into_iter().filter(|mv| weight(mv) >= max_weight - f32::EPSILON).collect()
}

#[cfg(test)]
mod tests {
    use draughts_bootstrap::Color;

    use super::*;

    fn sq(index: u8) -> Square {
        Square::from_index(index)
    }

    fn dummy_chain(visited: &[u8], captured: &[u8]) -> Move {
        Move::chain(
            visited.iter().map(|&s| sq(s)).collect(),
            captured.iter().map(|&s| sq(s)).collect(),
            false,
        )
    }

    /// Frisian's king capture weight (1.5) makes a 2-king chain (weight 3.0) tie a 3-man chain
    /// (weight 3.0) by weight alone. Cardinality must still win: only the 3-man chain is legal,
    /// the weight only breaks ties *within* the max-cardinality set (§4.D step 3, §4.D.2).
    #[test]
    fn cardinality_beats_a_weight_tie_under_frisian_rules() {
        let variant = Variant::frisian();
        let mut position = Position::empty(variant);

        // A 3-man chain: cardinality 3, weight 3.0 (man weight is always 1.0).
        position.place(Piece::new(Color::Black, Role::Man), sq(10));
        position.place(Piece::new(Color::Black, Role::Man), sq(11));
        position.place(Piece::new(Color::Black, Role::Man), sq(12));
        let three_men = dummy_chain(&[0, 1, 2, 3], &[10, 11, 12]);

        // A 2-king chain: cardinality 2, weight 2 * 1.5 = 3.0 — tied with the chain above by
        // weight, but strictly shorter.
        position.place(Piece::new(Color::Black, Role::King), sq(20));
        position.place(Piece::new(Color::Black, Role::King), sq(21));
        let two_kings = dummy_chain(&[4, 5, 6], &[20, 21]);

        let mut moves = Moves::new();
        moves.push(three_men.clone());
        moves.push(two_kings);

        let filtered = filter_to_maximum(&position, moves);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0], three_men);
    }
}
