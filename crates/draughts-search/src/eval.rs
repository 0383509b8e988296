//! Static evaluation (§4.H): material, advancement/centralization piece-square tables, and a
//! tempo bonus, all side-to-move-relative. The exact constants are an open question the distilled
//! spec leaves to sign and relative magnitude only; this crate commits to concrete values (see
//! `DESIGN.md`) and exposes them as `pub const`s so an embedding crate can reference or override
//! them without forking the evaluator.

use draughts_bootstrap::{Color, Square};
use draughts_core::{Geometry, Position, Role};

use crate::score::Score;

pub const MATERIAL_MAN: Score = 100;
pub const MATERIAL_KING: Score = 300;

/// Tempo bonus awarded to the side to move.
pub const TEMPO: Score = 5;

/// Ceiling on the magnitude of a piece-square bonus, per §4.H.
pub const MAX_PSQ: Score = 30;

/// A man's piece-square bonus rewards advancement toward its promotion row: `rank` counted from
/// its own baseline, scaled linearly up to [`MAX_PSQ`] at the row just short of promotion.
fn man_psq(geometry: &Geometry, color: Color, square: Square) -> Score {
    let board_side = geometry.board_side() as i32;
    let rank = geometry.rank(square) as i32;

    let advancement = match color {
        Color::White => board_side - 1 - rank,
        Color::Black => rank,
    };

    // `advancement` ranges 0..=board_side-2 for a man (it promotes before reaching board_side-1
    // as a man), so this never exceeds MAX_PSQ.
    (advancement * MAX_PSQ) / (board_side - 1)
}

/// A king's piece-square bonus rewards centralization: distance from the nearest edge, scaled to
/// [`MAX_PSQ`] at the board's center files/ranks.
fn king_psq(geometry: &Geometry, square: Square) -> Score {
    let board_side = geometry.board_side() as i32;
    let half = board_side / 2;

    let rank = geometry.rank(square) as i32;
    let file = geometry.file(square) as i32;
    // `file` is already halved (one entry per playable square per rank); center distance is
    // measured from the middle of each axis.
    let rank_distance = (rank - (board_side - 1) / 2).abs();
    let file_distance = (file - (half - 1) / 2).abs();

    let max_distance = half.max(board_side / 2);
    let centrality = max_distance - rank_distance.max(file_distance);

    (centrality.max(0) * MAX_PSQ) / max_distance.max(1)
}

fn side_score(position: &Position, geometry: &Geometry, color: Color) -> Score {
    let mut score = 0;

    score += position.men(color).count_ones() as Score * MATERIAL_MAN;
    score += position.kings(color).count_ones() as Score * MATERIAL_KING;

    for square in position.men(color).bits() {
        score += man_psq(geometry, color, square);
    }
    for square in position.kings(color).bits() {
        score += king_psq(geometry, square);
    }

    score
}

/// The static evaluation of `position`, relative to the side to move: positive means the side to
/// move stands better.
pub fn evaluate(position: &Position) -> Score {
    let geometry = position.geometry();
    let side = position.side_to_move();

    let own = side_score(position, geometry, side) + TEMPO;
    let opponent = side_score(position, geometry, !side);

    own - opponent
}

#[cfg(test)]
mod tests {
    use super::*;
    use draughts_core::{Piece, Variant};

    #[test]
    fn symmetric_position_favors_only_the_side_to_move_by_tempo() {
        let position = Position::new(Variant::international());
        assert_eq!(evaluate(&position), TEMPO);
    }

    #[test]
    fn an_extra_king_outweighs_tempo() {
        let variant = Variant::american();
        let mut position = Position::empty(variant);
        position.place(Piece::new(Color::White, Role::King), Square::from_notation(1).unwrap());
        position.place(Piece::new(Color::Black, Role::Man), Square::from_notation(32).unwrap());

        assert!(evaluate(&position) > 0);
    }

    #[test]
    fn psq_bonuses_never_exceed_the_configured_ceiling() {
        let geometry = Geometry::get(&Variant::international());

        for s in 0..geometry.squares() as u8 {
            let square = Square::from_index(s);
            assert!(man_psq(&geometry, Color::White, square).abs() <= MAX_PSQ);
            assert!(king_psq(&geometry, square).abs() <= MAX_PSQ);
        }
    }
}
