//! PDN reading and writing (§4.F): a move list `"N. WhiteMove BlackMove N+1. …"`, where a ply is
//! `a-b` (quiet) or `a x b [x c …]` (capture). The writer always emits the
//! visited-sequence-only dialect; the reader tolerates either dialect by matching the parsed
//! square sequence against the legal moves available in the position the ply is played from.

use draughts_bootstrap::Square;

use crate::{
    board::Board,
    error::{AmbiguousNotation, ParsePdnError},
    movegen,
    position::Position,
    repr::Move,
};

/// Renders a finished game's move list in the writer's canonical dialect.
pub fn write(moves: &[Move]) -> String {
    let mut out = String::new();

    for (i, pair) in moves.chunks(2).enumerate() {
        if i > 0 {
            out.push(' ');
        }

        out.push_str(&format!("{}. {}", i + 1, pair[0]));

        if let Some(black_move) = pair.get(1) {
            out.push(' ');
            out.push_str(&black_move.to_string());
        }
    }

    out
}

/// Replays a PDN move list onto `board`, one ply at a time, stopping at the first error.
pub fn replay(board: &mut Board, text: &str) -> Result<(), ParsePdnError> {
    for token in text.split_whitespace() {
        if token.ends_with('.') {
            let number = token.trim_end_matches('.');

            if number.parse::<u32>().map_or(true, |n| n == 0) {
                return Err(ParsePdnError::InvalidMoveNumber(token.to_string()));
            }

            continue;
        }

        let mv = parse_ply(board.position(), token)?;
        board
            .push(&mv)
            .expect("parse_ply only returns moves drawn from legal_moves()");
    }

    Ok(())
}

/// Parses one ply (`a-b` or `a x b [x c ...]`) and resolves it, unambiguously, against the legal
/// moves available in `position`.
pub fn parse_ply(position: &Position, notation: &str) -> Result<Move, ParsePdnError> {
    let is_capture = notation.contains('x');
    let separator = if is_capture { 'x' } else { '-' };

    let mut squares = Vec::new();
    for field in notation.split(separator) {
        let number: u8 = field
            .parse()
            .map_err(|_| ParsePdnError::MalformedPly(notation.to_string()))?;
        let square = Square::from_notation(number)
            .map_err(|_| ParsePdnError::SquareOutOfRange(notation.to_string(), number as u32))?;
        squares.push(square);
    }

    if squares.len() < 2 || (!is_capture && squares.len() != 2) {
        return Err(ParsePdnError::MalformedPly(notation.to_string()));
    }

    // Two readings of the same token list: the writer's visited-sequence-only dialect (every
    // token is a square the piece lands on), and a dialect that additionally interleaves the
    // captured square before each landing (`origin x captured x landing x ...`). Both are tried;
    // a ply is accepted only if exactly one legal move matches either reading.
    let visited_only = squares.clone();
    let alternating: Vec<Square> = squares.iter().step_by(2).copied().collect();

    let legal = movegen::legal_moves(position);
    let mut matches: Vec<Move> = Vec::new();

    for candidate in legal.iter() {
        let hits = candidate.visited() == visited_only.as_slice()
            || candidate.visited() == alternating.as_slice();

        if hits && !matches.iter().any(|already| already == candidate) {
            matches.push(candidate.clone());
        }
    }

    match matches.len() {
        0 => Err(ParsePdnError::NoMatch(notation.to_string())),
        1 => Ok(matches.into_iter().next().unwrap()),
        candidates => Err(ParsePdnError::Ambiguous(AmbiguousNotation {
            notation: notation.to_string(),
            candidates,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::Variant;

    #[test]
    fn parses_quiet_opening_ply() {
        let board = Board::new(Variant::international());
        let mv = parse_ply(board.position(), "31-26").unwrap();

        assert_eq!(mv.origin(), Square::from_notation(31).unwrap());
        assert_eq!(mv.destination(), Square::from_notation(26).unwrap());
        assert!(!mv.is_capture());
    }

    #[test]
    fn rejects_unmatched_ply() {
        let board = Board::new(Variant::international());
        let err = parse_ply(board.position(), "31-20").unwrap_err();

        assert!(matches!(err, ParsePdnError::NoMatch(_)));
    }

    #[test]
    fn writes_move_pairs_with_move_numbers() {
        let board = Board::new(Variant::international());
        let mv = parse_ply(board.position(), "31-26").unwrap();

        assert_eq!(write(&[mv]), "1. 31-26");
    }
}
