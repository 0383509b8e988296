use thiserror::Error;

use crate::repr::Move;

/// Raised by [`Board::push`](crate::Board::push) when the supplied move is not a member of
/// `legal_moves()` for the current position. `push` never partially mutates the board when this
/// is returned.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("move {attempted} is not legal in the current position")]
pub struct IllegalMove {
    pub attempted: Move,
}

/// Raised when a FEN string doesn't parse, per the grammar in §4.F.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseFenError {
    #[error("FEN must have the shape \"[halfmove]:[side]:[white]:[black]\", got {0:?}")]
    MalformedShape(String),
    #[error("FEN side marker must be 'W' or 'B', got {0:?}")]
    InvalidSide(String),
    #[error("FEN halfmove-clock field {0:?} is not a non-negative integer")]
    InvalidHalfmoveClock(String),
    #[error("FEN piece-list entry {0:?} is not of the form \"K?<number>\"")]
    MalformedEntry(String),
    #[error("FEN piece-list entry {0:?} names square {1}, out of range for this variant")]
    SquareOutOfRange(String, u32),
    #[error("FEN assigns square {0} to both sides")]
    DuplicateSquare(u32),
}

/// Raised when a PDN move list doesn't parse, per the grammar in §4.F.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParsePdnError {
    #[error("PDN move number {0:?} is not a positive integer")]
    InvalidMoveNumber(String),
    #[error("PDN ply {0:?} is not of the form \"a-b\" or \"a x b [x c ...]\"")]
    MalformedPly(String),
    #[error("PDN ply {0:?} names square {1}, out of range for this variant")]
    SquareOutOfRange(String, u32),
    #[error(transparent)]
    Ambiguous(#[from] AmbiguousNotation),
    #[error("PDN ply {0:?} does not match any legal move in the position it's played from")]
    NoMatch(String),
}

/// Raised when a textual ply matches more than one legal move and so cannot be disambiguated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("notation {notation:?} matches {candidates} legal moves; expected exactly one")]
pub struct AmbiguousNotation {
    pub notation: String,
    pub candidates: usize,
}

/// Raised by `pop()` when the move stack is empty.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Default)]
#[error("pop() called with no prior push()")]
pub struct EmptyStack;

/// Umbrella error for callers who'd rather match one `Result<_, BoardError>` than each granular
/// error type individually. Every public fallible operation's error type converts into this one.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum BoardError {
    #[error(transparent)]
    IllegalMove(#[from] IllegalMove),
    #[error(transparent)]
    ParseFen(#[from] ParseFenError),
    #[error(transparent)]
    ParsePdn(#[from] ParsePdnError),
    #[error(transparent)]
    Ambiguous(#[from] AmbiguousNotation),
    #[error(transparent)]
    EmptyStack(#[from] EmptyStack),
}

#[cfg(test)]
mod tests {
    use draughts_bootstrap::Square;

    use super::*;

    fn square(index: u8) -> Square {
        Square::from_index(index)
    }

    #[test]
    fn illegal_move_display_names_the_attempted_move() {
        let err = IllegalMove {
            attempted: Move::quiet(square(0), square(1), false),
        };

        assert!(err.to_string().contains(&Move::quiet(square(0), square(1), false).to_string()));
    }

    #[test]
    fn parse_fen_error_display_contains_offending_substring() {
        assert!(ParseFenError::MalformedShape("garbage".into())
            .to_string()
            .contains("garbage"));
        assert!(ParseFenError::InvalidSide("X".into()).to_string().contains("X"));
        assert!(ParseFenError::InvalidHalfmoveClock("-1".into())
            .to_string()
            .contains("-1"));
        assert!(ParseFenError::MalformedEntry("K".into()).to_string().contains('K'));
        assert!(ParseFenError::SquareOutOfRange("99".into(), 99)
            .to_string()
            .contains("99"));
        assert!(ParseFenError::DuplicateSquare(7).to_string().contains('7'));
    }

    #[test]
    fn parse_pdn_error_display_contains_offending_substring() {
        assert!(ParsePdnError::InvalidMoveNumber("x".into()).to_string().contains('x'));
        assert!(ParsePdnError::MalformedPly("1~2".into()).to_string().contains("1~2"));
        assert!(ParsePdnError::SquareOutOfRange("99-1".into(), 99)
            .to_string()
            .contains("99"));
        assert!(ParsePdnError::NoMatch("1-2".into()).to_string().contains("1-2"));

        let ambiguous = AmbiguousNotation {
            notation: "1x2".into(),
            candidates: 3,
        };
        let wrapped = ParsePdnError::from(ambiguous.clone());
        assert!(wrapped.to_string().contains(&ambiguous.to_string()));
    }

    #[test]
    fn ambiguous_notation_display_contains_notation_and_count() {
        let err = AmbiguousNotation {
            notation: "12x18".into(),
            candidates: 2,
        };

        let rendered = err.to_string();
        assert!(rendered.contains("12x18"));
        assert!(rendered.contains('2'));
    }

    #[test]
    fn empty_stack_display_is_stable() {
        assert_eq!(EmptyStack.to_string(), "pop() called with no prior push()");
    }

    #[test]
    fn board_error_forwards_the_wrapped_displays() {
        let fen_err = BoardError::from(ParseFenError::InvalidSide("Q".into()));
        assert!(fen_err.to_string().contains('Q'));

        let stack_err = BoardError::from(EmptyStack);
        assert_eq!(stack_err.to_string(), EmptyStack.to_string());
    }
}
