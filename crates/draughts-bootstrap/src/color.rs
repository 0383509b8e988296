use std::{
    fmt::{self, Display},
    ops::Not,
    str::FromStr,
};

/// A side in a draughts game, either [`White`](Color::White) or [`Black`](Color::Black). White
/// always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Not for Color {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

impl FromStr for Color {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "W" => Ok(Color::White),
            "B" => Ok(Color::Black),
            _ => Err("side marker must be 'W' or 'B'"),
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => 'W',
            Color::Black => 'B',
        }
        .fmt(f)
    }
}
