//! FEN reading and writing (§4.F): `"[H]:[Side]:[WhiteList]:[BlackList]"`, where each list is a
//! comma-separated `K?<number>` sequence of 1-based playable-square indices. The halfmove-clock
//! field is optional on read (a bare `Side:WhiteList:BlackList` defaults it to zero) but always
//! written, so `from_fen(fen(p)) == p` round-trips regardless of which shape a caller fed in.

use std::str::FromStr;

use draughts_bootstrap::{Color, Square};

use crate::{
    error::ParseFenError,
    position::Position,
    repr::{Piece, Role},
    variant::Variant,
};

pub fn parse(variant: Variant, text: &str) -> Result<Position, ParseFenError> {
    let parts: Vec<&str> = text.split(':').collect();

    let (halfmove_field, side_field, white_field, black_field) = match parts.as_slice() {
        [halfmove, side, white, black] => (Some(*halfmove), *side, *white, *black),
        [side, white, black] => (None, *side, *white, *black),
        _ => return Err(ParseFenError::MalformedShape(text.to_string())),
    };

    let halfmove_clock = match halfmove_field {
        Some(field) => field
            .parse::<u32>()
            .map_err(|_| ParseFenError::InvalidHalfmoveClock(field.to_string()))?,
        None => 0,
    };

    let side =
        Color::from_str(side_field).map_err(|_| ParseFenError::InvalidSide(side_field.to_string()))?;

    let mut position = Position::empty(variant);
    parse_piece_list(white_field, Color::White, &variant, &mut position)?;
    parse_piece_list(black_field, Color::Black, &variant, &mut position)?;
    position.set_side_to_move(side);
    position.set_halfmove_clock(halfmove_clock);

    Ok(position)
}

fn parse_piece_list(
    field: &str,
    color: Color,
    variant: &Variant,
    position: &mut Position,
) -> Result<(), ParseFenError> {
    let marker = match color {
        Color::White => 'W',
        Color::Black => 'B',
    };
    let rest = field.strip_prefix(marker).unwrap_or(field);

    if rest.is_empty() {
        return Ok(());
    }

    for entry in rest.split(',') {
        let (is_king, number_field) = match entry.strip_prefix('K') {
            Some(rest) => (true, rest),
            None => (false, entry),
        };

        let number: u32 = number_field
            .parse()
            .map_err(|_| ParseFenError::MalformedEntry(entry.to_string()))?;

        if number == 0 || number as usize > variant.squares() {
            return Err(ParseFenError::SquareOutOfRange(entry.to_string(), number));
        }

        let square = Square::from_notation(number as u8)
            .map_err(|_| ParseFenError::SquareOutOfRange(entry.to_string(), number))?;

        if position.piece_at(square).is_some() {
            return Err(ParseFenError::DuplicateSquare(number));
        }

        let role = if is_king { Role::King } else { Role::Man };
        position.place(Piece::new(color, role), square);
    }

    Ok(())
}

pub fn write(position: &Position) -> String {
    format!(
        "{}:{}:{}:{}",
        position.halfmove_clock(),
        position.side_to_move(),
        format_piece_list(position, Color::White),
        format_piece_list(position, Color::Black),
    )
}

fn format_piece_list(position: &Position, color: Color) -> String {
    let marker = match color {
        Color::White => 'W',
        Color::Black => 'B',
    };

    let mut entries: Vec<(u8, String)> = Vec::new();

    for square in position.men(color).bits() {
        entries.push((square.to_notation(), square.to_notation().to_string()));
    }
    for square in position.kings(color).bits() {
        entries.push((square.to_notation(), format!("K{}", square.to_notation())));
    }

    entries.sort_by_key(|(number, _)| *number);

    let list = entries
        .into_iter()
        .map(|(_, rendered)| rendered)
        .collect::<Vec<_>>()
        .join(",");

    format!("{marker}{list}")
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("W:W22:B17,18"; "bare shape, no halfmove field")]
    #[test_case("0:W:W22:B17,18"; "explicit halfmove field")]
    fn parses_without_error(fen: &str) {
        parse(Variant::american(), fen).unwrap();
    }

    #[test]
    fn round_trips_through_write() {
        let position = parse(Variant::american(), "5:B:W22,K30:B17,18").unwrap();
        let rendered = write(&position);
        let reparsed = parse(Variant::american(), &rendered).unwrap();

        assert_eq!(position, reparsed);
    }

    #[test]
    fn rejects_duplicate_square() {
        let err = parse(Variant::american(), "W:W22:B22").unwrap_err();
        assert!(matches!(err, ParseFenError::DuplicateSquare(22)));
    }

    #[test]
    fn rejects_out_of_range_square() {
        let err = parse(Variant::american(), "W:W99:B1").unwrap_err();
        assert!(matches!(err, ParseFenError::SquareOutOfRange(_, 99)));
    }

    #[test]
    fn rejects_malformed_shape() {
        let err = parse(Variant::american(), "W:W22").unwrap_err();
        assert!(matches!(err, ParseFenError::MalformedShape(_)));
    }
}
