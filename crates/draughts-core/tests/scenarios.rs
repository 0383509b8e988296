//! End-to-end scenarios from the board core's testable-properties list: maximum-capture
//! enforcement, flying-king long captures, promotion stopping a capture chain, hash stability
//! under make/unmake, and the FEN/threefold-repetition boundary behaviors.
//!
//! Positions are built by walking the geometry tables from a discovered anchor square rather than
//! hardcoding playable-square numbers, so these scenarios hold regardless of which row-major
//! numbering convention a `Geometry` happens to pick (§3.1 permits either).

use draughts_core::{movegen, Geometry, Piece, Position, Role, Variant, DIAGONALS};
use draughts_bootstrap::{Color, Square};

fn squares() -> Vec<Square> {
    (0..Geometry::get(&Variant::american()).squares() as u8)
        .map(Square::from_index)
        .collect()
}

#[test]
fn maximum_capture_enforcement_keeps_only_the_longer_chain() {
    let variant = Variant::american();
    let geometry = Geometry::get(&variant);

    // An origin with a 4-long ray in one diagonal direction (room for a double jump) and at
    // least a 2-long ray in another (room for a single jump).
    let mut origin = None;
    let mut long_dir = None;
    let mut short_dir = None;

    'search: for sq in (0..geometry.squares() as u8).map(Square::from_index) {
        for &d_long in &DIAGONALS {
            if geometry.ray(d_long, sq).len() < 4 {
                continue;
            }
            for &d_short in &DIAGONALS {
                if d_short == d_long {
                    continue;
                }
                if geometry.ray(d_short, sq).len() >= 2 {
                    origin = Some(sq);
                    long_dir = Some(d_long);
                    short_dir = Some(d_short);
                    break 'search;
                }
            }
        }
    }

    let origin = origin.expect("american board has a square with both a 4-ray and a cross-ray");
    let long_dir = long_dir.unwrap();
    let short_dir = short_dir.unwrap();

    let long_ray = geometry.ray(long_dir, origin).to_vec();
    let short_ray = geometry.ray(short_dir, origin).to_vec();

    let mut position = Position::empty(variant);
    position.place(Piece::new(Color::White, Role::King), origin);
    // Double-jump chain along `long_dir`: enemy, empty, enemy, empty.
    position.place(Piece::new(Color::Black, Role::Man), long_ray[0]);
    position.place(Piece::new(Color::Black, Role::Man), long_ray[2]);
    // Single-jump chain along `short_dir`: enemy, empty.
    position.place(Piece::new(Color::Black, Role::Man), short_ray[0]);

    let moves = movegen::legal_moves(&position);

    assert!(!moves.is_empty());
    for mv in moves.iter() {
        assert_eq!(mv.captured().len(), 2, "only the two-piece chain should survive max-capture filtering");
    }
}

#[test]
fn flying_king_captures_every_landing_square_beyond_the_jumped_piece() {
    let variant = Variant::international();
    let geometry = Geometry::get(&variant);

    let (origin, direction, ray) = (0..geometry.squares() as u8)
        .map(Square::from_index)
        .find_map(|sq| {
            DIAGONALS
                .iter()
                .map(|&d| (sq, d, geometry.ray(d, sq).to_vec()))
                .find(|(_, _, ray)| ray.len() >= 3)
        })
        .expect("international board has a ray at least 3 squares long");

    let mut position = Position::empty(variant);
    position.place(Piece::new(Color::White, Role::King), origin);
    position.place(Piece::new(Color::Black, Role::Man), ray[0]);
    // ray[1..] is left empty: every one of those squares is a legal landing square.

    let moves = movegen::legal_moves(&position);

    assert_eq!(moves.len(), ray.len() - 1);
    for mv in moves.iter() {
        assert_eq!(mv.captured(), &[ray[0]]);
        assert!(ray[1..].contains(&mv.destination()));
    }
    let _ = direction;
}

#[test]
fn promotion_stops_the_capture_chain_under_american_rules() {
    let variant = Variant::american();
    let geometry = Geometry::get(&variant);
    let forward = geometry.forward_diagonals(Color::White);

    // A man, one double-jump away from landing on White's promotion row.
    let (man, mid, landing, jump_dir) = squares()
        .into_iter()
        .find_map(|man| {
            forward.iter().find_map(|&d| {
                let mid = geometry.step(d, man)?;
                let landing = geometry.step(d, mid)?;
                geometry
                    .promotion_row(Color::White)
                    .get_bit(landing)
                    .then_some((man, mid, landing, d))
            })
        })
        .expect("american board has a square two forward-diagonal steps from promotion");

    // A second enemy placed so a further capture would be available from `landing`, if the
    // chain were allowed to continue as a king.
    let further = DIAGONALS.iter().find_map(|&d| {
        let next_mid = geometry.step(d, landing)?;
        let next_landing = geometry.step(d, next_mid)?;
        (next_mid != mid && next_landing != man).then_some((next_mid, next_landing))
    });

    let mut position = Position::empty(variant);
    position.place(Piece::new(Color::White, Role::Man), man);
    position.place(Piece::new(Color::Black, Role::Man), mid);
    if let Some((next_mid, _)) = further {
        position.place(Piece::new(Color::Black, Role::Man), next_mid);
    }
    let _ = jump_dir;

    let moves = movegen::legal_moves(&position);

    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].destination(), landing);
    assert_eq!(moves[0].captured(), &[mid]);
    assert!(moves[0].promoted());
}

#[test]
fn hash_round_trips_through_push_and_pop_over_many_plies() {
    let mut position = Position::new(Variant::international());
    let mut lcg_state: u64 = 0x9E3779B97F4A7C15;
    let mut next_random = move || {
        lcg_state = lcg_state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        lcg_state
    };

    for _ in 0..200 {
        let moves = movegen::legal_moves(&position);
        if moves.is_empty() {
            break;
        }

        let choice = (next_random() as usize) % moves.len();
        let mv = moves[choice].clone();

        let before = position.clone();
        position.make_move(&mv);
        assert!(position.hash_is_consistent());

        position.unmake_move();
        assert_eq!(position, before);
        assert!(position.hash_is_consistent());

        position.make_move(&mv);
    }
}

#[test]
fn threefold_repetition_fires_on_the_third_occurrence() {
    // Two lone, short-range kings (American rules: no flying, so a quiet move is always exactly
    // one diagonal step) shuffle independently between two squares each. Neither pair is
    // diagonally adjacent to the other, so every step stays a quiet move and never becomes a
    // mandatory capture.
    let variant = Variant::american();
    let geometry = Geometry::get(&variant);
    let all = squares();

    let white_origin = all
        .iter()
        .copied()
        .find(|&sq| DIAGONALS.iter().any(|&d| geometry.step(d, sq).is_some()))
        .unwrap();
    let white_away = DIAGONALS
        .iter()
        .find_map(|&d| geometry.step(d, white_origin))
        .unwrap();

    let not_adjacent_to_white = |sq: Square| {
        DIAGONALS.iter().all(|&d| {
            geometry.step(d, white_origin) != Some(sq) && geometry.step(d, white_away) != Some(sq)
        })
    };

    let (black_origin, black_away) = all
        .iter()
        .copied()
        .rev()
        .filter(|&sq| sq != white_origin && sq != white_away && not_adjacent_to_white(sq))
        .find_map(|sq| {
            DIAGONALS.iter().find_map(|&d| {
                let candidate = geometry.step(d, sq)?;
                (candidate != white_origin
                    && candidate != white_away
                    && not_adjacent_to_white(candidate))
                .then_some((sq, candidate))
            })
        })
        .expect("american board has room for a second, non-adjacent shuffling king pair");

    let mut position = Position::empty(variant);
    position.place(Piece::new(Color::White, Role::King), white_origin);
    position.place(Piece::new(Color::Black, Role::King), black_origin);

    assert!(!position.is_threefold_repetition());

    let step_to = |position: &mut Position, to: Square| {
        let mv = movegen::legal_moves(position)
            .iter()
            .find(|mv| mv.destination() == to)
            .cloned()
            .expect("the shuffling king has a quiet move to its paired square");
        position.make_move(&mv);
    };

    // Three full round trips return the hash (white and black both back on their origin square,
    // white to move) to its post-first-cycle value three times.
    for _ in 0..3 {
        step_to(&mut position, white_away);
        step_to(&mut position, black_away);
        step_to(&mut position, white_origin);
        step_to(&mut position, black_origin);
    }

    assert!(position.is_threefold_repetition());
}
