use std::sync::{Arc, OnceLock};

use draughts_bootstrap::{BitBoard, Color, Square, MAX_SQUARES};

use crate::variant::Variant;

/// One of the four diagonal directions a man or king may step or slide along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagonal {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

pub const DIAGONALS: [Diagonal; 4] = [
    Diagonal::NorthWest,
    Diagonal::NorthEast,
    Diagonal::SouthWest,
    Diagonal::SouthEast,
];

/// One of the four orthogonal (rank/file) directions, only consulted when a variant's
/// [`Variant::orthogonal_captures`] flag is set (Frisian draughts).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orthogonal {
    North,
    South,
    East,
    West,
}

pub const ORTHOGONALS: [Orthogonal; 4] = [
    Orthogonal::North,
    Orthogonal::South,
    Orthogonal::East,
    Orthogonal::West,
];

/// The precomputed neighbor/ray tables for one board shape, built once at [`Geometry::get`] and
/// shared thereafter. Rank 0 is the board edge black men start furthest from; white promotes on
/// rank 0, black promotes on rank `board_side - 1`.
#[derive(Debug)]
pub struct Geometry {
    squares: usize,
    board_side: u8,
    rank: Vec<u8>,
    file: Vec<u8>,
    abs_col: Vec<u8>,
    step: [Vec<Option<Square>>; 4],
    ray: [Vec<Vec<Square>>; 4],
    between: Vec<BitBoard>,
    step_ortho: [Vec<Option<Square>>; 4],
    ray_ortho: [Vec<Vec<Square>>; 4],
    promotion_row_white: BitBoard,
    promotion_row_black: BitBoard,
    full_mask: BitBoard,
}

fn diagonal_index(d: Diagonal) -> usize {
    match d {
        Diagonal::NorthWest => 0,
        Diagonal::NorthEast => 1,
        Diagonal::SouthWest => 2,
        Diagonal::SouthEast => 3,
    }
}

fn orthogonal_index(d: Orthogonal) -> usize {
    match d {
        Orthogonal::North => 0,
        Orthogonal::South => 1,
        Orthogonal::East => 2,
        Orthogonal::West => 3,
    }
}

/// `(rank delta, absolute-column delta)` for one diagonal step.
fn diagonal_delta(d: Diagonal) -> (i32, i32) {
    match d {
        Diagonal::NorthWest => (-1, -1),
        Diagonal::NorthEast => (-1, 1),
        Diagonal::SouthWest => (1, -1),
        Diagonal::SouthEast => (1, 1),
    }
}

fn orthogonal_delta(d: Orthogonal) -> (i32, i32) {
    match d {
        Orthogonal::North => (-1, 0),
        Orthogonal::South => (1, 0),
        Orthogonal::East => (0, 1),
        Orthogonal::West => (0, -1),
    }
}

impl Geometry {
    /// Returns the (process-wide, cached) geometry for a variant's board shape. Two variants with
    /// the same `board_side` share the same tables, since geometry depends only on board shape,
    /// not on capture-rule flags.
    pub fn get(variant: &Variant) -> Arc<Geometry> {
        static CACHE: [OnceLock<Arc<Geometry>>; 2] = [OnceLock::new(), OnceLock::new()];

        let slot = match variant.board_side {
            8 => &CACHE[0],
            10 => &CACHE[1],
            n => panic!("unsupported board side {n}: geometry only covers 8x8 and 10x10 boards"),
        };

        Arc::clone(slot.get_or_init(|| Arc::new(Geometry::build(variant.board_side))))
    }

    fn build(board_side: u8) -> Geometry {
        let n = board_side as i32;
        let half = (n / 2) as usize;
        let squares = (n * n / 2) as usize;
        assert!(squares <= MAX_SQUARES, "board side {board_side} exceeds MAX_SQUARES");

        let mut rank = vec![0u8; squares];
        let mut file = vec![0u8; squares];
        let mut abs_col = vec![0u8; squares];
        // Maps (rank, absolute column) to a playable-square index, or None for light squares.
        let mut abs_to_square = vec![None; (n * n) as usize];

        for s in 0..squares {
            let r = (s / half) as i32;
            let f = (s % half) as i32;
            let c = 2 * f + ((r + 1) % 2);

            rank[s] = r as u8;
            file[s] = f as u8;
            abs_col[s] = c as u8;
            abs_to_square[(r * n + c) as usize] = Some(s as u8);
        }

        let lookup = |r: i32, c: i32| -> Option<Square> {
            if (0..n).contains(&r) && (0..n).contains(&c) {
                abs_to_square[(r * n + c) as usize].map(Square::from_index)
            } else {
                None
            }
        };

        let mut step: [Vec<Option<Square>>; 4] = Default::default();
        let mut ray: [Vec<Vec<Square>>; 4] = Default::default();

        for &d in &DIAGONALS {
            let (dr, dc) = diagonal_delta(d);
            let mut step_col = vec![None; squares];
            let mut ray_col = vec![Vec::new(); squares];

            for s in 0..squares {
                let mut r = rank[s] as i32;
                let mut c = abs_col[s] as i32;
                let mut path = Vec::new();

                loop {
                    r += dr;
                    c += dc;

                    match lookup(r, c) {
                        Some(sq) => path.push(sq),
                        None => break,
                    }
                }

                step_col[s] = path.first().copied();
                ray_col[s] = path;
            }

            step[diagonal_index(d)] = step_col;
            ray[diagonal_index(d)] = ray_col;
        }

        let mut step_ortho: [Vec<Option<Square>>; 4] = Default::default();
        let mut ray_ortho: [Vec<Vec<Square>>; 4] = Default::default();

        for &d in &ORTHOGONALS {
            let (dr, dc) = orthogonal_delta(d);
            let mut step_col = vec![None; squares];
            let mut ray_col = vec![Vec::new(); squares];

            for s in 0..squares {
                let mut r = rank[s] as i32;
                let mut c = abs_col[s] as i32;
                let mut path = Vec::new();

                loop {
                    r += dr;
                    c += dc;

                    match lookup(r, c) {
                        Some(sq) => path.push(sq),
                        None => break,
                    }
                }

                step_col[s] = path.first().copied();
                ray_col[s] = path;
            }

            step_ortho[orthogonal_index(d)] = step_col;
            ray_ortho[orthogonal_index(d)] = ray_col;
        }

        let mut between = vec![BitBoard::EMPTY; squares * squares];

        for a in 0..squares {
            for &d in &DIAGONALS {
                let mut acc = BitBoard::EMPTY;

                for &sq in &ray[diagonal_index(d)][a] {
                    between[a * squares + sq.as_index()] = acc;
                    acc.toggle_bit(sq);
                }
            }
        }

        let mut promotion_row_white = BitBoard::EMPTY;
        let mut promotion_row_black = BitBoard::EMPTY;

        for s in 0..squares {
            if rank[s] == 0 {
                promotion_row_white.toggle_bit(Square::from_index(s as u8));
            }
            if rank[s] == board_side - 1 {
                promotion_row_black.toggle_bit(Square::from_index(s as u8));
            }
        }

        let mut full_mask = BitBoard::EMPTY;
        for s in 0..squares {
            full_mask.toggle_bit(Square::from_index(s as u8));
        }

        Geometry {
            squares,
            board_side,
            rank,
            file,
            abs_col,
            step,
            ray,
            between,
            step_ortho,
            ray_ortho,
            promotion_row_white,
            promotion_row_black,
            full_mask,
        }
    }

    pub fn squares(&self) -> usize {
        self.squares
    }

    pub fn board_side(&self) -> u8 {
        self.board_side
    }

    pub fn rank(&self, square: Square) -> u8 {
        self.rank[square.as_index()]
    }

    pub fn file(&self, square: Square) -> u8 {
        self.file[square.as_index()]
    }

    pub fn step(&self, direction: Diagonal, square: Square) -> Option<Square> {
        self.step[diagonal_index(direction)][square.as_index()]
    }

    pub fn ray(&self, direction: Diagonal, square: Square) -> &[Square] {
        &self.ray[diagonal_index(direction)][square.as_index()]
    }

    pub fn step_ortho(&self, direction: Orthogonal, square: Square) -> Option<Square> {
        self.step_ortho[orthogonal_index(direction)][square.as_index()]
    }

    pub fn ray_ortho(&self, direction: Orthogonal, square: Square) -> &[Square] {
        &self.ray_ortho[orthogonal_index(direction)][square.as_index()]
    }

    /// The playable squares strictly between `a` and `b` along a shared diagonal, or the empty
    /// bitboard if they don't share one.
    pub fn between(&self, a: Square, b: Square) -> BitBoard {
        self.between[a.as_index() * self.squares + b.as_index()]
    }

    /// The two diagonal directions a man of `color` may step forward along.
    pub fn forward_diagonals(&self, color: Color) -> [Diagonal; 2] {
        match color {
            Color::White => [Diagonal::NorthWest, Diagonal::NorthEast],
            Color::Black => [Diagonal::SouthWest, Diagonal::SouthEast],
        }
    }

    pub fn promotion_row(&self, color: Color) -> BitBoard {
        match color {
            Color::White => self.promotion_row_white,
            Color::Black => self.promotion_row_black,
        }
    }

    /// A bitboard with a `1` at every playable square this board shape has, and `0` everywhere
    /// else (including the unused high bits of the backing `u64` on an 8x8 board).
    pub fn full_mask(&self) -> BitBoard {
        self.full_mask
    }
}
