use rand::{distributions::Standard, prelude::Distribution, Rng};
use rustifact::ToTokenStream;

use crate::consts::MAX_SQUARES;

/// Per-(color, role) Zobrist keys, one entry per playable square a board could ever have. A
/// variant with fewer than [`MAX_SQUARES`] squares simply never reads the trailing entries.
#[derive(Debug, ToTokenStream)]
pub struct ZobristPieces {
    pub white_man: [u64; MAX_SQUARES],
    pub white_king: [u64; MAX_SQUARES],
    pub black_man: [u64; MAX_SQUARES],
    pub black_king: [u64; MAX_SQUARES],
}

impl Distribution<ZobristPieces> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ZobristPieces {
        ZobristPieces {
            white_man: rng.gen(),
            white_king: rng.gen(),
            black_man: rng.gen(),
            black_king: rng.gen(),
        }
    }
}

#[derive(Debug, ToTokenStream)]
pub struct ZobristSide {
    pub white_to_move: u64,
    pub black_to_move: u64,
}

impl Distribution<ZobristSide> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ZobristSide {
        ZobristSide {
            white_to_move: rng.gen(),
            black_to_move: rng.gen(),
        }
    }
}

#[derive(Debug, ToTokenStream)]
pub struct ZobristMap {
    pub pieces: ZobristPieces,
    pub side: ZobristSide,
}

impl Distribution<ZobristMap> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ZobristMap {
        ZobristMap {
            pieces: rng.gen(),
            side: rng.gen(),
        }
    }
}
