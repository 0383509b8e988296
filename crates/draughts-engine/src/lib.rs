//! The outermost crate: assembles [`draughts_core::Board`] and [`draughts_search::Engine`] behind
//! one dependency (§1.1, §6), and installs the `tracing` subscriber an embedding binary would
//! otherwise have to wire up itself. Ships no binary target and parses no CLI arguments — unlike
//! the teacher's `hash-engine`, which is itself the CLI; here that entry point is a boundary
//! collaborator's job, not this crate's (§6).

use std::error::Error;

use tracing_subscriber::EnvFilter;

pub use draughts_core::{
    error as board_error, movegen, Board, Diagonal, Geometry, GameResult, Move, Moves, Orthogonal,
    Piece, Position, Role, Variant, DIAGONALS, ORTHOGONALS, MAX_CHAIN,
};
pub use draughts_search::{eval, score, tt, Engine, EngineConfig, SearchStats};

/// Installs a global `tracing` subscriber filtered by `RUST_LOG` (defaulting to `info`), grounded
/// on the teacher's `initialize_tracing` minus the trace-file and CLI-level plumbing that has no
/// CLI here to drive (§1.1, §2.1). An embedding binary that wants different formatting is free to
/// install its own subscriber instead; this is a convenience, not the only supported path.
pub fn init_logging() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Asks `engine` for the best move in `board`'s current position and applies it, leaving `board`
/// advanced by one ply. The thin, stateful convenience §6 calls out as the Rust-idiomatic shape of
/// `engine.get_best_move(board)` followed by a push, since the search kernel below operates on a
/// bare [`Position`] rather than `Board`'s validated push/pop (§6.1).
pub fn play_best_move(engine: &mut Engine, board: &mut Board) -> Option<Move> {
    let mv = engine.get_best_move(board.position_mut())?;
    board.push(&mv).expect("a move the search engine returned is always legal");
    Some(mv)
}
