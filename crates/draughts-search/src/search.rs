//! The negamax/alpha-beta/PVS search kernel and its iterative-deepening driver (§4.G).
//!
//! The teacher's own search (`hash-search`) is a PUCT tree search over a neural-network
//! evaluation, which has no alpha-beta kernel to generalize from. This module's shape — the
//! `Result<Score, SearchAborted>` abort-propagation idiom, the TT probe/store around a PVS loop
//! with late-move reductions, killer and history move ordering — is grounded instead on a classic
//! chess negamax search (see `DESIGN.md`), adapted from chess's single-piece moves to draughts'
//! chain-capable captures.

use std::mem::size_of;
use std::time::{Duration, Instant};

use draughts_core::{movegen, Move, Moves, Position};
use tracing::{debug, info, info_span, trace};

use crate::{
    eval::evaluate,
    ordering::{HistoryTable, KillerTable},
    score::{lost_at, Score, MATE},
    tt::{Bound, Entry, TranspositionTable},
};

/// Raised by the deadline check at the top of [`Engine::negamax`]/[`Engine::quiescence`] and
/// propagated upward through every `?`. Never escapes [`Engine::get_best_move`]: the
/// iterative-deepening driver catches it, discards the in-flight depth, and keeps the previous
/// depth's result (§4.G.1, §5).
#[derive(Debug, thiserror::Error)]
#[error("search aborted: deadline exceeded")]
struct SearchAborted;

/// Plain, `Copy` engine configuration (§4.G.1.1), grounded on the teacher's CLI-configuration
/// idiom minus the CLI parsing itself (out of scope for this crate).
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub depth_limit: u8,
    pub time_limit: Option<Duration>,
    /// Advisory sizing hint for an embedder. The transposition table's bucket count is fixed at
    /// compile time (`tt::TT_SIZE`; see `DESIGN.md`), so this field does not change `Engine`'s
    /// memory footprint — it exists so configuration loaded from a file has somewhere to put the
    /// number, and so a future const-generic table can read it.
    pub tt_size_mib: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            depth_limit: 12,
            time_limit: Some(Duration::from_secs(5)),
            tt_size_mib: 64,
        }
    }
}

/// The statistics of one completed `get_best_move` call (§4.G.1.1) — the moral equivalent of the
/// teacher's per-depth `SearchIterationInfo`, reported once at the end rather than streamed,
/// since no CLI/UI collaborator is in scope here to consume an intermediate feed. Per-depth
/// progress is still observable as `tracing` events for an embedder wiring a subscriber.
#[derive(Debug, Clone)]
pub struct SearchStats {
    pub depth_reached: u8,
    pub nodes: u64,
    pub score: Score,
    pub principal_variation: Vec<Move>,
}

/// A negamax/alpha-beta search engine: the transposition table, killer and history tables, and
/// the iterative-deepening driver over a [`Position`]. Not `Sync` — its tables are mutated during
/// a search and a single instance must not be shared across concurrent callers — but `Send`, so a
/// worker pool may hand one instance to a thread between jobs (§5).
pub struct Engine {
    config: EngineConfig,
    tt: TranspositionTable,
    killers: KillerTable,
    history: HistoryTable,
    nodes: u64,
    deadline: Option<Instant>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        debug!(
            entries = crate::tt::TT_SIZE,
            bytes = crate::tt::TT_SIZE * size_of::<Entry>(),
            tt_size_mib_hint = config.tt_size_mib,
            "transposition table constructed"
        );

        Engine {
            config,
            tt: TranspositionTable::new(),
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            nodes: 0,
            deadline: None,
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Iterative deepening from depth 1 to `config.depth_limit`, returning the best move found at
    /// the deepest depth completed before the deadline (§4.G.1), or `None` if `position` has no
    /// legal moves.
    pub fn get_best_move(&mut self, position: &mut Position) -> Option<Move> {
        self.search(position).map(|(mv, _)| mv)
    }

    /// As [`Engine::get_best_move`], additionally returning the statistics of the search that
    /// produced it (§4.G.1.1).
    pub fn get_best_move_with_stats(&mut self, position: &mut Position) -> Option<(Move, SearchStats)> {
        self.search(position)
    }

    fn search(&mut self, position: &mut Position) -> Option<(Move, SearchStats)> {
        let root_moves = movegen::legal_moves(position);
        if root_moves.is_empty() {
            return None;
        }

        self.tt.clear();
        self.killers.clear();
        self.history.clear();
        self.nodes = 0;
        self.deadline = self.config.time_limit.map(|limit| Instant::now() + limit);

        let span = info_span!("iterative_deepening", depth_limit = self.config.depth_limit);
        let _enter = span.enter();

        let mut best_move = root_moves[0].clone();
        let mut best_score: Score = 0;
        let mut depth_reached: u8 = 0;

        for depth in 1..=self.config.depth_limit {
            match self.negamax(position, depth, -MATE, MATE, 0) {
                Ok(score) => {
                    // The PV move from this depth's root call, placed first in move ordering for
                    // the next iteration automatically, since it's the same TT entry `negamax`
                    // probes at the top of its own next call (§4.G.1's "PV move placed first").
                    if let Some(entry) = self.tt.probe(position) {
                        if let Some(mv) = entry.pv_move {
                            best_move = mv;
                        }
                    }
                    best_score = score;
                    depth_reached = depth;

                    debug!(depth, score, nodes = self.nodes, %best_move, "iteration complete");
                }
                Err(SearchAborted) => {
                    trace!(depth, "iteration aborted by deadline, keeping previous depth's result");
                    break;
                }
            }
        }

        info!(depth_reached, nodes = self.nodes, score = best_score, "search complete");

        let principal_variation = self.collect_pv(position, &best_move, depth_reached);

        Some((
            best_move,
            SearchStats {
                depth_reached,
                nodes: self.nodes,
                score: best_score,
                principal_variation,
            },
        ))
    }

    fn check_deadline(&self) -> Result<(), SearchAborted> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(SearchAborted),
            _ => Ok(()),
        }
    }

    /// `negamax(pos, depth, alpha, beta, ply) -> score`, as specified in §4.G.2.
    fn negamax(
        &mut self,
        position: &mut Position,
        depth: u8,
        mut alpha: Score,
        mut beta: Score,
        ply: u32,
    ) -> Result<Score, SearchAborted> {
        self.check_deadline()?;
        self.nodes += 1;

        let legal = movegen::legal_moves(position);
        if legal.is_empty() {
            return Ok(lost_at(ply));
        }
        if ply > 0 && (position.is_draw_by_halfmove_rule() || position.is_threefold_repetition()) {
            return Ok(0);
        }
        if depth == 0 {
            return self.quiescence(position, alpha, beta);
        }

        let original_alpha = alpha;
        let mut pv_move: Option<Move> = None;

        if let Some(entry) = self.tt.probe(position) {
            pv_move = entry.pv_move.clone();

            if entry.depth >= depth {
                match entry.bound {
                    Bound::Exact => return Ok(entry.score),
                    Bound::Lower => alpha = alpha.max(entry.score),
                    Bound::Upper => beta = beta.min(entry.score),
                }
                if alpha >= beta {
                    return Ok(entry.score);
                }
            }
        }

        let mut moves = legal;
        self.order_moves(&mut moves, ply, pv_move.as_ref());

        let mut best_score = -MATE;
        let mut best_move = moves[0].clone();

        for (i, mv) in moves.iter().enumerate() {
            let is_killer = self.killers.is_killer(ply as usize, mv);

            position.make_move(mv);

            // The deadline check inside a recursive call can abort mid-branch; the move applied
            // just above must be unmade before that abort propagates past this frame, or the
            // position is left mutated when the caller gives up (§5's "unwind cleanly" rule). So
            // every recursive result is captured here, unmade, and only then turned into `?`.
            let result = if i == 0 {
                self.negamax(position, depth - 1, -beta, -alpha, ply + 1).map(|s| -s)
            } else {
                let reduced_depth = if depth >= 3 && !mv.is_capture() && !is_killer {
                    depth - 2
                } else {
                    depth - 1
                };

                match self.negamax(position, reduced_depth, -alpha - 1, -alpha, ply + 1).map(|s| -s) {
                    Ok(reduced) if reduced > alpha && reduced < beta => {
                        self.negamax(position, depth - 1, -beta, -alpha, ply + 1).map(|s| -s)
                    }
                    other => other,
                }
            };

            position.unmake_move();
            let score = result?;

            if score > best_score {
                best_score = score;
                best_move = mv.clone();
            }
            if score > alpha {
                alpha = score;
            }

            if alpha >= beta {
                if !mv.is_capture() {
                    self.killers.record(ply as usize, mv.clone());
                    self.history.record(mv.origin(), mv.destination(), depth);
                }

                self.tt.store(
                    position,
                    Entry {
                        depth,
                        score: beta,
                        bound: Bound::Lower,
                        pv_move: Some(mv.clone()),
                    },
                );
                return Ok(beta);
            }
        }

        let bound = if best_score <= original_alpha { Bound::Upper } else { Bound::Exact };
        self.tt.store(
            position,
            Entry {
                depth,
                score: alpha,
                bound,
                pv_move: Some(best_move),
            },
        );

        Ok(alpha)
    }

    /// Captures-only search to quiet horizon-effect false readings (§4.G.3). Unbounded in depth:
    /// it terminates naturally once a side to move has no captures left.
    fn quiescence(&mut self, position: &mut Position, mut alpha: Score, beta: Score) -> Result<Score, SearchAborted> {
        self.check_deadline()?;
        self.nodes += 1;

        let stand_pat = evaluate(position);
        if stand_pat >= beta {
            return Ok(beta);
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut captures: Moves = movegen::legal_moves(position).into_iter().filter(Move::is_capture).collect();
        captures.sort_by_key(|mv| std::cmp::Reverse(mv.captured().len()));

        for mv in captures.iter() {
            position.make_move(mv);
            let result = self.quiescence(position, -beta, -alpha).map(|s| -s);
            position.unmake_move();
            let score = result?;

            if score >= beta {
                return Ok(beta);
            }
            if score > alpha {
                alpha = score;
            }
        }

        Ok(alpha)
    }

    /// Orders `moves` in place per §4.G.2: the TT's remembered PV move first, then captures by
    /// captured-set cardinality descending, then killer moves recorded at this ply, then the rest
    /// by history score descending.
    fn order_moves(&self, moves: &mut Moves, ply: u32, pv_move: Option<&Move>) {
        let killers = &self.killers;
        let history = &self.history;

        moves.sort_by_key(|mv| {
            if pv_move == Some(mv) {
                (0, 0, 0i64)
            } else if mv.is_capture() {
                (1, -(mv.captured().len() as i32), 0i64)
            } else if killers.is_killer(ply as usize, mv) {
                (2, 0, 0i64)
            } else {
                let score = history.score(mv.origin(), mv.destination());
                (3, 0, i64::from(u32::MAX - score))
            }
        });
    }

    /// Walks the TT's remembered PV moves from `position` forward, guarding against a best-effort
    /// cache entry that no longer matches a legal move (a hash collision, or simply having been
    /// overwritten by an unrelated position since it was stored).
    fn collect_pv(&self, position: &mut Position, best_move: &Move, depth_reached: u8) -> Vec<Move> {
        if depth_reached == 0 {
            return Vec::new();
        }

        let mut pv = vec![best_move.clone()];
        position.make_move(best_move);

        while (pv.len() as u8) < depth_reached {
            let Some(entry) = self.tt.probe(position) else { break };
            let Some(mv) = entry.pv_move else { break };

            if !movegen::legal_moves(position).iter().any(|legal| legal == &mv) {
                break;
            }

            position.make_move(&mv);
            pv.push(mv);
        }

        for _ in 0..pv.len() {
            position.unmake_move();
        }

        pv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draughts_core::{Piece, Role, Variant};
    use draughts_bootstrap::{Color, Square};

    fn fast_config(depth_limit: u8) -> EngineConfig {
        EngineConfig {
            depth_limit,
            time_limit: None,
            tt_size_mib: 8,
        }
    }

    #[test]
    fn capturing_the_last_enemy_piece_scores_as_a_won_mate() {
        // A lone white man one jump away from capturing the only black piece on the board: the
        // capture is mandatory, and it leaves black with no pieces and so no legal moves at all,
        // which the search should recognize as a forced win rather than just material gain.
        let variant = Variant::american();
        let mut position = Position::empty(variant);
        let geometry = draughts_core::Geometry::get(&variant);
        let forward = geometry.forward_diagonals(Color::White);

        let (man, mid) = (0..geometry.squares() as u8)
            .map(Square::from_index)
            .find_map(|sq| {
                forward.iter().find_map(|&d| {
                    let mid = geometry.step(d, sq)?;
                    geometry.step(d, mid)?;
                    Some((sq, mid))
                })
            })
            .expect("american board has a two-step forward diagonal");

        position.place(Piece::new(Color::White, Role::Man), man);
        position.place(Piece::new(Color::Black, Role::Man), mid);

        let mut engine = Engine::new(fast_config(6));
        let (mv, stats) = engine.get_best_move_with_stats(&mut position).unwrap();

        assert!(mv.is_capture(), "the only sensible move is the mandatory capture");
        assert!(crate::score::is_mate_score(stats.score), "capturing the last enemy piece should read as a forced win, got {}", stats.score);
        assert!(stats.score > 0, "the win should be scored from the mover's own perspective");
    }

    #[test]
    fn deadline_leaves_the_position_unchanged() {
        let mut position = Position::new(Variant::international());
        let before = position.clone();

        let mut engine = Engine::new(EngineConfig {
            depth_limit: 40,
            time_limit: Some(Duration::from_millis(1)),
            tt_size_mib: 8,
        });

        engine.get_best_move(&mut position);

        assert_eq!(position, before);
    }

    #[test]
    fn returns_none_when_no_legal_moves_exist() {
        // White has no pieces on the board at all, so the side to move has no legal moves.
        let board = draughts_core::Board::from_fen(Variant::american(), "W:W:B18").unwrap();
        let mut position = board.position().clone();

        let mut engine = Engine::new(fast_config(4));
        assert!(engine.get_best_move(&mut position).is_none());
    }

    #[test]
    fn repeated_searches_reuse_the_engine_without_panicking() {
        let mut position = Position::new(Variant::american());
        let mut engine = Engine::new(fast_config(3));

        for _ in 0..3 {
            let mv = engine.get_best_move(&mut position).unwrap();
            position.make_move(&mv);
        }
    }

    #[test]
    fn assert_send() {
        fn is_send<T: Send>() {}
        is_send::<Engine>();
    }

    #[test]
    #[ignore] // slow: reaches depth 6 on every starting position, run explicitly with --ignored
    fn default_config_reaches_depth_six_on_every_starting_position() {
        for variant in [
            Variant::international(),
            Variant::american(),
            Variant::frisian(),
            Variant::russian(),
        ] {
            let mut position = Position::new(variant);
            let mut engine = Engine::new(EngineConfig::default());

            let (_, stats) = engine
                .get_best_move_with_stats(&mut position)
                .unwrap_or_else(|| panic!("{} starting position has legal moves", variant.name));

            assert!(
                stats.depth_reached >= 6,
                "{} only reached depth {} within the default time budget",
                variant.name,
                stats.depth_reached
            );
        }
    }
}
