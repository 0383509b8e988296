//! Move-ordering heuristics (§4.G.5): killer moves and the history table. Both are owned by the
//! [`crate::Engine`], not the board, and are reset alongside the transposition table at the start
//! of every `get_best_move` call — grounded on the teacher's per-search `reset_history()` call at
//! the top of its iterative-deepening loop.

use draughts_bootstrap::{Square, MAX_SQUARES};
use draughts_core::Move;

use crate::score::MAX_PLY;

const KILLER_SLOTS: usize = 2;

/// Two killer-move slots per ply: the most recent non-capture moves that caused a beta cutoff at
/// that ply, tried during move ordering before falling back to history.
pub struct KillerTable {
    slots: Vec<[Option<Move>; KILLER_SLOTS]>,
}

impl KillerTable {
    pub fn new() -> Self {
        KillerTable {
            slots: vec![[None, None]; MAX_PLY],
        }
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = [None, None];
        }
    }

    pub fn is_killer(&self, ply: usize, mv: &Move) -> bool {
        let slot = &self.slots[ply.min(MAX_PLY - 1)];
        slot[0].as_ref() == Some(mv) || slot[1].as_ref() == Some(mv)
    }

    /// Records `mv` as the newest killer at `ply`, bumping the existing slot 0 down to slot 1
    /// (aging it out) unless `mv` is already recorded.
    pub fn record(&mut self, ply: usize, mv: Move) {
        let slot = &mut self.slots[ply.min(MAX_PLY - 1)];

        if slot[0].as_ref() == Some(&mv) {
            return;
        }

        slot[1] = slot[0].take();
        slot[0] = Some(mv);
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

/// A 2-D history table indexed by (from-square, to-square), incremented by `depth^2` whenever a
/// quiet move causes a beta cutoff. Used to order the remaining quiet moves when neither the TT's
/// PV move nor a killer applies.
pub struct HistoryTable {
    scores: Vec<u32>,
}

impl HistoryTable {
    pub fn new() -> Self {
        HistoryTable {
            scores: vec![0; MAX_SQUARES * MAX_SQUARES],
        }
    }

    pub fn clear(&mut self) {
        self.scores.fill(0);
    }

    fn index(from: Square, to: Square) -> usize {
        from.as_index() * MAX_SQUARES + to.as_index()
    }

    pub fn score(&self, from: Square, to: Square) -> u32 {
        self.scores[Self::index(from, to)]
    }

    pub fn record(&mut self, from: Square, to: Square, depth: u8) {
        let bonus = (depth as u32) * (depth as u32);
        self.scores[Self::index(from, to)] = self.scores[Self::index(from, to)].saturating_add(bonus);
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draughts_bootstrap::Square;

    fn sq(n: u8) -> Square {
        Square::from_notation(n).unwrap()
    }

    #[test]
    fn killer_recorded_at_a_ply_is_recognized_there_and_nowhere_else() {
        let mut killers = KillerTable::new();
        let mv = Move::quiet(sq(1), sq(2), false);

        killers.record(3, mv.clone());

        assert!(killers.is_killer(3, &mv));
        assert!(!killers.is_killer(4, &mv));
    }

    #[test]
    fn a_third_killer_ages_out_the_oldest() {
        let mut killers = KillerTable::new();
        let first = Move::quiet(sq(1), sq(2), false);
        let second = Move::quiet(sq(3), sq(4), false);
        let third = Move::quiet(sq(5), sq(6), false);

        killers.record(0, first.clone());
        killers.record(0, second.clone());
        killers.record(0, third.clone());

        assert!(!killers.is_killer(0, &first));
        assert!(killers.is_killer(0, &second));
        assert!(killers.is_killer(0, &third));
    }

    #[test]
    fn history_score_grows_with_depth_squared() {
        let mut history = HistoryTable::new();
        history.record(sq(1), sq(2), 4);

        assert_eq!(history.score(sq(1), sq(2)), 16);
    }
}
