//! Iterative-deepening Principal Variation Search.
//!
//! The engine deepens one ply at a time; the best move of the deepest
//! *completed* pass is the answer, so interrupting after any pass still
//! yields a valid (if shallower) move. Within a pass, the first
//! (best-ordered) child of every node is searched with the full
//! `(alpha, beta)` window; later children get a null-window probe
//! `(-alpha-1, -alpha)` and are only re-searched with the full window when
//! the probe lands strictly inside `(alpha, beta)`. With good ordering
//! most probes fail low or high and the re-search never happens.
//!
//! A [`TranspositionTable`] memoizes `(depth, score)` per position. The
//! table belongs to the engine instance and accumulates across calls —
//! a deliberate trade of memory for work, with [`clear_tt`] as the
//! explicit reset.
//!
//! [`clear_tt`]: IterativeDeepeningPvs::clear_tt

use std::sync::Arc;

use chess::{Board, BoardStatus, ChessMove};
use tracing::debug;

use crate::eval::Evaluator;
use crate::search::negamax::color_sign;
use crate::search::ordering::order_moves;
use crate::search::pool::WorkerPool;
use crate::search::tt::TranspositionTable;

/// Iterative-deepening PVS engine with a cumulative transposition table.
pub struct IterativeDeepeningPvs {
    evaluator: Arc<dyn Evaluator>,
    depth: u8,
    pool: WorkerPool,
    tt: TranspositionTable,
}

impl IterativeDeepeningPvs {
    /// Sequential engine deepening to `depth` plies.
    pub fn new(evaluator: Arc<dyn Evaluator>, depth: u8) -> Self {
        Self::with_pool(evaluator, depth, WorkerPool::serial())
    }

    /// Engine with an injected worker pool; a pool of more than one
    /// worker enables root-parallel search at every depth iteration.
    pub fn with_pool(evaluator: Arc<dyn Evaluator>, depth: u8, pool: WorkerPool) -> Self {
        Self {
            evaluator,
            depth: depth.max(1),
            pool,
            tt: TranspositionTable::new(),
        }
    }

    /// Configured target depth in plies.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Drop all accumulated transposition entries.
    pub fn clear_tt(&mut self) {
        self.tt.clear();
    }

    /// Search `board`, deepening from 1 to the target depth, and return
    /// the best move of the deepest completed pass.
    ///
    /// `history` is extended and restored in lock-step with every
    /// simulated move.
    pub fn best_move(
        &mut self,
        board: &Board,
        history: &mut Vec<u64>,
        depth_override: Option<u8>,
    ) -> Option<ChessMove> {
        let target_depth = depth_override.unwrap_or(self.depth).max(1);
        debug!(
            target_depth,
            parallel = self.pool.is_parallel(),
            tt_entries = self.tt.len(),
            "iterative deepening search"
        );

        if self.pool.is_parallel() {
            self.deepen_parallel(board, target_depth, history)
        } else {
            self.deepen_sequential(board, target_depth, history)
        }
    }

    /// One full root pass per depth; each pass overwrites the previous
    /// pass's best move.
    fn deepen_sequential(
        &mut self,
        board: &Board,
        target: u8,
        history: &mut Vec<u64>,
    ) -> Option<ChessMove> {
        let color = color_sign(board);
        let mut best_move = None;

        for current_depth in 1..=target {
            let mut max_eval = f64::NEG_INFINITY;
            let mut alpha = f64::NEG_INFINITY;
            let beta = f64::INFINITY;

            for mv in order_moves(board) {
                let child = board.make_move_new(mv);
                history.push(child.get_hash());
                let score = -pvs(
                    &child,
                    current_depth - 1,
                    -beta,
                    -alpha,
                    -color,
                    history,
                    self.evaluator.as_ref(),
                    &mut self.tt,
                );
                history.pop();

                if score > max_eval {
                    max_eval = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(score);
                if alpha >= beta {
                    break;
                }
            }

            debug!(
                depth = current_depth,
                score = max_eval,
                best = ?best_move.map(|m| m.to_string()),
                "completed deepening pass"
            );
        }

        best_move
    }

    /// Root-splitting at every depth iteration: each worker takes one
    /// root move with its own board copy, history copy, a *snapshot* of
    /// the table, and a fresh infinite window. Worker table writes stay
    /// in the worker's snapshot — only one recursion tree ever mutates a
    /// given table.
    fn deepen_parallel(
        &mut self,
        board: &Board,
        target: u8,
        history: &mut Vec<u64>,
    ) -> Option<ChessMove> {
        let color = color_sign(board);
        let evaluator = self.evaluator.as_ref();
        let base_history: &[u64] = history;
        let tt = &self.tt;
        let mut best_move = None;

        for current_depth in 1..=target {
            let results = self.pool.scatter(order_moves(board), |mv| {
                let child = board.make_move_new(mv);
                let mut history = base_history.to_vec();
                let mut tt = tt.clone();
                history.push(child.get_hash());
                let score = -pvs(
                    &child,
                    current_depth - 1,
                    f64::NEG_INFINITY,
                    f64::INFINITY,
                    -color,
                    &mut history,
                    evaluator,
                    &mut tt,
                );
                (mv, score)
            });

            let mut max_eval = f64::NEG_INFINITY;
            for (mv, score) in results {
                if score > max_eval {
                    max_eval = score;
                    best_move = Some(mv);
                }
            }

            debug!(
                depth = current_depth,
                score = max_eval,
                best = ?best_move.map(|m| m.to_string()),
                "completed deepening pass"
            );
        }

        best_move
    }
}

impl std::fmt::Debug for IterativeDeepeningPvs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IterativeDeepeningPvs")
            .field("depth", &self.depth)
            .field("pool", &self.pool)
            .field("tt", &self.tt)
            .finish_non_exhaustive()
    }
}

/// PVS recursion.
///
/// The table is probed with the key of the position *being evaluated*,
/// before any child move is pushed, and that same key is what goes onto
/// the history stack around each child recursion (the evaluator sees the
/// chain of positions that led here). Scores are stored unconditionally
/// after evaluating a leaf or finishing the move loop.
#[allow(clippy::too_many_arguments)]
pub(super) fn pvs(
    board: &Board,
    depth: u8,
    mut alpha: f64,
    beta: f64,
    color: f64,
    history: &mut Vec<u64>,
    evaluator: &dyn Evaluator,
    tt: &mut TranspositionTable,
) -> f64 {
    let key = board.get_hash();

    if let Some(score) = tt.lookup(key, depth) {
        return score;
    }

    if depth == 0 || board.status() != BoardStatus::Ongoing {
        let score = color * evaluator.evaluate(board, history);
        tt.store(key, depth, score);
        return score;
    }

    let mut max_eval = f64::NEG_INFINITY;
    let mut first = true;

    for mv in order_moves(board) {
        let child = board.make_move_new(mv);
        history.push(key);

        let score = if first {
            first = false;
            -pvs(
                &child,
                depth - 1,
                -beta,
                -alpha,
                -color,
                history,
                evaluator,
                tt,
            )
        } else {
            // Null-window probe; full re-search only on an unexpected
            // improvement strictly inside the window.
            let probe = -pvs(
                &child,
                depth - 1,
                -alpha - 1.0,
                -alpha,
                -color,
                history,
                evaluator,
                tt,
            );
            if alpha < probe && probe < beta {
                -pvs(
                    &child,
                    depth - 1,
                    -beta,
                    -alpha,
                    -color,
                    history,
                    evaluator,
                    tt,
                )
            } else {
                probe
            }
        };
        history.pop();

        max_eval = max_eval.max(score);
        alpha = alpha.max(score);
        if alpha >= beta {
            break;
        }
    }

    tt.store(key, depth, max_eval);
    max_eval
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chess::{MoveGen, Square};

    use crate::eval::MaterialEvaluator;
    use crate::search::negamax::negamax;

    use super::*;

    /// White: Kf6, Qg5. Black: Kh8. Qg7 is the only mate in one.
    const MATE_IN_ONE: &str = "7k/8/5K2/6Q1/8/8/8/8 w - - 0 1";

    /// Italian game after 1.e4 e5 2.Nf3 Nc6 3.Bc4.
    const ITALIAN: &str = "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3";

    #[test]
    fn returns_a_legal_opening_move() {
        let mut engine = IterativeDeepeningPvs::new(Arc::new(MaterialEvaluator), 2);
        let board = Board::default();
        let mut history = Vec::new();

        let mv = engine.best_move(&board, &mut history, None).unwrap();
        assert!(MoveGen::new_legal(&board).any(|legal| legal == mv));
    }

    #[test]
    fn finds_mate_in_one() {
        // At depth 2 the immediate mate is the unique +WIN_SCORE move.
        let mut engine = IterativeDeepeningPvs::new(Arc::new(MaterialEvaluator), 2);
        let board = Board::from_str(MATE_IN_ONE).unwrap();
        let mut history = Vec::new();

        let mv = engine.best_move(&board, &mut history, None).unwrap();
        assert_eq!(mv, ChessMove::new(Square::G5, Square::G7, None));
    }

    #[test]
    fn parallel_finds_the_same_mate() {
        let mut engine =
            IterativeDeepeningPvs::with_pool(Arc::new(MaterialEvaluator), 2, WorkerPool::new(4));
        let board = Board::from_str(MATE_IN_ONE).unwrap();
        let mut history = Vec::new();

        let mv = engine.best_move(&board, &mut history, None).unwrap();
        assert_eq!(mv, ChessMove::new(Square::G5, Square::G7, None));
    }

    #[test]
    fn deeper_search_still_picks_a_forced_mate() {
        // At depth 3 the slower mate Qh6 (Kg8 forced, then Qg7#) scores
        // the same +WIN_SCORE as the immediate Qg7#, and first-found
        // tie-keeping may return either. Both win; neither lets the
        // defender escape.
        let mut engine = IterativeDeepeningPvs::new(Arc::new(MaterialEvaluator), 3);
        let board = Board::from_str(MATE_IN_ONE).unwrap();
        let mut history = Vec::new();

        let mv = engine.best_move(&board, &mut history, None).unwrap();
        let mating = [
            ChessMove::new(Square::G5, Square::G7, None),
            ChessMove::new(Square::G5, Square::H6, None),
        ];
        assert!(mating.contains(&mv), "non-mating move {mv}");
    }

    #[test]
    fn depth_one_value_matches_plain_negamax() {
        // At depth 1 every child is an exact depth-0 evaluation, so the
        // null-window probes are window-independent and PVS must agree
        // with plain negamax to the bit.
        let board = Board::from_str(ITALIAN).unwrap();
        let color = color_sign(&board);

        let mut tt = TranspositionTable::new();
        let from_pvs = pvs(
            &board,
            1,
            f64::NEG_INFINITY,
            f64::INFINITY,
            color,
            &mut Vec::new(),
            &MaterialEvaluator,
            &mut tt,
        );
        let from_negamax = negamax(
            &board,
            1,
            f64::NEG_INFINITY,
            f64::INFINITY,
            color,
            &mut Vec::new(),
            &MaterialEvaluator,
        );
        assert_eq!(from_pvs, from_negamax);
    }

    #[test]
    fn null_window_probe_never_exceeds_final_score() {
        // The re-searched (or accepted) value of any child can only be
        // at or above its null-window estimate; at the root this means
        // the returned score bounds every probe from above.
        let board = Board::from_str(ITALIAN).unwrap();
        let color = color_sign(&board);
        let mut tt = TranspositionTable::new();

        let full = pvs(
            &board,
            2,
            f64::NEG_INFINITY,
            f64::INFINITY,
            color,
            &mut Vec::new(),
            &MaterialEvaluator,
            &mut tt,
        );

        // Probe every root child through a null window anchored below
        // the final score; none may beat the full-window result.
        for mv in order_moves(&board) {
            let child = board.make_move_new(mv);
            let mut probe_tt = TranspositionTable::new();
            let probe = -pvs(
                &child,
                1,
                -full - 1.0,
                -full,
                -color,
                &mut Vec::new(),
                &MaterialEvaluator,
                &mut probe_tt,
            );
            assert!(probe <= full);
        }
    }

    #[test]
    fn table_accumulates_across_calls() {
        let mut engine = IterativeDeepeningPvs::new(Arc::new(MaterialEvaluator), 2);
        let board = Board::default();
        let mut history = Vec::new();

        engine.best_move(&board, &mut history, None);
        let after_first = engine.tt.len();
        assert!(after_first > 0);

        engine.best_move(&board, &mut history, None);
        assert!(engine.tt.len() >= after_first);

        engine.clear_tt();
        assert!(engine.tt.is_empty());
    }

    #[test]
    fn history_is_restored_after_search() {
        let mut engine = IterativeDeepeningPvs::new(Arc::new(MaterialEvaluator), 3);
        let board = Board::from_str(ITALIAN).unwrap();
        let mut history = vec![1, 2, 3];

        engine.best_move(&board, &mut history, None);
        assert_eq!(history, vec![1, 2, 3]);
    }
}
