//! Negamax search with alpha-beta pruning.
//!
//! The recursion scores every position relative to the side to move
//! (`color * evaluate`), so one maximization loop serves both players.
//! Alpha-beta cuts a branch as soon as the window closes
//! (`alpha >= beta`). In parallel mode the *root* moves are scattered over
//! a worker pool; each worker searches its move from a fresh infinite
//! window, trading some pruning for parallelism.

use std::sync::Arc;

use chess::{Board, BoardStatus, ChessMove, Color};
use tracing::debug;

use crate::eval::Evaluator;
use crate::search::ordering::order_moves;
use crate::search::pool::WorkerPool;

/// Sign of the side to move: `+1` for White, `-1` for Black.
pub(super) fn color_sign(board: &Board) -> f64 {
    match board.side_to_move() {
        Color::White => 1.0,
        Color::Black => -1.0,
    }
}

/// Fixed-depth negamax alpha-beta engine.
///
/// Assumes a well-formed, non-terminal root position; on a terminal
/// position there is nothing to search and no move is returned.
pub struct NegamaxAlphaBeta {
    evaluator: Arc<dyn Evaluator>,
    depth: u8,
    pool: WorkerPool,
}

impl NegamaxAlphaBeta {
    /// Sequential engine searching to `depth` plies.
    pub fn new(evaluator: Arc<dyn Evaluator>, depth: u8) -> Self {
        Self::with_pool(evaluator, depth, WorkerPool::serial())
    }

    /// Engine with an injected worker pool; a pool of more than one
    /// worker enables root-parallel search.
    pub fn with_pool(evaluator: Arc<dyn Evaluator>, depth: u8, pool: WorkerPool) -> Self {
        Self {
            evaluator,
            depth: depth.max(1),
            pool,
        }
    }

    /// Configured search depth in plies.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Search `board` and return the best move found.
    ///
    /// `history` is the prior-position-key stack; it is extended and
    /// restored in lock-step with every simulated move, so it reads the
    /// same after the call as before it.
    pub fn best_move(
        &self,
        board: &Board,
        history: &mut Vec<u64>,
        depth_override: Option<u8>,
    ) -> Option<ChessMove> {
        let depth = depth_override.unwrap_or(self.depth).max(1);
        debug!(depth, parallel = self.pool.is_parallel(), "negamax search");

        if self.pool.is_parallel() {
            self.root_parallel(board, depth, history)
        } else {
            self.root_sequential(board, depth, history)
        }
    }

    /// Root move loop with a shared alpha-beta window.
    ///
    /// Ties keep the first move found (strict `>`), so the ordering's
    /// first-best candidate survives equal scores.
    fn root_sequential(
        &self,
        board: &Board,
        depth: u8,
        history: &mut Vec<u64>,
    ) -> Option<ChessMove> {
        let color = color_sign(board);
        let mut best_move = None;
        let mut max_eval = f64::NEG_INFINITY;
        let mut alpha = f64::NEG_INFINITY;
        let beta = f64::INFINITY;

        for mv in order_moves(board) {
            let child = board.make_move_new(mv);
            history.push(child.get_hash());
            let score = -negamax(
                &child,
                depth - 1,
                -beta,
                -alpha,
                -color,
                history,
                self.evaluator.as_ref(),
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

        best_move
    }

    /// Root moves scattered across the pool, one independent board and
    /// history copy per task, each searched from a fresh infinite window.
    /// No alpha-beta information crosses workers.
    fn root_parallel(&self, board: &Board, depth: u8, history: &mut Vec<u64>) -> Option<ChessMove> {
        let moves = order_moves(board);
        let color = color_sign(board);
        let evaluator = self.evaluator.as_ref();
        let base_history: &[u64] = history;

        let results = self.pool.scatter(moves, |mv| {
            let child = board.make_move_new(mv);
            let mut history = base_history.to_vec();
            history.push(child.get_hash());
            let score = -negamax(
                &child,
                depth - 1,
                f64::NEG_INFINITY,
                f64::INFINITY,
                -color,
                &mut history,
                evaluator,
            );
            (mv, score)
        });

        let mut best_move = None;
        let mut max_eval = f64::NEG_INFINITY;
        for (mv, score) in results {
            if score > max_eval {
                max_eval = score;
                best_move = Some(mv);
            }
        }
        best_move
    }
}

impl std::fmt::Debug for NegamaxAlphaBeta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NegamaxAlphaBeta")
            .field("depth", &self.depth)
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

/// Negamax recursion: best achievable score for the side to move.
///
/// At depth 0 or a finished game the position is scored as
/// `color * evaluate` (the evaluator speaks from White's perspective).
/// The child's key is pushed onto `history` before recursing and popped
/// right after, mirroring make/unmake exactly.
pub(super) fn negamax(
    board: &Board,
    depth: u8,
    mut alpha: f64,
    beta: f64,
    color: f64,
    history: &mut Vec<u64>,
    evaluator: &dyn Evaluator,
) -> f64 {
    if depth == 0 || board.status() != BoardStatus::Ongoing {
        return color * evaluator.evaluate(board, history);
    }

    let mut max_eval = f64::NEG_INFINITY;
    for mv in order_moves(board) {
        let child = board.make_move_new(mv);
        history.push(child.get_hash());
        let score = -negamax(&child, depth - 1, -beta, -alpha, -color, history, evaluator);
        history.pop();

        max_eval = max_eval.max(score);
        alpha = alpha.max(score);
        if alpha >= beta {
            break;
        }
    }
    max_eval
}
