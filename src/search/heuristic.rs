//! Plain fixed-depth minimax.
//!
//! The simplest engine in the family: no move ordering, no memoization,
//! no history context, no parallelism — just minimax with alpha-beta over
//! the raw legal move list. Useful as a baseline opponent and as a
//! cross-check for the cleverer searches.

use std::sync::Arc;

use chess::{Board, BoardStatus, ChessMove, Color, MoveGen};
use tracing::debug;

use crate::eval::Evaluator;

/// Fixed-depth minimax engine over a scalar evaluator.
pub struct Heuristic {
    evaluator: Arc<dyn Evaluator>,
    depth: u8,
}

impl Heuristic {
    /// Engine searching to `depth` plies.
    pub fn new(evaluator: Arc<dyn Evaluator>, depth: u8) -> Self {
        Self {
            evaluator,
            depth: depth.max(1),
        }
    }

    /// Configured search depth in plies.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Search `board` and return the best move for the side to move:
    /// White picks the maximizing move, Black the minimizing one (the
    /// evaluator speaks from White's perspective). Ties keep the first
    /// move found.
    pub fn best_move(&self, board: &Board, depth_override: Option<u8>) -> Option<ChessMove> {
        let depth = depth_override.unwrap_or(self.depth).max(1);
        let maximizing = board.side_to_move() == Color::White;
        debug!(depth, maximizing, "heuristic minimax search");

        let mut best_move = None;
        let mut best_score = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };

        for mv in MoveGen::new_legal(board) {
            let child = board.make_move_new(mv);
            let score = self.minimax(
                &child,
                depth - 1,
                !maximizing,
                f64::NEG_INFINITY,
                f64::INFINITY,
            );

            let improves = if maximizing {
                score > best_score
            } else {
                score < best_score
            };
            if improves {
                best_score = score;
                best_move = Some(mv);
            }
        }

        best_move
    }

    fn minimax(
        &self,
        board: &Board,
        depth: u8,
        is_maximizing: bool,
        mut alpha: f64,
        mut beta: f64,
    ) -> f64 {
        if depth == 0 || board.status() != BoardStatus::Ongoing {
            return self.evaluator.evaluate(board, &[]);
        }

        if is_maximizing {
            let mut max_score = f64::NEG_INFINITY;
            for mv in MoveGen::new_legal(board) {
                let child = board.make_move_new(mv);
                let score = self.minimax(&child, depth - 1, false, alpha, beta);
                max_score = max_score.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    break;
                }
            }
            max_score
        } else {
            let mut min_score = f64::INFINITY;
            for mv in MoveGen::new_legal(board) {
                let child = board.make_move_new(mv);
                let score = self.minimax(&child, depth - 1, true, alpha, beta);
                min_score = min_score.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    break;
                }
            }
            min_score
        }
    }
}

impl std::fmt::Debug for Heuristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Heuristic")
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}
