//! Worked policy-value evaluators.

use std::collections::HashMap;

use chess::{Board, ChessMove};

use crate::eval::material::{WIN_SCORE, material_balance, terminal_score};
use crate::eval::PolicyValue;

/// Uniform priors, neutral value.
///
/// The simplest possible policy: every legal move gets probability `1/n`
/// and every position is valued at 0. With it, PUCT degenerates to pure
/// visit-driven exploration, which makes search behavior easy to reason
/// about in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformPolicy;

impl PolicyValue for UniformPolicy {
    fn evaluate(&self, _board: &Board, legal_moves: &[ChessMove]) -> (HashMap<ChessMove, f64>, f64) {
        let n = legal_moves.len().max(1) as f64;
        let priors = legal_moves.iter().map(|&mv| (mv, 1.0 / n)).collect();
        (priors, 0.0)
    }
}

/// Uniform priors, material-based value.
///
/// Values come from [`material_balance`] rescaled into `[-1, 1]` and
/// flipped to the side to move's perspective, matching the scale the MCTS
/// engine expects from a learned value head.
#[derive(Debug, Default, Clone, Copy)]
pub struct MaterialPolicy;

impl PolicyValue for MaterialPolicy {
    fn evaluate(&self, board: &Board, legal_moves: &[ChessMove]) -> (HashMap<ChessMove, f64>, f64) {
        let (priors, _) = UniformPolicy.evaluate(board, legal_moves);

        let white_score = terminal_score(board).unwrap_or_else(|| material_balance(board));
        let sign = match board.side_to_move() {
            chess::Color::White => 1.0,
            chess::Color::Black => -1.0,
        };
        let value = (sign * white_score / WIN_SCORE).clamp(-1.0, 1.0);

        (priors, value)
    }
}
