//! Uniform entry point over the search variants.
//!
//! Callers construct one [`Algorithm`] up front — evaluator, depth or
//! simulation budget, and worker pool are all fixed at construction —
//! and then ask it for a move each turn. The variant set is closed:
//! dispatch is an exhaustive match, not dynamic registration.

use chess::{Board, BoardStatus, ChessMove};
use tracing::debug;

use crate::error::SearchError;
use crate::mcts::PolicyGuidedMcts;
use crate::search::heuristic::Heuristic;
use crate::search::negamax::NegamaxAlphaBeta;
use crate::search::pvs::IterativeDeepeningPvs;

/// One configured search algorithm.
pub enum Algorithm {
    /// Plain fixed-depth minimax.
    Heuristic(Heuristic),
    /// Negamax with alpha-beta pruning.
    NegamaxAlphaBeta(NegamaxAlphaBeta),
    /// Iterative deepening with principal-variation search.
    IterativeDeepeningPvs(IterativeDeepeningPvs),
    /// Policy-guided Monte Carlo tree search.
    PolicyGuidedMcts(PolicyGuidedMcts),
}

impl Algorithm {
    /// Pick a move for the side to move on `board`.
    ///
    /// `history` is the ordered sequence of prior position keys; the
    /// tree searches thread it through to the evaluator and leave it
    /// exactly as they found it. `limit` overrides the configured search
    /// depth (tree searches) or simulation budget (MCTS) for this call
    /// only.
    ///
    /// Callers should not ask for a move on a finished game; doing so
    /// reports [`SearchError::TerminalPosition`] rather than a move.
    pub fn pick_move(
        &mut self,
        board: &Board,
        history: &mut Vec<u64>,
        limit: Option<u32>,
    ) -> Result<ChessMove, SearchError> {
        if board.status() != BoardStatus::Ongoing {
            return Err(SearchError::TerminalPosition);
        }

        debug!(variant = self.name(), ?limit, "picking move");
        let depth_limit = limit.map(|d| d.min(u8::MAX as u32) as u8);

        let picked = match self {
            Algorithm::Heuristic(engine) => engine.best_move(board, depth_limit),
            Algorithm::NegamaxAlphaBeta(engine) => engine.best_move(board, history, depth_limit),
            Algorithm::IterativeDeepeningPvs(engine) => {
                engine.best_move(board, history, depth_limit)
            }
            Algorithm::PolicyGuidedMcts(engine) => engine.pick_move(board, limit),
        };

        picked.ok_or(SearchError::NoMoveFound)
    }

    /// Short name of the configured variant, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Heuristic(_) => "heuristic",
            Algorithm::NegamaxAlphaBeta(_) => "negamax-alphabeta",
            Algorithm::IterativeDeepeningPvs(_) => "idpvs",
            Algorithm::PolicyGuidedMcts(_) => "policy-mcts",
        }
    }
}

impl std::fmt::Debug for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Algorithm").field(&self.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::sync::Arc;

    use chess::MoveGen;

    use crate::eval::{MaterialEvaluator, MaterialPolicy};

    use super::*;

    fn variants() -> Vec<Algorithm> {
        vec![
            Algorithm::Heuristic(Heuristic::new(Arc::new(MaterialEvaluator), 2)),
            Algorithm::NegamaxAlphaBeta(NegamaxAlphaBeta::new(Arc::new(MaterialEvaluator), 2)),
            Algorithm::IterativeDeepeningPvs(IterativeDeepeningPvs::new(
                Arc::new(MaterialEvaluator),
                2,
            )),
            Algorithm::PolicyGuidedMcts(PolicyGuidedMcts::new(Arc::new(MaterialPolicy), 64)),
        ]
    }

    #[test]
    fn every_variant_returns_a_legal_opening_move() {
        let board = Board::default();
        for mut algorithm in variants() {
            let mut history = Vec::new();
            let mv = algorithm.pick_move(&board, &mut history, None).unwrap();
            assert!(
                MoveGen::new_legal(&board).any(|legal| legal == mv),
                "{} returned illegal move {mv}",
                algorithm.name()
            );
            assert!(history.is_empty());
        }
    }

    #[test]
    fn terminal_position_is_rejected() {
        let board = Board::from_str("7k/6Q1/5K2/8/8/8/8/8 b - - 0 1").unwrap();
        for mut algorithm in variants() {
            let mut history = Vec::new();
            let err = algorithm.pick_move(&board, &mut history, None).unwrap_err();
            assert!(matches!(err, SearchError::TerminalPosition));
        }
    }
}
