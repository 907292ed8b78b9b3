//! Evaluation seams consumed by the search engines.
//!
//! The search engines never score a position themselves — they call out
//! through one of two traits. [`Evaluator`] is the scalar mode used by the
//! minimax-family searches; [`PolicyValue`] is the policy-value mode used
//! by the MCTS engine. Worked implementations suitable as defaults and as
//! test doubles live in the submodules.

pub mod material;
pub mod policy;

use std::collections::HashMap;

use chess::{Board, ChessMove};

pub use material::MaterialEvaluator;
pub use policy::{MaterialPolicy, UniformPolicy};

/// Scalar position evaluator.
///
/// Scores are from White's perspective on an unbounded, centipawn-like
/// scale. Terminal positions map to large sentinel magnitudes for decisive
/// results and 0 for draws (see [`material::WIN_SCORE`]).
///
/// `history` is the ordered sequence of prior position keys, threaded
/// through every search recursion so evaluators can account for context
/// such as repetitions. Implementations are free to ignore it.
pub trait Evaluator: Send + Sync {
    /// Score `board` from White's perspective.
    fn evaluate(&self, board: &Board, history: &[u64]) -> f64;
}

/// Policy-value position evaluator.
///
/// Returns a prior probability for each supplied legal move together with
/// a scalar value estimate in `[-1, 1]` from the perspective of the side
/// to move. The returned map may omit moves (e.g. when a learned policy
/// head cannot index them) and need not be normalized — the search engine
/// renormalizes over legal moves and floors missing entries.
pub trait PolicyValue: Send + Sync {
    /// Evaluate `board`, returning `(move priors, value)`.
    fn evaluate(&self, board: &Board, legal_moves: &[ChessMove]) -> (HashMap<ChessMove, f64>, f64);
}
