//! Move search for two-player, perfect-information chess.
//!
//! The crate ranks the legal moves of a position by exploring future
//! positions, and exposes one operation to callers: pick a move. Four
//! search variants sit behind the [`Algorithm`] facade:
//!
//! - [`Heuristic`] — fixed-depth plain minimax with alpha-beta.
//! - [`NegamaxAlphaBeta`] — negamax with alpha-beta pruning and optional
//!   root-parallel search.
//! - [`IterativeDeepeningPvs`] — iterative deepening with null-window
//!   re-search and a transposition table.
//! - [`PolicyGuidedMcts`] — PUCT tree search guided by a learned prior
//!   distribution and value estimate.
//!
//! Rules (legal move generation, make-move, game termination, position
//! hashing) come from the `chess` crate; position evaluation is supplied
//! by the caller behind the [`Evaluator`] and [`PolicyValue`] traits.

pub mod agent;
pub mod error;
pub mod eval;
pub mod mcts;
pub mod search;

pub use agent::Algorithm;
pub use error::SearchError;
pub use eval::{Evaluator, MaterialEvaluator, MaterialPolicy, PolicyValue, UniformPolicy};
pub use mcts::PolicyGuidedMcts;
pub use search::heuristic::Heuristic;
pub use search::negamax::NegamaxAlphaBeta;
pub use search::pool::WorkerPool;
pub use search::pvs::IterativeDeepeningPvs;
