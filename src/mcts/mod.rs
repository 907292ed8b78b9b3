//! Policy-guided Monte Carlo Tree Search.
//!
//! Instead of a fixed lookahead depth, the engine spends a fixed budget
//! of simulations growing a [`Tree`]. Each simulation descends from the
//! root by PUCT selection, evaluates the leaf it reaches (game result for
//! terminal positions, the policy-value evaluator otherwise), expands the
//! leaf with one child per legal move weighted by the evaluator's priors,
//! and backpropagates the leaf value up the tree with a sign flip per
//! level. The final move is drawn from a temperature-controlled
//! distribution over root-child *visit counts*, never values.
//!
//! Simulations run strictly one at a time — the tree is not built for
//! concurrent mutation, and that is a deliberate simplicity trade-off.

pub mod node;

use std::collections::HashMap;
use std::sync::Arc;

use chess::{Board, BoardStatus, ChessMove, MoveGen};
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use tracing::debug;

use crate::eval::PolicyValue;

pub use node::{Node, NodeId, Tree};

/// Default simulation budget per move.
pub const DEFAULT_SIMULATIONS: u32 = 800;

/// PUCT exploration constant.
pub const C_PUCT: f64 = 1.0;

/// Default move-selection temperature — low enough to approximate
/// arg-max over visit counts.
pub const SELECTION_TEMPERATURE: f64 = 1e-3;

/// Floor temperature; anything lower would overflow the exponentials.
const MIN_TEMPERATURE: f64 = 1e-3;

/// Prior assigned to a legal move the evaluator could not index.
/// Small but non-zero, so the move is never pruned outright.
const MIN_PRIOR: f64 = 1e-9;

/// Monte Carlo engine driven by a policy-value evaluator.
pub struct PolicyGuidedMcts {
    policy: Arc<dyn PolicyValue>,
    simulations: u32,
    c_puct: f64,
    temperature: f64,
}

impl PolicyGuidedMcts {
    /// Engine with the given simulation budget and default exploration
    /// parameters.
    pub fn new(policy: Arc<dyn PolicyValue>, simulations: u32) -> Self {
        Self::with_params(policy, simulations, C_PUCT, SELECTION_TEMPERATURE)
    }

    /// Engine with explicit exploration constant and selection
    /// temperature.
    pub fn with_params(
        policy: Arc<dyn PolicyValue>,
        simulations: u32,
        c_puct: f64,
        temperature: f64,
    ) -> Self {
        Self {
            policy,
            simulations: simulations.max(1),
            c_puct,
            temperature,
        }
    }

    /// Configured simulation budget.
    pub fn simulations(&self) -> u32 {
        self.simulations
    }

    /// Grow a fresh tree from `board` for the full simulation budget and
    /// select a move from the root's visit counts.
    pub fn pick_move(&self, board: &Board, budget_override: Option<u32>) -> Option<ChessMove> {
        let budget = budget_override.unwrap_or(self.simulations).max(1);
        let mut tree = Tree::new(*board);
        self.run(&mut tree, budget);
        select_move(&tree, self.temperature, &mut rand::rng())
    }

    /// Run `simulations` full select-evaluate-expand-backpropagate
    /// cycles on `tree`.
    pub fn run(&self, tree: &mut Tree, simulations: u32) {
        debug!(simulations, "mcts search");
        for _ in 0..simulations {
            self.simulate(tree);
        }
        debug!(
            nodes = tree.len(),
            root_visits = tree.node(tree.root()).visits,
            "mcts search complete"
        );
    }

    /// One simulation. Tree mutation is confined to this call; the next
    /// simulation only starts once this one has fully completed.
    fn simulate(&self, tree: &mut Tree) {
        // Selection: descend while children exist.
        let mut id = tree.root();
        while let Some(child) = tree.select_child(id, self.c_puct) {
            id = child;
        }

        // Leaf evaluation, from the leaf's side-to-move perspective.
        let board = tree.node(id).board;
        let value = match board.status() {
            // The side to move has been mated.
            BoardStatus::Checkmate => -1.0,
            BoardStatus::Stalemate => 0.0,
            BoardStatus::Ongoing => {
                let legal: Vec<ChessMove> = MoveGen::new_legal(&board).collect();
                let (priors, value) = self.policy.evaluate(&board, &legal);
                self.expand(tree, id, &board, &legal, &priors);
                value.clamp(-1.0, 1.0)
            }
        };

        // The leaf's stored value is seen from the side that moved into
        // it, hence the negation; backpropagation flips per level.
        tree.backpropagate(id, -value);
    }

    /// Create one child per legal move, with priors renormalized over
    /// the legal moves only — probability mass the evaluator put on
    /// illegal moves is discarded. A legal move missing from the
    /// evaluator's output gets the [`MIN_PRIOR`] floor.
    fn expand(
        &self,
        tree: &mut Tree,
        id: NodeId,
        board: &Board,
        legal: &[ChessMove],
        priors: &HashMap<ChessMove, f64>,
    ) {
        let weighted: Vec<(ChessMove, f64)> = legal
            .iter()
            .map(|&mv| {
                let prior = priors
                    .get(&mv)
                    .copied()
                    .filter(|p| p.is_finite() && *p > 0.0)
                    .unwrap_or(MIN_PRIOR);
                (mv, prior)
            })
            .collect();

        let total: f64 = weighted.iter().map(|(_, p)| p).sum();
        let scale = if total > 0.0 { 1.0 / total } else { 1.0 };

        for (mv, prior) in weighted {
            tree.add_child(id, mv, board.make_move_new(mv), prior * scale);
        }
    }
}

impl std::fmt::Debug for PolicyGuidedMcts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyGuidedMcts")
            .field("simulations", &self.simulations)
            .field("c_puct", &self.c_puct)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

/// Sample a move from the root's children with probability proportional
/// to `visits^(1/temperature)`.
///
/// Computed in log space: visit counts are clipped to at least 1, their
/// logs shifted by the maximum before exponentiating, so a near-zero
/// temperature collapses onto the most-visited child without overflow.
/// If the resulting weights are degenerate (non-finite or zero total
/// mass), selection falls back deterministically to [`most_visited`].
pub fn select_move<R: Rng>(tree: &Tree, temperature: f64, rng: &mut R) -> Option<ChessMove> {
    let root = tree.node(tree.root());
    if root.children.is_empty() {
        return None;
    }

    let moves: Vec<ChessMove> = tree
        .children(tree.root())
        .iter()
        .filter_map(|&id| tree.node(id).mv)
        .collect();
    let log_visits: Vec<f64> = tree
        .children(tree.root())
        .iter()
        .map(|&id| f64::from(tree.node(id).visits.max(1)).ln())
        .collect();

    let temperature = temperature.max(MIN_TEMPERATURE);
    let max_log = log_visits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let weights: Vec<f64> = log_visits
        .iter()
        .map(|&log| ((log - max_log) / temperature).exp())
        .collect();

    match WeightedIndex::new(&weights) {
        Ok(dist) => Some(moves[dist.sample(rng)]),
        Err(_) => most_visited(tree),
    }
}

/// The root child with the maximum visit count; ties keep the first
/// child. Deterministic fallback for degenerate sampling weights.
pub fn most_visited(tree: &Tree) -> Option<ChessMove> {
    let mut best = None;
    let mut best_visits = 0;
    for &id in tree.children(tree.root()) {
        let node = tree.node(id);
        if best.is_none() || node.visits > best_visits {
            best = node.mv;
            best_visits = node.visits;
        }
    }
    best
}
