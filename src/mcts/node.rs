//! Arena-allocated Monte Carlo search tree.
//!
//! Nodes live in one `Vec`; children and parents refer to each other by
//! [`NodeId`] index. The parent link exists solely so backpropagation can
//! walk to the root — ownership only ever flows downward, so there are no
//! reference cycles to manage.

use chess::{Board, ChessMove};

/// Index of a node within its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Arena index of the parent; `None` for the root.
    pub(crate) parent: Option<NodeId>,
    /// The move that led to this node's position; `None` for the root.
    pub mv: Option<ChessMove>,
    /// Position at this node.
    pub board: Board,
    pub(crate) children: Vec<NodeId>,
    /// Number of completed simulations through this node.
    pub visits: u32,
    /// Sum of backpropagated values through this node.
    pub value_sum: f64,
    /// Prior probability assigned at creation, from the parent's policy
    /// query.
    pub prior: f64,
}

impl Node {
    fn new(parent: Option<NodeId>, mv: Option<ChessMove>, board: Board, prior: f64) -> Self {
        Self {
            parent,
            mv,
            board,
            children: Vec::new(),
            visits: 0,
            value_sum: 0.0,
            prior,
        }
    }

    /// Arena id of the parent node; `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Mean backpropagated value; 0 until the node has been visited.
    pub fn value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.value_sum / f64::from(self.visits)
        }
    }

    /// Whether this node has children (selection descends past it).
    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }
}

/// The search tree: an arena of nodes plus the current root index.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    /// Single-node tree rooted at `board`.
    pub fn new(board: Board) -> Self {
        Self {
            nodes: vec![Node::new(None, None, board, 0.0)],
            root: NodeId(0),
        }
    }

    /// The current root's id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Borrow a node.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Ids of a node's children, in creation order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Total number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty (never true: a tree always has a root).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a child of `parent` and link it in.
    pub(crate) fn add_child(
        &mut self,
        parent: NodeId,
        mv: ChessMove,
        board: Board,
        prior: f64,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes
            .push(Node::new(Some(parent), Some(mv), board, prior));
        self.node_mut(parent).children.push(id);
        id
    }

    /// PUCT child selection: the child maximizing `Q + U`, where `Q` is
    /// the child's mean value and
    /// `U = c_puct * prior * sqrt(parent_visits) / (1 + child_visits)`.
    ///
    /// Returns `None` for a childless node. Ties keep the first child.
    pub fn select_child(&self, id: NodeId, c_puct: f64) -> Option<NodeId> {
        let node = self.node(id);
        let parent_visits = f64::from(node.visits.max(1));

        let mut best = None;
        let mut best_score = f64::NEG_INFINITY;
        for &child_id in &node.children {
            let child = self.node(child_id);
            let q = child.value();
            let u = c_puct * child.prior * parent_visits.sqrt() / (1.0 + f64::from(child.visits));
            if q + u > best_score {
                best_score = q + u;
                best = Some(child_id);
            }
        }
        best
    }

    /// Propagate a simulation result from `leaf` to the root, flipping
    /// the sign at every level — each level is the opposing side's
    /// perspective. `value` is credited to the leaf itself.
    pub(crate) fn backpropagate(&mut self, leaf: NodeId, mut value: f64) {
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = self.node_mut(id);
            node.visits += 1;
            node.value_sum += value;
            value = -value;
            current = node.parent;
        }
    }

    /// Advance the root after `mv` was played on the real board.
    ///
    /// If the root has a child for `mv`, that child becomes the new root:
    /// its parent link is severed, its subtree (statistics intact) is
    /// kept, and everything else — old root and siblings — is dropped.
    /// Otherwise the tree is rebuilt as a single node at the resulting
    /// position.
    pub fn advance(&mut self, mv: ChessMove) {
        let matched = self
            .children(self.root)
            .iter()
            .copied()
            .find(|&child| self.node(child).mv == Some(mv));

        match matched {
            Some(child) => {
                let mut nodes = Vec::new();
                let root = self.copy_subtree(child, None, &mut nodes);
                self.nodes = nodes;
                self.root = root;
            }
            None => {
                let board = self.node(self.root).board.make_move_new(mv);
                *self = Tree::new(board);
            }
        }
    }

    /// Copy the subtree under `id` into `out`, re-indexing as it goes.
    fn copy_subtree(&self, id: NodeId, parent: Option<NodeId>, out: &mut Vec<Node>) -> NodeId {
        let new_id = NodeId(out.len());
        let mut node = self.nodes[id.0].clone();
        node.parent = parent;
        node.children = Vec::new();
        out.push(node);

        for &child in &self.nodes[id.0].children {
            let new_child = self.copy_subtree(child, Some(new_id), out);
            out[new_id.0].children.push(new_child);
        }
        new_id
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chess::Square;

    use super::*;

    fn mv(from: Square, to: Square) -> ChessMove {
        ChessMove::new(from, to, None)
    }

    #[test]
    fn unvisited_value_is_zero() {
        let tree = Tree::new(Board::default());
        assert_eq!(tree.node(tree.root()).value(), 0.0);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn backpropagation_flips_sign_per_level() {
        let board = Board::default();
        let mut tree = Tree::new(board);
        let root = tree.root();
        let e4 = mv(Square::E2, Square::E4);
        let child = tree.add_child(root, e4, board.make_move_new(e4), 1.0);

        tree.backpropagate(child, 1.0);

        assert_eq!(tree.node(child).visits, 1);
        assert_eq!(tree.node(child).value_sum, 1.0);
        assert_eq!(tree.node(root).visits, 1);
        assert_eq!(tree.node(root).value_sum, -1.0);
    }

    #[test]
    fn puct_prefers_high_prior_when_unvisited() {
        let board = Board::default();
        let mut tree = Tree::new(board);
        let root = tree.root();

        let e4 = mv(Square::E2, Square::E4);
        let d4 = mv(Square::D2, Square::D4);
        tree.add_child(root, e4, board.make_move_new(e4), 0.1);
        let strong = tree.add_child(root, d4, board.make_move_new(d4), 0.9);

        assert_eq!(tree.select_child(root, 1.0), Some(strong));
    }

    #[test]
    fn puct_explores_once_the_favorite_disappoints() {
        let board = Board::default();
        let mut tree = Tree::new(board);
        let root = tree.root();

        let e4 = mv(Square::E2, Square::E4);
        let d4 = mv(Square::D2, Square::D4);
        let weak = tree.add_child(root, e4, board.make_move_new(e4), 0.5);
        let fresh = tree.add_child(root, d4, board.make_move_new(d4), 0.5);

        // The favorite has been visited often and scored badly; the
        // untouched sibling's exploration bonus now wins.
        tree.node_mut(root).visits = 100;
        tree.node_mut(weak).visits = 99;
        tree.node_mut(weak).value_sum = -60.0;

        assert_eq!(tree.select_child(root, 1.0), Some(fresh));
    }

    #[test]
    fn select_child_on_leaf_is_none() {
        let tree = Tree::new(Board::default());
        assert_eq!(tree.select_child(tree.root(), 1.0), None);
    }

    #[test]
    fn advance_to_explored_child_keeps_statistics() {
        let board = Board::default();
        let mut tree = Tree::new(board);
        let root = tree.root();

        let e4 = mv(Square::E2, Square::E4);
        let d4 = mv(Square::D2, Square::D4);
        let kept = tree.add_child(root, e4, board.make_move_new(e4), 0.5);
        tree.add_child(root, d4, board.make_move_new(d4), 0.5);
        tree.backpropagate(kept, 0.25);
        tree.backpropagate(kept, 0.75);

        tree.advance(e4);

        let new_root = tree.node(tree.root());
        assert_eq!(new_root.parent, None);
        assert_eq!(new_root.mv, Some(e4));
        assert_eq!(new_root.visits, 2);
        assert_eq!(new_root.value_sum, 1.0);
        // Old root and the d4 sibling are gone.
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn advance_to_unexplored_move_rebuilds() {
        let board = Board::default();
        let mut tree = Tree::new(board);
        let e4 = mv(Square::E2, Square::E4);

        tree.advance(e4);

        let root = tree.node(tree.root());
        assert_eq!(root.parent, None);
        assert_eq!(root.visits, 0);
        assert_eq!(root.board, board.make_move_new(e4));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn advance_keeps_grandchildren() {
        let board = Board::from_str(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        )
        .unwrap();
        let mut tree = Tree::new(board);
        let root = tree.root();

        let e4 = mv(Square::E2, Square::E4);
        let after_e4 = board.make_move_new(e4);
        let child = tree.add_child(root, e4, after_e4, 1.0);

        let e5 = mv(Square::E7, Square::E5);
        let grandchild = tree.add_child(child, e5, after_e4.make_move_new(e5), 1.0);
        tree.backpropagate(grandchild, 0.5);

        tree.advance(e4);

        assert_eq!(tree.len(), 2);
        let root = tree.root();
        assert_eq!(tree.children(root).len(), 1);
        let kept = tree.children(root)[0];
        assert_eq!(tree.node(kept).mv, Some(e5));
        assert_eq!(tree.node(kept).visits, 1);
        assert_eq!(tree.node(kept).parent, Some(root));
    }
}
