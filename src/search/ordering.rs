//! Move ordering: captures, promotions, and checks first.
//!
//! Good ordering is what makes alpha-beta cut: the earlier a strong move
//! is searched, the more of its siblings fail outside the window. Ordering
//! never changes which move is analytically best — it is side-effect-free
//! and independent of search depth.

use std::cmp::Reverse;

use chess::{Board, ChessMove, MoveGen, Piece};

/// Captured-piece weight used in the capture bonus (pawn = 1 .. king = 6).
const fn capture_weight(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => 1,
        Piece::Knight => 2,
        Piece::Bishop => 3,
        Piece::Rook => 4,
        Piece::Queen => 5,
        Piece::King => 6,
    }
}

/// The piece a move captures, if any.
///
/// En passant is the one capture whose destination square is empty; it is
/// recognized as a pawn moving diagonally onto an empty square.
fn captured_piece(board: &Board, mv: ChessMove) -> Option<Piece> {
    if let Some(victim) = board.piece_on(mv.get_dest()) {
        return Some(victim);
    }
    if board.piece_on(mv.get_source()) == Some(Piece::Pawn)
        && mv.get_source().get_file() != mv.get_dest().get_file()
    {
        return Some(Piece::Pawn);
    }
    None
}

/// Ordering priority for one move. Bonuses are additive, so a
/// capture-promotion-check combines all three.
///
/// - capture: `10 +` captured-piece weight
/// - promotion: `+20`
/// - gives check: `+5`
pub fn priority(board: &Board, mv: ChessMove) -> i32 {
    let mut score = 0;
    if let Some(victim) = captured_piece(board, mv) {
        score += 10 + capture_weight(victim);
    }
    if mv.get_promotion().is_some() {
        score += 20;
    }
    if board.make_move_new(mv).checkers().popcnt() > 0 {
        score += 5;
    }
    score
}

/// Legal moves of `board`, sorted by [`priority`] descending.
///
/// The sort is stable: moves of equal priority keep the generator's
/// encounter order. Promotions appear once per promotion piece straight
/// from the move generator, so every promotion choice is searched as its
/// own branch.
pub fn order_moves(board: &Board) -> Vec<ChessMove> {
    let mut moves: Vec<ChessMove> = MoveGen::new_legal(board).collect();
    moves.sort_by_key(|&mv| Reverse(priority(board, mv)));
    moves
}
