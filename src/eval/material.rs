//! Material and piece-square evaluation.
//!
//! All scores are from White's perspective (positive = White ahead).
//! Tables are defined from White's point of view in LERF order:
//! index 0 = A1, index 7 = H1, ..., index 63 = H8. Black lookups mirror
//! the square vertically (`index ^ 56`).

use chess::{Board, BoardStatus, Color, Piece};

use crate::eval::Evaluator;

/// Sentinel magnitude returned for decisive terminal positions.
pub const WIN_SCORE: f64 = 1000.0;

/// Base material values indexed by piece.
///
/// | Piece  | Value |
/// |--------|-------|
/// | Pawn   | 100   |
/// | Knight | 320   |
/// | Bishop | 330   |
/// | Rook   | 500   |
/// | Queen  | 900   |
/// | King   | 0     |
const fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => 100,
        Piece::Knight => 320,
        Piece::Bishop => 330,
        Piece::Rook => 500,
        Piece::Queen => 900,
        Piece::King => 0,
    }
}

/// Pawn PST. Rank 1 and rank 8 entries are 0 — pawns never sit there.
#[rustfmt::skip]
const PAWN_PST: [i32; 64] = [
    // Rank 1 (indices 0-7) — never used
      0,   0,   0,   0,   0,   0,   0,   0,
    // Rank 2 (indices 8-15)
      5,  10,  10, -20, -20,  10,  10,   5,
    // Rank 3 (indices 16-23)
      5,  -5, -10,   0,   0, -10,  -5,   5,
    // Rank 4 (indices 24-31)
      0,   0,   0,  20,  20,   0,   0,   0,
    // Rank 5 (indices 32-39)
      5,   5,  10,  25,  25,  10,   5,   5,
    // Rank 6 (indices 40-47)
     10,  10,  20,  30,  30,  20,  10,  10,
    // Rank 7 (indices 48-55)
     50,  50,  50,  50,  50,  50,  50,  50,
    // Rank 8 (indices 56-63) — never used
      0,   0,   0,   0,   0,   0,   0,   0,
];

/// Knight PST. Edges are penalized, central squares rewarded.
#[rustfmt::skip]
const KNIGHT_PST: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

/// PST value for `piece` on the square with LERF `index`, seen by `color`.
fn pst_value(piece: Piece, index: usize, color: Color) -> i32 {
    let index = match color {
        Color::White => index,
        Color::Black => index ^ 56,
    };
    match piece {
        Piece::Pawn => PAWN_PST[index],
        Piece::Knight => KNIGHT_PST[index],
        _ => 0,
    }
}

/// Material plus piece-square balance from White's perspective.
///
/// Does not inspect game termination — see [`terminal_score`] for that.
pub fn material_balance(board: &Board) -> f64 {
    let mut score = 0;

    for sq in chess::ALL_SQUARES {
        let Some(piece) = board.piece_on(sq) else {
            continue;
        };
        // A piece on a square always has a color.
        let color = board.color_on(sq).unwrap_or(Color::White);
        let value = piece_value(piece) + pst_value(piece, sq.to_index(), color);
        match color {
            Color::White => score += value,
            Color::Black => score -= value,
        }
    }

    score as f64
}

/// Map a finished game to its sentinel score, from White's perspective.
///
/// Returns `None` while the game is still in progress.
pub fn terminal_score(board: &Board) -> Option<f64> {
    match board.status() {
        BoardStatus::Ongoing => None,
        BoardStatus::Stalemate => Some(0.0),
        // The side to move is the side that got mated.
        BoardStatus::Checkmate => match board.side_to_move() {
            Color::White => Some(-WIN_SCORE),
            Color::Black => Some(WIN_SCORE),
        },
    }
}

/// Static evaluator over material and piece-square tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct MaterialEvaluator;

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, board: &Board, _history: &[u64]) -> f64 {
        terminal_score(board).unwrap_or_else(|| material_balance(board))
    }
}
