//! Search errors surfaced to callers.

/// Errors that can occur when asking an algorithm to pick a move.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Search was invoked on a position with no legal moves.
    ///
    /// Callers are expected to check for game over before asking for a
    /// move; this error exists so the facade fails loudly instead of
    /// handing back a nonsense move.
    #[error("search invoked on a terminal position")]
    TerminalPosition,

    /// The search ran to completion without selecting a move.
    #[error("search failed to select a move for this turn")]
    NoMoveFound,
}
