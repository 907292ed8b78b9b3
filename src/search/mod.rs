//! Minimax-family search engines and their shared machinery.
//!
//! [`ordering`] ranks moves so that alpha-beta windows shrink early,
//! [`tt`] memoizes position scores within a search, [`pool`] fans root
//! moves out over worker threads, and the three engines ([`heuristic`],
//! [`negamax`], [`pvs`]) implement the actual adversarial searches.

pub mod heuristic;
pub mod negamax;
pub mod ordering;
pub mod pool;
pub mod pvs;
pub mod tt;
