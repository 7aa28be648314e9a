//! Double-dummy solver for Belote Contrée.
//!
//! The algorithm uses:
//! - Alpha-beta minimax from any mid-deal state to the end of the deal
//! - Bitboard hands with make/unmake on a single mutable position
//! - Incremental Zobrist keys and a direct-mapped transposition table
//! - Move ordering by trump-adjusted card strength
//! - Batch solving with one solver instance per worker thread

mod batch;
mod search;
mod table;
mod zobrist;

pub use batch::{solve_batch, solve_one, BatchConfig};
pub use search::{Solver, SolverConfig};
pub use table::TransTable;
pub use zobrist::{root_hash, ZobristTable, ZOBRIST};
