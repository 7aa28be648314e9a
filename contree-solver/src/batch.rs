//! Batch solving across worker threads.
//!
//! Independent deals are distributed over a rayon pool; every worker owns
//! its own `Solver` (and transposition table), and results land in the
//! output at their input index, so a batch is reproducible for any thread
//! count.

use crate::{Solver, SolverConfig};
use contree_core::{Hands, Seat, StateError, Suit, Trick};
use rayon::prelude::*;

/// Configuration for batch execution.
#[derive(Debug, Clone, Copy)]
pub struct BatchConfig {
    /// Number of worker threads (0 = all cores)
    pub num_threads: usize,
    /// Per-worker solver configuration
    pub solver: SolverConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            num_threads: 0,
            solver: SolverConfig::default(),
        }
    }
}

/// Solve every deal for all four trump suits with a fixed declarer.
///
/// Row `i`, column `s` of the result is the declaring team's score for
/// deal `i` under trump `s` (suit encoding order). The first invalid deal
/// aborts the batch.
pub fn solve_batch(
    deals: &[Hands],
    declarer: Seat,
    config: &BatchConfig,
) -> Result<Vec<[i32; 4]>, StateError> {
    let solver_config = config.solver;
    let solve_all = move |solver: &mut Solver, hands: &Hands| {
        solver.solve_all_suits(*hands, declarer, Trick::new(), 0, 0, 0)
    };

    if config.num_threads > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_threads)
            .build()
            .expect("failed to build batch thread pool");
        pool.install(|| {
            deals
                .par_iter()
                .map_init(move || Solver::new(solver_config), solve_all)
                .collect()
        })
    } else {
        deals
            .par_iter()
            .map_init(move || Solver::new(solver_config), solve_all)
            .collect()
    }
}

/// Convenience wrapper solving one deal per suit on the current thread.
pub fn solve_one(hands: &Hands, declarer: Seat, trump: Suit, config: &SolverConfig) -> Result<i32, StateError> {
    let mut solver = Solver::new(*config);
    let scores = solver.solve_all_suits(*hands, declarer, Trick::new(), 0, 0, 0)?;
    Ok(scores[trump as usize])
}
