//! Bidding corpus: one dealt hand, four per-trump declarer scores.
//!
//! Every sample is reproducible from a single `u64` seed; a batch is a
//! list of seeds fanned out over rayon workers, each with its own solver.

use crate::bias::{biased_deal, pick_bias_mode, BiasMode};
use contree_core::rng::Xoshiro256PlusPlus;
use contree_core::{CardSet, Hands, StateError, Suit, Trick};
use contree_solver::{Solver, SolverConfig};
use rayon::prelude::*;

/// Knobs for bidding-sample generation.
#[derive(Debug, Clone, Copy)]
pub struct BiddingConfig {
    /// Perfect-information Monte-Carlo worlds per sample (1 = oracle mode)
    pub pimc_n: u32,
    /// Apply the 40/20/20/20 bias mixture instead of uniform dealing
    pub biased: bool,
}

impl Default for BiddingConfig {
    fn default() -> Self {
        BiddingConfig {
            pimc_n: 1,
            biased: true,
        }
    }
}

/// One labeled bidding row, scores indexed by suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiddingSample {
    pub hand: u32,
    pub scores: [i32; 4],
    pub pimc_n: i32,
    pub bias_mode: u8,
}

/// Redeal the 24 cards outside seat 0's hand among seats 1-3.
fn resample_worlds(hand0: CardSet, rng: &mut Xoshiro256PlusPlus) -> Hands {
    let mut rest: Vec<_> = CardSet::DECK.without(hand0).iter().collect();
    rng.shuffle(&mut rest);

    let mut hands = [CardSet::EMPTY; 4];
    hands[0] = hand0;
    for (i, card) in rest.into_iter().enumerate() {
        hands[1 + i / 8].add(card);
    }
    hands
}

/// Generate and label the bidding sample for one seed.
///
/// Seat 0 declares each of the four trumps in turn; with `pimc_n > 1`, the
/// hidden hands are redealt per world and the per-trump scores are the
/// rounded means over the worlds.
pub fn bidding_sample(
    seed: u64,
    config: &BiddingConfig,
    solver: &mut Solver,
) -> Result<BiddingSample, StateError> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

    let mode = if config.biased {
        pick_bias_mode(&mut rng)
    } else {
        BiasMode::Uniform
    };
    let target_suit = Suit::ALL[rng.next_index(4) as usize];
    let hands = biased_deal(&mut rng, target_suit, mode);

    let worlds = config.pimc_n.max(1);
    let mut totals = [0i64; 4];
    for world in 0..worlds {
        let world_hands = if world == 0 {
            hands
        } else {
            resample_worlds(hands[0], &mut rng)
        };
        let scores = solver.solve_all_suits(world_hands, 0, Trick::new(), 0, 0, 0)?;
        for (total, score) in totals.iter_mut().zip(scores) {
            *total += i64::from(score);
        }
    }

    let scores = totals.map(|total| {
        // Round to nearest, keeping negative belote-only corners exact
        let n = i64::from(worlds);
        ((total + total.signum() * n / 2) / n) as i32
    });

    Ok(BiddingSample {
        hand: hands[0].bits(),
        scores,
        pimc_n: worlds as i32,
        bias_mode: mode.code(),
    })
}

/// Label a batch of seeds in parallel, one solver per worker. Results are
/// ordered like the seeds regardless of thread scheduling.
pub fn generate_bidding_batch(
    seeds: &[u64],
    config: &BiddingConfig,
    solver_config: &SolverConfig,
) -> Result<Vec<BiddingSample>, StateError> {
    let config = *config;
    let solver_config = *solver_config;
    seeds
        .par_iter()
        .map_init(
            move || Solver::new(solver_config),
            move |solver, &seed| bidding_sample(seed, &config, solver),
        )
        .collect()
}
