//! Zobrist keys for position hashing.
//!
//! One process-wide table, generated from a fixed seed at first use and
//! borrowed read-only by every solver instance, so hashes are identical
//! across runs and across threads. The key of a position covers per-player
//! hand membership, the cards lying in the open trick, the player to move
//! and the trump suit; it deliberately does not depend on the order in
//! which earlier tricks were played, which is what lets equivalent lines
//! transpose onto the same table slot.

use contree_core::rng::Xoshiro256PlusPlus;
use contree_core::{GameState, NUM_SEATS};
use once_cell::sync::Lazy;

/// Seed for the key tables. Changing it invalidates nothing but the
/// reproducibility of logged hashes between builds.
const ZOBRIST_SEED: u64 = 42;

/// The four independent key tables.
pub struct ZobristTable {
    /// Key per (seat, card still held)
    pub hand: [[u64; 32]; 4],
    /// Key per card lying in the open trick
    pub trick: [u64; 32],
    /// Key per seat to move
    pub turn: [u64; 4],
    /// Key per trump suit (slot 4 reserved for the no-trump sentinel)
    pub trump: [u64; 5],
}

impl ZobristTable {
    fn generate(seed: u64) -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut hand = [[0u64; 32]; 4];
        for seat in hand.iter_mut() {
            for key in seat.iter_mut() {
                *key = rng.next_u64();
            }
        }
        let mut trick = [0u64; 32];
        for key in trick.iter_mut() {
            *key = rng.next_u64();
        }
        let mut turn = [0u64; 4];
        for key in turn.iter_mut() {
            *key = rng.next_u64();
        }
        let mut trump = [0u64; 5];
        for key in trump.iter_mut() {
            *key = rng.next_u64();
        }
        ZobristTable {
            hand,
            trick,
            turn,
            trump,
        }
    }
}

/// The process-wide table.
pub static ZOBRIST: Lazy<ZobristTable> = Lazy::new(|| ZobristTable::generate(ZOBRIST_SEED));

/// Full key of a position, folding in the trump and hand-at-root
/// contributions. The search maintains this incrementally from here on.
pub fn root_hash(state: &GameState) -> u64 {
    let z = &*ZOBRIST;
    let mut hash = 0u64;
    for seat in 0..NUM_SEATS {
        for card in state.hands[seat].iter() {
            hash ^= z.hand[seat][card.index() as usize];
        }
    }
    for play in state.trick.plays() {
        hash ^= z.trick[play.card.index() as usize];
    }
    hash ^= z.turn[state.seat_to_play()];
    hash ^= z.trump[state.trump as usize];
    hash
}
