//! Stateless deal synthesis.
//!
//! Each deal is generated from a single `u64` seed with a Fisher-Yates
//! shuffle, so deals are completely independent of each other. A master
//! stream hands out seeds; workers regenerate the full deal from the seed
//! alone, which is what makes parallel dataset generation deterministic
//! for any thread count.

use crate::rng::Xoshiro256PlusPlus;
use crate::{Card, CardSet};

/// Four hands of eight cards each, seat 0 first.
pub type Hands = [CardSet; 4];

/// Generate a uniformly random deal from a seed.
///
/// The same seed always produces the same deal, regardless of any other
/// deals generated.
pub fn deal_from_seed(seed: u64) -> Hands {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut deck: [u8; 32] = std::array::from_fn(|i| i as u8);
    rng.shuffle(&mut deck);
    hands_from_deck(&deck)
}

/// Distribute a shuffled 32-card deck into four 8-card hands.
fn hands_from_deck(deck: &[u8; 32]) -> Hands {
    let mut hands = [CardSet::EMPTY; 4];
    for (slot, &id) in deck.iter().enumerate() {
        hands[slot / 8].add(Card::from_index(id).expect("deck ids are in range"));
    }
    hands
}

/// Check that four hands of eight cards partition the deck.
pub fn is_valid_deal(hands: &Hands) -> bool {
    let mut union = CardSet::EMPTY;
    for hand in hands {
        if hand.size() != 8 {
            return false;
        }
        if !union.intersect(*hand).is_empty() {
            return false;
        }
        union = union.union(*hand);
    }
    union == CardSet::DECK
}
