//! Biased deal construction for the bidding corpus.
//!
//! A bias shapes the target player's hand (seat 0 by convention) before
//! the rest of the deck is dealt out; the solver still labels whatever
//! deal comes out, so biasing never touches the labels themselves.

use contree_core::rng::Xoshiro256PlusPlus;
use contree_core::{Card, CardSet, Hands, Rank, Suit};

/// How the target hand is shaped. The discriminants are the on-disk
/// `bias_mode` column values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BiasMode {
    /// Plain uniform deal
    Uniform = 0,
    /// Top five trumps plus the three side aces
    Capot = 1,
    /// King and queen of the target suit
    Belote = 2,
    /// A named suit-length vector, trump suit first
    Shape = 3,
}

impl BiasMode {
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

/// Mixture weights: 40% uniform, 20% capot, 20% belote, 20% shape.
const BIAS_WEIGHTS: [u32; 4] = [40, 20, 20, 20];

/// Eight-card suit-length vectors, counted relative to the target suit
/// (target first, then the other suits clockwise).
const SHAPES: [[u8; 4]; 5] = [
    [5, 2, 1, 0],
    [4, 3, 1, 0],
    [4, 2, 2, 0],
    [6, 1, 1, 0],
    [3, 3, 2, 0],
];

/// Trump ranks from strongest to weakest.
const TRUMP_RANK_ORDER: [Rank; 8] = [
    Rank::Jack,
    Rank::Nine,
    Rank::Ace,
    Rank::Ten,
    Rank::King,
    Rank::Queen,
    Rank::Eight,
    Rank::Seven,
];

/// Draw a bias mode from the mixture.
pub fn pick_bias_mode(rng: &mut Xoshiro256PlusPlus) -> BiasMode {
    match rng.pick_weighted(&BIAS_WEIGHTS) {
        0 => BiasMode::Uniform,
        1 => BiasMode::Capot,
        2 => BiasMode::Belote,
        _ => BiasMode::Shape,
    }
}

/// Builds one deal with constraints on seat 0's hand.
///
/// Two phases, like a predeal: forced cards land first, then the rest of
/// the deck is shuffled over the open slots.
pub struct HandBuilder {
    target_suit: Suit,
    forced: CardSet,
    shape: Option<[u8; 4]>,
}

impl HandBuilder {
    pub fn new(target_suit: Suit) -> Self {
        HandBuilder {
            target_suit,
            forced: CardSet::EMPTY,
            shape: None,
        }
    }

    pub fn force_card(&mut self, card: Card) -> &mut Self {
        self.forced.add(card);
        self
    }

    pub fn force_shape(&mut self, shape: [u8; 4]) -> &mut Self {
        self.shape = Some(shape);
        self
    }

    /// Deal the full table. Seat 0 receives the forced cards and shape
    /// fill; everyone else splits the shuffled remainder.
    pub fn build(&self, rng: &mut Xoshiro256PlusPlus) -> Hands {
        let mut hands = [CardSet::EMPTY; 4];
        hands[0] = self.forced;
        let mut pool = CardSet::DECK.without(self.forced);

        if let Some(shape) = self.shape {
            for (offset, &want) in shape.iter().enumerate() {
                let suit =
                    Suit::from_index((self.target_suit as u8 + offset as u8) % 4).unwrap();
                let have = hands[0].suit(suit).size() as u8;
                if have >= want {
                    continue;
                }
                let mut available: Vec<Card> = pool.suit(suit).iter().collect();
                rng.shuffle(&mut available);
                for card in available.into_iter().take((want - have) as usize) {
                    hands[0].add(card);
                    pool.remove(card);
                }
            }
        }

        // Top up seat 0 to eight cards, then deal the rest clockwise
        let mut rest: Vec<Card> = pool.iter().collect();
        rng.shuffle(&mut rest);
        let mut rest = rest.into_iter();
        while hands[0].size() < 8 {
            hands[0].add(rest.next().expect("deck exhausted"));
        }
        for seat in 1..4 {
            while hands[seat].size() < 8 {
                hands[seat].add(rest.next().expect("deck exhausted"));
            }
        }
        hands
    }
}

/// Produce a deal under the given bias, targeting seat 0.
pub fn biased_deal(rng: &mut Xoshiro256PlusPlus, target_suit: Suit, mode: BiasMode) -> Hands {
    let mut builder = HandBuilder::new(target_suit);

    match mode {
        BiasMode::Uniform => {}
        BiasMode::Capot => {
            for rank in &TRUMP_RANK_ORDER[..5] {
                builder.force_card(Card::new(target_suit, *rank));
            }
            for offset in 1..4u8 {
                let suit = Suit::from_index((target_suit as u8 + offset) % 4).unwrap();
                builder.force_card(Card::new(suit, Rank::Ace));
            }
        }
        BiasMode::Belote => {
            builder.force_card(Card::new(target_suit, Rank::King));
            builder.force_card(Card::new(target_suit, Rank::Queen));
        }
        BiasMode::Shape => {
            let shape = SHAPES[rng.next_index(SHAPES.len() as u32) as usize];
            builder.force_shape(shape);
        }
    }

    builder.build(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contree_core::is_valid_deal;

    #[test]
    fn test_uniform_deals_are_valid() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        for _ in 0..50 {
            let hands = biased_deal(&mut rng, Suit::Hearts, BiasMode::Uniform);
            assert!(is_valid_deal(&hands));
        }
    }

    #[test]
    fn test_capot_bias_forces_master_hand() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2);
        let hands = biased_deal(&mut rng, Suit::Spades, BiasMode::Capot);
        assert!(is_valid_deal(&hands));

        for rank in [Rank::Jack, Rank::Nine, Rank::Ace, Rank::Ten, Rank::King] {
            assert!(hands[0].contains(Card::new(Suit::Spades, rank)), "{:?}", rank);
        }
        for suit in [Suit::Hearts, Suit::Diamonds, Suit::Clubs] {
            assert!(hands[0].contains(Card::new(suit, Rank::Ace)), "{:?}", suit);
        }
        assert_eq!(hands[0].size(), 8);
    }

    #[test]
    fn test_belote_bias_forces_king_queen() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        for _ in 0..20 {
            let hands = biased_deal(&mut rng, Suit::Diamonds, BiasMode::Belote);
            assert!(is_valid_deal(&hands));
            assert!(hands[0].contains(Card::new(Suit::Diamonds, Rank::King)));
            assert!(hands[0].contains(Card::new(Suit::Diamonds, Rank::Queen)));
        }
    }

    #[test]
    fn test_shape_bias_matches_a_library_vector() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(4);
        for _ in 0..20 {
            let target = Suit::Clubs;
            let hands = biased_deal(&mut rng, target, BiasMode::Shape);
            assert!(is_valid_deal(&hands));

            let lengths: [u8; 4] = std::array::from_fn(|offset| {
                let suit = Suit::from_index((target as u8 + offset as u8) % 4).unwrap();
                hands[0].suit(suit).size() as u8
            });
            assert!(
                SHAPES.contains(&lengths),
                "unexpected shape {:?}",
                lengths
            );
        }
    }

    #[test]
    fn test_mixture_hits_every_mode() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[pick_bias_mode(&mut rng).code() as usize] = true;
        }
        assert_eq!(seen, [true; 4]);
    }
}
