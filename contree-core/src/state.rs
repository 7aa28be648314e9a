//! Mid-deal game state and its invariants.

use crate::rules::{trick_points, trick_winner};
use crate::{CardSet, Hands, Seat, Suit, Team, Trick, NUM_SEATS};
use thiserror::Error;

/// Rejection reasons for a state handed to the solver.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("seat index {0} out of range")]
    SeatOutOfRange(usize),
    #[error("card {0} appears in more than one place")]
    OverlappingCards(crate::Card),
    #[error("remaining cards plus trick length is {0}, not a multiple of four")]
    CardCountNotRound(u32),
    #[error("seat {seat} holds {held} cards but {expected} were expected")]
    UnbalancedHands { seat: Seat, held: u32, expected: u32 },
    #[error("trick entry for seat {found} where seat {expected} was due")]
    TrickOutOfOrder { expected: Seat, found: Seat },
    #[error("current trick already holds four cards; resolve it first")]
    TrickUnresolved,
    #[error("points {ns} + {ew} exceed the 152 trick points of a deal")]
    PointsOutOfRange { ns: i32, ew: i32 },
}

/// A fully observable position: four hands, the contract, the trick in
/// progress and both running totals.
///
/// The state is `Copy`-cheap to clone and mutated in place by `play`;
/// the search keeps its own make/unmake view and never clones per child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    pub hands: [CardSet; 4],
    pub trump: Suit,
    pub declarer: Seat,
    pub trick: Trick,
    pub starter: Seat,
    pub ns_points: i32,
    pub ew_points: i32,
}

impl GameState {
    /// A fresh deal about to be played: empty trick, seat 0 leads.
    pub fn new(hands: Hands, trump: Suit, declarer: Seat) -> Self {
        GameState {
            hands,
            trump,
            declarer,
            trick: Trick::new(),
            starter: 0,
            ns_points: 0,
            ew_points: 0,
        }
    }

    /// Seat due to play the next card.
    #[inline]
    pub fn seat_to_play(&self) -> Seat {
        (self.starter + self.trick.len()) % NUM_SEATS
    }

    /// Team of the player who won the bid.
    #[inline]
    pub fn declaring_team(&self) -> Team {
        Team::of(self.declarer)
    }

    /// Number of completed tricks implied by the cards no longer visible.
    pub fn completed_tricks(&self) -> u32 {
        let remaining: u32 = self.hands.iter().map(|h| h.size()).sum();
        (32 - remaining - self.trick.len() as u32) / 4
    }

    /// Deal over: every card played and the last trick resolved.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.trick.is_empty() && self.hands.iter().all(|h| h.is_empty())
    }

    /// Accumulated points of a team.
    #[inline]
    pub fn points(&self, team: Team) -> i32 {
        match team {
            Team::NorthSouth => self.ns_points,
            Team::EastWest => self.ew_points,
        }
    }

    /// Play a card for the seat on turn, resolving the trick when it fills:
    /// the winner's team takes the trick points (plus the dix de der on the
    /// final trick) and the winner leads the next trick.
    ///
    /// The card must come from `legal_moves`; only hand membership is
    /// checked here.
    pub fn play(&mut self, card: crate::Card) {
        let seat = self.seat_to_play();
        debug_assert!(self.hands[seat].contains(card), "card not in hand");

        self.hands[seat].remove(card);
        self.trick.push(seat, card);

        if self.trick.is_complete() {
            let winner = trick_winner(&self.trick, self.trump);
            let last = self.hands.iter().all(|h| h.is_empty());
            let points = trick_points(&self.trick, self.trump, last);
            match Team::of(winner) {
                Team::NorthSouth => self.ns_points += points,
                Team::EastWest => self.ew_points += points,
            }
            self.trick = Trick::new();
            self.starter = winner;
        }
    }

    /// Validate the §-invariants of a mid-deal state: index ranges, the
    /// disjoint hand/trick partition, the balanced card count against the
    /// partial trick, the trick's seat ordering and the point bounds.
    pub fn validate(&self) -> Result<(), StateError> {
        if self.declarer >= NUM_SEATS {
            return Err(StateError::SeatOutOfRange(self.declarer));
        }
        if self.starter >= NUM_SEATS {
            return Err(StateError::SeatOutOfRange(self.starter));
        }
        if self.trick.is_complete() {
            return Err(StateError::TrickUnresolved);
        }

        // Hands and trick cards are pairwise disjoint
        let mut seen = CardSet::EMPTY;
        for hand in &self.hands {
            let overlap = seen.intersect(*hand);
            if let Some(card) = overlap.iter().next() {
                return Err(StateError::OverlappingCards(card));
            }
            seen = seen.union(*hand);
        }
        for play in self.trick.plays() {
            if play.seat >= NUM_SEATS {
                return Err(StateError::SeatOutOfRange(play.seat));
            }
            if seen.contains(play.card) {
                return Err(StateError::OverlappingCards(play.card));
            }
            seen.add(play.card);
        }

        // Trick entries run clockwise from the starter
        for (i, play) in self.trick.plays().iter().enumerate() {
            let expected = (self.starter + i) % NUM_SEATS;
            if play.seat != expected {
                return Err(StateError::TrickOutOfOrder {
                    expected,
                    found: play.seat,
                });
            }
        }

        // Total live cards must make whole rounds
        let remaining: u32 = self.hands.iter().map(|h| h.size()).sum();
        let live = remaining + self.trick.len() as u32;
        if live % 4 != 0 {
            return Err(StateError::CardCountNotRound(live));
        }

        // Seats that already played into the open trick hold one card fewer
        let rounds = live / 4;
        for seat in 0..NUM_SEATS {
            let played_in_trick = self.trick.plays().iter().any(|p| p.seat == seat);
            let expected = rounds - u32::from(played_in_trick);
            let held = self.hands[seat].size();
            if held != expected {
                return Err(StateError::UnbalancedHands {
                    seat,
                    held,
                    expected,
                });
            }
        }

        if self.ns_points < 0 || self.ew_points < 0 || self.ns_points + self.ew_points > 152 {
            return Err(StateError::PointsOutOfRange {
                ns: self.ns_points,
                ew: self.ew_points,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::legal_moves;
    use crate::{deal_from_seed, Card, Rank};

    fn card(suit: Suit, rank: Rank) -> Card {
        Card::new(suit, rank)
    }

    #[test]
    fn test_trick_resolution_awards_points() {
        let mut hands = [CardSet::EMPTY; 4];
        hands[0].add(card(Suit::Hearts, Rank::Jack));
        hands[1].add(card(Suit::Hearts, Rank::Nine));
        hands[2].add(card(Suit::Hearts, Rank::Ace));
        hands[3].add(card(Suit::Spades, Rank::Ten));

        let mut state = GameState::new(hands, Suit::Hearts, 0);
        state.play(card(Suit::Hearts, Rank::Jack));
        state.play(card(Suit::Hearts, Rank::Nine));
        state.play(card(Suit::Hearts, Rank::Ace));
        state.play(card(Suit::Spades, Rank::Ten));

        // 20 + 14 + 11 + 10, plus the dix de der: the jack takes it all
        assert_eq!(state.ns_points, 65);
        assert_eq!(state.ew_points, 0);
        assert_eq!(state.starter, 0);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_winner_leads_next_trick() {
        let mut hands = [CardSet::EMPTY; 4];
        hands[0].add(card(Suit::Clubs, Rank::Seven));
        hands[0].add(card(Suit::Diamonds, Rank::Seven));
        hands[1].add(card(Suit::Clubs, Rank::Ace));
        hands[1].add(card(Suit::Diamonds, Rank::Eight));
        hands[2].add(card(Suit::Clubs, Rank::Eight));
        hands[2].add(card(Suit::Diamonds, Rank::Nine));
        hands[3].add(card(Suit::Clubs, Rank::Nine));
        hands[3].add(card(Suit::Diamonds, Rank::Ten));

        let mut state = GameState::new(hands, Suit::Hearts, 0);
        state.play(card(Suit::Clubs, Rank::Seven));
        state.play(card(Suit::Clubs, Rank::Ace));
        state.play(card(Suit::Clubs, Rank::Eight));
        state.play(card(Suit::Clubs, Rank::Nine));

        assert_eq!(state.starter, 1);
        assert_eq!(state.seat_to_play(), 1);
        assert_eq!(state.completed_tricks(), 1);
        assert_eq!(state.ew_points, 11);
    }

    #[test]
    fn test_validate_fresh_deal() {
        let state = GameState::new(deal_from_seed(9), Suit::Spades, 2);
        assert_eq!(state.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_overlap() {
        let mut state = GameState::new(deal_from_seed(9), Suit::Spades, 0);
        let shared = state.hands[0].iter().next().unwrap();
        let victim = state.hands[1].iter().next().unwrap();
        state.hands[1].remove(victim);
        state.hands[1].add(shared);
        assert!(matches!(
            state.validate(),
            Err(StateError::OverlappingCards(_))
        ));
    }

    #[test]
    fn test_validate_rejects_unbalanced_hands() {
        let mut state = GameState::new(deal_from_seed(9), Suit::Spades, 0);
        let a = state.hands[0].iter().next().unwrap();
        let b = state.hands[0].iter().nth(1).unwrap();
        let c = state.hands[1].iter().next().unwrap();
        let d = state.hands[2].iter().next().unwrap();
        // Drop four cards so the total stays a multiple of four but one
        // seat is short two cards
        state.hands[0].remove(a);
        state.hands[0].remove(b);
        state.hands[1].remove(c);
        state.hands[2].remove(d);
        assert!(matches!(
            state.validate(),
            Err(StateError::UnbalancedHands { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_trick_order() {
        let mut state = GameState::new(deal_from_seed(9), Suit::Spades, 0);
        let card = state.hands[1].iter().next().unwrap();
        state.hands[1].remove(card);
        // Starter is 0, so the first trick entry must come from seat 0
        state.trick.push(1, card);
        assert!(matches!(
            state.validate(),
            Err(StateError::TrickOutOfOrder { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_unresolved_trick() {
        let mut state = GameState::new(deal_from_seed(9), Suit::Spades, 0);
        for seat in 0..4 {
            let card = state.hands[seat].iter().next().unwrap();
            state.hands[seat].remove(card);
            state.trick.push(seat, card);
        }
        assert_eq!(state.validate(), Err(StateError::TrickUnresolved));
    }

    #[test]
    fn test_validate_rejects_bad_points() {
        let mut state = GameState::new(deal_from_seed(9), Suit::Spades, 0);
        state.ns_points = 100;
        state.ew_points = 100;
        assert!(matches!(
            state.validate(),
            Err(StateError::PointsOutOfRange { .. })
        ));
    }

    #[test]
    fn test_point_conservation_along_random_playout() {
        let mut rng = crate::rng::Xoshiro256PlusPlus::seed_from_u64(77);
        for seed in 0..20u64 {
            let trump = Suit::ALL[(seed % 4) as usize];
            let mut state = GameState::new(deal_from_seed(seed), trump, 0);
            let mut last_winner_team = None;
            while !state.is_terminal() {
                let seat = state.seat_to_play();
                let legal = legal_moves(state.hands[seat], &state.trick, trump, true);
                assert!(!legal.is_empty());
                let pick = rng.next_index(legal.size()) as usize;
                let card = legal.iter().nth(pick).unwrap();
                state.play(card);
                if state.trick.is_empty() {
                    last_winner_team = Some(Team::of(state.starter));
                }
            }
            // All 152 card points plus the dix de der were distributed
            assert_eq!(state.ns_points + state.ew_points, 162);
            assert!(last_winner_team.is_some());
            // And the unplayed-card pool is empty, so conservation held
            assert_eq!(state.completed_tricks(), 8);
        }
    }
}
