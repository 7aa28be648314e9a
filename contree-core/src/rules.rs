//! Rules engine: legal moves, trick winners, trick points and belote.
//!
//! Everything here is a pure function over bitboards and the in-progress
//! trick. These sit in the innermost loop of the search, so the move
//! generator works on suit masks and only falls back to per-card loops
//! when an over-trump comparison is required.

use crate::{partner, Card, CardSet, Seat, Suit, Team, Trick};

/// The subset of `cards` strictly stronger (as trumps) than `floor`.
#[inline]
fn trumps_above(cards: CardSet, trump: Suit, floor: i32) -> CardSet {
    let mut out = CardSet::EMPTY;
    for card in cards.iter() {
        if card.strength(trump) > floor {
            out.add(card);
        }
    }
    out
}

/// Compute the set of legal cards for the player holding `hand`, facing
/// `trick` under `trump`.
///
/// - Leading: the whole hand.
/// - Holding the led suit: must follow; if trump was led, must additionally
///   beat the strongest trump in the trick when possible.
/// - Void in the led suit: must play a trump when holding one, over-trumping
///   when possible; otherwise any card.
///
/// `exempt_partner_winning` selects how the must-trump obligation interacts
/// with a partner who currently holds the trick: `true` lifts the obligation
/// (table rules), `false` keeps it unconditional. Going higher on a trump
/// lead is mandatory either way.
pub fn legal_moves(
    hand: CardSet,
    trick: &Trick,
    trump: Suit,
    exempt_partner_winning: bool,
) -> CardSet {
    let led = match trick.led_suit() {
        None => return hand,
        Some(suit) => suit,
    };

    let follow = hand.suit(led);
    if !follow.is_empty() {
        if led == trump {
            let higher = trumps_above(follow, trump, trick.highest_trump_strength(trump));
            if !higher.is_empty() {
                return higher;
            }
        }
        return follow;
    }

    // Void in the led suit
    if exempt_partner_winning {
        let mover = next_to_play(trick);
        if current_winner(trick, trump) == Some(partner(mover)) {
            return hand;
        }
    }

    let trumps = hand.suit(trump);
    if !trumps.is_empty() {
        let higher = trumps_above(trumps, trump, trick.highest_trump_strength(trump));
        if !higher.is_empty() {
            return higher;
        }
        return trumps;
    }

    hand
}

/// Seat due to play on `trick` (undefined for a complete trick).
#[inline]
fn next_to_play(trick: &Trick) -> Seat {
    let plays = trick.plays();
    match plays.last() {
        Some(play) => (play.seat + 1) % 4,
        None => 0,
    }
}

/// Comparison score of a card within a trick: trumps above everything,
/// then led-suit cards, then nothing.
#[inline]
fn trick_score(card: Card, led: Suit, trump: Suit) -> i32 {
    if card.suit() == trump {
        1000 + card.strength(trump)
    } else if card.suit() == led {
        card.strength(trump)
    } else {
        -1
    }
}

/// The seat currently holding a (possibly partial) trick.
pub fn current_winner(trick: &Trick, trump: Suit) -> Option<Seat> {
    let led = trick.led_suit()?;
    let mut best_seat = trick.plays()[0].seat;
    let mut best_score = trick_score(trick.plays()[0].card, led, trump);
    for play in &trick.plays()[1..] {
        let score = trick_score(play.card, led, trump);
        if score > best_score {
            best_score = score;
            best_seat = play.seat;
        }
    }
    Some(best_seat)
}

/// The winner of a complete trick.
///
/// Trump beats non-trump; within a suit the stronger card wins; a card
/// that is neither trump nor the led suit cannot win.
pub fn trick_winner(trick: &Trick, trump: Suit) -> Seat {
    debug_assert!(trick.is_complete());
    current_winner(trick, trump).expect("complete trick has a winner")
}

/// Sum of card points in the trick, plus the 10-point dix de der on the
/// last trick of the deal.
pub fn trick_points(trick: &Trick, trump: Suit, is_last_trick: bool) -> i32 {
    let mut points = 0;
    for play in trick.plays() {
        points += play.card.points(trump);
    }
    if is_last_trick {
        points += 10;
    }
    points
}

/// The team of the single player holding both the trump King and the trump
/// Queen, if any. The bonus is per player: a King and Queen split between
/// partners earns nothing.
pub fn belote_holder(hands: &[CardSet; 4], trump: Suit) -> Option<Team> {
    let king = Card::new(trump, crate::Rank::King);
    let queen = Card::new(trump, crate::Rank::Queen);
    for (seat, hand) in hands.iter().enumerate() {
        if hand.contains(king) && hand.contains(queen) {
            return Some(Team::of(seat));
        }
    }
    None
}
