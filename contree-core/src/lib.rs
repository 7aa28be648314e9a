//! Card model, rules engine and deal synthesis for Belote Contrée.
//!
//! The 32-card deck is packed into `u8` card ids and `u32` bitboard hands;
//! the rules engine is a handful of pure functions over those bitboards.
//! Everything downstream (search, dataset generation) builds on this crate.

mod card;
mod cardset;
mod deal;
pub mod rng;
pub mod rules;
mod seat;
mod state;
mod trick;

pub use card::{Card, Rank, Suit};
pub use cardset::{CardSet, CardSetIter};
pub use deal::{deal_from_seed, is_valid_deal, Hands};
pub use seat::{next_seat, partner, Seat, Team, NUM_SEATS};
pub use state::{GameState, StateError};
pub use trick::{PlayedCard, Trick};
