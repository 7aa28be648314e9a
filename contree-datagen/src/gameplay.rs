//! Gameplay corpus: mid-deal states labeled with the best move.
//!
//! A sample is synthesized by dealing a full deal and playing forward to
//! a target depth, then labeled by solving the child of every legal move.
//! States with no discriminative signal (fewer than two legal moves, or a
//! tie between the two best moves) are dropped.

use contree_core::rng::Xoshiro256PlusPlus;
use contree_core::rules::legal_moves;
use contree_core::{deal_from_seed, Card, GameState, Seat, StateError, Suit, Team};
use contree_solver::{Solver, SolverConfig};
use rayon::prelude::*;

/// Policy used to advance a synthesized deal to its sampling point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayoutPolicy {
    /// Uniformly random legal card
    Random,
    /// The solver's own best card (slower, on-policy states)
    Solver,
}

/// Knobs for gameplay-sample generation.
#[derive(Debug, Clone, Copy)]
pub struct GameplayConfig {
    /// Chance (percent) of forcing one sub-optimal move before labeling
    pub perturb_percent: u32,
    pub policy: PlayoutPolicy,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        GameplayConfig {
            perturb_percent: 20,
            policy: PlayoutPolicy::Random,
        }
    }
}

/// One labeled gameplay row (wire encodings throughout).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameplaySample {
    pub hands: [u32; 4],
    pub trump: u8,
    pub declarer: u8,
    pub starter: u8,
    /// Current trick in play order; 255 marks an empty slot
    pub trick_cards: [u8; 4],
    pub ns_points: i16,
    pub ew_points: i16,
    pub best_card: u8,
    pub best_value: i32,
    pub second_best_value: i32,
    pub perturbed: bool,
}

/// Result of labeling one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveLabel {
    pub best_card: Card,
    pub best_value: i32,
    pub second_best_value: i32,
}

/// Solve the child of every legal move and rank them for the mover.
///
/// Returns `None` when the position carries no signal: a single legal
/// move, or the two best moves reaching the same declarer score.
pub fn label_state(
    state: &GameState,
    solver: &mut Solver,
) -> Result<Option<MoveLabel>, StateError> {
    let seat = state.seat_to_play();
    let legal = legal_moves(
        state.hands[seat],
        &state.trick,
        state.trump,
        solver.config().exempt_partner_overcut,
    );
    if legal.size() < 2 {
        return Ok(None);
    }

    let maximizing = Team::of(seat) == state.declaring_team();
    let mut best: Option<(Card, i32)> = None;
    let mut second_value: Option<i32> = None;

    for card in legal.iter() {
        let mut child = *state;
        child.play(card);
        let value = solver.solve(&child)?;

        let better = match best {
            None => true,
            Some((_, best_value)) => {
                if maximizing {
                    value > best_value
                } else {
                    value < best_value
                }
            }
        };
        if better {
            second_value = best.map(|(_, v)| v);
            best = Some((card, value));
        } else {
            let closer = match second_value {
                None => true,
                Some(second) => {
                    if maximizing {
                        value > second
                    } else {
                        value < second
                    }
                }
            };
            if closer {
                second_value = Some(value);
            }
        }
    }

    let (best_card, best_value) = best.expect("at least two legal moves");
    let second_best_value = second_value.expect("at least two legal moves");
    if best_value == second_best_value {
        return Ok(None);
    }

    Ok(Some(MoveLabel {
        best_card,
        best_value,
        second_best_value,
    }))
}

/// Pick the number of completed tricks at the sampling point: 20% opening
/// (0-2), 30% mid-game (3-5), 50% endgame (6-7).
fn pick_depth(rng: &mut Xoshiro256PlusPlus) -> u32 {
    let roll = rng.next_index(100);
    if roll < 50 {
        6 + rng.next_index(2)
    } else if roll < 80 {
        3 + rng.next_index(3)
    } else {
        rng.next_index(3)
    }
}

/// Advance the state by one card according to the playout policy.
fn advance(
    state: &mut GameState,
    policy: PlayoutPolicy,
    rng: &mut Xoshiro256PlusPlus,
    solver: &mut Solver,
) -> Result<(), StateError> {
    let seat = state.seat_to_play();
    let legal = legal_moves(
        state.hands[seat],
        &state.trick,
        state.trump,
        solver.config().exempt_partner_overcut,
    );

    let card = match policy {
        PlayoutPolicy::Solver => match label_state(state, solver)? {
            Some(label) => label.best_card,
            // Forced or tied positions fall back to a random legal card
            None => pick_random(legal.iter(), rng),
        },
        PlayoutPolicy::Random => pick_random(legal.iter(), rng),
    };
    state.play(card);
    Ok(())
}

fn pick_random(cards: impl Iterator<Item = Card> + Clone, rng: &mut Xoshiro256PlusPlus) -> Card {
    let count = cards.clone().count() as u32;
    cards
        .clone()
        .nth(rng.next_index(count) as usize)
        .expect("non-empty legal set")
}

/// Synthesize and label the gameplay sample for one seed. `None` means the
/// state was filtered out.
pub fn gameplay_sample(
    seed: u64,
    config: &GameplayConfig,
    solver: &mut Solver,
) -> Result<Option<GameplaySample>, StateError> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

    let hands = deal_from_seed(rng.next_u64());
    let trump = Suit::ALL[rng.next_index(4) as usize];
    let declarer = rng.next_index(4) as Seat;
    let mut state = GameState::new(hands, trump, declarer);

    let depth = pick_depth(&mut rng);
    let partial = rng.next_index(4);
    let total_moves = depth * 4 + partial;
    for _ in 0..total_moves {
        advance(&mut state, config.policy, &mut rng, solver)?;
    }

    let mut perturbed = false;
    if rng.chance_percent(config.perturb_percent) {
        // Force one sub-optimal legal move, then label whatever follows
        if let Some(label) = label_state(&state, solver)? {
            let seat = state.seat_to_play();
            let legal = legal_moves(
                state.hands[seat],
                &state.trick,
                state.trump,
                solver.config().exempt_partner_overcut,
            );
            let off_moves = legal.iter().filter(|&c| c != label.best_card);
            let card = pick_random(off_moves, &mut rng);
            state.play(card);
            perturbed = true;
            if state.is_terminal() {
                return Ok(None);
            }
        }
    }

    let label = match label_state(&state, solver)? {
        Some(label) => label,
        None => return Ok(None),
    };

    let mut trick_cards = [255u8; 4];
    for (slot, play) in state.trick.plays().iter().enumerate() {
        trick_cards[slot] = play.card.index();
    }

    Ok(Some(GameplaySample {
        hands: std::array::from_fn(|seat| state.hands[seat].bits()),
        trump: state.trump as u8,
        declarer: state.declarer as u8,
        starter: state.starter as u8,
        trick_cards,
        ns_points: state.ns_points as i16,
        ew_points: state.ew_points as i16,
        best_card: label.best_card.index(),
        best_value: label.best_value,
        second_best_value: label.second_best_value,
        perturbed,
    }))
}

/// Label a batch of seeds in parallel, one solver per worker; filtered
/// seeds simply drop out, so the output can be shorter than the input.
pub fn generate_gameplay_batch(
    seeds: &[u64],
    config: &GameplayConfig,
    solver_config: &SolverConfig,
) -> Result<Vec<GameplaySample>, StateError> {
    let config = *config;
    let solver_config = *solver_config;
    let labeled: Result<Vec<Option<GameplaySample>>, StateError> = seeds
        .par_iter()
        .map_init(
            move || Solver::new(solver_config),
            move |solver, &seed| gameplay_sample(seed, &config, solver),
        )
        .collect();
    Ok(labeled?.into_iter().flatten().collect())
}
