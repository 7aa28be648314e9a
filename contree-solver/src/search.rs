//! Alpha-beta search over the remaining deal.
//!
//! The declaring team maximizes its final score, the defenders minimize
//! it. The search walks a single mutable position with make/unmake around
//! each recursive call, keeps the Zobrist key incrementally up to date and
//! memoizes finished subtrees in a direct-mapped transposition table.

use crate::table::TransTable;
use crate::zobrist::{root_hash, ZOBRIST};
use contree_core::rules::{belote_holder, legal_moves, trick_points, trick_winner};
use contree_core::{next_seat, Card, CardSet, GameState, Hands, Seat, StateError, Suit, Team, Trick};

/// Tuning and rule knobs for a solver instance.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    /// log2 of the transposition-table entry count (16 bytes per entry)
    pub tt_log2: u32,
    /// Disable memoization entirely (for equivalence testing)
    pub tt_enabled: bool,
    /// Lift the must-trump obligation when the partner holds the trick
    pub exempt_partner_overcut: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            tt_log2: 22,
            tt_enabled: true,
            exempt_partner_overcut: true,
        }
    }
}

/// Double-dummy solver. Owns its transposition table, which persists
/// across `solve` calls; never share one instance between threads.
pub struct Solver {
    config: SolverConfig,
    tt: TransTable,
    nodes: u64,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Solver {
            tt: TransTable::new(config.tt_log2),
            config,
            nodes: 0,
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Positions visited since construction.
    pub fn node_count(&self) -> u64 {
        self.nodes
    }

    /// Maximum score the declaring team can secure from `state` against
    /// best defense: trick points plus capot and belote adjustments.
    ///
    /// The belote adjustment is computed from the hands as given; a
    /// mid-deal call whose history already spent the trump king or queen
    /// sees no bonus.
    pub fn solve(&mut self, state: &GameState) -> Result<i32, StateError> {
        state.validate()?;

        let belote = match belote_holder(&state.hands, state.trump) {
            Some(team) if team == state.declaring_team() => 20,
            Some(_) => -20,
            None => 0,
        };

        let hash = root_hash(state);
        let mut search = Search {
            hands: state.hands,
            trick: state.trick,
            trump: state.trump,
            declaring_team: state.declaring_team(),
            belote,
            exempt: self.config.exempt_partner_overcut,
            tt: self.config.tt_enabled.then_some(&mut self.tt),
            nodes: &mut self.nodes,
        };

        Ok(search.alpha_beta(state.starter, state.ns_points, state.ew_points, -1, 163, hash))
    }

    /// Solve a fresh deal once per trump suit. Output indexed by suit.
    pub fn solve_all_suits(
        &mut self,
        hands: Hands,
        declarer: Seat,
        trick: Trick,
        starter: Seat,
        ns_points: i32,
        ew_points: i32,
    ) -> Result<[i32; 4], StateError> {
        let mut scores = [0i32; 4];
        for trump in Suit::ALL {
            let state = GameState {
                hands,
                trump,
                declarer,
                trick,
                starter,
                ns_points,
                ew_points,
            };
            scores[trump as usize] = self.solve(&state)?;
        }
        Ok(scores)
    }
}

/// Mutable search view: the one position being walked, plus borrowed
/// memoization state. Everything lives on the stack.
struct Search<'a> {
    hands: [CardSet; 4],
    trick: Trick,
    trump: Suit,
    declaring_team: Team,
    belote: i32,
    exempt: bool,
    tt: Option<&'a mut TransTable>,
    nodes: &'a mut u64,
}

impl Search<'_> {
    fn alpha_beta(
        &mut self,
        starter: Seat,
        ns_points: i32,
        ew_points: i32,
        mut alpha: i32,
        mut beta: i32,
        hash: u64,
    ) -> i32 {
        *self.nodes += 1;
        let (alpha_in, beta_in) = (alpha, beta);

        // Deal over: settle the score
        if self.trick.is_empty() && self.hands.iter().all(|h| h.is_empty()) {
            let (own, opp) = match self.declaring_team {
                Team::NorthSouth => (ns_points, ew_points),
                Team::EastWest => (ew_points, ns_points),
            };
            let mut value = own;
            if opp == 0 {
                value += 90;
            }
            return value + self.belote;
        }

        if let Some(tt) = self.tt.as_deref() {
            if let Some(value) = tt.lookup(hash) {
                return value;
            }
        }

        let seat = (starter + self.trick.len()) % 4;
        let maximizing = Team::of(seat) == self.declaring_team;

        let legal = legal_moves(self.hands[seat], &self.trick, self.trump, self.exempt);
        let mut moves = [Card::from_index(0).unwrap(); 8];
        let mut n_moves = 0;
        for card in legal.iter() {
            moves[n_moves] = card;
            n_moves += 1;
        }
        // Strong cards first; the stable sort keeps equal strengths in
        // ascending id order
        moves[..n_moves].sort_by(|a, b| b.strength(self.trump).cmp(&a.strength(self.trump)));

        let z = &*ZOBRIST;
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for &card in &moves[..n_moves] {
            let id = card.index() as usize;
            let mut next_hash = hash;
            next_hash ^= z.hand[seat][id];
            next_hash ^= z.turn[seat];
            next_hash ^= z.trick[id];

            self.hands[seat].remove(card);
            self.trick.push(seat, card);

            let value = if self.trick.is_complete() {
                let winner = trick_winner(&self.trick, self.trump);
                let last = self.hands.iter().all(|h| h.is_empty());
                let points = trick_points(&self.trick, self.trump, last);
                let (next_ns, next_ew) = match Team::of(winner) {
                    Team::NorthSouth => (ns_points + points, ew_points),
                    Team::EastWest => (ns_points, ew_points + points),
                };

                let mut cleared_hash = next_hash;
                for play in self.trick.plays() {
                    cleared_hash ^= z.trick[play.card.index() as usize];
                }
                cleared_hash ^= z.turn[winner];

                let completed = self.trick;
                self.trick = Trick::new();
                let value =
                    self.alpha_beta(winner, next_ns, next_ew, alpha, beta, cleared_hash);
                self.trick = completed;
                value
            } else {
                let next_hash = next_hash ^ z.turn[next_seat(seat)];
                self.alpha_beta(starter, ns_points, ew_points, alpha, beta, next_hash)
            };

            self.trick.pop();
            self.hands[seat].add(card);

            if maximizing {
                best = best.max(value);
                alpha = alpha.max(best);
            } else {
                best = best.min(value);
                beta = beta.min(best);
            }
            if beta <= alpha {
                break;
            }
        }

        // A value that fell outside the entry window is only a bound on
        // the true score; caching it as exact would poison later probes
        // made under other windows
        if alpha_in < best && best < beta_in {
            if let Some(tt) = self.tt.as_deref_mut() {
                tt.store(hash, best);
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contree_core::{deal_from_seed, Rank};

    fn card(suit: Suit, rank: Rank) -> Card {
        Card::new(suit, rank)
    }

    #[test]
    fn test_terminal_state_settles_without_search() {
        let mut solver = Solver::new(SolverConfig {
            tt_log2: 10,
            ..SolverConfig::default()
        });
        let mut state = GameState::new([CardSet::EMPTY; 4], Suit::Hearts, 0);
        state.ns_points = 110;
        state.ew_points = 42;

        let nodes_before = solver.node_count();
        assert_eq!(solver.solve(&state).unwrap(), 110);
        assert_eq!(solver.node_count(), nodes_before + 1);

        // Defenders on zero: capot for the declarer side
        state.ns_points = 152;
        state.ew_points = 0;
        assert_eq!(solver.solve(&state).unwrap(), 242);

        // Declarer on the other side sees its own total
        state.declarer = 1;
        assert_eq!(solver.solve(&state).unwrap(), 0);
    }

    #[test]
    fn test_last_trick_with_master_lead() {
        // Seat 0 leads the spade ace into three small spades; trump is
        // elsewhere, so the ace takes 11 points plus the dix de der
        let mut hands = [CardSet::EMPTY; 4];
        hands[0].add(card(Suit::Spades, Rank::Ace));
        hands[1].add(card(Suit::Spades, Rank::Seven));
        hands[2].add(card(Suit::Spades, Rank::Eight));
        hands[3].add(card(Suit::Spades, Rank::Nine));

        let mut state = GameState::new(hands, Suit::Hearts, 0);
        state.ns_points = 0;
        state.ew_points = 152;

        let mut solver = Solver::new(SolverConfig {
            tt_log2: 10,
            ..SolverConfig::default()
        });
        assert_eq!(solver.solve(&state).unwrap(), 21);
    }

    #[test]
    fn test_two_trick_endgame() {
        // Seat 0 holds the two top trumps and cashes them
        let mut hands = [CardSet::EMPTY; 4];
        hands[0].add(card(Suit::Hearts, Rank::Jack));
        hands[0].add(card(Suit::Hearts, Rank::Nine));
        hands[1].add(card(Suit::Hearts, Rank::Seven));
        hands[1].add(card(Suit::Hearts, Rank::Eight));
        hands[2].add(card(Suit::Spades, Rank::Seven));
        hands[2].add(card(Suit::Spades, Rank::Eight));
        hands[3].add(card(Suit::Diamonds, Rank::Seven));
        hands[3].add(card(Suit::Diamonds, Rank::Eight));

        let mut state = GameState::new(hands, Suit::Hearts, 0);
        state.ns_points = 100;
        state.ew_points = 52;

        let mut solver = Solver::new(SolverConfig {
            tt_log2: 12,
            ..SolverConfig::default()
        });
        // 100 + jack 20 + nine 14 + dix de der 10
        assert_eq!(solver.solve(&state).unwrap(), 144);
    }

    #[test]
    fn test_solver_is_repeatable_and_tt_warms_up() {
        // Three-trick endgame where seat 0 sweeps with the two top trumps
        // and the spade ace: 77 + 20 + 14 + 11 + 10 = 132, no capot
        let mut hands = [CardSet::EMPTY; 4];
        hands[0].add(card(Suit::Hearts, Rank::Jack));
        hands[0].add(card(Suit::Hearts, Rank::Nine));
        hands[0].add(card(Suit::Spades, Rank::Ace));
        hands[1].add(card(Suit::Hearts, Rank::Seven));
        hands[1].add(card(Suit::Hearts, Rank::Eight));
        hands[1].add(card(Suit::Spades, Rank::Seven));
        hands[2].add(card(Suit::Diamonds, Rank::Seven));
        hands[2].add(card(Suit::Diamonds, Rank::Eight));
        hands[2].add(card(Suit::Spades, Rank::Eight));
        hands[3].add(card(Suit::Clubs, Rank::Seven));
        hands[3].add(card(Suit::Clubs, Rank::Eight));
        hands[3].add(card(Suit::Spades, Rank::Nine));
        let mut state = GameState::new(hands, Suit::Hearts, 0);
        state.ns_points = 77;
        state.ew_points = 30;

        let mut solver = Solver::new(SolverConfig {
            tt_log2: 18,
            ..SolverConfig::default()
        });
        let first = solver.solve(&state).unwrap();
        let cold_nodes = solver.node_count();

        let second = solver.solve(&state).unwrap();
        let warm_nodes = solver.node_count() - cold_nodes;

        assert_eq!(first, 132);
        assert_eq!(first, second);
        // The whole root is memoized after the first pass
        assert!(warm_nodes <= 1, "warm search expanded {} nodes", warm_nodes);
    }

    #[test]
    fn test_solve_all_suits_matches_scalar() {
        let hands = deal_from_seed(5);
        let mut solver = Solver::new(SolverConfig {
            tt_log2: 18,
            ..SolverConfig::default()
        });
        let scores = solver
            .solve_all_suits(hands, 1, Trick::new(), 0, 0, 0)
            .unwrap();

        for trump in Suit::ALL {
            let mut fresh = Solver::new(SolverConfig {
                tt_log2: 18,
                ..SolverConfig::default()
            });
            let state = GameState {
                hands,
                trump,
                declarer: 1,
                trick: Trick::new(),
                starter: 0,
                ns_points: 0,
                ew_points: 0,
            };
            assert_eq!(scores[trump as usize], fresh.solve(&state).unwrap());
        }
    }

    #[test]
    fn test_invalid_state_is_rejected() {
        let mut state = GameState::new(deal_from_seed(1), Suit::Hearts, 0);
        state.declarer = 7;
        let mut solver = Solver::new(SolverConfig {
            tt_log2: 10,
            ..SolverConfig::default()
        });
        assert!(matches!(
            solver.solve(&state),
            Err(StateError::SeatOutOfRange(7))
        ));
    }
}
