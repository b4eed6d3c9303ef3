//! Monte Carlo rollout strategy.
//!
//! For every legal candidate action the player runs a batch of
//! randomized rollouts on isolated clones of the state, scores the
//! resulting positions from its own perspective, and plays the candidate
//! with the highest mean. Flat search: every candidate gets the same
//! budget, no tree is kept between calls.
//!
//! Determinism: the search RNG is re-seeded on every `play` call, so an
//! identical state with an identical configuration always yields the
//! same action. Ties break to the first-seen candidate in `all_legal`
//! order.

use log::trace;
use std::time::{Duration, Instant};

use crate::core::{Action, GameRng, PlayerId, State};
use crate::game::GameHelper;

use super::Player;

/// Rollout-search strategy.
pub struct MonteCarloPlayer {
    /// Rollouts per candidate action.
    rollouts: u32,
    /// Maximum actions per rollout; 0 rolls to the end of the round.
    horizon: u32,
    /// Seed for the per-call search stream.
    seed: u64,
    /// Optional wall-clock budget, checked between rollouts.
    budget: Option<Duration>,
}

impl Default for MonteCarloPlayer {
    fn default() -> Self {
        Self {
            rollouts: 100,
            horizon: 0,
            seed: 0,
            budget: None,
        }
    }
}

impl MonteCarloPlayer {
    /// A Monte Carlo player with the default budget.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of rollouts per candidate.
    #[must_use]
    pub fn with_rollouts(mut self, rollouts: u32) -> Self {
        assert!(rollouts > 0, "rollout budget must be positive");
        self.rollouts = rollouts;
        self
    }

    /// Set the rollout depth limit; 0 means until the round ends.
    #[must_use]
    pub fn with_horizon(mut self, horizon: u32) -> Self {
        self.horizon = horizon;
        self
    }

    /// Set the search seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set a wall-clock budget for one `play` call.
    #[must_use]
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Position value from `perspective`: projected own total minus the
    /// best projected opponent total, where projected means cumulative
    /// score plus the deltas of scoring the round right now.
    fn evaluate(state: &State, perspective: PlayerId) -> f64 {
        let deltas = GameHelper::round_deltas(state);

        let projected =
            |player: PlayerId| f64::from(state.score(player) + deltas[player]);

        let own = projected(perspective);
        let best_other = PlayerId::all(state.player_count())
            .filter(|&p| p != perspective)
            .map(projected)
            .fold(f64::NEG_INFINITY, f64::max);

        own - best_other
    }

    /// One rollout: apply the candidate on a fresh clone, continue with
    /// uniformly random legal actions to the horizon or the round
    /// boundary, evaluate.
    fn rollout(
        &self,
        state: &State,
        candidate: &Action,
        perspective: PlayerId,
        rng: &mut GameRng,
    ) -> f64 {
        // The clone gets its own draw stream; the choice stream is a
        // second independent fork.
        let mut scratch = state.clone_with_seed(rng.fork().seed());
        let mut choices = rng.fork();

        GameHelper::apply(candidate, &mut scratch).expect("candidate from all_legal must apply");

        let mut depth = 0;
        while !scratch.is_round_finished() && (self.horizon == 0 || depth < self.horizon) {
            let actions = GameHelper::all_legal(&scratch);
            let action = choices
                .choose(&actions)
                .expect("at least one legal action always exists")
                .clone();
            GameHelper::apply(&action, &mut scratch).expect("enumerated action must apply");
            depth += 1;
        }

        Self::evaluate(&scratch, perspective)
    }
}

impl Player for MonteCarloPlayer {
    fn play(&mut self, state: &State) -> Action {
        let candidates = GameHelper::all_legal(state);
        assert!(
            !candidates.is_empty(),
            "the engine must guarantee a legal action before asking a player to act"
        );
        if candidates.len() == 1 {
            return candidates.into_iter().next().expect("checked non-empty");
        }

        let perspective = state.current_player();
        let started = Instant::now();
        // Fresh stream per call: identical states yield identical choices.
        let mut rng = GameRng::new(self.seed);

        let mut best_index = 0;
        let mut best_mean = f64::NEG_INFINITY;

        for (index, candidate) in candidates.iter().enumerate() {
            let mut total = 0.0;
            let mut runs = 0u32;

            for _ in 0..self.rollouts {
                if let Some(budget) = self.budget {
                    if started.elapsed() >= budget {
                        break;
                    }
                }
                total += self.rollout(state, candidate, perspective, &mut rng);
                runs += 1;
            }

            // A candidate starved by the budget keeps -inf and is never
            // preferred; the first candidate then wins by default.
            let mean = if runs == 0 {
                f64::NEG_INFINITY
            } else {
                total / f64::from(runs)
            };
            trace!("{}: mean {:.3} over {} rollouts", candidate, mean, runs);

            if mean > best_mean {
                best_mean = mean;
                best_index = index;
            }
        }

        candidates[best_index].clone()
    }

    fn player_type(&self) -> String {
        format!("monte-carlo({})", self.rollouts)
    }
}
