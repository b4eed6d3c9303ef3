//! Uniform random strategy.

use crate::core::{Action, GameRng, State};
use crate::game::GameHelper;

use super::Player;

/// Picks uniformly at random from the legal actions. No state carries
/// over between calls beyond the RNG position.
pub struct RandomPlayer {
    rng: GameRng,
}

impl RandomPlayer {
    /// A random player with a fixed seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Player for RandomPlayer {
    fn play(&mut self, state: &State) -> Action {
        let actions = GameHelper::all_legal(state);
        self.rng
            .choose(&actions)
            .expect("at least one legal action always exists")
            .clone()
    }

    fn player_type(&self) -> String {
        "random".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PlayerId, Rules, State};
    use std::sync::Arc;

    #[test]
    fn test_random_player_returns_legal_action() {
        let mut state = State::new(Arc::new(Rules::mini()), 42);
        state.reset_round(PlayerId::new(0));
        for player in PlayerId::all(2) {
            for _ in 0..3 {
                state.draw_from_pool(player);
            }
        }

        let mut player = RandomPlayer::new(7);
        for _ in 0..10 {
            let action = player.play(&state);
            assert!(GameHelper::legal(&action, &state));
        }
    }

    #[test]
    fn test_random_player_is_seed_deterministic() {
        let mut state = State::new(Arc::new(Rules::mini()), 42);
        state.reset_round(PlayerId::new(0));
        for player in PlayerId::all(2) {
            for _ in 0..3 {
                state.draw_from_pool(player);
            }
        }

        let mut a = RandomPlayer::new(9);
        let mut b = RandomPlayer::new(9);
        for _ in 0..5 {
            assert_eq!(a.play(&state), b.play(&state));
        }
    }
}
