//! Cheapest baseline: always the first enumerated action.

use crate::core::{Action, State};
use crate::game::GameHelper;

use super::Player;

/// Plays the first action `all_legal` returns. Deterministic by
/// construction; useful as a floor in strategy comparisons.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstLegalPlayer;

impl FirstLegalPlayer {
    /// A first-legal player.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Player for FirstLegalPlayer {
    fn play(&mut self, state: &State) -> Action {
        GameHelper::all_legal(state)
            .into_iter()
            .next()
            .expect("at least one legal action always exists")
    }

    fn player_type(&self) -> String {
        "first-legal".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PlayerId, Rules, State};
    use std::sync::Arc;

    #[test]
    fn test_first_legal_matches_enumeration_head() {
        let mut state = State::new(Arc::new(Rules::mini()), 42);
        state.reset_round(PlayerId::new(0));
        state.draw_from_pool(PlayerId::new(0));

        let mut player = FirstLegalPlayer::new();
        let expected = GameHelper::all_legal(&state)[0].clone();
        assert_eq!(player.play(&state), expected);
    }
}
