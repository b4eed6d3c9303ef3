//! Game orchestration.
//!
//! `Game` owns the rules, the authoritative [`State`] and the registered
//! players, and drives the round/turn lifecycle:
//!
//! ```text
//! NotStarted -> RoundInProgress -> (RoundEnded | GameEnded)
//!                    ^                   |
//!                    +---- start_round --+
//! ```
//!
//! Failure semantics follow the engine taxonomy: lifecycle methods called
//! from the wrong phase panic (programmer error); illegal actions come
//! back as recoverable `Err` values and leave the state untouched;
//! configuration problems surface from `new`/`add_player` immediately.

use log::{debug, warn};
use std::sync::Arc;

use super::helper::GameHelper;
use crate::core::{Action, PlayerId, Rules, State};
use crate::error::EngineError;
use crate::players::Player;

/// Lifecycle phase of a [`Game`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    /// Constructed; players may register.
    NotStarted,
    /// A round is being played.
    RoundInProgress,
    /// A round was scored; the next may start.
    RoundEnded,
    /// The game is over.
    GameEnded,
}

/// The orchestrator: owns rules, state and players, applies validated
/// actions, and detects round/game termination.
pub struct Game {
    rules: Arc<Rules>,
    state: State,
    players: Vec<Box<dyn Player>>,
    phase: GamePhase,
}

impl Game {
    /// Create a game from validated rules, seeded with 0.
    pub fn new(rules: Rules) -> Result<Self, EngineError> {
        Self::with_seed(rules, 0)
    }

    /// Create a game from validated rules with an explicit RNG seed.
    ///
    /// The seed fixes the deal and draw sequence, making whole games
    /// reproducible.
    pub fn with_seed(rules: Rules, seed: u64) -> Result<Self, EngineError> {
        rules.validate()?;
        let rules = Arc::new(rules);
        let state = State::new(Arc::clone(&rules), seed);
        Ok(Self {
            rules,
            state,
            players: Vec::new(),
            phase: GamePhase::NotStarted,
        })
    }

    /// The frozen rules.
    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Read-only view of the authoritative state.
    #[must_use]
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    // === Player registration ===

    /// Seats still to fill before the game can self-play.
    #[must_use]
    pub fn players_missing(&self) -> usize {
        self.rules.player_count - self.players.len()
    }

    /// True once every seat has a registered player.
    #[must_use]
    pub fn has_enough_players(&self) -> bool {
        self.players_missing() == 0
    }

    /// Register the next player.
    ///
    /// Fails once the game has started or when every seat is taken.
    pub fn add_player(&mut self, player: Box<dyn Player>) -> Result<(), EngineError> {
        if self.phase != GamePhase::NotStarted {
            return Err(EngineError::GameAlreadyStarted);
        }
        if self.players.len() >= self.rules.player_count {
            return Err(EngineError::TooManyPlayers(self.rules.player_count));
        }
        debug!("seat {} taken by {}", self.players.len(), player.player_type());
        self.players.push(player);
        Ok(())
    }

    // === Round lifecycle ===

    /// Deal a fresh round: refill the pool, deal every hand, reset the
    /// turn counter, rotate the starting seat round-robin.
    ///
    /// Panics unless called from `NotStarted` or `RoundEnded`.
    pub fn start_round(&mut self) {
        assert!(
            matches!(self.phase, GamePhase::NotStarted | GamePhase::RoundEnded),
            "start_round called in phase {:?}",
            self.phase
        );

        let starter =
            PlayerId::new((self.state.round() % self.rules.player_count as u32) as u8);
        self.state.reset_round(starter);

        for player in PlayerId::all(self.rules.player_count) {
            for _ in 0..self.rules.hand_size {
                let dealt = self.state.draw_from_pool(player);
                debug_assert!(dealt.is_some(), "validated rules guarantee a full deal");
            }
        }

        debug!(
            "round {} started, {} tiles pooled, {} to move",
            self.state.round(),
            self.state.pool().total(),
            starter
        );
        self.phase = GamePhase::RoundInProgress;
    }

    /// Check an action against the authoritative state.
    #[must_use]
    pub fn legal(&self, action: &Action) -> bool {
        GameHelper::legal(action, &self.state)
    }

    /// Validate and apply one action.
    ///
    /// Panics outside `RoundInProgress`. An illegal action is returned as
    /// `Err` and leaves the state untouched; the caller retries with a
    /// different action (normally one drawn from
    /// [`GameHelper::all_legal`]).
    pub fn apply(&mut self, action: &Action) -> Result<(), EngineError> {
        assert_eq!(
            self.phase,
            GamePhase::RoundInProgress,
            "apply called outside a round"
        );
        GameHelper::apply(action, &mut self.state)
    }

    /// Score the finished round and advance the round counter.
    ///
    /// Panics unless the round is in progress and
    /// `state.is_round_finished()` holds.
    pub fn end_round(&mut self) {
        assert_eq!(
            self.phase,
            GamePhase::RoundInProgress,
            "end_round called outside a round"
        );
        assert!(
            self.state.is_round_finished(),
            "end_round called before the round finished"
        );

        let deltas = GameHelper::round_deltas(&self.state);
        for (player, &delta) in deltas.iter() {
            self.state.add_score(player, delta);
        }
        self.state.advance_round();

        debug!(
            "round {} scored: {:?}",
            self.state.round(),
            PlayerId::all(self.rules.player_count)
                .map(|p| self.state.score(p))
                .collect::<Vec<_>>()
        );

        self.phase = if self.state.is_game_finished() {
            GamePhase::GameEnded
        } else {
            GamePhase::RoundEnded
        };
    }

    // === Self-play drivers ===

    /// Ask the seat to move for an action, validate it and apply it.
    ///
    /// A player submitting an illegal action is recovered: the submission
    /// is logged and replaced by the first legal action, which always
    /// exists. Returns the action actually applied.
    ///
    /// Panics outside `RoundInProgress` or with unfilled seats.
    pub fn play_turn(&mut self) -> Action {
        assert_eq!(
            self.phase,
            GamePhase::RoundInProgress,
            "play_turn called outside a round"
        );
        assert!(
            self.has_enough_players(),
            "play_turn needs every seat registered"
        );

        let seat = self.state.current_player();
        let action = self.players[seat.index()].play(&self.state);

        match GameHelper::apply(&action, &mut self.state) {
            Ok(()) => action,
            Err(err) => {
                warn!("{} submitted {}: replaced by first legal action", seat, err);
                let fallback = GameHelper::all_legal(&self.state)
                    .into_iter()
                    .next()
                    .expect("at least one legal action always exists");
                GameHelper::apply(&fallback, &mut self.state)
                    .expect("enumerated action must apply");
                fallback
            }
        }
    }

    /// Play one full round with the registered players.
    pub fn roll_round(&mut self) {
        self.start_round();
        while !self.state.is_round_finished() {
            self.play_turn();
        }
        self.end_round();
    }

    /// Play rounds until the game ends. Valid from `NotStarted` or
    /// `RoundEnded`; a no-op once the game is over.
    pub fn roll_game(&mut self) {
        while self.phase != GamePhase::GameEnded {
            self.roll_round();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::{FirstLegalPlayer, RandomPlayer};

    fn mini_game(seed: u64) -> Game {
        Game::with_seed(Rules::mini(), seed).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_rules() {
        let mut rules = Rules::base();
        rules.player_count = 0;
        assert!(matches!(
            Game::new(rules),
            Err(EngineError::InvalidRules(_))
        ));
    }

    #[test]
    fn test_add_player_bounds() {
        let mut game = mini_game(42);
        assert_eq!(game.players_missing(), 2);

        game.add_player(Box::new(FirstLegalPlayer::new())).unwrap();
        game.add_player(Box::new(RandomPlayer::new(1))).unwrap();
        assert!(game.has_enough_players());

        assert_eq!(
            game.add_player(Box::new(FirstLegalPlayer::new())),
            Err(EngineError::TooManyPlayers(2))
        );
    }

    #[test]
    fn test_add_player_after_start_fails() {
        let mut game = mini_game(42);
        game.start_round();
        assert_eq!(
            game.add_player(Box::new(FirstLegalPlayer::new())),
            Err(EngineError::GameAlreadyStarted)
        );
    }

    #[test]
    fn test_start_round_deals_hands() {
        let mut game = mini_game(42);
        game.start_round();

        let state = game.state();
        assert_eq!(state.hand(PlayerId::new(0)).total(), 3);
        assert_eq!(state.hand(PlayerId::new(1)).total(), 3);
        assert_eq!(state.pool().total(), 6);
        assert_eq!(state.total_tiles(), 12);
        assert_eq!(game.phase(), GamePhase::RoundInProgress);
    }

    #[test]
    fn test_starting_seat_rotates() {
        let mut game = mini_game(42);
        game.start_round();
        assert_eq!(game.state().current_player(), PlayerId::new(0));

        // Drive round 0 to its end, then the next round's lead rotates
        while !game.state().is_round_finished() {
            let action = GameHelper::all_legal(game.state())[0].clone();
            game.apply(&action).unwrap();
        }
        game.end_round();
        assert_eq!(game.phase(), GamePhase::RoundEnded);

        game.start_round();
        assert_eq!(game.state().current_player(), PlayerId::new(1));
    }

    #[test]
    #[should_panic(expected = "apply called outside a round")]
    fn test_apply_outside_round_panics() {
        let mut game = mini_game(42);
        let _ = game.apply(&Action::draw(PlayerId::new(0)));
    }

    #[test]
    #[should_panic(expected = "start_round called in phase")]
    fn test_double_start_round_panics() {
        let mut game = mini_game(42);
        game.start_round();
        game.start_round();
    }

    #[test]
    #[should_panic(expected = "end_round called before the round finished")]
    fn test_premature_end_round_panics() {
        let mut game = mini_game(42);
        game.start_round();
        // Hands were just dealt: the round cannot be finished
        game.end_round();
    }

    #[test]
    fn test_apply_rejects_illegal_without_state_change() {
        let mut game = mini_game(42);
        game.start_round();

        let turn_before = game.state().turn();
        let err = game.apply(&Action::draw(PlayerId::new(1))); // wrong seat
        assert!(matches!(err, Err(EngineError::IllegalAction(_))));
        assert_eq!(game.state().turn(), turn_before);
    }

    #[test]
    fn test_roll_game_reaches_game_end() {
        let mut game = mini_game(42);
        game.add_player(Box::new(RandomPlayer::new(1))).unwrap();
        game.add_player(Box::new(RandomPlayer::new(2))).unwrap();

        game.roll_game();

        assert_eq!(game.phase(), GamePhase::GameEnded);
        assert!(game.state().is_game_finished());
        assert_eq!(game.state().round(), game.rules().round_limit);
    }
}
