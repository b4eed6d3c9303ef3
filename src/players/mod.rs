//! Player strategies.
//!
//! A closed family of decision strategies behind one capability: given a
//! read-only view of the state, return an action. Players never touch the
//! authoritative state; anything speculative happens on value clones.

mod first_legal;
mod monte_carlo;
mod random;

pub use first_legal::FirstLegalPlayer;
pub use monte_carlo::MonteCarloPlayer;
pub use random::RandomPlayer;

use crate::core::{Action, State};

/// A decision strategy for one seat.
///
/// The engine guarantees at least one legal action exists whenever a
/// player is asked to act (pass is enumerated as an explicit fallback),
/// so implementations never face an empty choice.
pub trait Player {
    /// Choose an action for the seat to move in `state`.
    fn play(&mut self, state: &State) -> Action;

    /// Short human-readable strategy name.
    fn player_type(&self) -> String;
}
