//! Engine error taxonomy.
//!
//! Two recoverable families surface as `Result`s:
//! - configuration errors, fatal at setup (`InvalidRules`,
//!   `TooManyPlayers`, `GameAlreadyStarted`);
//! - rule violations at play time (`IllegalAction`), which reject the
//!   action without touching the state.
//!
//! Sequencing misuse (calling a lifecycle method from the wrong phase) is
//! a programmer error and panics instead.

use thiserror::Error;

use crate::core::Action;

/// Everything the engine can refuse to do.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The rule configuration is structurally unsound.
    #[error("invalid rules: {0}")]
    InvalidRules(String),

    /// More players were registered than the rules seat.
    #[error("cannot register more than {0} players")]
    TooManyPlayers(usize),

    /// Player registration attempted after the first round started.
    #[error("players cannot be added once the game has started")]
    GameAlreadyStarted,

    /// The submitted action failed validation; the state is unchanged.
    #[error("illegal action: {0}")]
    IllegalAction(Action),
}
