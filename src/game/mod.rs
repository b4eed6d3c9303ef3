//! Orchestration: the legality core and the game state machine.

pub mod game;
pub mod helper;

pub use game::{Game, GamePhase};
pub use helper::GameHelper;
