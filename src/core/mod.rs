//! Core value model: tiles, seats, rules, actions, state, RNG.

pub mod action;
pub mod player;
pub mod rng;
pub mod rules;
pub mod state;
pub mod tile;

pub use action::{Action, ActionKind, ActionRecord};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use rules::{GroupKind, RoundEnd, Rules};
pub use state::{Meld, State};
pub use tile::{Tile, TileGroup, TileSet, COLOR_LETTERS};
