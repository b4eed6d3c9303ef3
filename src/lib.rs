//! # faience
//!
//! A turn-based, multi-round tile set-collection game engine with hidden
//! information (a shared draw pool) and a combinatorial per-turn action
//! space.
//!
//! ## Design Principles
//!
//! 1. **Derived termination**: round and game end are pure predicates
//!    over the tiles and counters, never stored flags that can desync.
//!
//! 2. **One writer**: the orchestrator exclusively owns and mutates the
//!    authoritative state. Players see `&State` and speculate on value
//!    clones with independent RNG streams.
//!
//! 3. **Exhaustive, normalized enumeration**: `GameHelper::all_legal` is
//!    exactly the set `GameHelper::legal` accepts - complete,
//!    duplicate-free (groups are sorted multisets) and deterministic,
//!    which makes search reproducible and the rules testable.
//!
//! ## Modules
//!
//! - `core`: tiles, seats, rules, actions, state, RNG
//! - `game`: legality/enumeration core and the round/turn orchestrator
//! - `players`: strategy variants (random, first-legal, Monte Carlo)
//! - `error`: the engine error taxonomy

pub mod core;
pub mod error;
pub mod game;
pub mod players;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionKind, ActionRecord,
    GameRng,
    GroupKind, Meld, RoundEnd, Rules, State,
    PlayerId, PlayerMap,
    Tile, TileGroup, TileSet, COLOR_LETTERS,
};

pub use crate::error::EngineError;

pub use crate::game::{Game, GameHelper, GamePhase};

pub use crate::players::{FirstLegalPlayer, MonteCarloPlayer, Player, RandomPlayer};
