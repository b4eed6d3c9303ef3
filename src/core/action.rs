//! Action representation: the closed verb set of a turn.
//!
//! An action is immutable and carries exactly enough to replay it
//! against a state: the acting seat, and a kind with its payload.
//! Two actions are equal iff every field matches; the sorted
//! [`TileGroup`] payload makes meld equality multiset equality.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::player::PlayerId;
use super::tile::{Tile, TileGroup};

/// What a turn does.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Draw the configured number of tiles from the pool.
    Draw,
    /// Move a valid group from the hand to the table.
    Meld(TileGroup),
    /// Return `count` copies of one tile to the pool and draw as many
    /// replacements.
    Swap { tile: Tile, count: usize },
    /// Do nothing. Only legal when nothing else is.
    Pass,
}

/// A proposed, replayable move by one seat.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    /// The seat proposing the move.
    pub actor: PlayerId,
    /// The move itself.
    pub kind: ActionKind,
}

impl Action {
    /// A draw action.
    #[must_use]
    pub fn draw(actor: PlayerId) -> Self {
        Self {
            actor,
            kind: ActionKind::Draw,
        }
    }

    /// A meld action for the given group.
    #[must_use]
    pub fn meld(actor: PlayerId, group: TileGroup) -> Self {
        Self {
            actor,
            kind: ActionKind::Meld(group),
        }
    }

    /// A swap action exchanging `count` copies of `tile`.
    #[must_use]
    pub fn swap(actor: PlayerId, tile: Tile, count: usize) -> Self {
        Self {
            actor,
            kind: ActionKind::Swap { tile, count },
        }
    }

    /// A pass action.
    #[must_use]
    pub fn pass(actor: PlayerId) -> Self {
        Self {
            actor,
            kind: ActionKind::Pass,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ActionKind::Draw => write!(f, "{} draw", self.actor),
            ActionKind::Meld(group) => write!(f, "{} meld {}", self.actor, group),
            ActionKind::Swap { tile, count } => {
                write!(f, "{} swap {}x{}", self.actor, tile, count)
            }
            ActionKind::Pass => write!(f, "{} pass", self.actor),
        }
    }
}

/// An applied action with enough metadata to replay a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The seat that acted.
    pub player: PlayerId,
    /// The action applied.
    pub action: Action,
    /// Round counter when it was applied.
    pub round: u32,
    /// Turn counter within the round.
    pub turn: u32,
}

impl ActionRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(player: PlayerId, action: Action, round: u32, turn: u32) -> Self {
        Self {
            player,
            action,
            round,
            turn,
        }
    }
}
