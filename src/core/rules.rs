//! Rule configuration.
//!
//! `Rules` is built once, tweaked field-by-field before the game starts,
//! validated, and then shared read-only (behind an `Arc`) for the whole
//! game lifetime. It also owns the one piece of game knowledge everything
//! else defers to: [`Rules::classify_group`], the authority on which tile
//! groups form a valid meld.

use serde::{Deserialize, Serialize};

use super::tile::{TileGroup, TileSet, COLOR_LETTERS};
use crate::error::EngineError;

/// The grouping rule a meld satisfied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKind {
    /// Every tile shares one rank; colors arbitrary, duplicates allowed.
    Set,
    /// Every tile shares one color; ranks strictly consecutive.
    Run,
}

/// What, besides the turn limit, ends a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEnd {
    /// The shared pool has been drawn empty.
    PoolDrained,
    /// Every player's hand is empty.
    HandsEmpty,
}

/// Immutable game configuration.
///
/// Fields are public and freely mutable up to the moment a `Game` is
/// built from them; `Game::new` re-validates and freezes them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    /// Number of seats.
    pub player_count: usize,

    // === Pool composition ===
    /// Number of tile colors.
    pub colors: u8,
    /// Number of tile ranks per color.
    pub ranks: u8,
    /// Copies of every (color, rank) combination in the pool.
    pub copies: u8,

    // === Turn structure ===
    /// Tiles dealt to each hand at the start of a round.
    pub hand_size: usize,
    /// Tiles taken by a draw action.
    pub draw_count: usize,
    /// Smallest meldable group.
    pub min_group_size: usize,
    /// Largest meldable group.
    pub max_group_size: usize,
    /// Whether same-rank groups may be melded.
    pub allow_sets: bool,
    /// Whether same-color consecutive-rank groups may be melded.
    pub allow_runs: bool,
    /// Largest multiplicity of the single-tile swap action; 0 disables it.
    pub swap_limit: usize,

    // === Scoring ===
    /// Bonus on top of tile values for a melded set.
    pub set_bonus: i32,
    /// Bonus on top of tile values for a melded run.
    pub run_bonus: i32,
    /// Penalty per tile left in hand when the round ends.
    pub hand_penalty: i32,

    // === Termination ===
    /// Round-end condition (the turn limit below always applies too).
    pub round_end: RoundEnd,
    /// Hard per-round turn cap.
    pub turn_limit: u32,
    /// Number of rounds in a game.
    pub round_limit: u32,
    /// Cumulative score that ends the game early; 0 disables it.
    pub score_target: i32,
}

impl Rules {
    /// The standard preset: 4 seats over a 64-tile pool, sets and runs.
    #[must_use]
    pub fn base() -> Self {
        Self {
            player_count: 4,
            colors: 4,
            ranks: 8,
            copies: 2,
            hand_size: 7,
            draw_count: 1,
            min_group_size: 3,
            max_group_size: 5,
            allow_sets: true,
            allow_runs: true,
            swap_limit: 2,
            set_bonus: 3,
            run_bonus: 7,
            hand_penalty: 2,
            round_end: RoundEnd::PoolDrained,
            turn_limit: 200,
            round_limit: 5,
            score_target: 0,
        }
    }

    /// A tiny preset for fast games and tests: 2 seats, 12 tiles over
    /// 4 kinds (3 copies each), sets of exactly 3, rounds played until
    /// hands empty out.
    #[must_use]
    pub fn mini() -> Self {
        Self {
            player_count: 2,
            colors: 2,
            ranks: 2,
            copies: 3,
            hand_size: 3,
            draw_count: 1,
            min_group_size: 3,
            max_group_size: 3,
            allow_sets: true,
            allow_runs: false,
            swap_limit: 0,
            set_bonus: 2,
            run_bonus: 0,
            hand_penalty: 1,
            round_end: RoundEnd::HandsEmpty,
            turn_limit: 60,
            round_limit: 2,
            score_target: 0,
        }
    }

    /// Structural sanity check. Run by `Game::new`; configuration errors
    /// are fatal at setup and never recovered.
    pub fn validate(&self) -> Result<(), EngineError> {
        let fail = |msg: &str| Err(EngineError::InvalidRules(msg.to_string()));

        if !(2..=8).contains(&self.player_count) {
            return fail("player_count must be between 2 and 8");
        }
        if self.colors == 0 || self.colors as usize > COLOR_LETTERS.len() {
            return fail("colors must fit the color alphabet");
        }
        if self.ranks == 0 || self.ranks > 30 {
            return fail("ranks must be between 1 and 30");
        }
        if self.copies == 0 || self.copies > 8 {
            return fail("copies must be between 1 and 8");
        }
        if self.hand_size == 0 || self.draw_count == 0 {
            return fail("hand_size and draw_count must be positive");
        }
        if self.min_group_size < 2 {
            return fail("min_group_size must be at least 2");
        }
        if self.max_group_size < self.min_group_size {
            return fail("max_group_size must be at least min_group_size");
        }
        if !self.allow_sets && !self.allow_runs {
            return fail("at least one grouping kind must be enabled");
        }
        if self.set_bonus < 0 || self.run_bonus < 0 || self.hand_penalty < 0 {
            return fail("scoring parameters must be non-negative");
        }
        if self.turn_limit == 0 || self.round_limit == 0 {
            return fail("turn_limit and round_limit must be positive");
        }
        if self.score_target < 0 {
            return fail("score_target must be non-negative");
        }
        if self.total_tiles() < self.player_count * self.hand_size {
            return fail("pool too small to deal the opening hands");
        }
        Ok(())
    }

    /// Number of distinct (color, rank) kinds.
    #[must_use]
    pub fn kind_count(&self) -> usize {
        self.colors as usize * self.ranks as usize
    }

    /// Fixed total tile count the engine conserves.
    #[must_use]
    pub fn total_tiles(&self) -> usize {
        self.kind_count() * self.copies as usize
    }

    /// The full pool composition, as dealt at the start of every round.
    #[must_use]
    pub fn full_pool(&self) -> TileSet {
        TileSet::filled(self.colors, self.ranks, self.copies)
    }

    /// Decide whether `group` is a valid meld, and of which kind.
    ///
    /// Checks the size window first, then the enabled kinds. Set and Run
    /// are disjoint for any `min_group_size >= 2`, so the answer is
    /// unambiguous.
    #[must_use]
    pub fn classify_group(&self, group: &TileGroup) -> Option<GroupKind> {
        let len = group.len();
        if len < self.min_group_size || len > self.max_group_size {
            return None;
        }

        if self.allow_sets && is_set(group) {
            return Some(GroupKind::Set);
        }
        if self.allow_runs && is_run(group) {
            return Some(GroupKind::Run);
        }
        None
    }

    /// Bonus awarded on top of tile values for a meld of `kind`.
    #[must_use]
    pub fn group_bonus(&self, kind: GroupKind) -> i32 {
        match kind {
            GroupKind::Set => self.set_bonus,
            GroupKind::Run => self.run_bonus,
        }
    }
}

fn is_set(group: &TileGroup) -> bool {
    let mut tiles = group.iter();
    let first = match tiles.next() {
        Some(t) => t,
        None => return false,
    };
    tiles.all(|t| t.rank() == first.rank())
}

fn is_run(group: &TileGroup) -> bool {
    // Groups are sorted (color, rank): a run is one color with each rank
    // one above the previous.
    let mut tiles = group.iter();
    let mut prev = match tiles.next() {
        Some(t) => t,
        None => return false,
    };
    for tile in tiles {
        if tile.color() != prev.color() || tile.rank() != prev.rank() + 1 {
            return false;
        }
        prev = tile;
    }
    true
}
