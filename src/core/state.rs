//! Authoritative game state.
//!
//! One mutable aggregate holds everything a game knows: the shared pool,
//! every private hand, the table of melds, cumulative scores, whose turn
//! it is, and the round/turn counters. The orchestrator owns the
//! authoritative instance and is the only writer; players receive `&State`
//! and speculate on value clones via [`State::clone_with_seed`].
//!
//! Termination is never a stored flag. `is_round_finished` and
//! `is_game_finished` are derived from the pool, the hands and the
//! counters on every call, so they cannot desync from the tiles.
//!
//! The RNG is embedded in the state (and cloned with it), so draw
//! randomness in a speculative copy consumes the copy's own stream and
//! never disturbs the authoritative sequence.

use im::Vector;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::action::ActionRecord;
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use super::rules::{GroupKind, RoundEnd, Rules};
use super::tile::{Tile, TileGroup, TileSet};

/// A group played to the table, with its owner and the rule it satisfied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meld {
    /// The seat that played the group.
    pub owner: PlayerId,
    /// The tiles, as a sorted group.
    pub group: TileGroup,
    /// Which grouping rule the group satisfied.
    pub kind: GroupKind,
}

/// The mutable game snapshot.
///
/// Cloning is cheap: the table and history use persistent vectors, the
/// tile multisets are small inline count arrays.
#[derive(Clone, Debug)]
pub struct State {
    rules: Arc<Rules>,
    pool: TileSet,
    hands: PlayerMap<TileSet>,
    table: Vector<Meld>,
    scores: PlayerMap<i32>,
    current_player: PlayerId,
    round: u32,
    turn: u32,
    history: Vector<ActionRecord>,
    /// Deterministic randomness for draws from the pool.
    pub rng: GameRng,
}

impl State {
    /// Create an empty state (no tiles anywhere) for the given rules.
    ///
    /// `Game::start_round` fills the pool and deals the hands.
    #[must_use]
    pub fn new(rules: Arc<Rules>, seed: u64) -> Self {
        let colors = rules.colors;
        let ranks = rules.ranks;
        let player_count = rules.player_count;

        Self {
            rules,
            pool: TileSet::new(colors, ranks),
            hands: PlayerMap::new(player_count, |_| TileSet::new(colors, ranks)),
            table: Vector::new(),
            scores: PlayerMap::with_value(player_count, 0),
            current_player: PlayerId::new(0),
            round: 0,
            turn: 0,
            history: Vector::new(),
            rng: GameRng::new(seed),
        }
    }

    /// The rules this state was built for.
    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.rules.player_count
    }

    // === Read access ===

    /// The shared draw pool.
    #[must_use]
    pub fn pool(&self) -> &TileSet {
        &self.pool
    }

    /// One seat's private hand.
    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &TileSet {
        &self.hands[player]
    }

    /// Iterate the melds on the table, oldest first.
    pub fn melds(&self) -> impl Iterator<Item = &Meld> {
        self.table.iter()
    }

    /// Number of melds on the table.
    #[must_use]
    pub fn meld_count(&self) -> usize {
        self.table.len()
    }

    /// One seat's cumulative score.
    #[must_use]
    pub fn score(&self, player: PlayerId) -> i32 {
        self.scores[player]
    }

    /// The seat whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    /// Completed-rounds counter.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Turns taken in the current round.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Iterate the applied-action history, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &ActionRecord> {
        self.history.iter()
    }

    // === Derived predicates ===

    /// True once the current round is over: the configured round-end
    /// condition holds, or the turn cap is reached.
    #[must_use]
    pub fn is_round_finished(&self) -> bool {
        if self.turn >= self.rules.turn_limit {
            return true;
        }
        match self.rules.round_end {
            RoundEnd::PoolDrained => self.pool.is_empty(),
            RoundEnd::HandsEmpty => self.hands.iter().all(|(_, hand)| hand.is_empty()),
        }
    }

    /// True once the game is over: the round limit is reached, or a
    /// cumulative score passed the configured target.
    #[must_use]
    pub fn is_game_finished(&self) -> bool {
        if self.round >= self.rules.round_limit {
            return true;
        }
        self.rules.score_target > 0
            && self
                .scores
                .iter()
                .any(|(_, &score)| score >= self.rules.score_target)
    }

    /// Tiles currently in play: pool + hands + table. Conserved at
    /// `rules.total_tiles()` from deal to round end.
    #[must_use]
    pub fn total_tiles(&self) -> usize {
        let in_hands: usize = self.hands.iter().map(|(_, hand)| hand.total()).sum();
        let on_table: usize = self.table.iter().map(|meld| meld.group.len()).sum();
        self.pool.total() + in_hands + on_table
    }

    /// The seat with the highest cumulative score; earlier seats win ties.
    #[must_use]
    pub fn winning_player(&self) -> PlayerId {
        let mut best = PlayerId::new(0);
        for (player, &score) in self.scores.iter() {
            if score > self.scores[best] {
                best = player;
            }
        }
        best
    }

    // === Mutation (orchestrator and test setup) ===

    /// Refill the pool, clear hands and table, reset the turn counter and
    /// hand the first move to `starting_player`.
    pub fn reset_round(&mut self, starting_player: PlayerId) {
        assert!(
            starting_player.index() < self.player_count(),
            "starting player out of range"
        );
        self.pool = self.rules.full_pool();
        for (_, hand) in self.hands.iter_mut() {
            *hand = TileSet::new(self.rules.colors, self.rules.ranks);
        }
        self.table = Vector::new();
        self.turn = 0;
        self.current_player = starting_player;
    }

    /// Draw one uniformly random tile from the pool into `player`'s hand.
    ///
    /// Returns the tile drawn, or `None` on an empty pool.
    pub fn draw_from_pool(&mut self, player: PlayerId) -> Option<Tile> {
        let tile = self.rng.sample_tile(&self.pool)?;
        self.pool.remove(tile);
        self.hands[player].add(tile);
        Some(tile)
    }

    /// Return `count` copies of `tile` from `player`'s hand to the pool.
    ///
    /// Returns false (without mutating) if the hand holds fewer copies.
    pub fn return_to_pool(&mut self, player: PlayerId, tile: Tile, count: usize) -> bool {
        if !self.hands[player].remove_n(tile, count) {
            return false;
        }
        self.pool.add_n(tile, count);
        true
    }

    /// Move a group from `player`'s hand onto the table.
    ///
    /// Returns false (without mutating) if the hand does not contain the
    /// group.
    pub fn play_meld(&mut self, player: PlayerId, group: TileGroup, kind: GroupKind) -> bool {
        if !self.hands[player].remove_group(&group) {
            return false;
        }
        self.table.push_back(Meld {
            owner: player,
            group,
            kind,
        });
        true
    }

    /// Replace one seat's hand. Test-setup and deal plumbing.
    pub fn set_hand(&mut self, player: PlayerId, hand: TileSet) {
        self.hands[player] = hand;
    }

    /// Replace the pool. Test-setup plumbing.
    pub fn set_pool(&mut self, pool: TileSet) {
        self.pool = pool;
    }

    /// Hand the move to a specific seat.
    pub fn set_current_player(&mut self, player: PlayerId) {
        assert!(
            player.index() < self.player_count(),
            "current player out of range"
        );
        self.current_player = player;
    }

    /// Add to one seat's cumulative score.
    pub fn add_score(&mut self, player: PlayerId, delta: i32) {
        self.scores[player] += delta;
    }

    /// Count one applied action: bump the turn counter and pass the move
    /// to the next seat round-robin.
    pub fn advance_turn(&mut self) {
        self.turn += 1;
        let next = (self.current_player.0 + 1) % self.player_count() as u8;
        self.current_player = PlayerId::new(next);
    }

    /// Count one finished round.
    pub fn advance_round(&mut self) {
        self.round += 1;
    }

    /// Append to the applied-action history.
    pub fn record_action(&mut self, record: ActionRecord) {
        self.history.push_back(record);
    }

    // === Speculation ===

    /// An isolated copy for simulation: identical tiles, counters and
    /// scores, but an independent RNG stream seeded with `seed`.
    ///
    /// Shares no mutable substructure with `self` - mutating the copy can
    /// never corrupt the authoritative state.
    #[must_use]
    pub fn clone_with_seed(&self, seed: u64) -> Self {
        let mut copy = self.clone();
        copy.rng = GameRng::new(seed);
        copy
    }
}
