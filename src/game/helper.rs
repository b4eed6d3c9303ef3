//! Legality checking, exhaustive action enumeration, and action effects.
//!
//! `GameHelper` is the reasoning core the rest of the engine defers to:
//!
//! - [`GameHelper::legal`] decides whether one action is valid against a
//!   state. It fails closed: malformed or out-of-turn actions are simply
//!   illegal, never an error or a panic.
//! - [`GameHelper::all_legal`] enumerates every distinct legal action.
//!   The sequence is complete (exactly the actions `legal` accepts),
//!   duplicate-free (groups are normalized sorted multisets, and an
//!   explicit key set guards the output), and deterministic for a fixed
//!   state.
//! - [`GameHelper::apply`] validates and then executes an action,
//!   all-or-nothing. Rollout search applies candidates to value clones of
//!   the state through the same entry point the orchestrator uses.
//!
//! Enumeration never generates-then-discards exponentially many duplicate
//! groupings: set candidates are walked as count vectors over colors (one
//! visit per distinct multiset) and run candidates as maximal consecutive
//! stretches, so duplicate tiles in a hand cannot multiply the output.

use log::trace;
use rustc_hash::FxHashSet;

use crate::core::{
    Action, ActionKind, ActionRecord, PlayerId, PlayerMap, Rules, State, Tile, TileGroup, TileSet,
};
use crate::error::EngineError;

/// Pure rule functions over [`Action`] and [`State`].
pub struct GameHelper;

impl GameHelper {
    /// Is `action` valid against `state`?
    ///
    /// Checks, in order: the actor holds the current turn; the referenced
    /// tiles exist in the actor's hand with sufficient multiplicity; the
    /// grouping/pool preconditions of the action kind. Every failure is a
    /// plain `false`.
    #[must_use]
    pub fn legal(action: &Action, state: &State) -> bool {
        if action.actor != state.current_player() {
            return false;
        }

        let rules = state.rules();
        let hand = state.hand(action.actor);

        match &action.kind {
            ActionKind::Draw => !state.pool().is_empty(),
            ActionKind::Meld(group) => {
                rules.classify_group(group).is_some() && hand.contains_group(group)
            }
            ActionKind::Swap { tile, count } => {
                *count >= 1
                    && *count <= rules.swap_limit
                    && hand.count(*tile) >= *count
                    && state.pool().total() >= *count
            }
            // Pass exists so the action set is never empty; it is only
            // legal when nothing productive is.
            ActionKind::Pass => state.pool().is_empty() && !Self::any_meld_exists(hand, rules),
        }
    }

    /// Every distinct legal action for the seat to move, in a fixed
    /// deterministic order: sets (by rank), runs (by color and start),
    /// swaps (by kind and multiplicity), draw, then pass as the sole
    /// fallback.
    #[must_use]
    pub fn all_legal(state: &State) -> Vec<Action> {
        let actor = state.current_player();
        let rules = state.rules();
        let hand = state.hand(actor);
        let pool_total = state.pool().total();

        let mut actions = Vec::new();
        let mut seen: FxHashSet<TileGroup> = FxHashSet::default();

        if rules.allow_sets {
            Self::collect_sets(hand, rules, actor, &mut seen, &mut actions);
        }
        if rules.allow_runs {
            Self::collect_runs(hand, rules, actor, &mut seen, &mut actions);
        }

        if rules.swap_limit > 0 && pool_total > 0 {
            for (tile, held) in hand.iter() {
                let max_count = held.min(rules.swap_limit).min(pool_total);
                for count in 1..=max_count {
                    actions.push(Action::swap(actor, tile, count));
                }
            }
        }

        if pool_total > 0 {
            actions.push(Action::draw(actor));
        }

        if actions.is_empty() {
            actions.push(Action::pass(actor));
        }

        trace!("{} has {} legal actions", actor, actions.len());
        actions
    }

    /// Validate and execute `action` on `state`.
    ///
    /// On success the tiles move, the action is recorded and the turn
    /// advances to the next seat. On rejection the state is untouched.
    pub fn apply(action: &Action, state: &mut State) -> Result<(), EngineError> {
        if !Self::legal(action, state) {
            return Err(EngineError::IllegalAction(action.clone()));
        }

        let actor = action.actor;
        let tiles_before = state.total_tiles();

        match &action.kind {
            ActionKind::Draw => {
                let draw_count = state.rules().draw_count;
                for _ in 0..draw_count {
                    if state.draw_from_pool(actor).is_none() {
                        break;
                    }
                }
            }
            ActionKind::Meld(group) => {
                let kind = state
                    .rules()
                    .classify_group(group)
                    .expect("validated meld must classify");
                let moved = state.play_meld(actor, group.clone(), kind);
                debug_assert!(moved, "validated meld must be in hand");
            }
            ActionKind::Swap { tile, count } => {
                let returned = state.return_to_pool(actor, *tile, *count);
                debug_assert!(returned, "validated swap must be in hand");
                for _ in 0..*count {
                    let drawn = state.draw_from_pool(actor);
                    debug_assert!(drawn.is_some(), "pool cannot empty mid-swap");
                }
            }
            ActionKind::Pass => {}
        }

        state.record_action(ActionRecord::new(
            actor,
            action.clone(),
            state.round(),
            state.turn(),
        ));
        state.advance_turn();

        debug_assert_eq!(
            state.total_tiles(),
            tiles_before,
            "apply must conserve tiles"
        );
        Ok(())
    }

    /// Score movement if the round ended right now: every meld credits
    /// its owner, every tile still in a hand costs its holder the
    /// configured penalty.
    ///
    /// `Game::end_round` folds this into the cumulative scores; the Monte
    /// Carlo evaluator reads it as the projected value of a position.
    #[must_use]
    pub fn round_deltas(state: &State) -> PlayerMap<i32> {
        let rules = state.rules();
        let mut deltas = PlayerMap::with_value(state.player_count(), 0);

        for meld in state.melds() {
            deltas[meld.owner] += meld.group.points() + rules.group_bonus(meld.kind);
        }
        for player in PlayerId::all(state.player_count()) {
            deltas[player] -= rules.hand_penalty * state.hand(player).total() as i32;
        }

        deltas
    }

    // === Enumeration internals ===

    /// Same-rank groups: for each rank, walk every count vector over the
    /// colors held, one leaf per distinct multiset.
    fn collect_sets(
        hand: &TileSet,
        rules: &Rules,
        actor: PlayerId,
        seen: &mut FxHashSet<TileGroup>,
        out: &mut Vec<Action>,
    ) {
        for rank in 1..=rules.ranks {
            let available: Vec<(Tile, usize)> = (0..rules.colors)
                .map(|color| Tile::new(color, rank))
                .map(|tile| (tile, hand.count(tile)))
                .filter(|&(_, count)| count > 0)
                .collect();

            let total: usize = available.iter().map(|&(_, count)| count).sum();
            if total < rules.min_group_size {
                continue;
            }

            let mut picked: Vec<(Tile, usize)> = Vec::new();
            Self::emit_count_vectors(&available, 0, 0, rules, &mut picked, actor, seen, out);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_count_vectors(
        available: &[(Tile, usize)],
        idx: usize,
        chosen: usize,
        rules: &Rules,
        picked: &mut Vec<(Tile, usize)>,
        actor: PlayerId,
        seen: &mut FxHashSet<TileGroup>,
        out: &mut Vec<Action>,
    ) {
        if chosen > rules.max_group_size {
            return;
        }
        if idx == available.len() {
            if chosen >= rules.min_group_size {
                let group = TileGroup::from_tiles(
                    picked
                        .iter()
                        .flat_map(|&(tile, n)| std::iter::repeat(tile).take(n)),
                );
                if seen.insert(group.clone()) {
                    out.push(Action::meld(actor, group));
                }
            }
            return;
        }

        let (tile, held) = available[idx];
        for take in 0..=held {
            if take > 0 {
                picked.push((tile, take));
            }
            Self::emit_count_vectors(available, idx + 1, chosen + take, rules, picked, actor, seen, out);
            if take > 0 {
                picked.pop();
            }
        }
    }

    /// Same-color consecutive-rank groups: for each color and start rank,
    /// measure the consecutive stretch once and emit every window within
    /// the size bounds.
    fn collect_runs(
        hand: &TileSet,
        rules: &Rules,
        actor: PlayerId,
        seen: &mut FxHashSet<TileGroup>,
        out: &mut Vec<Action>,
    ) {
        for color in 0..rules.colors {
            for start in 1..=rules.ranks {
                let mut reach = start;
                while reach <= rules.ranks && hand.count(Tile::new(color, reach)) > 0 {
                    reach += 1;
                }
                let stretch = (reach - start) as usize;

                for len in rules.min_group_size..=rules.max_group_size.min(stretch) {
                    let group = TileGroup::from_tiles(
                        (start..start + len as u8).map(|rank| Tile::new(color, rank)),
                    );
                    if seen.insert(group.clone()) {
                        out.push(Action::meld(actor, group));
                    }
                }
            }
        }
    }

    /// Existence probe mirroring the enumerators: is any meld available?
    ///
    /// Used by pass legality; must agree exactly with what the
    /// enumeration would emit.
    fn any_meld_exists(hand: &TileSet, rules: &Rules) -> bool {
        if rules.allow_sets {
            for rank in 1..=rules.ranks {
                let total: usize = (0..rules.colors)
                    .map(|color| hand.count(Tile::new(color, rank)))
                    .sum();
                if total >= rules.min_group_size {
                    return true;
                }
            }
        }
        if rules.allow_runs {
            for color in 0..rules.colors {
                let mut stretch = 0usize;
                for rank in 1..=rules.ranks {
                    if hand.count(Tile::new(color, rank)) > 0 {
                        stretch += 1;
                        if stretch >= rules.min_group_size {
                            return true;
                        }
                    } else {
                        stretch = 0;
                    }
                }
            }
        }
        false
    }
}
