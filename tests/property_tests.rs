//! Property tests over random seeds and positions.

use std::sync::Arc;

use proptest::prelude::*;
use rustc_hash::FxHashSet;

use faience::{
    Action, GameHelper, GameRng, PlayerId, Rules, State, Tile, TileGroup,
};

fn dealt_state(rules: Rules, seed: u64) -> State {
    let player_count = rules.player_count;
    let hand_size = rules.hand_size;
    let mut state = State::new(Arc::new(rules), seed);
    state.reset_round(PlayerId::new(0));
    for player in PlayerId::all(player_count) {
        for _ in 0..hand_size {
            state.draw_from_pool(player);
        }
    }
    state
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Conservation, soundness, dedup and determinism hold along any
    /// randomly driven round.
    #[test]
    fn random_rounds_preserve_invariants(seed in any::<u64>(), steps in 0usize..40) {
        let mut state = dealt_state(Rules::mini(), seed);
        let mut chooser = GameRng::new(seed ^ 0x5EED);

        for _ in 0..steps {
            if state.is_round_finished() {
                break;
            }

            let actions = GameHelper::all_legal(&state);
            prop_assert!(!actions.is_empty());

            for action in &actions {
                prop_assert!(GameHelper::legal(action, &state));
            }

            let unique: FxHashSet<&Action> = actions.iter().collect();
            prop_assert_eq!(unique.len(), actions.len());

            prop_assert_eq!(&actions, &GameHelper::all_legal(&state));

            let index = chooser.gen_range_usize(0..actions.len());
            GameHelper::apply(&actions[index], &mut state).unwrap();
            prop_assert_eq!(state.total_tiles(), 12);
        }
    }

    /// Any meld probe agrees between `legal` and `all_legal` membership,
    /// whether or not its tiles exist in the hand or the rule dimensions.
    #[test]
    fn meld_probes_match_enumeration(
        seed in any::<u64>(),
        raw_tiles in prop::collection::vec((0u8..5, 0u8..10), 0..6),
    ) {
        let state = dealt_state(Rules::base(), seed);
        let actions = GameHelper::all_legal(&state);
        let listed: FxHashSet<&Action> = actions.iter().collect();

        let group = TileGroup::from_tiles(
            raw_tiles.iter().map(|&(color, rank)| Tile::new(color, rank)),
        );
        let probe = Action::meld(PlayerId::new(0), group);

        prop_assert_eq!(
            GameHelper::legal(&probe, &state),
            listed.contains(&probe)
        );
    }

    /// Swap probes agree between `legal` and `all_legal` membership.
    #[test]
    fn swap_probes_match_enumeration(
        seed in any::<u64>(),
        color in 0u8..5,
        rank in 0u8..10,
        count in 0usize..5,
    ) {
        let state = dealt_state(Rules::base(), seed);
        let actions = GameHelper::all_legal(&state);
        let listed: FxHashSet<&Action> = actions.iter().collect();

        let probe = Action::swap(PlayerId::new(0), Tile::new(color, rank), count);
        prop_assert_eq!(
            GameHelper::legal(&probe, &state),
            listed.contains(&probe)
        );
    }

    /// A full random base-rules round conserves the 64 tiles and always
    /// terminates within the turn limit.
    #[test]
    fn base_rounds_terminate_and_conserve(seed in any::<u64>()) {
        let mut state = dealt_state(Rules::base(), seed);
        let mut chooser = GameRng::new(seed ^ 0xF00D);

        let mut turns = 0u32;
        while !state.is_round_finished() {
            let actions = GameHelper::all_legal(&state);
            let index = chooser.gen_range_usize(0..actions.len());
            GameHelper::apply(&actions[index], &mut state).unwrap();
            turns += 1;
            prop_assert_eq!(state.total_tiles(), 64);
            prop_assert!(turns <= state.rules().turn_limit);
        }
    }
}
