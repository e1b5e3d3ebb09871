mod common;

use common::{local, remote};
use voluntr::state::{FavoritesStore, OpportunityStore, SwipeDirection, SwipePhase};
use voluntr::viewmodels::{SwipeOutcome, SwipeViewModel};

fn deck(ids: &[i64]) -> (OpportunityStore, FavoritesStore, SwipeViewModel) {
    let store = OpportunityStore::with_preferences(25, false);
    store.set_opportunities(ids.iter().map(|&id| local(id)).collect());
    let favorites = FavoritesStore::new();
    let vm = SwipeViewModel::new(store.clone(), favorites.clone());
    (store, favorites, vm)
}

#[test]
fn drag_right_80px_saves_and_advances() {
    let (store, favorites, vm) = deck(&[10, 20, 30]);

    assert_eq!(vm.pointer_down(300.0), SwipeOutcome::Dragging(0.0));
    assert_eq!(vm.pointer_move(380.0), SwipeOutcome::Dragging(80.0));
    let outcome = vm.pointer_up();

    let SwipeOutcome::Exiting { direction, exit_id, .. } = outcome else {
        panic!("expected the card to exit, got {:?}", outcome);
    };
    assert_eq!(direction, SwipeDirection::Right);
    assert!(favorites.is_favorite(10));
    let card = vm.current_card().unwrap();
    assert!(matches!(card.phase, SwipePhase::Exiting { direction: SwipeDirection::Right, .. }));
    assert_eq!(card.index, 0);

    // Pasó la ventana de animación
    assert!(vm.finish_exit(exit_id));
    let card = vm.current_card().unwrap();
    assert_eq!(card.index, 1);
    assert_eq!(card.opportunity.id, 20);
    assert_eq!(card.exit_direction, None);
    assert_eq!(card.drag_offset, 0.0);
    assert_eq!(store.selected_id(), Some(20));
}

#[test]
fn cursor_stays_in_bounds() {
    let (store, _, vm) = deck(&[1, 2, 3, 4, 5]);
    for round in 0..30 {
        match round % 4 {
            0 => {
                if let SwipeOutcome::Exiting { exit_id, .. } = vm.save() {
                    vm.finish_exit(exit_id);
                }
            }
            1 => {
                vm.pointer_down(0.0);
                vm.pointer_move(-200.0);
                if let SwipeOutcome::Exiting { exit_id, .. } = vm.pointer_up() {
                    vm.finish_exit(exit_id);
                }
            }
            2 => {
                store.select_by_id((round % 5) as i64 + 1);
            }
            _ => {
                if let SwipeOutcome::Exiting { exit_id, .. } = vm.skip() {
                    vm.finish_exit(exit_id);
                }
            }
        }
        let card = vm.current_card().unwrap();
        assert!(card.index < card.total);
    }
}

#[test]
fn last_card_never_wraps() {
    let (_, _, vm) = deck(&[1, 2]);
    let SwipeOutcome::Exiting { exit_id, .. } = vm.skip() else {
        panic!("first skip should exit");
    };
    vm.finish_exit(exit_id);

    assert_eq!(vm.skip(), SwipeOutcome::Disabled);
    assert_eq!(vm.save(), SwipeOutcome::Disabled);
    let card = vm.current_card().unwrap();
    assert_eq!(card.opportunity.id, 2);
    assert_eq!(card.position_label(), "2 of 2");
}

#[test]
fn marker_click_moves_deck_without_favorites() {
    let (store, favorites, vm) = deck(&[1, 2, 3, 4]);
    assert!(store.select_by_id(3));

    assert_eq!(vm.current_card().unwrap().index, 2);
    assert_eq!(favorites.count(), 0);
}

#[test]
fn hiding_remote_resets_to_first_card() {
    let store = OpportunityStore::with_preferences(25, false);
    store.set_opportunities(vec![remote(1), local(2), remote(3), local(4), local(5)]);
    let vm = SwipeViewModel::new(store.clone(), FavoritesStore::new());
    store.select_by_id(5);
    assert_eq!(vm.current_card().unwrap().index, 4);

    store.set_hide_remote_opportunities(true);
    let card = vm.current_card().unwrap();
    assert_eq!(card.index, 0);
    assert_eq!(card.opportunity.id, 2);
    assert_eq!(card.total, 3);

    store.set_hide_remote_opportunities(false);
    assert_eq!(vm.current_card().unwrap().index, 0);
}

#[test]
fn empty_filtered_deck_shows_nothing() {
    let store = OpportunityStore::with_preferences(25, true);
    store.set_opportunities(vec![remote(1), remote(2)]);
    let vm = SwipeViewModel::new(store, FavoritesStore::new());

    assert_eq!(vm.current_card(), None);
    assert_eq!(vm.save(), SwipeOutcome::Ignored);
    assert_eq!(vm.pointer_down(5.0), SwipeOutcome::Ignored);
}
