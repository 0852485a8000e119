use fraudscope_core::{update, AppState, Msg};

#[test]
fn redundant_drag_leave_does_not_mark_dirty() {
    let (mut next, effects) = update(AppState::new(), Msg::DragLeft);

    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}
