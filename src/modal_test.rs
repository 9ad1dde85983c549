use super::*;
use crate::doc::{DocStore, NodeId};
use crate::page::Task;
use proptest::prelude::*;

struct Fixture {
    doc: DocStore,
    announcer: Announcer<NodeId>,
    modals: ModalController<NodeId>,
    opener: NodeId,
    backdrop: NodeId,
    dialog: NodeId,
    items: Vec<NodeId>,
}

/// A page with an opener button and a dialog holding `count` buttons.
fn fixture(count: usize) -> Fixture {
    let mut doc = DocStore::new();
    let body = doc.body().expect("body exists");
    let opener = doc.append(body, "button", &[("data-open-modal", "#demo")]);
    let backdrop = doc.append(body, "div", &[("id", "demo"), ("class", "modal-backdrop"), ("aria-hidden", "true")]);
    let dialog = doc.append(backdrop, "div", &[("class", "modal"), ("aria-label", "Demo dialog")]);
    let items = (0..count).map(|_| doc.append(dialog, "button", &[])).collect();
    let announcer = Announcer::install(&mut doc, 50);
    doc.focus(&opener);
    Fixture { doc, announcer, modals: ModalController::new(), opener, backdrop, dialog, items }
}

impl Fixture {
    fn open(&mut self) -> bool {
        self.modals.open(&mut self.doc, &mut self.announcer, "#demo")
    }

    fn key_listener(&self) -> ListenerId {
        self.doc.listeners_on(self.backdrop, EventKind::KeyDown)[0]
    }

    fn click_listener(&self) -> ListenerId {
        self.doc.listeners_on(self.backdrop, EventKind::Click)[0]
    }

    fn press(&mut self, key: &str, shift: bool) -> Option<Outcome> {
        let listener = self.key_listener();
        self.modals.handle_key(&mut self.doc, listener, &KeyInput::new(key, shift))
    }

    /// Tab as the browser would: the trap first, then native focus movement
    /// through document order when the trap passes the key through.
    fn tab(&mut self, shift: bool) {
        let before = self.doc.active_element();
        if self.press("Tab", shift) == Some(Outcome::PassThrough) {
            let index = self.items.iter().position(|item| Some(*item) == before).expect("focus inside dialog");
            let next = if shift { index - 1 } else { index + 1 };
            self.doc.focus(&self.items[next]);
        }
    }

    fn active(&self) -> NodeId {
        self.doc.active_element().expect("something focused")
    }
}

// =============================================================
// open
// =============================================================

#[test]
fn open_shows_backdrop_and_focuses_first_item() {
    let mut f = fixture(3);
    assert!(f.open());
    assert!(f.doc.has_class(&f.backdrop, "show"));
    assert!(!f.doc.has_attribute(&f.backdrop, "aria-hidden"));
    assert_eq!(f.active(), f.items[0]);
    assert_eq!(f.modals.focus_memory(), Some(&f.opener));
    assert!(f.modals.is_open(&f.backdrop));
    assert_eq!(f.modals.session(&f.backdrop).map(|s| s.dialog), Some(f.dialog));
}

#[test]
fn open_installs_one_key_and_one_click_listener() {
    let mut f = fixture(1);
    f.open();
    assert_eq!(f.doc.listener_count(f.backdrop, EventKind::KeyDown), 1);
    assert_eq!(f.doc.listener_count(f.backdrop, EventKind::Click), 1);
}

#[test]
fn open_with_empty_focusable_set_focuses_dialog() {
    let mut f = fixture(0);
    f.open();
    assert_eq!(f.active(), f.dialog);
    assert_eq!(f.doc.attribute(&f.dialog, "tabindex").as_deref(), Some("-1"));
}

#[test]
fn open_missing_selector_is_silent_noop() {
    let mut f = fixture(2);
    assert!(!f.modals.open(&mut f.doc, &mut f.announcer, "#nope"));
    assert_eq!(f.active(), f.opener);
    assert_eq!(f.modals.open_backdrops().count(), 0);
}

#[test]
fn open_twice_keeps_single_session() {
    let mut f = fixture(2);
    assert!(f.open());
    assert!(!f.open());
    assert_eq!(f.doc.listener_count(f.backdrop, EventKind::KeyDown), 1);
    assert_eq!(f.modals.focus_memory(), Some(&f.opener));
}

#[test]
fn open_announces_dialog_label() {
    let mut f = fixture(1);
    f.open();
    while let Some(task) = f.doc.pop_due(1_000) {
        if let Task::Announce { message } = task {
            f.announcer.deliver(&mut f.doc, &message);
        }
    }
    let region = *f.announcer.region().expect("region installed");
    assert_eq!(f.doc.text(&region), "Demo dialog");
}

#[test]
fn backdrop_without_dialog_element_traps_inside_backdrop() {
    let mut doc = DocStore::new();
    let body = doc.body().expect("body exists");
    let backdrop = doc.append(body, "div", &[("class", "modal-backdrop")]);
    let only = doc.append(backdrop, "a", &[("href", "#")]);
    let mut announcer = Announcer::detached(50);
    let mut modals = ModalController::new();
    assert!(modals.open(&mut doc, &mut announcer, ".modal-backdrop"));
    assert_eq!(doc.active_element(), Some(only));
    assert_eq!(modals.session(&backdrop).map(|s| s.dialog), Some(backdrop));
}

// =============================================================
// close
// =============================================================

#[test]
fn close_restores_focus_and_hides() {
    let mut f = fixture(2);
    f.open();
    assert!(f.modals.close(&mut f.doc, Some(&f.backdrop)));
    assert!(!f.doc.has_class(&f.backdrop, "show"));
    assert_eq!(f.doc.attribute(&f.backdrop, "aria-hidden").as_deref(), Some("true"));
    assert_eq!(f.active(), f.opener);
    assert_eq!(f.modals.focus_memory(), None);
}

#[test]
fn close_removes_session_listeners() {
    let mut f = fixture(2);
    f.open();
    f.modals.close(&mut f.doc, Some(&f.backdrop));
    assert_eq!(f.doc.listener_count(f.backdrop, EventKind::KeyDown), 0);
    assert_eq!(f.doc.listener_count(f.backdrop, EventKind::Click), 0);
}

#[test]
fn close_absent_or_closed_is_noop() {
    let mut f = fixture(2);
    assert!(!f.modals.close(&mut f.doc, None));
    assert!(!f.modals.close(&mut f.doc, Some(&f.backdrop)));
    assert_eq!(f.doc.attribute(&f.backdrop, "aria-hidden").as_deref(), Some("true"));
    assert_eq!(f.active(), f.opener);
}

#[test]
fn close_skips_focus_restore_for_detached_element() {
    let mut f = fixture(2);
    f.open();
    f.doc.detach(f.opener);
    f.modals.close(&mut f.doc, Some(&f.backdrop));
    assert_eq!(f.doc.active_element(), Some(f.items[0]));
}

#[test]
fn round_trip_is_idempotent() {
    let mut f = fixture(3);
    for _ in 0..3 {
        f.open();
        f.modals.close(&mut f.doc, Some(&f.backdrop));
        assert_eq!(f.active(), f.opener);
    }
}

#[test]
fn opening_second_dialog_closes_first() {
    let mut f = fixture(1);
    let body = f.doc.body().expect("body exists");
    let other = f.doc.append(body, "div", &[("id", "other"), ("class", "modal-backdrop")]);
    let other_dialog = f.doc.append(other, "div", &[("class", "modal")]);
    let other_button = f.doc.append(other_dialog, "button", &[]);

    f.open();
    assert!(f.modals.open(&mut f.doc, &mut f.announcer, "#other"));
    assert!(!f.modals.is_open(&f.backdrop));
    assert!(!f.doc.has_class(&f.backdrop, "show"));
    assert_eq!(f.doc.active_element(), Some(other_button));

    f.modals.close(&mut f.doc, Some(&other));
    assert_eq!(f.active(), f.opener);
}

// =============================================================
// Keys
// =============================================================

#[test]
fn escape_closes_like_close() {
    let mut f = fixture(2);
    f.open();
    assert_eq!(f.press("Escape", false), Some(Outcome::PassThrough));
    assert!(!f.modals.is_open(&f.backdrop));
    assert_eq!(f.active(), f.opener);
    assert_eq!(f.doc.attribute(&f.backdrop, "aria-hidden").as_deref(), Some("true"));
}

#[test]
fn tab_on_last_wraps_to_first() {
    let mut f = fixture(3);
    f.open();
    f.doc.focus(&f.items[2]);
    assert_eq!(f.press("Tab", false), Some(Outcome::PreventDefault));
    assert_eq!(f.active(), f.items[0]);
}

#[test]
fn shift_tab_on_first_wraps_to_last() {
    let mut f = fixture(3);
    f.open();
    assert_eq!(f.press("Tab", true), Some(Outcome::PreventDefault));
    assert_eq!(f.active(), f.items[2]);
}

#[test]
fn tab_in_middle_passes_through() {
    let mut f = fixture(3);
    f.open();
    f.doc.focus(&f.items[1]);
    assert_eq!(f.press("Tab", false), Some(Outcome::PassThrough));
    assert_eq!(f.press("Tab", true), Some(Outcome::PassThrough));
    assert_eq!(f.active(), f.items[1]);
}

#[test]
fn tab_from_outside_focusables_is_pulled_back_in() {
    let mut f = fixture(2);
    f.open();
    f.doc.focus(&f.dialog);
    assert_eq!(f.press("Tab", false), Some(Outcome::PreventDefault));
    assert_eq!(f.active(), f.items[0]);
    f.doc.focus(&f.dialog);
    assert_eq!(f.press("Tab", true), Some(Outcome::PreventDefault));
    assert_eq!(f.active(), f.items[1]);
}

#[test]
fn tab_with_no_focusables_keeps_focus_on_dialog() {
    let mut f = fixture(0);
    f.open();
    assert_eq!(f.press("Tab", false), Some(Outcome::PreventDefault));
    assert_eq!(f.active(), f.dialog);
}

#[test]
fn focusable_set_is_recomputed_per_press() {
    let mut f = fixture(3);
    f.open();
    f.doc.set_attribute(&f.items[2], "disabled", "");
    f.doc.focus(&f.items[1]);
    assert_eq!(f.press("Tab", false), Some(Outcome::PreventDefault));
    assert_eq!(f.active(), f.items[0]);
}

#[test]
fn other_keys_pass_through() {
    let mut f = fixture(2);
    f.open();
    assert_eq!(f.press("Enter", false), Some(Outcome::PassThrough));
    assert!(f.modals.is_open(&f.backdrop));
}

#[test]
fn unknown_listener_is_not_handled() {
    let mut f = fixture(2);
    f.open();
    let stray = f.doc.listen(&f.opener, EventKind::KeyDown);
    assert_eq!(f.modals.handle_key(&mut f.doc, stray, &KeyInput::new("Escape", false)), None);
    assert!(f.modals.is_open(&f.backdrop));
}

// =============================================================
// Clicks
// =============================================================

#[test]
fn click_on_backdrop_closes() {
    let mut f = fixture(2);
    f.open();
    let listener = f.click_listener();
    assert_eq!(f.modals.handle_click(&mut f.doc, listener, &f.backdrop), Some(Outcome::PassThrough));
    assert!(!f.modals.is_open(&f.backdrop));
    assert_eq!(f.active(), f.opener);
}

#[test]
fn click_inside_dialog_keeps_it_open() {
    let mut f = fixture(2);
    f.open();
    let listener = f.click_listener();
    let inside = f.items[1];
    f.modals.handle_click(&mut f.doc, listener, &inside);
    f.modals.handle_click(&mut f.doc, listener, &f.dialog);
    assert!(f.modals.is_open(&f.backdrop));
    // The session listener survives clicks inside the dialog.
    f.modals.handle_click(&mut f.doc, listener, &f.backdrop);
    assert!(!f.modals.is_open(&f.backdrop));
}

// =============================================================
// Properties
// =============================================================

proptest! {
    #[test]
    fn tab_cycles_through_items(count in 1usize..8, presses in 0usize..24) {
        let mut f = fixture(count);
        f.open();
        for _ in 0..presses {
            f.tab(false);
        }
        prop_assert_eq!(f.active(), f.items[presses % count]);
    }

    #[test]
    fn shift_tab_cycles_backwards(count in 1usize..8, presses in 0usize..24) {
        let mut f = fixture(count);
        f.open();
        for _ in 0..presses {
            f.tab(true);
        }
        prop_assert_eq!(f.active(), f.items[(count - presses % count) % count]);
    }

    #[test]
    fn focus_never_leaves_dialog(count in 1usize..6, moves in proptest::collection::vec(any::<bool>(), 0..20)) {
        let mut f = fixture(count);
        f.open();
        for shift in moves {
            f.tab(shift);
            prop_assert!(f.items.contains(&f.active()));
        }
        f.modals.close(&mut f.doc, Some(&f.backdrop));
        prop_assert_eq!(f.active(), f.opener);
    }
}
