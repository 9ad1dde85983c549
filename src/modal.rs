//! Modal dialog state machine and focus trap.
//!
//! Each dialog is either Closed (initial) or Open. Opening records the focused
//! element in a single focus-memory slot, shows the backdrop, moves focus into
//! the dialog, and installs two listeners scoped to that open session: a
//! keydown listener (Escape closes, Tab/Shift+Tab wrap at the ends) and a
//! click listener that closes only when the click lands on the backdrop
//! itself. Closing hides the backdrop, removes both listeners, and returns
//! focus to the remembered element if it is still in the document.
//!
//! At most one dialog is open at a time: opening a dialog first closes any
//! other open session.

#[cfg(test)]
#[path = "modal_test.rs"]
mod modal_test;

use std::fmt;

use crate::announce::Announcer;
use crate::consts::{DIALOG_SELECTOR, SHOW_CLASS};
use crate::focus;
use crate::input::{EventKind, KeyInput, Outcome};
use crate::page::{ListenerId, Page};

/// Listeners and elements belonging to one open dialog.
#[derive(Debug, Clone)]
pub struct ModalSession<N> {
    pub backdrop: N,
    /// The `.modal` element, or the backdrop when it has none.
    pub dialog: N,
    key_listener: ListenerId,
    click_listener: ListenerId,
}

/// Owns open sessions (keyed by backdrop) and the focus-memory slot.
#[derive(Debug, Clone)]
pub struct ModalController<N> {
    sessions: Vec<ModalSession<N>>,
    focus_memory: Option<N>,
}

impl<N> Default for ModalController<N> {
    fn default() -> Self {
        Self { sessions: Vec::new(), focus_memory: None }
    }
}

impl<N: Clone + PartialEq + fmt::Debug> ModalController<N> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Queries ---

    #[must_use]
    pub fn is_open(&self, backdrop: &N) -> bool {
        self.session(backdrop).is_some()
    }

    #[must_use]
    pub fn session(&self, backdrop: &N) -> Option<&ModalSession<N>> {
        self.sessions.iter().find(|session| &session.backdrop == backdrop)
    }

    /// Backdrops of currently open dialogs.
    pub fn open_backdrops(&self) -> impl Iterator<Item = &N> {
        self.sessions.iter().map(|session| &session.backdrop)
    }

    /// Element that will receive focus when the open dialog closes.
    #[must_use]
    pub fn focus_memory(&self) -> Option<&N> {
        self.focus_memory.as_ref()
    }

    // --- Transitions ---

    /// Open the backdrop `selector` resolves to. Missing targets are a no-op.
    ///
    /// Returns whether a dialog was opened.
    pub fn open<P: Page<Node = N>>(&mut self, page: &mut P, announcer: &mut Announcer<N>, selector: &str) -> bool {
        let Some(backdrop) = page.query(selector) else {
            log::debug!("modal: no element matches {selector:?}");
            return false;
        };
        self.open_backdrop(page, announcer, backdrop)
    }

    /// Closed → Open for `backdrop`. Already-open backdrops are left alone.
    pub fn open_backdrop<P: Page<Node = N>>(&mut self, page: &mut P, announcer: &mut Announcer<N>, backdrop: N) -> bool {
        if self.is_open(&backdrop) {
            log::debug!("modal: {backdrop:?} is already open");
            return false;
        }
        let others: Vec<N> = self.open_backdrops().cloned().collect();
        for other in &others {
            self.close(page, Some(other));
        }

        self.focus_memory = page.active_element();
        page.add_class(&backdrop, SHOW_CLASS);
        page.remove_attribute(&backdrop, "aria-hidden");

        let dialog = page.query_in(&backdrop, DIALOG_SELECTOR).unwrap_or_else(|| backdrop.clone());
        match focus::resolve(page, &dialog).first() {
            Some(first) => page.focus(first),
            None => {
                if !page.has_attribute(&dialog, "tabindex") {
                    page.set_attribute(&dialog, "tabindex", "-1");
                }
                page.focus(&dialog);
            }
        }

        let key_listener = page.listen(&backdrop, EventKind::KeyDown);
        let click_listener = page.listen(&backdrop, EventKind::Click);

        if let Some(label) = page.attribute(&dialog, "aria-label")
            && !label.trim().is_empty()
        {
            announcer.announce(page, label.trim());
        }

        log::debug!("modal: opened {backdrop:?}");
        self.sessions.push(ModalSession { backdrop, dialog, key_listener, click_listener });
        true
    }

    /// Open → Closed. Absent backdrops and closed dialogs are a no-op.
    ///
    /// Returns whether a dialog was closed.
    pub fn close<P: Page<Node = N>>(&mut self, page: &mut P, backdrop: Option<&N>) -> bool {
        let Some(backdrop) = backdrop else {
            return false;
        };
        let Some(index) = self.sessions.iter().position(|session| &session.backdrop == backdrop) else {
            log::debug!("modal: {backdrop:?} is not open");
            return false;
        };
        let session = self.sessions.remove(index);

        page.remove_class(&session.backdrop, SHOW_CLASS);
        page.set_attribute(&session.backdrop, "aria-hidden", "true");
        page.unlisten(session.key_listener);
        page.unlisten(session.click_listener);

        if let Some(previous) = self.focus_memory.take()
            && page.is_connected(&previous)
        {
            page.focus(&previous);
        }
        log::debug!("modal: closed {:?}", session.backdrop);
        true
    }

    // --- Session listeners ---

    /// Keydown on an open backdrop. `None` if `listener` is not a session's.
    pub fn handle_key<P: Page<Node = N>>(&mut self, page: &mut P, listener: ListenerId, key: &KeyInput) -> Option<Outcome> {
        let session = self.sessions.iter().find(|session| session.key_listener == listener)?;
        let (backdrop, dialog) = (session.backdrop.clone(), session.dialog.clone());

        if key.is_escape() {
            self.close(page, Some(&backdrop));
            return Some(Outcome::PassThrough);
        }
        if key.is_tab() {
            return Some(trap_tab(page, &dialog, key.shift));
        }
        Some(Outcome::PassThrough)
    }

    /// Click on an open backdrop. `None` if `listener` is not a session's.
    pub fn handle_click<P: Page<Node = N>>(&mut self, page: &mut P, listener: ListenerId, target: &N) -> Option<Outcome> {
        let session = self.sessions.iter().find(|session| session.click_listener == listener)?;
        if &session.backdrop == target {
            let backdrop = session.backdrop.clone();
            self.close(page, Some(&backdrop));
        }
        Some(Outcome::PassThrough)
    }
}

/// Keep Tab focus cycling inside `dialog`.
fn trap_tab<P: Page>(page: &mut P, dialog: &P::Node, shift: bool) -> Outcome {
    let focusables = focus::resolve(page, dialog);
    let (Some(first), Some(last)) = (focusables.first(), focusables.last()) else {
        // Nothing to cycle through; focus stays on the dialog.
        return Outcome::PreventDefault;
    };
    let active = page.active_element();
    let inside = active.as_ref().is_some_and(|node| focusables.contains(node));

    if shift && (!inside || active.as_ref() == Some(first)) {
        page.focus(last);
        Outcome::PreventDefault
    } else if !shift && (!inside || active.as_ref() == Some(last)) {
        page.focus(first);
        Outcome::PreventDefault
    } else {
        Outcome::PassThrough
    }
}
