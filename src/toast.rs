//! Transient toast notifications.
//!
//! Showing a toast sets its text, adds `show`, announces the text, and
//! (re)starts its hide timer. Retriggering before the timer fires cancels the
//! old timer, so the toast stays up for the full duration after the most
//! recent trigger and is hidden exactly once.

#[cfg(test)]
#[path = "toast_test.rs"]
mod toast_test;

use std::fmt;

use crate::announce::Announcer;
use crate::consts::SHOW_CLASS;
use crate::page::{Page, Task, TimerId};

#[derive(Debug, Clone)]
pub struct ToastController<N> {
    duration_ms: u32,
    /// Pending hide timer per visible toast.
    pending: Vec<(N, TimerId)>,
}

impl<N: Clone + PartialEq + fmt::Debug> ToastController<N> {
    #[must_use]
    pub fn new(duration_ms: u32) -> Self {
        Self { duration_ms, pending: Vec::new() }
    }

    #[must_use]
    pub fn is_pending(&self, toast: &N) -> bool {
        self.pending.iter().any(|(node, _)| node == toast)
    }

    /// Show the toast `selector` resolves to for the default duration.
    pub fn show<P: Page<Node = N>>(&mut self, page: &mut P, announcer: &mut Announcer<N>, selector: &str, message: &str) -> bool {
        self.show_for(page, announcer, selector, message, self.duration_ms)
    }

    /// Show with an explicit duration. Missing targets are a no-op.
    ///
    /// An empty `message` keeps the toast's current text.
    pub fn show_for<P: Page<Node = N>>(
        &mut self,
        page: &mut P,
        announcer: &mut Announcer<N>,
        selector: &str,
        message: &str,
        duration_ms: u32,
    ) -> bool {
        let Some(toast) = page.query(selector) else {
            log::debug!("toast: no element matches {selector:?}");
            return false;
        };
        if !message.is_empty() {
            page.set_text(&toast, message);
        }
        page.add_class(&toast, SHOW_CLASS);
        let text = page.text(&toast);
        announcer.announce(page, &text);

        if let Some(index) = self.pending.iter().position(|(node, _)| node == &toast) {
            let (_, timer) = self.pending.remove(index);
            page.clear_timeout(timer);
        }
        let timer = page.set_timeout(duration_ms, Task::HideToast { toast: toast.clone() });
        self.pending.push((toast, timer));
        true
    }

    /// Hide timer expiry.
    pub fn hide<P: Page<Node = N>>(&mut self, page: &mut P, toast: &N) {
        self.pending.retain(|(node, _)| node != toast);
        page.remove_class(toast, SHOW_CLASS);
    }
}
