//! Copy-to-clipboard controls and their "Copied!" flash.
//!
//! A control's source is decided once when bindings are built. A click
//! resolves the source to text and starts an asynchronous clipboard write;
//! the write's success comes back through [`CopyFlash::on_copied`], which
//! swaps the control's content for a confirmation, announces it, and
//! schedules the restore. A failed write leaves the control untouched.

#[cfg(test)]
#[path = "clipboard_test.rs"]
mod clipboard_test;

use std::fmt;

use crate::announce::Announcer;
use crate::consts::{COLOR_TOKENS_CSS, COPIED_ANNOUNCEMENT, COPIED_LABEL, COPY_CODE_SELECTOR, COPY_COLOR_TOKENS_ID, COPY_TOKEN_SELECTOR};
use crate::page::{Page, Task, TimerId};

/// Where a copy control takes its text from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopySource {
    /// The `code` element inside the control's previous sibling.
    PreviousCode,
    /// The element a selector points at.
    Target(String),
    /// A literal value carried by the control.
    Value(String),
    /// The page's color design tokens as CSS custom properties.
    ColorTokens,
}

impl CopySource {
    /// Classify `control` by its markup. `None` for controls with nothing to copy.
    pub fn for_control<P: Page>(page: &P, control: &P::Node) -> Option<Self> {
        if page.attribute(control, "id").as_deref() == Some(COPY_COLOR_TOKENS_ID) {
            return Some(Self::ColorTokens);
        }
        if page.has_class(control, class_name(COPY_TOKEN_SELECTOR)) {
            return page
                .attribute(control, "data-value")
                .filter(|value| !value.is_empty())
                .map(Self::Value);
        }
        if page.has_class(control, class_name(COPY_CODE_SELECTOR)) {
            return match page.attribute(control, "data-target") {
                Some(target) if target == "previous" => Some(Self::PreviousCode),
                Some(target) if !target.is_empty() => Some(Self::Target(target)),
                _ => None,
            };
        }
        None
    }

    /// Resolve to the text to copy, or `None` if the source element is gone.
    pub fn text<P: Page>(&self, page: &P, control: &P::Node) -> Option<String> {
        match self {
            Self::PreviousCode => {
                let previous = page.previous_sibling(control)?;
                let code = page.query_in(&previous, "code")?;
                Some(page.text(&code).trim().to_owned())
            }
            Self::Target(selector) => page.query(selector).map(|node| page.text(&node).trim().to_owned()),
            Self::Value(value) => Some(value.clone()),
            Self::ColorTokens => Some(COLOR_TOKENS_CSS.to_owned()),
        }
    }
}

fn class_name(selector: &str) -> &str {
    selector.trim_start_matches('.')
}

#[derive(Debug, Clone)]
struct Flash<N> {
    control: N,
    original: String,
    timer: TimerId,
}

/// Controls currently showing the confirmation.
#[derive(Debug, Clone)]
pub struct CopyFlash<N> {
    flash_ms: u32,
    active: Vec<Flash<N>>,
}

impl<N: Clone + PartialEq + fmt::Debug> CopyFlash<N> {
    #[must_use]
    pub fn new(flash_ms: u32) -> Self {
        Self { flash_ms, active: Vec::new() }
    }

    #[must_use]
    pub fn is_flashing(&self, control: &N) -> bool {
        self.active.iter().any(|flash| &flash.control == control)
    }

    /// Start a clipboard write for `control`. Returns whether one was started.
    pub fn request<P: Page<Node = N>>(&self, page: &mut P, control: &N, source: &CopySource) -> bool {
        let Some(text) = source.text(page, control) else {
            log::debug!("copy: nothing to copy for {control:?}");
            return false;
        };
        page.write_clipboard(text, control);
        true
    }

    /// The write for `control` succeeded: show the confirmation.
    ///
    /// A control already flashing keeps its first original content and gets
    /// a fresh restore timer.
    pub fn on_copied<P: Page<Node = N>>(&mut self, page: &mut P, announcer: &mut Announcer<N>, control: &N) {
        let original = match self.active.iter().position(|flash| &flash.control == control) {
            Some(index) => {
                let flash = self.active.remove(index);
                page.clear_timeout(flash.timer);
                flash.original
            }
            None => page.inner_html(control),
        };

        page.set_inner_html(control, COPIED_LABEL);
        page.set_attribute(control, "aria-label", COPIED_ANNOUNCEMENT);
        announcer.announce(page, COPIED_ANNOUNCEMENT);

        let timer = page.set_timeout(self.flash_ms, Task::RestoreFlash { control: control.clone() });
        self.active.push(Flash { control: control.clone(), original, timer });
    }

    /// Restore timer expiry: put the original content back.
    pub fn restore<P: Page<Node = N>>(&mut self, page: &mut P, control: &N) {
        let Some(index) = self.active.iter().position(|flash| &flash.control == control) else {
            return;
        };
        let flash = self.active.remove(index);
        page.set_inner_html(control, &flash.original);
        page.remove_attribute(control, "aria-label");
    }
}
