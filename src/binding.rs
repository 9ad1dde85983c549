//! Declarative trigger table.
//!
//! Built once at startup by scanning the document for trigger markup. Each
//! trigger gets its own click listener, and the listener handle maps back to
//! the action, so dispatch is a table lookup.
//!
//! | Markup                                | Action        |
//! |---------------------------------------|---------------|
//! | `[data-open-modal="sel"]`             | `OpenModal`   |
//! | `[data-close-modal]`                  | `CloseModal`  |
//! | `[data-show-toast="sel"]`             | `ShowToast`   |
//! | `#themeToggle`                        | `ToggleTheme` |
//! | `.copy-code`, `.copy-token`, `#copyColorTokens` | `Copy` |
//! | `.guide-sidebar .nav-link[href^="#"]` | `ScrollTo`    |

#[cfg(test)]
#[path = "binding_test.rs"]
mod binding_test;

use std::fmt;

use crate::clipboard::CopySource;
use crate::config::BehaviorConfig;
use crate::consts::{
    BACKDROP_SELECTOR, CLOSE_MODAL_ATTR, COPY_CODE_SELECTOR, COPY_COLOR_TOKENS_ID, COPY_TOKEN_SELECTOR,
    OPEN_MODAL_ATTR, SHOW_TOAST_ATTR,
};
use crate::input::EventKind;
use crate::page::{ListenerId, Page};

/// What a trigger does when clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action<N> {
    OpenModal { selector: String },
    /// Close the trigger's enclosing backdrop, if it has one.
    CloseModal { backdrop: Option<N> },
    ShowToast { selector: String },
    ToggleTheme,
    Copy(CopySource),
    /// Scroll to the element with this id (fragment without `#`).
    ScrollTo { id: String },
}

#[derive(Debug, Clone)]
pub struct Binding<N> {
    pub trigger: N,
    pub action: Action<N>,
    pub listener: ListenerId,
}

#[derive(Debug, Clone)]
pub struct BindingTable<N> {
    bindings: Vec<Binding<N>>,
}

impl<N> Default for BindingTable<N> {
    fn default() -> Self {
        Self { bindings: Vec::new() }
    }
}

impl<N: Clone + PartialEq + fmt::Debug> BindingTable<N> {
    /// Scan the document and install one click listener per trigger.
    pub fn build<P: Page<Node = N>>(page: &mut P, config: &BehaviorConfig) -> Self {
        let mut table = Self::default();

        for trigger in page.query_all(&format!("[{OPEN_MODAL_ATTR}]")) {
            match page.attribute(&trigger, OPEN_MODAL_ATTR) {
                Some(selector) if !selector.is_empty() => table.bind(page, trigger, Action::OpenModal { selector }),
                _ => log::debug!("binding: {OPEN_MODAL_ATTR} without a selector on {trigger:?}"),
            }
        }

        for trigger in page.query_all(&format!("[{CLOSE_MODAL_ATTR}]")) {
            let backdrop = page.closest(&trigger, BACKDROP_SELECTOR);
            table.bind(page, trigger, Action::CloseModal { backdrop });
        }

        for trigger in page.query_all(&format!("[{SHOW_TOAST_ATTR}]")) {
            match page.attribute(&trigger, SHOW_TOAST_ATTR) {
                Some(selector) if !selector.is_empty() => table.bind(page, trigger, Action::ShowToast { selector }),
                _ => log::debug!("binding: {SHOW_TOAST_ATTR} without a selector on {trigger:?}"),
            }
        }

        if let Some(toggle) = page.element_by_id(&config.theme_toggle_id) {
            table.bind(page, toggle, Action::ToggleTheme);
        }

        let mut copy_controls = page.query_all(COPY_CODE_SELECTOR);
        copy_controls.extend(page.query_all(COPY_TOKEN_SELECTOR));
        copy_controls.extend(page.element_by_id(COPY_COLOR_TOKENS_ID));
        for control in copy_controls {
            if let Some(source) = CopySource::for_control(page, &control) {
                table.bind(page, control, Action::Copy(source));
            }
        }

        for link in page.query_all(&config.nav_link_selector) {
            if let Some(href) = page.attribute(&link, "href")
                && let Some(id) = href.strip_prefix('#')
            {
                let id = id.to_owned();
                table.bind(page, link, Action::ScrollTo { id });
            }
        }

        log::debug!("binding: {} triggers bound", table.bindings.len());
        table
    }

    fn bind<P: Page<Node = N>>(&mut self, page: &mut P, trigger: N, action: Action<N>) {
        let listener = page.listen(&trigger, EventKind::Click);
        self.bindings.push(Binding { trigger, action, listener });
    }

    /// The binding a click listener belongs to.
    #[must_use]
    pub fn action_for(&self, listener: ListenerId) -> Option<&Binding<N>> {
        self.bindings.iter().find(|binding| binding.listener == listener)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding<N>> {
        self.bindings.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
