//! Light/dark theme preference.
//!
//! The theme is a `data-theme` attribute on the `<html>` element. At startup a
//! stored preference wins, then the system color scheme, then light. Toggling
//! flips the theme, reapplies it and writes it back to storage. The toggle
//! button mirrors the state: its label names the theme it switches to and
//! `aria-pressed` reports whether dark mode is on.
//!
//! TRADE-OFFS
//! ==========
//! Storage is best-effort. A page without storage still toggles, it just
//! forgets the choice on reload.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use serde::{Deserialize, Serialize};

use crate::config::BehaviorConfig;
use crate::consts::THEME_ATTR;
use crate::page::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Attribute and storage value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse a stored value. Unknown values yield `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    /// Toggle button content while this theme is active.
    #[must_use]
    pub fn button_label(self) -> &'static str {
        match self {
            Self::Light => "🌙 Dark Mode",
            Self::Dark => "☀️ Light Mode",
        }
    }

    /// Toggle button `aria-label` while this theme is active.
    #[must_use]
    pub fn button_aria_label(self) -> &'static str {
        match self {
            Self::Light => "Switch to dark mode",
            Self::Dark => "Switch to light mode",
        }
    }
}

/// Startup preference: stored value, then system scheme, then light.
pub fn read_preference<P: Page>(page: &P, storage_key: &str) -> Theme {
    if let Some(stored) = page.storage_get(storage_key) {
        match Theme::parse(&stored) {
            Some(theme) => return theme,
            None => log::debug!("theme: ignoring stored value {stored:?}"),
        }
    }
    if page.prefers_dark() { Theme::Dark } else { Theme::Light }
}

/// Current theme plus the toggle button it keeps in sync.
#[derive(Debug, Clone)]
pub struct ThemeController<N> {
    current: Theme,
    toggle: Option<N>,
    storage_key: String,
}

impl<N: Clone> ThemeController<N> {
    /// Resolve the startup theme and apply it.
    pub fn init<P: Page<Node = N>>(page: &mut P, config: &BehaviorConfig) -> Self {
        let toggle = page.element_by_id(&config.theme_toggle_id);
        if toggle.is_none() {
            log::debug!("theme: no #{} button", config.theme_toggle_id);
        }
        let controller = Self {
            current: read_preference(page, &config.theme_storage_key),
            toggle,
            storage_key: config.theme_storage_key.clone(),
        };
        controller.apply(page);
        controller
    }

    #[must_use]
    pub fn current(&self) -> Theme {
        self.current
    }

    /// The `#themeToggle` button, when present.
    #[must_use]
    pub fn toggle_button(&self) -> Option<&N> {
        self.toggle.as_ref()
    }

    /// Write the current theme to the root element and the toggle button.
    pub fn apply<P: Page<Node = N>>(&self, page: &mut P) {
        if let Some(root) = page.root() {
            page.set_attribute(&root, THEME_ATTR, self.current.as_str());
        }
        if let Some(button) = &self.toggle {
            page.set_inner_html(button, self.current.button_label());
            page.set_attribute(button, "aria-pressed", if self.current.is_dark() { "true" } else { "false" });
            page.set_attribute(button, "aria-label", self.current.button_aria_label());
        }
    }

    /// Flip, apply and persist. Returns the new theme.
    pub fn toggle<P: Page<Node = N>>(&mut self, page: &mut P) -> Theme {
        self.current = self.current.toggled();
        self.apply(page);
        page.storage_set(&self.storage_key, self.current.as_str());
        log::debug!("theme: switched to {}", self.current.as_str());
        self.current
    }
}
