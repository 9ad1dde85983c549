//! Runtime configuration for the page behaviors.
//!
//! Every field has a default matching the guide's markup, so an empty JSON
//! object (or no configuration at all) yields the stock behavior. Pages that
//! rename classes or want different timings pass a JSON object to
//! `start_with_config`.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::error::UiError;

/// Tunable delays, storage key, and selectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub announce_delay_ms: u32,
    pub toast_duration_ms: u32,
    pub toast_message: String,
    pub copy_flash_ms: u32,
    pub card_stagger_ms: u32,
    pub scrollspy_root_margin: String,
    pub scrollspy_threshold: f64,
    pub theme_storage_key: String,
    pub theme_toggle_id: String,
    pub nav_link_selector: String,
    pub section_selector: String,
    pub card_selector: String,
    pub button_selector: String,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            announce_delay_ms: consts::ANNOUNCE_DELAY_MS,
            toast_duration_ms: consts::TOAST_DURATION_MS,
            toast_message: consts::TOAST_MESSAGE.to_owned(),
            copy_flash_ms: consts::COPY_FLASH_MS,
            card_stagger_ms: consts::CARD_STAGGER_MS,
            scrollspy_root_margin: consts::SCROLLSPY_ROOT_MARGIN.to_owned(),
            scrollspy_threshold: consts::SCROLLSPY_THRESHOLD,
            theme_storage_key: consts::THEME_STORAGE_KEY.to_owned(),
            theme_toggle_id: consts::THEME_TOGGLE_ID.to_owned(),
            nav_link_selector: consts::NAV_LINK_SELECTOR.to_owned(),
            section_selector: consts::SECTION_SELECTOR.to_owned(),
            card_selector: consts::CARD_SELECTOR.to_owned(),
            button_selector: consts::BUTTON_SELECTOR.to_owned(),
        }
    }
}

impl BehaviorConfig {
    /// Parse a configuration object; absent fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `UiError::Config` if `raw` is not a JSON object of the expected shape.
    pub fn from_json(raw: &str) -> Result<Self, UiError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Announcement delay, never below [`consts::MIN_ANNOUNCE_DELAY_MS`].
    #[must_use]
    pub fn announce_delay(&self) -> u32 {
        self.announce_delay_ms.max(consts::MIN_ANNOUNCE_DELAY_MS)
    }
}
