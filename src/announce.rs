//! Polite live region for assistive technology.
//!
//! `announce` clears the region immediately and schedules the new text for
//! `delay_ms` later. Screen readers treat the second mutation as a change even
//! when the same message was announced before. A newer announcement cancels
//! the pending write of an older one (last write wins, no queue).

#[cfg(test)]
#[path = "announce_test.rs"]
mod announce_test;

use crate::consts::MIN_ANNOUNCE_DELAY_MS;
use crate::page::{Page, Task, TimerId};

/// Visually hidden but readable by assistive technology.
const REGION_STYLES: &[(&str, &str)] = &[
    ("position", "absolute"),
    ("width", "1px"),
    ("height", "1px"),
    ("margin", "-1px"),
    ("padding", "0"),
    ("overflow", "hidden"),
    ("clip", "rect(0 0 0 0)"),
    ("white-space", "nowrap"),
    ("border", "0"),
];

/// Page-wide live region.
#[derive(Debug, Clone)]
pub struct Announcer<N> {
    region: Option<N>,
    delay_ms: u32,
    pending: Option<TimerId>,
}

impl<N: Clone + PartialEq> Announcer<N> {
    /// Create the live region and append it to `<body>`.
    ///
    /// If the region cannot be created, the announcer is inert.
    pub fn install<P: Page<Node = N>>(page: &mut P, delay_ms: u32) -> Self {
        let region = page.create_element("div").and_then(|region| {
            let body = page.body()?;
            page.set_attribute(&region, "role", "status");
            page.set_attribute(&region, "aria-live", "polite");
            for (property, value) in REGION_STYLES {
                page.set_style(&region, property, value);
            }
            page.append_child(&body, &region);
            Some(region)
        });
        if region.is_none() {
            log::warn!("announcer: live region unavailable, announcements disabled");
        }
        Self { region, delay_ms: delay_ms.max(MIN_ANNOUNCE_DELAY_MS), pending: None }
    }

    /// An announcer without a region; every call is a no-op.
    #[must_use]
    pub fn detached(delay_ms: u32) -> Self {
        Self { region: None, delay_ms: delay_ms.max(MIN_ANNOUNCE_DELAY_MS), pending: None }
    }

    #[must_use]
    pub fn region(&self) -> Option<&N> {
        self.region.as_ref()
    }

    /// Whether a delayed write is still outstanding.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Clear the region now and write `message` after the delay.
    pub fn announce<P: Page<Node = N>>(&mut self, page: &mut P, message: &str) {
        let Some(region) = &self.region else {
            return;
        };
        page.set_text(region, "");
        if let Some(previous) = self.pending.take() {
            page.clear_timeout(previous);
        }
        self.pending = Some(page.set_timeout(self.delay_ms, Task::Announce { message: message.to_owned() }));
    }

    /// Timer expiry: write the message into the region.
    pub fn deliver<P: Page<Node = N>>(&mut self, page: &mut P, message: &str) {
        self.pending = None;
        if let Some(region) = &self.region {
            page.set_text(region, message);
        }
    }
}
