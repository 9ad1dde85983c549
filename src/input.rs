//! Input model: page events, key presses, and intersection entries.
//!
//! These are the values the host feeds into [`crate::behaviors::Behaviors`].
//! A `PageEvent` is one listener invocation; the listener handle identifies
//! which registration fired, so dispatch never has to sniff attributes.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::page::ListenerId;

/// DOM event types the behaviors listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyDown,
    MouseEnter,
    MouseLeave,
}

impl EventKind {
    /// The DOM event name, as passed to `addEventListener`.
    #[must_use]
    pub fn dom_name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::KeyDown => "keydown",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
        }
    }

    /// Whether the event propagates to ancestors.
    #[must_use]
    pub fn bubbles(self) -> bool {
        matches!(self, Self::Click | Self::KeyDown)
    }
}

/// A key press as reported by the browser.
///
/// `key` holds the `KeyboardEvent.key` value (e.g. `"Tab"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub shift: bool,
}

impl KeyInput {
    #[must_use]
    pub fn new(key: impl Into<String>, shift: bool) -> Self {
        Self { key: key.into(), shift }
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.key == "Escape"
    }

    #[must_use]
    pub fn is_tab(&self) -> bool {
        self.key == "Tab"
    }
}

/// One listener invocation.
#[derive(Debug, Clone)]
pub struct PageEvent<N> {
    /// Registration that fired.
    pub listener: ListenerId,
    pub kind: EventKind,
    /// Element the listener is attached to (`currentTarget`).
    pub current: N,
    /// Element the event originated from (`target`).
    pub target: N,
    /// Present for `KeyDown` events.
    pub key: Option<KeyInput>,
}

/// What the host should do with the native event after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    PassThrough,
    PreventDefault,
}

impl Outcome {
    /// Combine outcomes from several listeners on one event path.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        if self == Self::PreventDefault || other == Self::PreventDefault {
            Self::PreventDefault
        } else {
            Self::PassThrough
        }
    }
}

/// One entry of an intersection observer batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intersection<N> {
    pub target: N,
    pub is_intersecting: bool,
}
