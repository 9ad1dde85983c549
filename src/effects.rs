//! Decorative effects: theme color transitions, button hover lift, card fade-in.

#[cfg(test)]
#[path = "effects_test.rs"]
mod effects_test;

use std::fmt;

use crate::config::BehaviorConfig;
use crate::consts::{
    CARD_HIDDEN_TRANSFORM, CARD_TRANSITION, COLOR_TRANSITION, HOVER_SHADOW, HOVER_TRANSFORM, REST_SHADOW,
    REST_TRANSFORM,
};
use crate::input::EventKind;
use crate::page::{ListenerId, Page, Task};

#[derive(Debug, Clone)]
struct HoverBinding<N> {
    button: N,
    enter: ListenerId,
    leave: ListenerId,
}

#[derive(Debug, Clone)]
pub struct Effects<N> {
    hovers: Vec<HoverBinding<N>>,
}

impl<N: Clone + PartialEq + fmt::Debug> Effects<N> {
    /// Install every effect on the current document.
    pub fn install<P: Page<Node = N>>(page: &mut P, config: &BehaviorConfig) -> Self {
        for element in page.query_all("*") {
            page.set_style(&element, "transition", COLOR_TRANSITION);
        }

        let buttons = page.query_all(&config.button_selector);
        let hovers = buttons
            .into_iter()
            .map(|button| {
                let enter = page.listen(&button, EventKind::MouseEnter);
                let leave = page.listen(&button, EventKind::MouseLeave);
                HoverBinding { button, enter, leave }
            })
            .collect();

        let mut delay_ms: u32 = 0;
        for card in page.query_all(&config.card_selector) {
            page.set_style(&card, "opacity", "0");
            page.set_style(&card, "transform", CARD_HIDDEN_TRANSFORM);
            page.set_timeout(delay_ms, Task::RevealCard { card });
            delay_ms = delay_ms.saturating_add(config.card_stagger_ms);
        }

        Self { hovers }
    }

    /// Mouse enter/leave on a `.btn`. Returns whether `listener` was a hover binding.
    pub fn on_hover<P: Page<Node = N>>(&self, page: &mut P, listener: ListenerId) -> bool {
        let Some(binding) = self.hovers.iter().find(|b| b.enter == listener || b.leave == listener) else {
            return false;
        };
        let (transform, shadow) = if binding.enter == listener {
            (HOVER_TRANSFORM, HOVER_SHADOW)
        } else {
            (REST_TRANSFORM, REST_SHADOW)
        };
        page.set_style(&binding.button, "transform", transform);
        page.set_style(&binding.button, "box-shadow", shadow);
        true
    }
}

/// Card timer expiry: fade in.
pub fn reveal<P: Page>(page: &mut P, card: &P::Node) {
    page.set_style(card, "transition", CARD_TRANSITION);
    page.set_style(card, "opacity", "1");
    page.set_style(card, "transform", REST_TRANSFORM);
}
