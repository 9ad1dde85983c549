//! Focusable-set resolution.
//!
//! A focusable element is a link with an `href`, a button without
//! `disabled`, any `textarea`, `input`, or `select`, or any element carrying an
//! explicit non-negative `tabindex`. The set is returned in document order,
//! not tabindex order, and is never cached: callers resolve it again on every
//! Tab press because disabled and hidden state can change while a dialog is
//! open.

#[cfg(test)]
#[path = "focus_test.rs"]
mod focus_test;

use crate::page::Page;

/// Whether an element with this tag and attributes can take keyboard focus.
pub fn is_focusable(tag: &str, attribute: impl Fn(&str) -> Option<String>) -> bool {
    let by_tag = match tag {
        "a" => attribute("href").is_some(),
        "button" => attribute("disabled").is_none(),
        "textarea" | "input" | "select" => true,
        _ => false,
    };
    by_tag
        || attribute("tabindex").is_some_and(|raw| raw.trim().parse::<i32>().is_ok_and(|index| index >= 0))
}

/// Focusable descendants of `container`, in document order.
///
/// Returns an empty vector when nothing qualifies; the caller falls back to
/// focusing the container itself.
pub fn resolve<P: Page>(page: &P, container: &P::Node) -> Vec<P::Node> {
    page.descendants(container)
        .into_iter()
        .filter(|node| is_focusable(&page.tag_name(node), |name| page.attribute(node, name)))
        .collect()
}
