//! The page seam: every DOM, timer, storage, and clipboard operation the
//! behaviors perform.
//!
//! Two implementations exist. [`crate::doc::DocStore`] is an in-memory
//! document with a manual clock, used by tests and native builds. The
//! `web::BrowserPage` binding (feature `hydrate`) forwards to `web-sys`.
//!
//! Node handles are opaque and compared by identity. Every operation is
//! infallible from the caller's point of view: a missing element, a rejected
//! browser call, or an invalid selector degrades to "nothing found" or a
//! no-op, and the binding decides what to log.

use std::fmt;

use crate::input::EventKind;

/// Handle for an installed event listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Handle for a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Work scheduled to run when a timer expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task<N> {
    /// Write `message` into the live region (second half of an announcement).
    Announce { message: String },
    /// Hide a toast whose display duration elapsed.
    HideToast { toast: N },
    /// Restore a copy control after its "Copied!" flash.
    RestoreFlash { control: N },
    /// Fade a card in.
    RevealCard { card: N },
}

/// DOM and environment operations used by the behaviors.
pub trait Page {
    /// Opaque element handle.
    type Node: Clone + PartialEq + fmt::Debug;

    // --- Queries ---

    /// The document element (`<html>`).
    fn root(&self) -> Option<Self::Node>;

    /// The `<body>` element.
    fn body(&self) -> Option<Self::Node>;

    /// First element in document order matching `selector`.
    fn query(&self, selector: &str) -> Option<Self::Node>;

    /// All elements matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Node>;

    /// First descendant of `scope` matching `selector`.
    fn query_in(&self, scope: &Self::Node, selector: &str) -> Option<Self::Node>;

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Every descendant element of `node`, in document order, excluding `node`.
    fn descendants(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// `node` or its nearest ancestor matching `selector`.
    fn closest(&self, node: &Self::Node, selector: &str) -> Option<Self::Node>;

    /// The element sibling immediately before `node`.
    fn previous_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Whether `node` is still attached to the document.
    fn is_connected(&self, node: &Self::Node) -> bool;

    /// Lowercase tag name.
    fn tag_name(&self, node: &Self::Node) -> String;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn has_attribute(&self, node: &Self::Node, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Text content of `node` and its descendants.
    fn text(&self, node: &Self::Node) -> String;

    fn inner_html(&self, node: &Self::Node) -> String;

    // --- Mutations ---

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    fn remove_attribute(&mut self, node: &Self::Node, name: &str);

    fn add_class(&mut self, node: &Self::Node, class: &str);

    fn remove_class(&mut self, node: &Self::Node, class: &str);

    /// Add or remove `class` depending on `on`.
    fn set_class(&mut self, node: &Self::Node, class: &str, on: bool) {
        if on {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    fn set_text(&mut self, node: &Self::Node, text: &str);

    fn set_inner_html(&mut self, node: &Self::Node, html: &str);

    /// Set one inline style property (CSS property name, e.g. `box-shadow`).
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str);

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> Option<Self::Node>;

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);

    // --- Focus and scrolling ---

    /// The focused element, or `<body>` when nothing is.
    fn active_element(&self) -> Option<Self::Node>;

    fn focus(&mut self, node: &Self::Node);

    /// Smoothly scroll `node` to the top of the viewport.
    fn scroll_into_view(&mut self, node: &Self::Node);

    // --- Listeners ---

    fn listen(&mut self, node: &Self::Node, kind: EventKind) -> ListenerId;

    /// Remove a listener. Unknown handles are ignored.
    fn unlisten(&mut self, id: ListenerId);

    // --- Timers ---

    fn set_timeout(&mut self, delay_ms: u32, task: Task<Self::Node>) -> TimerId;

    /// Cancel a pending timer. Expired or unknown handles are ignored.
    fn clear_timeout(&mut self, id: TimerId);

    // --- Intersection observer ---

    /// Watch `targets`; batches are delivered to `Behaviors::on_intersections`.
    fn observe_intersections(&mut self, targets: &[Self::Node], root_margin: &str, threshold: f64);

    // --- Environment ---

    fn storage_get(&self, key: &str) -> Option<String>;

    fn storage_set(&mut self, key: &str, value: &str);

    /// Whether the system color scheme preference is dark.
    fn prefers_dark(&self) -> bool;

    /// Start an asynchronous clipboard write on behalf of `source`.
    ///
    /// Success is reported through `Behaviors::on_copied`; failure is dropped.
    fn write_clipboard(&mut self, text: String, source: &Self::Node);
}
