//! In-memory page document: elements, focus, listeners, timers, storage.
//!
//! `DocStore` implements [`Page`] without a browser. It keeps a flat arena of
//! elements (attributes, own text, inline styles, parent/children links), a
//! manual millisecond clock with a timer queue, the listener registry, and
//! recorders for side effects a browser would perform out of band (intersection
//! observation, scrolling, clipboard writes). Tests build markup with
//! [`DocStore::append`] and drive it through `Behaviors`.
//!
//! Text is modeled per element rather than as separate text nodes, so
//! `inner_html` is the serialized text without markup.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use crate::input::EventKind;
use crate::page::{ListenerId, Page, Task, TimerId};
use crate::selector::{Selector, SelectorTarget};

/// Index of an element in the document arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
struct ElementData {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    styles: Vec<(String, String)>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
struct ListenerRecord {
    id: ListenerId,
    node: NodeId,
    kind: EventKind,
}

#[derive(Debug, Clone)]
struct ScheduledTask {
    id: TimerId,
    due_ms: u64,
    task: Task<NodeId>,
}

/// One `observe_intersections` registration.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverRecord {
    pub targets: Vec<NodeId>,
    pub root_margin: String,
    pub threshold: f64,
}

/// A clipboard write waiting to be settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardRequest {
    pub text: String,
    pub source: NodeId,
}

/// In-memory document implementing [`Page`].
#[derive(Debug, Clone)]
pub struct DocStore {
    nodes: Vec<ElementData>,
    root: NodeId,
    body: NodeId,
    active: Option<NodeId>,
    storage: HashMap<String, String>,
    prefers_dark: bool,
    clipboard: Option<String>,
    clipboard_requests: Vec<ClipboardRequest>,
    listeners: Vec<ListenerRecord>,
    timers: Vec<ScheduledTask>,
    observers: Vec<ObserverRecord>,
    scrolled: Vec<NodeId>,
    now_ms: u64,
    next_handle: u64,
}

impl Default for DocStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocStore {
    /// A document containing `<html>` and an empty `<body>`.
    #[must_use]
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
            active: None,
            storage: HashMap::new(),
            prefers_dark: false,
            clipboard: None,
            clipboard_requests: Vec::new(),
            listeners: Vec::new(),
            timers: Vec::new(),
            observers: Vec::new(),
            scrolled: Vec::new(),
            now_ms: 0,
            next_handle: 1,
        };
        doc.root = doc.alloc("html");
        let body = doc.alloc("body");
        doc.attach(doc.root, body);
        doc.body = body;
        doc
    }

    // --- Building ---

    /// Append a new element under `parent` and return its id.
    pub fn append(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let node = self.alloc(tag);
        if let Some(data) = self.nodes.get_mut(node.0) {
            data.attrs = attrs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
        }
        self.attach(parent, node);
        node
    }

    /// Append a new element with text content.
    pub fn append_text(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)], text: &str) -> NodeId {
        let node = self.append(parent, tag, attrs);
        if let Some(data) = self.nodes.get_mut(node.0) {
            data.text = text.to_owned();
        }
        node
    }

    /// Remove `node` from its parent, leaving it disconnected.
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get(node.0).and_then(|data| data.parent) else {
            return;
        };
        if let Some(data) = self.nodes.get_mut(parent.0) {
            data.children.retain(|child| *child != node);
        }
        if let Some(data) = self.nodes.get_mut(node.0) {
            data.parent = None;
        }
    }

    pub fn set_prefers_dark(&mut self, prefers_dark: bool) {
        self.prefers_dark = prefers_dark;
    }

    // --- Inspection ---

    /// Inline style value for `property`.
    #[must_use]
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes
            .get(node.0)?
            .styles
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.as_str())
    }

    /// Last text successfully written to the clipboard.
    #[must_use]
    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    /// Record a clipboard write as completed.
    pub fn set_clipboard(&mut self, text: String) {
        self.clipboard = Some(text);
    }

    /// Drain clipboard writes started since the last call.
    pub fn take_clipboard_requests(&mut self) -> Vec<ClipboardRequest> {
        std::mem::take(&mut self.clipboard_requests)
    }

    #[must_use]
    pub fn observers(&self) -> &[ObserverRecord] {
        &self.observers
    }

    /// Elements passed to `scroll_into_view`, oldest first.
    #[must_use]
    pub fn scrolled(&self) -> &[NodeId] {
        &self.scrolled
    }

    /// Listener handles on `node` for `kind`, in registration order.
    #[must_use]
    pub fn listeners_on(&self, node: NodeId, kind: EventKind) -> Vec<ListenerId> {
        self.listeners
            .iter()
            .filter(|record| record.node == node && record.kind == kind)
            .map(|record| record.id)
            .collect()
    }

    #[must_use]
    pub fn listener_count(&self, node: NodeId, kind: EventKind) -> usize {
        self.listeners_on(node, kind).len()
    }

    #[must_use]
    pub fn is_listening(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|record| record.id == id)
    }

    /// `node` followed by its ancestors up to the root: the bubbling path.
    #[must_use]
    pub fn event_path(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = vec![node];
        let mut cursor = self.parent(node);
        while let Some(parent) = cursor {
            path.push(parent);
            cursor = self.parent(parent);
        }
        path
    }

    // --- Clock ---

    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Remove and return the earliest task due at or before `until_ms`,
    /// advancing the clock to its due time. Ties run in scheduling order.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Task<NodeId>> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due_ms <= until_ms)
            .min_by_key(|(_, timer)| (timer.due_ms, timer.id))
            .map(|(index, _)| index)?;
        let timer = self.timers.remove(index);
        self.now_ms = self.now_ms.max(timer.due_ms);
        Some(timer.task)
    }

    /// Move the clock forward without running anything.
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    // --- Internals ---

    fn alloc(&mut self, tag: &str) -> NodeId {
        self.nodes.push(ElementData { tag: tag.to_ascii_lowercase(), ..ElementData::default() });
        NodeId(self.nodes.len() - 1)
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        if let Some(data) = self.nodes.get_mut(parent.0) {
            data.children.push(child);
        }
        if let Some(data) = self.nodes.get_mut(child.0) {
            data.parent = Some(parent);
        }
    }

    fn next_handle(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|data| data.children.as_slice())
            .unwrap_or_default()
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(node.0)?
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn collect_descendants(&self, node: NodeId, out: &mut Vec<NodeId>) {
        for child in self.children(node) {
            out.push(*child);
            self.collect_descendants(*child, out);
        }
    }

    /// `root` and every element below it, in document order.
    fn document_order(&self) -> Vec<NodeId> {
        let mut all = vec![self.root];
        self.collect_descendants(self.root, &mut all);
        all
    }

    fn matching(&self, candidates: Vec<NodeId>, selector: &str) -> Vec<NodeId> {
        let Some(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        candidates.into_iter().filter(|node| selector.matches(self, *node)).collect()
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        if let Some(data) = self.nodes.get(node.0) {
            out.push_str(&data.text);
            for child in &data.children {
                self.collect_text(*child, out);
            }
        }
    }

    fn update_class_list(&mut self, node: NodeId, class: &str, on: bool) {
        let existing = self.attr(node, "class").unwrap_or("");
        let mut classes: Vec<String> = existing
            .split_whitespace()
            .filter(|c| *c != class)
            .map(str::to_owned)
            .collect();
        if on {
            classes.push(class.to_owned());
        }
        self.set_attribute(&node, "class", &classes.join(" "));
    }

    fn clear_children(&mut self, node: NodeId) {
        let children = self.children(node).to_vec();
        for child in children {
            self.detach(child);
        }
    }
}

impl SelectorTarget for DocStore {
    type Id = NodeId;

    fn tag_of(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id.0).map(|data| data.tag.as_str())
    }

    fn attr_of(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attr(id, name)
    }

    fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id)
    }
}

impl Page for DocStore {
    type Node = NodeId;

    fn root(&self) -> Option<NodeId> {
        Some(self.root)
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn query(&self, selector: &str) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.matching(self.document_order(), selector)
    }

    fn query_in(&self, scope: &NodeId, selector: &str) -> Option<NodeId> {
        self.matching(self.descendants(scope), selector).into_iter().next()
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.document_order()
            .into_iter()
            .find(|node| self.attr(*node, "id") == Some(id))
    }

    fn descendants(&self, node: &NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(*node, &mut out);
        out
    }

    fn closest(&self, node: &NodeId, selector: &str) -> Option<NodeId> {
        let selector = Selector::parse(selector)?;
        self.event_path(*node)
            .into_iter()
            .find(|candidate| selector.matches(self, *candidate))
    }

    fn previous_sibling(&self, node: &NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(*node)?);
        let index = siblings.iter().position(|child| child == node)?;
        index.checked_sub(1).and_then(|prev| siblings.get(prev).copied())
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        self.event_path(*node).last() == Some(&self.root)
    }

    fn tag_name(&self, node: &NodeId) -> String {
        self.nodes.get(node.0).map(|data| data.tag.clone()).unwrap_or_default()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.attr(*node, name).map(str::to_owned)
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.attr(*node, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    fn text(&self, node: &NodeId) -> String {
        let mut out = String::new();
        self.collect_text(*node, &mut out);
        out
    }

    fn inner_html(&self, node: &NodeId) -> String {
        self.text(node)
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        let Some(data) = self.nodes.get_mut(node.0) else {
            return;
        };
        if let Some(entry) = data.attrs.iter_mut().find(|(k, _)| k == name) {
            entry.1 = value.to_owned();
        } else {
            data.attrs.push((name.to_owned(), value.to_owned()));
        }
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) {
        if let Some(data) = self.nodes.get_mut(node.0) {
            data.attrs.retain(|(k, _)| k != name);
        }
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        self.update_class_list(*node, class, true);
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) {
        self.update_class_list(*node, class, false);
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        self.clear_children(*node);
        if let Some(data) = self.nodes.get_mut(node.0) {
            data.text = text.to_owned();
        }
    }

    fn set_inner_html(&mut self, node: &NodeId, html: &str) {
        self.set_text(node, html);
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) {
        let Some(data) = self.nodes.get_mut(node.0) else {
            return;
        };
        if let Some(entry) = data.styles.iter_mut().find(|(k, _)| k == property) {
            entry.1 = value.to_owned();
        } else {
            data.styles.push((property.to_owned(), value.to_owned()));
        }
    }

    fn create_element(&mut self, tag: &str) -> Option<NodeId> {
        Some(self.alloc(tag))
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        self.attach(*parent, *child);
    }

    fn active_element(&self) -> Option<NodeId> {
        match self.active {
            Some(node) if self.is_connected(&node) => Some(node),
            _ => Some(self.body),
        }
    }

    fn focus(&mut self, node: &NodeId) {
        if self.is_connected(node) {
            self.active = Some(*node);
        }
    }

    fn scroll_into_view(&mut self, node: &NodeId) {
        self.scrolled.push(*node);
    }

    fn listen(&mut self, node: &NodeId, kind: EventKind) -> ListenerId {
        let id = ListenerId(self.next_handle());
        self.listeners.push(ListenerRecord { id, node: *node, kind });
        id
    }

    fn unlisten(&mut self, id: ListenerId) {
        self.listeners.retain(|record| record.id != id);
    }

    fn set_timeout(&mut self, delay_ms: u32, task: Task<NodeId>) -> TimerId {
        let id = TimerId(self.next_handle());
        let due_ms = self.now_ms + u64::from(delay_ms);
        self.timers.push(ScheduledTask { id, due_ms, task });
        id
    }

    fn clear_timeout(&mut self, id: TimerId) {
        self.timers.retain(|timer| timer.id != id);
    }

    fn observe_intersections(&mut self, targets: &[NodeId], root_margin: &str, threshold: f64) {
        self.observers.push(ObserverRecord {
            targets: targets.to_vec(),
            root_margin: root_margin.to_owned(),
            threshold,
        });
    }

    fn storage_get(&self, key: &str) -> Option<String> {
        self.storage.get(key).cloned()
    }

    fn storage_set(&mut self, key: &str, value: &str) {
        self.storage.insert(key.to_owned(), value.to_owned());
    }

    fn prefers_dark(&self) -> bool {
        self.prefers_dark
    }

    fn write_clipboard(&mut self, text: String, source: &NodeId) {
        self.clipboard_requests.push(ClipboardRequest { text, source: *source });
    }
}
