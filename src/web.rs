//! Browser binding: [`Page`] over `web-sys` plus the wasm entry points.
//!
//! `Behaviors<BrowserPage>` lives in an `Rc<RefCell<_>>` held by a
//! thread-local. Every callback handed to the browser (event listeners,
//! timeouts, the intersection observer, clipboard futures) holds a `Weak` to
//! it and re-enters through `dispatch`, `run_timer`, `on_intersections` or
//! `on_copied`.
//!
//! A callback may remove its own registration (Escape removes the key
//! listener that is running). Removed closures and fired timeouts are parked
//! in `retired` and only dropped at the start of the next callback.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, Element, Event, HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    KeyboardEvent, NodeList, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Storage, Window,
};

use crate::behaviors::Behaviors;
use crate::config::BehaviorConfig;
use crate::error::UiError;
use crate::input::{EventKind, Intersection, KeyInput, Outcome, PageEvent};
use crate::page::{ListenerId, Page, Task, TimerId};

type Shared = Rc<RefCell<Behaviors<BrowserPage>>>;
type Host = Weak<RefCell<Behaviors<BrowserPage>>>;

thread_local! {
    static APP: RefCell<Option<Shared>> = const { RefCell::new(None) };
}

// =============================================================
// Entry points
// =============================================================

/// Wire the page with the default configuration.
#[wasm_bindgen]
pub fn start() {
    install_logging();
    boot(BehaviorConfig::default());
}

/// Wire the page with a JSON configuration object. Invalid JSON falls back
/// to the defaults.
#[wasm_bindgen]
pub fn start_with_config(json: &str) {
    install_logging();
    let config = match BehaviorConfig::from_json(json) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("web: {err}, using defaults");
            BehaviorConfig::default()
        }
    };
    boot(config);
}

fn install_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        log::debug!("web: logger already installed");
    }
}

/// Mount now if the document is parsed, otherwise on `DOMContentLoaded`.
fn boot(config: BehaviorConfig) {
    let Some(window) = web_sys::window() else {
        log::warn!("web: {}", UiError::MissingWindow);
        return;
    };
    let Some(document) = window.document() else {
        log::warn!("web: {}", UiError::MissingDocument);
        return;
    };

    let loading = js_sys::Reflect::get(&document, &JsValue::from_str("readyState"))
        .is_ok_and(|state| state.as_string().as_deref() == Some("loading"));
    if !loading {
        mount(window, document, config);
        return;
    }

    let target = document.clone();
    let on_ready = Closure::once_into_js(move || mount(window, document, config));
    report(
        "DOMContentLoaded listener",
        target.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref()),
    );
}

fn mount(window: Window, document: Document, config: BehaviorConfig) {
    APP.with(|app| {
        if app.borrow().is_some() {
            log::debug!("web: already started");
            return;
        }
        let behaviors: Shared = Rc::new_cyclic(|host: &Host| {
            RefCell::new(Behaviors::init(BrowserPage::new(window, document, host.clone()), config))
        });
        *app.borrow_mut() = Some(behaviors);
    });
}

/// Run `f` against the live behaviors, if they still exist and are not busy.
fn with_host(host: &Host, f: impl FnOnce(&mut Behaviors<BrowserPage>)) {
    let Some(shared) = host.upgrade() else {
        return;
    };
    let Ok(mut behaviors) = shared.try_borrow_mut() else {
        log::debug!("web: behaviors busy, callback dropped");
        return;
    };
    behaviors.page_mut().release_retired();
    f(&mut behaviors);
}

/// Log a failed browser call and turn it into `None`.
fn report<T>(what: &str, result: Result<T, JsValue>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("web: {what} failed: {}", UiError::from(err));
            None
        }
    }
}

fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|index| list.get(index))
        .filter_map(|node| node.dyn_ref::<Element>().cloned())
        .collect()
}

// =============================================================
// BrowserPage
// =============================================================

struct Listener {
    target: Element,
    kind: EventKind,
    callback: Closure<dyn FnMut(Event)>,
}

struct PendingTimer {
    handle: Timeout,
    task: Task<Element>,
}

#[derive(Default)]
struct Retired {
    listeners: Vec<Closure<dyn FnMut(Event)>>,
    timers: Vec<Timeout>,
}

/// The live document behind [`Page`].
pub struct BrowserPage {
    window: Window,
    document: Document,
    host: Host,
    listeners: HashMap<ListenerId, Listener>,
    timers: HashMap<TimerId, PendingTimer>,
    retired: Retired,
    next_handle: u64,
}

impl BrowserPage {
    fn new(window: Window, document: Document, host: Host) -> Self {
        Self {
            window,
            document,
            host,
            listeners: HashMap::new(),
            timers: HashMap::new(),
            retired: Retired::default(),
            next_handle: 1,
        }
    }

    fn next_handle(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    fn release_retired(&mut self) {
        self.retired.listeners.clear();
        self.retired.timers.clear();
    }

    /// Timeout callback: claim the task for `id` unless it was cancelled.
    fn fire(&mut self, id: TimerId) -> Option<Task<Element>> {
        let timer = self.timers.remove(&id)?;
        self.retired.timers.push(timer.handle);
        Some(timer.task)
    }

    fn storage(&self) -> Option<Storage> {
        report("localStorage", self.window.local_storage()).flatten()
    }
}

impl Page for BrowserPage {
    type Node = Element;

    fn root(&self) -> Option<Element> {
        self.document.document_element()
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Into::into)
    }

    fn query(&self, selector: &str) -> Option<Element> {
        report("querySelector", self.document.query_selector(selector)).flatten()
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        report("querySelectorAll", self.document.query_selector_all(selector))
            .map(|list| elements(&list))
            .unwrap_or_default()
    }

    fn query_in(&self, scope: &Element, selector: &str) -> Option<Element> {
        report("querySelector", scope.query_selector(selector)).flatten()
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn descendants(&self, node: &Element) -> Vec<Element> {
        report("querySelectorAll", node.query_selector_all("*"))
            .map(|list| elements(&list))
            .unwrap_or_default()
    }

    fn closest(&self, node: &Element, selector: &str) -> Option<Element> {
        report("closest", node.closest(selector)).flatten()
    }

    fn previous_sibling(&self, node: &Element) -> Option<Element> {
        node.previous_element_sibling()
    }

    fn is_connected(&self, node: &Element) -> bool {
        node.is_connected()
    }

    fn tag_name(&self, node: &Element) -> String {
        node.tag_name().to_ascii_lowercase()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn has_attribute(&self, node: &Element, name: &str) -> bool {
        node.has_attribute(name)
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn inner_html(&self, node: &Element) -> String {
        node.inner_html()
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        report("setAttribute", node.set_attribute(name, value));
    }

    fn remove_attribute(&mut self, node: &Element, name: &str) {
        report("removeAttribute", node.remove_attribute(name));
    }

    fn add_class(&mut self, node: &Element, class: &str) {
        report("classList.add", node.class_list().add_1(class));
    }

    fn remove_class(&mut self, node: &Element, class: &str) {
        report("classList.remove", node.class_list().remove_1(class));
    }

    fn set_text(&mut self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn set_inner_html(&mut self, node: &Element, html: &str) {
        node.set_inner_html(html);
    }

    fn set_style(&mut self, node: &Element, property: &str, value: &str) {
        if let Some(element) = node.dyn_ref::<HtmlElement>() {
            report("style.setProperty", element.style().set_property(property, value));
        }
    }

    fn create_element(&mut self, tag: &str) -> Option<Element> {
        report("createElement", self.document.create_element(tag))
    }

    fn append_child(&mut self, parent: &Element, child: &Element) {
        report("appendChild", parent.append_child(child));
    }

    fn active_element(&self) -> Option<Element> {
        self.document.active_element().or_else(|| self.body())
    }

    fn focus(&mut self, node: &Element) {
        match node.dyn_ref::<HtmlElement>() {
            Some(element) => {
                report("focus", element.focus());
            }
            None => log::debug!("web: {} is not focusable", node.tag_name()),
        }
    }

    fn scroll_into_view(&mut self, node: &Element) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        node.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn listen(&mut self, node: &Element, kind: EventKind) -> ListenerId {
        let id = ListenerId(self.next_handle());
        let host = self.host.clone();
        let current = node.clone();
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(target) = event.target().and_then(|target| target.dyn_ref::<Element>().cloned()) else {
                return;
            };
            let key = event
                .dyn_ref::<KeyboardEvent>()
                .map(|key| KeyInput::new(key.key(), key.shift_key()));
            let page_event = PageEvent { listener: id, kind, current: current.clone(), target, key };
            with_host(&host, |behaviors| {
                if behaviors.dispatch(&page_event) == Outcome::PreventDefault {
                    event.prevent_default();
                }
            });
        });
        report(
            "addEventListener",
            node.add_event_listener_with_callback(kind.dom_name(), callback.as_ref().unchecked_ref()),
        );
        self.listeners.insert(id, Listener { target: node.clone(), kind, callback });
        id
    }

    fn unlisten(&mut self, id: ListenerId) {
        let Some(listener) = self.listeners.remove(&id) else {
            return;
        };
        report(
            "removeEventListener",
            listener
                .target
                .remove_event_listener_with_callback(listener.kind.dom_name(), listener.callback.as_ref().unchecked_ref()),
        );
        self.retired.listeners.push(listener.callback);
    }

    fn set_timeout(&mut self, delay_ms: u32, task: Task<Element>) -> TimerId {
        let id = TimerId(self.next_handle());
        let host = self.host.clone();
        let handle = Timeout::new(delay_ms, move || {
            with_host(&host, |behaviors| {
                if let Some(task) = behaviors.page_mut().fire(id) {
                    behaviors.run_timer(task);
                }
            });
        });
        self.timers.insert(id, PendingTimer { handle, task });
        id
    }

    fn clear_timeout(&mut self, id: TimerId) {
        // Dropping the handle cancels the browser timeout.
        self.timers.remove(&id);
    }

    fn observe_intersections(&mut self, targets: &[Element], root_margin: &str, threshold: f64) {
        let host = self.host.clone();
        let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
            let batch: Vec<Intersection<Element>> = entries
                .iter()
                .filter_map(|entry| {
                    entry.dyn_ref::<IntersectionObserverEntry>().map(|entry| Intersection {
                        target: entry.target(),
                        is_intersecting: entry.is_intersecting(),
                    })
                })
                .collect();
            with_host(&host, |behaviors| behaviors.on_intersections(&batch));
        });

        let options = IntersectionObserverInit::new();
        options.set_root_margin(root_margin);
        options.set_threshold(&JsValue::from_f64(threshold));
        let Some(observer) = report(
            "IntersectionObserver",
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options),
        ) else {
            return;
        };
        for target in targets {
            observer.observe(target);
        }
        // Observed targets keep the observer alive for the page's lifetime.
        callback.forget();
    }

    fn storage_get(&self, key: &str) -> Option<String> {
        report("localStorage.getItem", self.storage()?.get_item(key)).flatten()
    }

    fn storage_set(&mut self, key: &str, value: &str) {
        if let Some(storage) = self.storage() {
            report("localStorage.setItem", storage.set_item(key, value));
        }
    }

    fn prefers_dark(&self) -> bool {
        matches!(
            self.window.match_media("(prefers-color-scheme: dark)"),
            Ok(Some(query)) if query.matches()
        )
    }

    fn write_clipboard(&mut self, text: String, source: &Element) {
        let navigator = self.window.navigator();
        let clipboard = match js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard")) {
            Ok(value) if !value.is_undefined() => value.unchecked_into::<web_sys::Clipboard>(),
            _ => {
                log::debug!("copy: clipboard API unavailable");
                return;
            }
        };
        let promise = clipboard.write_text(&text);
        let host = self.host.clone();
        let source = source.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => with_host(&host, |behaviors| behaviors.on_copied(&source)),
                Err(err) => log::debug!("copy: clipboard write rejected: {}", UiError::from(err)),
            }
        });
    }
}
