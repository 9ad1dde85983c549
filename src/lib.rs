//! Page behavior layer for the Puffin Guide documentation site.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It wires the
//! static guide markup to a handful of behaviors: a persisted light/dark theme,
//! copy-to-clipboard controls, a focus-trapped modal dialog, toast
//! notifications, scrollspy highlighting for the sidebar, and a few decorative
//! effects. All DOM access goes through the [`page::Page`] trait so the logic
//! runs unchanged against the in-memory [`doc::DocStore`] in tests.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`behaviors`] | Top-level [`behaviors::Behaviors`] owning every controller and the page |
//! | [`page`] | The DOM/timer/storage seam and scheduled [`page::Task`]s |
//! | [`doc`] | In-memory page document used by tests and native builds |
//! | [`selector`] | CSS selector subset understood by [`doc::DocStore`] |
//! | [`input`] | Page events, key input, intersection entries |
//! | [`binding`] | Declarative trigger → action table built at startup |
//! | [`focus`] | Focusable-set resolution for dialogs |
//! | [`modal`] | Modal dialog state machine and focus trap |
//! | [`scrollspy`] | Sidebar highlighting and fragment scrolling |
//! | [`announce`] | Polite live region for assistive technology |
//! | [`theme`] | Light/dark preference |
//! | [`clipboard`] | Copy sources and the "Copied!" flash |
//! | [`toast`] | Transient notifications with debounced hide |
//! | [`effects`] | Hover lift, card fade-in, color transitions |
//! | [`config`] | Serde-backed runtime configuration |
//! | [`consts`] | Shared constants (delays, class names, selectors) |
//! | `web` | `web-sys` page binding and wasm entry points (`hydrate` feature) |

pub mod announce;
pub mod behaviors;
pub mod binding;
pub mod clipboard;
pub mod config;
pub mod consts;
pub mod doc;
pub mod effects;
pub mod error;
pub mod focus;
pub mod input;
pub mod modal;
pub mod page;
pub mod scrollspy;
pub mod selector;
pub mod theme;
pub mod toast;
#[cfg(feature = "hydrate")]
pub mod web;
