//! Scrollspy: mark the sidebar link of the section currently in view.
//!
//! Sections are watched through the page's intersection observer with a band
//! from 40% below the top to 50% above the bottom of the viewport. Each
//! intersecting entry activates the link whose `href` is `#` + the section id
//! and deactivates every other link, so the last intersecting entry of a batch
//! wins. When the section owning the active link leaves the band and nothing
//! replaces it, the marker falls back to the most recently entered section
//! that is still in the band, or is cleared.

#[cfg(test)]
#[path = "scrollspy_test.rs"]
mod scrollspy_test;

use std::fmt;

use crate::config::BehaviorConfig;
use crate::consts::ACTIVE_CLASS;
use crate::input::{Intersection, Outcome};
use crate::page::Page;

/// Observer state for one page.
#[derive(Debug, Clone)]
pub struct Scrollspy<N> {
    links: Vec<N>,
    sections: Vec<N>,
    /// Sections inside the band, oldest entry first.
    intersecting: Vec<N>,
    /// Section whose link currently carries the marker.
    current: Option<N>,
}

impl<N: Clone + PartialEq + fmt::Debug> Scrollspy<N> {
    /// Start observing sections. `None` when there are no sections or no links.
    pub fn install<P: Page<Node = N>>(page: &mut P, config: &BehaviorConfig) -> Option<Self> {
        let sections = page.query_all(&config.section_selector);
        let links = page.query_all(&config.nav_link_selector);
        if sections.is_empty() || links.is_empty() {
            log::debug!("scrollspy: {} sections, {} links, not observing", sections.len(), links.len());
            return None;
        }
        page.observe_intersections(&sections, &config.scrollspy_root_margin, config.scrollspy_threshold);
        Some(Self { links, sections, intersecting: Vec::new(), current: None })
    }

    #[must_use]
    pub fn links(&self) -> &[N] {
        &self.links
    }

    #[must_use]
    pub fn sections(&self) -> &[N] {
        &self.sections
    }

    /// Section whose link is marked active.
    #[must_use]
    pub fn current(&self) -> Option<&N> {
        self.current.as_ref()
    }

    /// Apply one observer batch, in entry order.
    pub fn on_intersections<P: Page<Node = N>>(&mut self, page: &mut P, entries: &[Intersection<N>]) {
        for entry in entries {
            self.intersecting.retain(|section| section != &entry.target);
            if entry.is_intersecting {
                self.intersecting.push(entry.target.clone());
                self.activate(page, &entry.target);
            }
        }

        let current_left = self
            .current
            .as_ref()
            .is_some_and(|section| !self.intersecting.contains(section));
        if current_left {
            match self.intersecting.last().cloned() {
                Some(fallback) => self.activate(page, &fallback),
                None => {
                    self.current = None;
                    self.mark(page, None);
                }
            }
        }
    }

    /// The link currently marked active, if any.
    pub fn active_link<P: Page<Node = N>>(&self, page: &P) -> Option<N> {
        self.links.iter().find(|link| page.has_class(link, ACTIVE_CLASS)).cloned()
    }

    fn activate<P: Page<Node = N>>(&mut self, page: &mut P, section: &N) {
        let href = page
            .attribute(section, "id")
            .filter(|id| !id.is_empty())
            .map(|id| format!("#{id}"));
        self.current = Some(section.clone());
        self.mark(page, href.as_deref());
    }

    /// Put the marker on the first link with `href`, remove it everywhere else.
    fn mark<P: Page<Node = N>>(&self, page: &mut P, href: Option<&str>) {
        let mut marked = false;
        for link in &self.links {
            let matches = !marked && href.is_some() && page.attribute(link, "href").as_deref() == href;
            marked |= matches;
            page.set_class(link, ACTIVE_CLASS, matches);
        }
    }
}

/// Sidebar link click: smooth-scroll to the fragment target.
///
/// In-page links never navigate; a fragment with no matching element is
/// ignored.
pub fn scroll_to_fragment<P: Page>(page: &mut P, id: &str) -> Outcome {
    match page.element_by_id(id) {
        Some(target) => page.scroll_into_view(&target),
        None => log::debug!("scrollspy: no section with id {id:?}"),
    }
    Outcome::PreventDefault
}
