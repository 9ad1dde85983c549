use super::*;
use crate::doc::{DocStore, NodeId};

fn run_due(doc: &mut DocStore, announcer: &mut Announcer<NodeId>, until_ms: u64) {
    while let Some(task) = doc.pop_due(until_ms) {
        if let Task::Announce { message } = task {
            announcer.deliver(doc, &message);
        }
    }
    doc.set_now(until_ms);
}

fn region_text(doc: &DocStore, announcer: &Announcer<NodeId>) -> String {
    doc.text(announcer.region().expect("region installed"))
}

#[test]
fn install_appends_hidden_status_region_to_body() {
    let mut doc = DocStore::new();
    let announcer = Announcer::install(&mut doc, 50);
    let region = *announcer.region().expect("region installed");
    assert!(doc.is_connected(&region));
    assert_eq!(doc.attribute(&region, "role").as_deref(), Some("status"));
    assert_eq!(doc.attribute(&region, "aria-live").as_deref(), Some("polite"));
    assert_eq!(doc.style(region, "clip"), Some("rect(0 0 0 0)"));
    assert_eq!(doc.style(region, "width"), Some("1px"));
}

#[test]
fn announce_clears_then_sets_after_delay() {
    let mut doc = DocStore::new();
    let mut announcer = Announcer::install(&mut doc, 50);
    announcer.announce(&mut doc, "Opened");
    run_due(&mut doc, &mut announcer, 60);

    announcer.announce(&mut doc, "Copied to clipboard");
    assert_eq!(region_text(&doc, &announcer), "");
    assert!(announcer.is_pending());

    run_due(&mut doc, &mut announcer, 100);
    assert_eq!(region_text(&doc, &announcer), "");

    run_due(&mut doc, &mut announcer, 110);
    assert_eq!(region_text(&doc, &announcer), "Copied to clipboard");
    assert!(!announcer.is_pending());
}

#[test]
fn double_fire_ends_with_message_not_empty() {
    let mut doc = DocStore::new();
    let mut announcer = Announcer::install(&mut doc, 50);
    announcer.announce(&mut doc, "Saved");
    run_due(&mut doc, &mut announcer, 10);
    announcer.announce(&mut doc, "Saved");
    run_due(&mut doc, &mut announcer, 1_000);
    assert_eq!(region_text(&doc, &announcer), "Saved");
    assert_eq!(doc.pending_timers(), 0);
}

#[test]
fn newer_announcement_supersedes_pending_one() {
    let mut doc = DocStore::new();
    let mut announcer = Announcer::install(&mut doc, 50);
    announcer.announce(&mut doc, "First");
    announcer.announce(&mut doc, "Second");
    assert_eq!(doc.pending_timers(), 1);
    run_due(&mut doc, &mut announcer, 1_000);
    assert_eq!(region_text(&doc, &announcer), "Second");
}

#[test]
fn zero_delay_is_raised_to_minimum() {
    let mut doc = DocStore::new();
    let mut announcer = Announcer::install(&mut doc, 0);
    announcer.announce(&mut doc, "Hi");
    run_due(&mut doc, &mut announcer, 0);
    assert_eq!(region_text(&doc, &announcer), "");
    run_due(&mut doc, &mut announcer, 1);
    assert_eq!(region_text(&doc, &announcer), "Hi");
}

#[test]
fn detached_announcer_is_silent() {
    let mut doc = DocStore::new();
    let mut announcer: Announcer<NodeId> = Announcer::detached(50);
    announcer.announce(&mut doc, "Nobody hears this");
    assert_eq!(doc.pending_timers(), 0);
    announcer.deliver(&mut doc, "Nor this");
    assert!(announcer.region().is_none());
}
