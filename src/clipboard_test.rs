use super::*;
use crate::doc::{ClipboardRequest, DocStore, NodeId};

fn body(doc: &DocStore) -> NodeId {
    doc.body().expect("body exists")
}

fn run_restores(doc: &mut DocStore, flash: &mut CopyFlash<NodeId>, until_ms: u64) {
    while let Some(task) = doc.pop_due(until_ms) {
        if let Task::RestoreFlash { control } = task {
            flash.restore(doc, &control);
        }
    }
    doc.set_now(until_ms);
}

// =============================================================
// CopySource
// =============================================================

#[test]
fn classifies_controls_by_markup() {
    let mut doc = DocStore::new();
    let b = body(&doc);
    let previous = doc.append(b, "button", &[("class", "copy-code"), ("data-target", "previous")]);
    let targeted = doc.append(b, "button", &[("class", "copy-code"), ("data-target", "#snippet")]);
    let untargeted = doc.append(b, "button", &[("class", "copy-code")]);
    let token = doc.append(b, "button", &[("class", "copy-token"), ("data-value", "#1F4E79")]);
    let empty_token = doc.append(b, "button", &[("class", "copy-token"), ("data-value", "")]);
    let colors = doc.append(b, "button", &[("id", "copyColorTokens")]);

    assert_eq!(CopySource::for_control(&doc, &previous), Some(CopySource::PreviousCode));
    assert_eq!(CopySource::for_control(&doc, &targeted), Some(CopySource::Target("#snippet".to_owned())));
    assert_eq!(CopySource::for_control(&doc, &untargeted), None);
    assert_eq!(CopySource::for_control(&doc, &token), Some(CopySource::Value("#1F4E79".to_owned())));
    assert_eq!(CopySource::for_control(&doc, &empty_token), None);
    assert_eq!(CopySource::for_control(&doc, &colors), Some(CopySource::ColorTokens));
}

#[test]
fn previous_code_reads_sibling_code_trimmed() {
    let mut doc = DocStore::new();
    let b = body(&doc);
    let pre = doc.append(b, "pre", &[]);
    doc.append_text(pre, "code", &[], "  cargo build\n");
    let button = doc.append(b, "button", &[("class", "copy-code"), ("data-target", "previous")]);
    assert_eq!(CopySource::PreviousCode.text(&doc, &button).as_deref(), Some("cargo build"));
}

#[test]
fn previous_code_without_sibling_is_none() {
    let mut doc = DocStore::new();
    let b = body(&doc);
    let button = doc.append(b, "button", &[]);
    assert_eq!(CopySource::PreviousCode.text(&doc, &button), None);
    let lonely = doc.append(b, "button", &[]);
    // Previous sibling exists but holds no code element.
    assert_eq!(CopySource::PreviousCode.text(&doc, &lonely), None);
}

#[test]
fn target_selector_reads_that_element() {
    let mut doc = DocStore::new();
    let b = body(&doc);
    doc.append_text(b, "code", &[("id", "snippet")], " npm i ");
    let button = doc.append(b, "button", &[]);
    let source = CopySource::Target("#snippet".to_owned());
    assert_eq!(source.text(&doc, &button).as_deref(), Some("npm i"));
    assert_eq!(CopySource::Target("#gone".to_owned()).text(&doc, &button), None);
}

#[test]
fn color_tokens_are_fixed_css() {
    let doc = DocStore::new();
    let text = CopySource::ColorTokens.text(&doc, &body(&doc)).expect("tokens");
    assert!(text.starts_with(":root {"));
    assert!(text.contains("--primary: #1F4E79;"));
    assert!(text.ends_with('}'));
}

// =============================================================
// CopyFlash
// =============================================================

#[test]
fn request_starts_clipboard_write() {
    let mut doc = DocStore::new();
    let b = body(&doc);
    let button = doc.append(b, "button", &[]);
    let flash = CopyFlash::new(1200);
    assert!(flash.request(&mut doc, &button, &CopySource::Value("abc".to_owned())));
    assert_eq!(
        doc.take_clipboard_requests(),
        vec![ClipboardRequest { text: "abc".to_owned(), source: button }]
    );
}

#[test]
fn request_with_missing_source_writes_nothing() {
    let mut doc = DocStore::new();
    let b = body(&doc);
    let button = doc.append(b, "button", &[]);
    let flash = CopyFlash::new(1200);
    assert!(!flash.request(&mut doc, &button, &CopySource::Target("#gone".to_owned())));
    assert!(doc.take_clipboard_requests().is_empty());
}

#[test]
fn success_flashes_then_restores() {
    let mut doc = DocStore::new();
    let b = body(&doc);
    let button = doc.append_text(b, "button", &[], "Copy");
    let mut announcer = Announcer::install(&mut doc, 50);
    let mut flash = CopyFlash::new(1200);

    flash.on_copied(&mut doc, &mut announcer, &button);
    assert_eq!(doc.inner_html(&button), "Copied!");
    assert_eq!(doc.attribute(&button, "aria-label").as_deref(), Some("Copied to clipboard"));
    assert!(announcer.is_pending());

    run_restores(&mut doc, &mut flash, 1_199);
    assert!(flash.is_flashing(&button));
    run_restores(&mut doc, &mut flash, 1_200);
    assert_eq!(doc.inner_html(&button), "Copy");
    assert!(!doc.has_attribute(&button, "aria-label"));
    assert!(!flash.is_flashing(&button));
}

#[test]
fn second_success_keeps_first_original_and_restarts_timer() {
    let mut doc = DocStore::new();
    let b = body(&doc);
    let button = doc.append_text(b, "button", &[], "Copy");
    let mut announcer = Announcer::detached(50);
    let mut flash = CopyFlash::new(1200);

    flash.on_copied(&mut doc, &mut announcer, &button);
    run_restores(&mut doc, &mut flash, 600);
    flash.on_copied(&mut doc, &mut announcer, &button);

    run_restores(&mut doc, &mut flash, 1_300);
    assert_eq!(doc.inner_html(&button), "Copied!");
    run_restores(&mut doc, &mut flash, 1_800);
    assert_eq!(doc.inner_html(&button), "Copy");
    assert_eq!(doc.pending_timers(), 0);
}

#[test]
fn restore_without_flash_is_noop() {
    let mut doc = DocStore::new();
    let b = body(&doc);
    let button = doc.append_text(b, "button", &[("aria-label", "Copy snippet")], "Copy");
    let mut flash = CopyFlash::new(1200);
    flash.restore(&mut doc, &button);
    assert_eq!(doc.inner_html(&button), "Copy");
    assert_eq!(doc.attribute(&button, "aria-label").as_deref(), Some("Copy snippet"));
}
