use super::*;
use crate::doc::DocStore;

fn attrs<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
    move |name: &str| pairs.iter().find(|(k, _)| *k == name).map(|(_, v)| (*v).to_owned())
}

// =============================================================
// is_focusable
// =============================================================

#[test]
fn links_need_href() {
    assert!(is_focusable("a", attrs(&[("href", "#x")])));
    assert!(!is_focusable("a", attrs(&[])));
}

#[test]
fn buttons_unless_disabled() {
    assert!(is_focusable("button", attrs(&[])));
    assert!(!is_focusable("button", attrs(&[("disabled", "")])));
}

#[test]
fn form_fields_always_qualify() {
    for tag in ["textarea", "input", "select"] {
        assert!(is_focusable(tag, attrs(&[])), "{tag} should be focusable");
    }
}

#[test]
fn tabindex_must_be_non_negative() {
    assert!(is_focusable("div", attrs(&[("tabindex", "0")])));
    assert!(is_focusable("span", attrs(&[("tabindex", " 3 ")])));
    assert!(!is_focusable("div", attrs(&[("tabindex", "-1")])));
    assert!(!is_focusable("div", attrs(&[("tabindex", "-2")])));
    assert!(!is_focusable("div", attrs(&[("tabindex", "soon")])));
    assert!(!is_focusable("div", attrs(&[])));
}

#[test]
fn tabindex_rescues_disabled_button() {
    assert!(is_focusable("button", attrs(&[("disabled", ""), ("tabindex", "0")])));
}

// =============================================================
// resolve
// =============================================================

#[test]
fn resolve_returns_document_order_not_tabindex_order() {
    let mut doc = DocStore::new();
    let body = doc.body().expect("body exists");
    let dialog = doc.append(body, "div", &[("class", "modal")]);
    let late = doc.append(dialog, "div", &[("tabindex", "5")]);
    let wrapper = doc.append(dialog, "p", &[]);
    let link = doc.append(wrapper, "a", &[("href", "/docs")]);
    doc.append(dialog, "button", &[("disabled", "")]);
    let input = doc.append(dialog, "input", &[]);
    doc.append(dialog, "a", &[]);

    assert_eq!(resolve(&doc, &dialog), vec![late, link, input]);
}

#[test]
fn resolve_excludes_container_and_outside_elements() {
    let mut doc = DocStore::new();
    let body = doc.body().expect("body exists");
    doc.append(body, "button", &[]);
    let dialog = doc.append(body, "div", &[("tabindex", "0")]);
    assert!(resolve(&doc, &dialog).is_empty());
}
