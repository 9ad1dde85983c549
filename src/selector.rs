//! CSS selector subset for the in-memory document.
//!
//! Supports type selectors (`button`, `*`), `#id`, `.class`, `[attr]`,
//! `[attr=value]` (bare, single- or double-quoted values), compounds of
//! those, and the descendant combinator (whitespace). Anything else fails to
//! parse, which callers treat as "matches nothing", the same way a browser
//! query with an invalid selector finds nothing once its exception is caught.

#[cfg(test)]
#[path = "selector_test.rs"]
mod selector_test;

/// Read access to an element tree, for matching.
pub trait SelectorTarget {
    type Id: Copy;

    fn tag_of(&self, id: Self::Id) -> Option<&str>;
    fn attr_of(&self, id: Self::Id, name: &str) -> Option<&str>;
    fn parent_of(&self, id: Self::Id) -> Option<Self::Id>;
}

/// A parsed selector: compounds joined by descendant combinators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Outermost ancestor first; the last compound matches the subject.
    chain: Vec<Compound>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrTest>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrTest {
    name: String,
    value: Option<String>,
}

impl Selector {
    /// Parse `raw`, returning `None` for empty or unsupported selectors.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let mut chain = Vec::new();
        for part in split_compounds(raw)? {
            chain.push(parse_compound(&part)?);
        }
        if chain.is_empty() {
            return None;
        }
        Some(Self { chain })
    }

    /// Whether `subject` matches, with ancestors resolved through `tree`.
    pub fn matches<T: SelectorTarget>(&self, tree: &T, subject: T::Id) -> bool {
        let Some((last, ancestors)) = self.chain.split_last() else {
            return false;
        };
        if !last.matches(tree, subject) {
            return false;
        }
        // Descendant-only chains match greedily: the nearest qualifying ancestor
        // never rules out a match further up.
        let mut cursor = tree.parent_of(subject);
        for compound in ancestors.iter().rev() {
            loop {
                let Some(node) = cursor else {
                    return false;
                };
                cursor = tree.parent_of(node);
                if compound.matches(tree, node) {
                    break;
                }
            }
        }
        true
    }
}

impl Compound {
    fn matches<T: SelectorTarget>(&self, tree: &T, node: T::Id) -> bool {
        let Some(tag) = tree.tag_of(node) else {
            return false;
        };
        if let Some(expected) = &self.tag
            && !expected.eq_ignore_ascii_case(tag)
        {
            return false;
        }
        if let Some(id) = &self.id
            && tree.attr_of(node, "id") != Some(id.as_str())
        {
            return false;
        }
        if !self.classes.is_empty() {
            let class_attr = tree.attr_of(node, "class").unwrap_or("");
            if !self.classes.iter().all(|class| class_attr.split_whitespace().any(|c| c == class)) {
                return false;
            }
        }
        self.attrs.iter().all(|test| match (&test.value, tree.attr_of(node, &test.name)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(expected), Some(actual)) => expected == actual,
        })
    }
}

/// Split on whitespace that is not inside `[...]`.
fn split_compounds(raw: &str) -> Option<Vec<String>> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for ch in raw.trim().chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => {
                quote = None;
                current.push(c);
            }
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') if depth > 0 => {
                quote = Some(ch);
                current.push(ch);
            }
            (None, '[') => {
                depth += 1;
                current.push(ch);
            }
            (None, ']') => {
                depth = depth.checked_sub(1)?;
                current.push(ch);
            }
            (None, c) if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            (None, c) => current.push(c),
        }
    }
    if depth != 0 || quote.is_some() {
        return None;
    }
    if !current.is_empty() {
        parts.push(current);
    }
    Some(parts)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &[char], pos: &mut usize) -> Option<String> {
    let start = *pos;
    while *pos < chars.len() && is_ident_char(chars[*pos]) {
        *pos += 1;
    }
    if *pos == start {
        return None;
    }
    Some(chars[start..*pos].iter().collect())
}

fn parse_compound(raw: &str) -> Option<Compound> {
    let chars: Vec<char> = raw.chars().collect();
    let mut pos = 0;
    let mut compound = Compound::default();

    if chars.first() == Some(&'*') {
        pos = 1;
    } else if chars.first().is_some_and(char::is_ascii_alphabetic) {
        compound.tag = Some(take_ident(&chars, &mut pos)?.to_ascii_lowercase());
    }

    while pos < chars.len() {
        let marker = chars[pos];
        pos += 1;
        match marker {
            '#' => compound.id = Some(take_ident(&chars, &mut pos)?),
            '.' => compound.classes.push(take_ident(&chars, &mut pos)?),
            '[' => compound.attrs.push(parse_attr(&chars, &mut pos)?),
            _ => return None,
        }
    }
    Some(compound)
}

/// Parse the body of `[name]` or `[name=value]`; `pos` starts after `[`.
fn parse_attr(chars: &[char], pos: &mut usize) -> Option<AttrTest> {
    let name = take_ident(chars, pos)?;
    match chars.get(*pos)? {
        ']' => {
            *pos += 1;
            Some(AttrTest { name, value: None })
        }
        '=' => {
            *pos += 1;
            let value = match chars.get(*pos)? {
                q @ ('"' | '\'') => {
                    let quote = *q;
                    *pos += 1;
                    let start = *pos;
                    while chars.get(*pos)? != &quote {
                        *pos += 1;
                    }
                    let value: String = chars[start..*pos].iter().collect();
                    *pos += 1;
                    value
                }
                _ => take_ident(chars, pos)?,
            };
            if chars.get(*pos)? != &']' {
                return None;
            }
            *pos += 1;
            Some(AttrTest { name, value: Some(value) })
        }
        _ => None,
    }
}
