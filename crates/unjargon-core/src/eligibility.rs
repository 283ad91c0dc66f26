//! Which elements a scan looks at.

use std::sync::LazyLock;

use crate::dom::{Document, NodeId, Selector};

/// Navigation, chrome, ads, legal boilerplate and UI widgets.
pub const EXCLUDED_SELECTORS: &[&str] = &[
    "nav",
    "header",
    "footer",
    ".nav",
    ".navbar",
    ".navigation",
    ".menu",
    ".header",
    ".footer",
    ".sidebar",
    "script",
    "style",
    "noscript",
    ".advertisement",
    ".ads",
    ".banner",
    ".cookie",
    ".privacy",
    ".legal",
    ".social",
    ".share",
    ".follow",
    ".breadcrumb",
    ".pagination",
    ".tooltip",
    ".modal",
    ".popup",
    ".dropdown",
    ".select",
    ".option",
];

static EXCLUDED: LazyLock<Vec<Selector>> =
    LazyLock::new(|| EXCLUDED_SELECTORS.iter().map(|s| Selector::parse(s)).collect());

/// Smallest rendered width worth scanning.
pub const MIN_WIDTH: f64 = 20.0;

/// Smallest rendered height worth scanning.
pub const MIN_HEIGHT: f64 = 10.0;

/// Trimmed text must be longer than this many characters.
pub const MIN_TEXT_CHARS: usize = 2;

/// Returns `true` if the element or an ancestor matches an excluded selector.
pub fn is_excluded(doc: &Document, id: NodeId) -> bool {
    EXCLUDED.iter().any(|sel| doc.closest(id, sel).is_some())
}

/// Returns `true` if trimmed `text` is long enough to hold a term.
pub fn has_meaningful_text(text: &str) -> bool {
    text.trim().chars().count() > MIN_TEXT_CHARS
}

/// Returns `true` if the element is rendered, large enough and outside
/// excluded regions. Text is not considered.
pub fn is_scannable_box(doc: &Document, id: NodeId) -> bool {
    if doc.element(id).is_none() || is_excluded(doc, id) {
        return false;
    }
    doc.layout(id)
        .is_some_and(|rect| rect.width >= MIN_WIDTH && rect.height >= MIN_HEIGHT)
}

/// Returns `true` if the element should be scanned.
pub fn is_eligible(doc: &Document, id: NodeId) -> bool {
    if !is_scannable_box(doc, id) {
        return false;
    }
    let text = doc.text_content(id);
    let trimmed = text.trim();
    if !has_meaningful_text(trimmed) {
        return false;
    }
    // A child repeating its parent's text is redundant only when the parent
    // gets scanned itself.
    match doc.parent(id) {
        Some(parent) if is_scannable_box(doc, parent) => {
            doc.text_content(parent).trim() != trimmed
        }
        _ => true,
    }
}

/// Eligible elements in document order.
#[tracing::instrument(skip_all)]
pub fn eligible_elements(doc: &Document) -> Vec<NodeId> {
    let found: Vec<NodeId> = doc.elements().filter(|&id| is_eligible(doc, id)).collect();
    tracing::debug!(count = found.len(), "eligible elements");
    found
}
