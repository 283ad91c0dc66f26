//! Wrap matched text in marker elements, and undo it.
//!
//! A marker is a `span` carrying the [`MARKER_CLASS`] class, the severity
//! class, the original and translated text as data attributes, and a single
//! text child holding the verbatim page text. Inserting a marker never
//! changes the element's text content.

use crate::dictionary::Severity;
use crate::dom::{Document, NodeId};
use crate::error::{RewriteError, RewriteResult};

/// Class carried by every marker.
pub const MARKER_CLASS: &str = "unjargon-term";

/// Tag used for markers.
pub const MARKER_TAG: &str = "span";

/// Accessible label set on every marker.
pub const MARKER_LABEL: &str = "View translation";

/// What to insert, and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerSpec<'a> {
    /// Verbatim page text to wrap.
    pub original: &'a str,
    /// Plain-language replacement shown in the tooltip.
    pub replacement: &'a str,
    /// Severity class, or `None` to leave the marker unstyled.
    pub severity: Option<Severity>,
    /// Byte offset of `original` in the element's text content.
    pub offset: usize,
}

/// A text run cut into the part before a match, the match, and the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitPoint<'a> {
    /// Text before the match.
    pub prefix: &'a str,
    /// The matched text.
    pub matched: &'a str,
    /// Text after the match.
    pub suffix: &'a str,
}

impl<'a> SplitPoint<'a> {
    /// Split `text` around `len` bytes starting at `start`.
    ///
    /// Returns `None` if the range is out of bounds or not on character
    /// boundaries.
    pub fn at(text: &'a str, start: usize, len: usize) -> Option<Self> {
        let end = start.checked_add(len)?;
        Some(Self {
            prefix: text.get(..start)?,
            matched: text.get(start..end)?,
            suffix: text.get(end..)?,
        })
    }

    /// The three fragments in order.
    pub const fn fragments(&self) -> [&'a str; 3] {
        [self.prefix, self.matched, self.suffix]
    }
}

/// How the marker got into the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewritePath {
    /// A single text node was split around the match.
    Split,
    /// The match crossed inline markup and the element's children were
    /// rebuilt from its text. Inline formatting inside the element is lost.
    Fallback,
}

/// Result of a successful rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// The inserted marker.
    pub marker: NodeId,
    /// Which path inserted it.
    pub path: RewritePath,
}

/// Data read back from a marker's attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerData {
    /// Verbatim page text.
    pub original: String,
    /// Plain-language replacement.
    pub translation: String,
    /// Severity class, when the marker is styled.
    pub severity: Option<Severity>,
}

/// Build a detached marker element for `spec`.
pub fn create_marker(doc: &mut Document, spec: &MarkerSpec<'_>) -> NodeId {
    let marker = doc.create_element(MARKER_TAG);
    if let Some(el) = doc.element_mut(marker) {
        el.add_class(MARKER_CLASS);
        if let Some(severity) = spec.severity {
            el.add_class(severity.as_str());
        }
        el.set_attr("data-original", spec.original);
        el.set_attr("data-translation", spec.replacement);
        el.set_attr("tabindex", "0");
        el.set_attr("role", "button");
        el.set_attr("aria-label", MARKER_LABEL);
    }
    let text = doc.create_text(spec.original);
    doc.append_child(marker, text);
    marker
}

/// Returns `true` if the node is a marker.
pub fn is_marker(doc: &Document, id: NodeId) -> bool {
    doc.element(id).is_some_and(|e| e.has_class(MARKER_CLASS))
}

/// Read a marker's attributes.
pub fn marker_data(doc: &Document, id: NodeId) -> Option<MarkerData> {
    let el = doc.element(id).filter(|e| e.has_class(MARKER_CLASS))?;
    Some(MarkerData {
        original: el.attr("data-original").unwrap_or_default().to_string(),
        translation: el.attr("data-translation").unwrap_or_default().to_string(),
        severity: el.classes().find_map(Severity::from_class),
    })
}

/// Every marker under `root`, in document order.
pub fn markers(doc: &Document, root: NodeId) -> Vec<NodeId> {
    doc.query_class(root, MARKER_CLASS)
}

/// Wrap the text at `spec.offset` inside `element` in a new marker.
///
/// The text node holding the whole range is split into prefix, marker and
/// suffix, leaving every other node in place. When the range crosses inline
/// markup, the element's children are replaced with plain text around the
/// marker instead; this is refused if the element already holds markers.
#[tracing::instrument(skip_all, fields(element = %element, original = spec.original))]
pub fn apply_marker(
    doc: &mut Document,
    element: NodeId,
    spec: &MarkerSpec<'_>,
) -> RewriteResult<RewriteOutcome> {
    if doc.element(element).is_none() {
        return Err(RewriteError::NotAnElement(element));
    }
    let content = doc.text_content(element);
    let not_found = || RewriteError::TextNotFound {
        text: spec.original.to_string(),
        offset: spec.offset,
    };
    let whole = SplitPoint::at(&content, spec.offset, spec.original.len()).ok_or_else(not_found)?;
    if whole.matched != spec.original {
        return Err(not_found());
    }

    let mut pos = 0;
    let mut holder = None;
    for node in doc.descendants(element) {
        let Some(text) = doc.text(node) else {
            continue;
        };
        let end = pos + text.len();
        if pos <= spec.offset && spec.offset + spec.original.len() <= end && !text.is_empty() {
            holder = Some((node, spec.offset - pos));
            break;
        }
        if end > spec.offset {
            break;
        }
        pos = end;
    }

    if let Some((node, local)) = holder {
        if doc
            .ancestors(node)
            .take_while(|&a| a != element)
            .any(|a| is_marker(doc, a))
        {
            return Err(RewriteError::AlreadyMarked(spec.original.to_string()));
        }
        let text = doc.text(node).unwrap_or_default().to_string();
        let split = SplitPoint::at(&text, local, spec.original.len()).ok_or_else(not_found)?;
        let marker = create_marker(doc, spec);
        let replacements = fragment_nodes(doc, &split, marker);
        if !doc.replace_with(node, &replacements) {
            return Err(not_found());
        }
        tracing::debug!(marker = %marker, "split text node");
        return Ok(RewriteOutcome {
            marker,
            path: RewritePath::Split,
        });
    }

    if doc.has_descendant_class(element, MARKER_CLASS) {
        tracing::warn!("match spans inline markup next to existing markers, skipping");
        return Err(RewriteError::CrossesMarkup(spec.original.to_string()));
    }
    let marker = create_marker(doc, spec);
    let children = fragment_nodes(doc, &whole, marker);
    doc.set_children(element, &children);
    tracing::debug!(marker = %marker, "rebuilt element content around marker");
    Ok(RewriteOutcome {
        marker,
        path: RewritePath::Fallback,
    })
}

/// Text nodes for the non-empty prefix and suffix around `marker`.
fn fragment_nodes(doc: &mut Document, split: &SplitPoint<'_>, marker: NodeId) -> Vec<NodeId> {
    let mut nodes = Vec::with_capacity(3);
    if !split.prefix.is_empty() {
        nodes.push(doc.create_text(split.prefix));
    }
    nodes.push(marker);
    if !split.suffix.is_empty() {
        nodes.push(doc.create_text(split.suffix));
    }
    nodes
}

/// Replace every marker under `root` with its plain text.
///
/// Adjacent text nodes left behind are merged. Returns the number of
/// markers removed.
#[tracing::instrument(skip_all, fields(root = %root))]
pub fn revert_markers(doc: &mut Document, root: NodeId) -> usize {
    let mut parents: Vec<NodeId> = Vec::new();
    let mut reverted = 0;
    for marker in markers(doc, root) {
        let Some(parent) = doc.parent(marker) else {
            continue;
        };
        if !doc.is_attached(marker) {
            continue;
        }
        let text = doc.text_content(marker);
        let plain = doc.create_text(text);
        if doc.replace_with(marker, &[plain]) {
            reverted += 1;
            if !parents.contains(&parent) {
                parents.push(parent);
            }
        }
    }
    for parent in parents {
        doc.normalize(parent);
    }
    if reverted > 0 {
        tracing::debug!(reverted, "markers reverted");
    }
    reverted
}
