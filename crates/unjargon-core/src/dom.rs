//! In-memory document tree.
//!
//! An arena of element and text nodes standing in for a live DOM. Hosts
//! (a browser binding, the HTML importer in [`crate::html`], or tests)
//! populate the tree and attach a layout box to every rendered element; the
//! scan engine only ever reads and mutates the document through this type.
//!
//! Detached nodes stay in the arena until the document is dropped. Node ids
//! are never reused, so a stale id can be detected with [`Document::is_attached`].

use std::fmt;

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Axis-aligned layout box in viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Distance from the left viewport edge.
    pub left: f64,
    /// Distance from the top viewport edge.
    pub top: f64,
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
}

impl Rect {
    /// Create a rect from its origin and size.
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Element payload: tag, attributes and layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    tag: String,
    attrs: Vec<(String, String)>,
    /// Layout box when the element is rendered; `None` means the element
    /// has no offset parent (hidden, detached, or not laid out).
    pub layout: Option<Rect>,
}

impl ElementData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            layout: None,
        }
    }

    /// Lowercase tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All attributes in insertion order.
    pub fn attrs(&self) -> &[(String, String)] {
        &self.attrs
    }

    /// Set or replace an attribute.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|(k, _)| k == name)?;
        Some(self.attrs.remove(pos).1)
    }

    /// Iterate over the whitespace-separated class list.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    /// Returns `true` if the class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Add a class if it is not present yet.
    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let joined = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
            _ => class.to_string(),
        };
        self.set_attr("class", joined);
    }

    /// Remove every occurrence of a class.
    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let kept: Vec<&str> = self.classes().filter(|c| *c != class).collect();
        let joined = kept.join(" ");
        if joined.is_empty() {
            self.remove_attr("class");
        } else {
            self.set_attr("class", joined);
        }
    }
}

/// What a node holds.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// An element with tag, attributes and children.
    Element(ElementData),
    /// A run of character data.
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A simple selector: a tag name (`nav`) or a class (`.menu`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Matches elements by lowercase tag name.
    Tag(String),
    /// Matches elements carrying the class.
    Class(String),
}

impl Selector {
    /// Parse `"tag"` or `".class"`.
    pub fn parse(input: &str) -> Self {
        match input.strip_prefix('.') {
            Some(class) => Self::Class(class.to_string()),
            None => Self::Tag(input.to_ascii_lowercase()),
        }
    }

    /// Returns `true` if the element matches this selector.
    pub fn matches(&self, element: &ElementData) -> bool {
        match self {
            Self::Tag(tag) => element.tag() == tag,
            Self::Class(class) => element.has_class(class),
        }
    }
}

/// Tag of the synthetic root node every document starts with.
pub const ROOT_TAG: &str = "#document";

/// Arena-backed document tree.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document holding only the synthetic root.
    pub fn new() -> Self {
        let root = Node {
            kind: NodeKind::Element(ElementData::new(ROOT_TAG)),
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    /// The synthetic root node.
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// The first `body` element, or the root when there is none.
    pub fn body(&self) -> NodeId {
        self.descendants(self.root)
            .find(|&id| self.element(id).is_some_and(|e| e.tag() == "body"))
            .unwrap_or(self.root)
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(ElementData::new(tag)))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    /// Node payload.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    /// Element payload, if the node is an element.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.node(id).kind {
            NodeKind::Element(e) => Some(e),
            NodeKind::Text(_) => None,
        }
    }

    /// Mutable element payload, if the node is an element.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.node_mut(id).kind {
            NodeKind::Element(e) => Some(e),
            NodeKind::Text(_) => None,
        }
    }

    /// Character data, if the node is a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Text(t) => Some(t),
            NodeKind::Element(_) => None,
        }
    }

    /// Layout box of a rendered element.
    pub fn layout(&self, id: NodeId) -> Option<Rect> {
        self.element(id).and_then(|e| e.layout)
    }

    /// Set (or clear) an element's layout box. No-op on text nodes.
    pub fn set_layout(&mut self, id: NodeId, layout: Option<Rect>) {
        if let Some(e) = self.element_mut(id) {
            e.layout = layout;
        }
    }

    /// Parent node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Child nodes in order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Returns `true` if the node is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.root || self.ancestors(id).any(|a| a == self.root)
    }

    /// Strict ancestors, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Strict descendants in document (pre-)order.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// Every attached element in document order, root excluded.
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(self.root)
            .filter(move |&id| self.element(id).is_some())
    }

    /// Concatenated character data of the node and its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(t) = self.text(id) {
            return t.to_string();
        }
        self.descendants(id)
            .filter_map(|d| self.text(d))
            .collect()
    }

    /// Returns `true` if the element matches the selector.
    pub fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        self.element(id).is_some_and(|e| selector.matches(e))
    }

    /// Nearest inclusive ancestor matching the selector.
    pub fn closest(&self, id: NodeId, selector: &Selector) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&a| self.matches(a, selector))
    }

    /// Descendant elements carrying a class, in document order.
    pub fn query_class(&self, id: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(id)
            .filter(|&d| self.element(d).is_some_and(|e| e.has_class(class)))
            .collect()
    }

    /// Returns `true` if any descendant element carries the class.
    pub fn has_descendant_class(&self, id: NodeId, class: &str) -> bool {
        self.descendants(id)
            .any(|d| self.element(d).is_some_and(|e| e.has_class(class)))
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|&c| c != id);
            self.node_mut(id).parent = None;
        }
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    /// Remove a node from its parent. The node stays in the arena.
    pub fn remove(&mut self, id: NodeId) {
        self.detach(id);
    }

    /// Replace `old` with `replacements`, in order, at its position.
    ///
    /// Returns `false` (and changes nothing) when `old` has no parent.
    pub fn replace_with(&mut self, old: NodeId, replacements: &[NodeId]) -> bool {
        let Some(parent) = self.node(old).parent else {
            return false;
        };
        for &r in replacements {
            self.detach(r);
        }
        let Some(pos) = self.children(parent).iter().position(|&c| c == old) else {
            return false;
        };
        for &r in replacements {
            self.node_mut(r).parent = Some(parent);
        }
        let siblings = &mut self.node_mut(parent).children;
        siblings.remove(pos);
        for (offset, &r) in replacements.iter().enumerate() {
            siblings.insert(pos + offset, r);
        }
        self.node_mut(old).parent = None;
        true
    }

    /// Replace every child of `parent` with `children`.
    pub fn set_children(&mut self, parent: NodeId, children: &[NodeId]) {
        let old = std::mem::take(&mut self.node_mut(parent).children);
        for c in old {
            self.node_mut(c).parent = None;
        }
        for &c in children {
            self.append_child(parent, c);
        }
    }

    /// Replace a text node's character data. No-op on elements.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let NodeKind::Text(t) = &mut self.node_mut(id).kind {
            *t = text.into();
        }
    }

    /// Merge adjacent text children and drop empty ones, recursively.
    pub fn normalize(&mut self, id: NodeId) {
        let children = self.children(id).to_vec();
        let mut kept: Vec<NodeId> = Vec::with_capacity(children.len());
        for child in children {
            match &self.node(child).kind {
                NodeKind::Text(t) if t.is_empty() => {
                    self.node_mut(child).parent = None;
                }
                NodeKind::Text(t) => {
                    let prev_text = kept
                        .last()
                        .copied()
                        .filter(|&prev| self.text(prev).is_some());
                    if let Some(prev) = prev_text {
                        let extra = t.clone();
                        if let NodeKind::Text(p) = &mut self.node_mut(prev).kind {
                            p.push_str(&extra);
                        }
                        self.node_mut(child).parent = None;
                    } else {
                        kept.push(child);
                    }
                }
                NodeKind::Element(_) => {
                    self.normalize(child);
                    kept.push(child);
                }
            }
        }
        self.node_mut(id).children = kept;
    }
}

/// Pre-order iterator returned by [`Document::descendants`].
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(id).iter().rev().copied());
        Some(id)
    }
}
