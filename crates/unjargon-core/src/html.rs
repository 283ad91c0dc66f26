//! HTML import and export for static documents.
//!
//! Import parses with `html5ever` and copies elements and text into a
//! [`Document`]. There is no layout engine, so every rendered element gets a
//! nominal box stacked down the page; elements in `<head>`, scripting and
//! metadata elements, and anything under a `hidden` attribute or an inline
//! `display: none` are left without a box and so are never scanned. Like in a
//! browser, `<html>` and `<body>` have no box either.
//!
//! Comments, the doctype and `<template>` contents are not imported. Export
//! always writes an HTML5 doctype.

use std::io;

use html5ever::serialize::{Serialize, SerializeOpts, Serializer, TraversalScope, serialize};
use html5ever::tendril::TendrilSink;
use html5ever::{LocalName, QualName, namespace_url, ns, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::dom::{Document, ElementData, NodeId, NodeKind, Rect};
use crate::error::{HtmlError, HtmlResult};

/// Width of the nominal box given to rendered elements.
pub const NOMINAL_WIDTH: f64 = 800.0;

/// Height of the nominal box given to rendered elements.
pub const NOMINAL_HEIGHT: f64 = 20.0;

const NOMINAL_GAP: f64 = 4.0;

/// Elements that are never rendered, nor is anything inside them.
const NOT_RENDERED: &[&str] = &[
    "head", "script", "style", "template", "title", "meta", "link", "base", "noscript",
];

/// Elements rendered without a box of their own.
const NO_BOX: &[&str] = &["html", "body"];

struct Stacker {
    next_top: f64,
}

impl Stacker {
    fn next(&mut self) -> Rect {
        let rect = Rect::new(0.0, self.next_top, NOMINAL_WIDTH, NOMINAL_HEIGHT);
        self.next_top += NOMINAL_HEIGHT + NOMINAL_GAP;
        rect
    }
}

fn is_hidden(el: &ElementData) -> bool {
    if el.attr("hidden").is_some() {
        return true;
    }
    if el.tag() == "input" && el.attr("type").is_some_and(|t| t.eq_ignore_ascii_case("hidden")) {
        return true;
    }
    el.attr("style").is_some_and(|style| {
        let compact: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        compact.contains("display:none")
    })
}

fn import_children(
    handle: &Handle,
    parent: NodeId,
    doc: &mut Document,
    stacker: &mut Stacker,
    rendered: bool,
) {
    for child in handle.children.borrow().iter() {
        match &child.data {
            NodeData::Element { name, attrs, .. } => {
                let id = doc.create_element(name.local.as_ref());
                if let Some(el) = doc.element_mut(id) {
                    for attr in attrs.borrow().iter() {
                        el.set_attr(attr.name.local.as_ref(), attr.value.to_string());
                    }
                }
                doc.append_child(parent, id);

                let visible = rendered
                    && doc.element(id).is_some_and(|el| {
                        !NOT_RENDERED.contains(&el.tag()) && !is_hidden(el)
                    });
                let boxed = visible && doc.element(id).is_some_and(|el| !NO_BOX.contains(&el.tag()));
                if boxed {
                    doc.set_layout(id, Some(stacker.next()));
                }
                import_children(child, id, doc, stacker, visible);
            }
            NodeData::Text { contents } => {
                let text = doc.create_text(contents.borrow().to_string());
                doc.append_child(parent, text);
            }
            _ => {}
        }
    }
}

/// Parse an HTML document.
#[tracing::instrument(skip_all, fields(input_len = input.len()))]
pub fn parse_html(input: &str) -> Document {
    let dom: RcDom = parse_document(RcDom::default(), Default::default()).one(input);
    let mut doc = Document::new();
    let root = doc.root();
    let mut stacker = Stacker { next_top: 0.0 };
    import_children(&dom.document, root, &mut doc, &mut stacker, true);
    tracing::debug!(elements = doc.elements().count(), "document imported");
    doc
}

/// Parse an HTML document, refusing input over `limit` bytes.
pub fn parse_html_bounded(input: &str, limit: Option<usize>) -> HtmlResult<Document> {
    match limit {
        Some(limit) if input.len() > limit => Err(HtmlError::TooLarge {
            size: input.len(),
            limit,
        }),
        _ => Ok(parse_html(input)),
    }
}

/// A node and its subtree, serialized through html5ever.
struct Subtree<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl Serialize for Subtree<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        match traversal_scope {
            TraversalScope::IncludeNode => write_node(self.doc, self.id, serializer),
            TraversalScope::ChildrenOnly(_) => self
                .doc
                .children(self.id)
                .iter()
                .try_for_each(|&child| write_node(self.doc, child, serializer)),
        }
    }
}

fn write_node<S: Serializer>(doc: &Document, id: NodeId, serializer: &mut S) -> io::Result<()> {
    match doc.kind(id) {
        NodeKind::Text(text) => serializer.write_text(text),
        NodeKind::Element(el) => {
            let name = QualName::new(None, ns!(html), LocalName::from(el.tag()));
            let attr_names: Vec<QualName> = el
                .attrs()
                .iter()
                .map(|(attr, _)| QualName::new(None, ns!(), LocalName::from(attr.as_str())))
                .collect();
            let attrs = attr_names
                .iter()
                .zip(el.attrs())
                .map(|(attr, (_, value))| (attr, value.as_str()));
            serializer.start_elem(name.clone(), attrs)?;
            for &child in doc.children(id) {
                write_node(doc, child, serializer)?;
            }
            serializer.end_elem(name)
        }
    }
}

fn serialize_subtree(doc: &Document, id: NodeId, traversal_scope: TraversalScope) -> HtmlResult<String> {
    let opts = SerializeOpts {
        traversal_scope,
        ..SerializeOpts::default()
    };
    let mut out = Vec::new();
    serialize(&mut out, &Subtree { doc, id }, opts)
        .map_err(|e| HtmlError::Serialize(e.to_string()))?;
    String::from_utf8(out).map_err(|e| HtmlError::Serialize(e.to_string()))
}

/// Serialize a document to HTML.
///
/// Raw text elements (`script`, `style`, `noscript`, `iframe` and the
/// like) keep their content unescaped, and void elements get no end tag.
pub fn to_html(doc: &Document) -> HtmlResult<String> {
    let body = serialize_subtree(doc, doc.root(), TraversalScope::ChildrenOnly(None))?;
    Ok(format!("<!DOCTYPE html>\n{body}\n"))
}

/// Serialize one element and its subtree.
pub fn outer_html(doc: &Document, id: NodeId) -> HtmlResult<String> {
    serialize_subtree(doc, id, TraversalScope::IncludeNode)
}
