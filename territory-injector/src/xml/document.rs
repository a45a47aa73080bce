//! Arena-backed XML document
//!
//! Nodes live in a single `Vec` and refer to each other by [`NodeId`].
//! Detached nodes stay in the arena but are no longer reachable from the root.

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;
use territory_common::{Error, Result};

/// Index of a node inside its [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Node payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Element with attributes in source order; values are unescaped
    Element {
        name: String,
        attributes: Vec<(String, String)>,
    },
    /// Character data, kept escaped exactly as read
    Text(String),
    CData(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Mutable XML tree with a single root element
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    pub(crate) doctype: Option<String>,
}

impl Document {
    /// Create a document holding only an empty root element
    pub fn new(root_name: &str) -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Element {
                    name: root_name.to_string(),
                    attributes: Vec::new(),
                },
                parent: None,
                children: Vec::new(),
            }],
            root: NodeId(0),
            doctype: None,
        }
    }

    /// Read and parse a file; errors carry the file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_str(&content).map_err(|e| e.with_path(path))
    }

    /// Parse XML text
    ///
    /// Whitespace-only text between elements is dropped; it is regenerated
    /// by the indenting writer.
    pub fn parse_str(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut nodes: Vec<Node> = Vec::new();
        let mut stack: Vec<NodeId> = Vec::new();
        let mut root: Option<NodeId> = None;
        let mut doctype = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                Error::xml(format!("at position {}: {}", reader.error_position(), e))
            })?;

            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let is_start = matches!(event, Event::Start(_));
                    let parent = stack.last().copied();
                    if parent.is_none() && root.is_some() {
                        return Err(Error::xml("multiple root elements"));
                    }
                    let kind = element_kind(e)?;
                    let id = push_node(&mut nodes, kind, parent);
                    if parent.is_none() {
                        root = Some(id);
                    }
                    if is_start {
                        stack.push(id);
                    }
                }
                Event::End(_) => {
                    stack.pop();
                }
                Event::Text(ref e) => {
                    let raw = std::str::from_utf8(e)
                        .map_err(|err| Error::xml(format!("invalid UTF-8 in text: {}", err)))?;
                    match stack.last() {
                        Some(&parent) => append_text(&mut nodes, parent, raw, false),
                        None if raw.trim().is_empty() => {}
                        None => return Err(Error::xml("text outside the root element")),
                    }
                }
                Event::GeneralRef(ref e) => {
                    let name = std::str::from_utf8(e)
                        .map_err(|err| Error::xml(format!("invalid UTF-8 in reference: {}", err)))?;
                    if let Some(&parent) = stack.last() {
                        append_text(&mut nodes, parent, &format!("&{};", name), true);
                    }
                }
                Event::CData(ref e) => {
                    if let Some(&parent) = stack.last() {
                        let text = String::from_utf8_lossy(e).into_owned();
                        push_node(&mut nodes, NodeKind::CData(text), Some(parent));
                    }
                }
                Event::Comment(ref e) => {
                    // Comments outside the root element are not kept
                    if let Some(&parent) = stack.last() {
                        let text = String::from_utf8_lossy(e).into_owned();
                        push_node(&mut nodes, NodeKind::Comment(text), Some(parent));
                    }
                }
                Event::DocType(ref e) => {
                    doctype = Some(String::from_utf8_lossy(e).into_owned());
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(&open) = stack.last() {
            let name = match &nodes[open.0].kind {
                NodeKind::Element { name, .. } => name.clone(),
                _ => String::new(),
            };
            return Err(Error::xml(format!("unclosed element <{}>", name)));
        }

        let root = root.ok_or_else(|| Error::xml("no root element"))?;
        Ok(Self {
            nodes,
            root,
            doctype,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// Element name, `None` for non-element nodes
    pub fn name(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Element attributes in source order (empty for non-element nodes)
    pub fn attributes(&self, id: NodeId) -> &[(String, String)] {
        match &self.nodes[id.0].kind {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    pub fn attr(&self, id: NodeId, key: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Direct child elements with the given name, in document order
    pub fn child_elements<'a>(
        &'a self,
        id: NodeId,
        name: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&child| self.name(child) == Some(name))
    }

    /// First direct child element with the given name
    pub fn find_child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.child_elements(id, name).next()
    }

    /// Elements with the given name in the subtree rooted at `id`
    /// (including `id` itself), in document order
    pub fn descendants(&self, id: NodeId, name: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if self.name(current) == Some(name) {
                found.push(current);
            }
            pending.extend(self.children(current).iter().rev().copied());
        }
        found
    }

    /// Append a new element as the last child of `parent`
    pub fn append_element(
        &mut self,
        parent: NodeId,
        name: &str,
        attributes: Vec<(String, String)>,
    ) -> NodeId {
        push_node(
            &mut self.nodes,
            NodeKind::Element {
                name: name.to_string(),
                attributes,
            },
            Some(parent),
        )
    }

    /// Unlink a node from its parent; the root cannot be detached
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&child| child != id);
        }
    }
}

fn push_node(nodes: &mut Vec<Node>, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
    let id = NodeId(nodes.len());
    nodes.push(Node {
        kind,
        parent,
        children: Vec::new(),
    });
    if let Some(parent) = parent {
        nodes[parent.0].children.push(id);
    }
    id
}

/// Extend the trailing text node of `parent`, or start a new one.
/// A new node is not started for whitespace-only text unless `keep` is set.
fn append_text(nodes: &mut Vec<Node>, parent: NodeId, raw: &str, keep: bool) {
    if let Some(&last) = nodes[parent.0].children.last() {
        if let NodeKind::Text(existing) = &mut nodes[last.0].kind {
            existing.push_str(raw);
            return;
        }
    }
    if keep || !raw.trim().is_empty() {
        push_node(nodes, NodeKind::Text(raw.to_string()), Some(parent));
    }
}

fn element_kind(e: &BytesStart<'_>) -> Result<NodeKind> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(|err| Error::xml(format!("invalid UTF-8 in element name: {}", err)))?
        .to_string();

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::xml(format!("bad attribute in <{}>: {}", name, err)))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| Error::xml(format!("invalid UTF-8 in attribute name: {}", err)))?
            .to_string();
        let raw = std::str::from_utf8(&attr.value)
            .map_err(|err| Error::xml(format!("invalid UTF-8 in attribute '{}': {}", key, err)))?;
        let value = unescape(raw)
            .map_err(|err| Error::xml(format!("bad escape in attribute '{}': {}", key, err)))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(NodeKind::Element { name, attributes })
}
