//! Arena-backed in-memory tree
//!
//! Mirrors the subset of DOM behavior the splitter relies on, so wrapping and
//! transitions can run without a browser (tests, headless pre-rendering).

use super::{NodeKind, UiTree};
use crate::error::DomError;

/// Handle into a [`MemoryTree`] arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Clone, Debug)]
enum NodeData {
    Document,
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
    Comment(String),
}

#[derive(Clone, Debug)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// In-memory document with a `<body>` element
///
/// Nodes are never freed. Detached nodes lose their parent but stay readable
/// through their ids, so the arena grows with every wrap, rewrap and
/// transition. Long-running headless use should start a fresh tree (and
/// splitter) per session rather than transitioning one tree indefinitely.
#[derive(Clone, Debug)]
pub struct MemoryTree {
    nodes: Vec<Node>,
    document: NodeId,
    body: NodeId,
}

impl MemoryTree {
    pub fn new() -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            document: NodeId(0),
            body: NodeId(0),
        };
        tree.document = tree.push(NodeData::Document);
        tree.body = tree.push(NodeData::Element {
            tag: "body".to_string(),
            attrs: Vec::new(),
        });
        let (document, body) = (tree.document, tree.body);
        tree.link(document, body);
        tree
    }

    /// Number of nodes ever allocated, detached ones included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn document(&self) -> NodeId {
        self.document
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create an element with attributes and append it to `parent`
    pub fn el(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = self.push(NodeData::Element {
            tag: tag.to_ascii_lowercase(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        self.link(parent, id);
        id
    }

    /// Create a text node and append it to `parent`
    pub fn text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.push(NodeData::Text(text.to_string()));
        self.link(parent, id);
        id
    }

    /// Create a comment node and append it to `parent`
    pub fn comment(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.push(NodeData::Comment(text.to_string()));
        self.link(parent, id);
        id
    }

    /// Remove a node from its parent
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    /// Serialize the children of `node` as HTML
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for &child in &self.nodes[node.0].children {
            self.write_html(child, &mut out);
        }
        out
    }

    /// Serialize `node` itself as HTML
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].data {
            NodeData::Document => out.push_str(&self.inner_html(node)),
            NodeData::Text(text) => out.push_str(&escape(text)),
            NodeData::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeData::Element { tag, attrs } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push_str(&format!(" {}=\"{}\"", name, escape(value)));
                }
                out.push('>');
                out.push_str(&self.inner_html(node));
                out.push_str(&format!("</{}>", tag));
            }
        }
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn attrs_mut(&mut self, node: NodeId) -> Result<&mut Vec<(String, String)>, DomError> {
        match &mut self.nodes[node.0].data {
            NodeData::Element { attrs, .. } => Ok(attrs),
            _ => Err(DomError::NotAnElement),
        }
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Comment(_) => {}
            _ => {
                for &child in &self.nodes[node.0].children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    fn find(&self, node: NodeId, matcher: &Selector) -> Option<NodeId> {
        for &child in &self.nodes[node.0].children {
            if let NodeData::Element { tag, attrs } = &self.nodes[child.0].data {
                if matcher.matches(tag, attrs) {
                    return Some(child);
                }
            }
            if let Some(found) = self.find(child, matcher) {
                return Some(found);
            }
        }
        None
    }
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl UiTree for MemoryTree {
    type Node = NodeId;

    fn kind(&self, node: &NodeId) -> NodeKind {
        match self.nodes[node.0].data {
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Document | NodeData::Comment(_) => NodeKind::Other,
        }
    }

    fn tag_name(&self, node: &NodeId) -> Option<String> {
        match &self.nodes[node.0].data {
            NodeData::Element { tag, .. } => Some(tag.clone()),
            _ => None,
        }
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.nodes[node.0].children.clone()
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn text_content(&self, node: &NodeId) -> String {
        let mut out = String::new();
        self.collect_text(*node, &mut out);
        out
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        match &self.nodes[node.0].data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone()),
            _ => None,
        }
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let attrs = self.attrs_mut(*node)?;
        match attrs.iter_mut().find(|(k, _)| k == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => attrs.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) -> Result<(), DomError> {
        self.attrs_mut(*node)?.retain(|(k, _)| k != name);
        Ok(())
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId, DomError> {
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(DomError::Operation(format!("invalid tag name '{}'", tag)));
        }
        Ok(self.push(NodeData::Element {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        }))
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        if self.kind(parent) == NodeKind::Text {
            return Err(DomError::NotAnElement);
        }
        self.link(*parent, *child);
        Ok(())
    }

    fn replace_with(&mut self, node: &NodeId, replacements: &[NodeId]) -> Result<(), DomError> {
        let parent = self.nodes[node.0].parent.ok_or(DomError::NoParent)?;
        for &replacement in replacements {
            if replacement != *node {
                self.detach(replacement);
            }
        }
        let siblings = &mut self.nodes[parent.0].children;
        let position = siblings
            .iter()
            .position(|c| c == node)
            .ok_or(DomError::NoParent)?;
        siblings.splice(position..=position, replacements.iter().copied());
        if !replacements.contains(node) {
            self.nodes[node.0].parent = None;
        }
        for &replacement in replacements {
            self.nodes[replacement.0].parent = Some(parent);
        }
        Ok(())
    }

    fn replace_children(&mut self, parent: &NodeId, children: &[NodeId]) -> Result<(), DomError> {
        if self.kind(parent) == NodeKind::Text {
            return Err(DomError::NotAnElement);
        }
        for old in std::mem::take(&mut self.nodes[parent.0].children) {
            self.nodes[old.0].parent = None;
        }
        for &child in children {
            self.link(*parent, child);
        }
        Ok(())
    }

    fn deep_clone(&mut self, node: &NodeId) -> NodeId {
        let data = self.nodes[node.0].data.clone();
        let copy = self.push(data);
        for child in self.nodes[node.0].children.clone() {
            let child_copy = self.deep_clone(&child);
            self.link(copy, child_copy);
        }
        copy
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        let mut current = Some(*node);
        while let Some(id) = current {
            if id == self.document {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    fn query(&self, selector: &str) -> Result<Option<NodeId>, DomError> {
        let matcher = Selector::parse(selector)?;
        Ok(self.find(self.document, &matcher))
    }
}

/// Single simple selector: `tag`, `#id`, `.class` or `[attr]`
enum Selector {
    Tag(String),
    Id(String),
    Class(String),
    Attribute(String),
}

impl Selector {
    fn parse(selector: &str) -> Result<Self, DomError> {
        let selector = selector.trim();
        let invalid = || DomError::InvalidSelector(selector.to_string());
        let valid_ident =
            |s: &str| !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_');

        let parsed = if let Some(id) = selector.strip_prefix('#') {
            Selector::Id(id.to_string())
        } else if let Some(class) = selector.strip_prefix('.') {
            Selector::Class(class.to_string())
        } else if let Some(attr) = selector.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            Selector::Attribute(attr.to_string())
        } else {
            Selector::Tag(selector.to_ascii_lowercase())
        };

        let ident = match &parsed {
            Selector::Tag(s) | Selector::Id(s) | Selector::Class(s) | Selector::Attribute(s) => s,
        };
        if valid_ident(ident) {
            Ok(parsed)
        } else {
            Err(invalid())
        }
    }

    fn matches(&self, tag: &str, attrs: &[(String, String)]) -> bool {
        let attr = |name: &str| attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str());
        match self {
            Selector::Tag(t) => tag == t,
            Selector::Id(id) => attr("id") == Some(id.as_str()),
            Selector::Class(class) => attr("class")
                .map(|v| v.split_whitespace().any(|c| c == class))
                .unwrap_or(false),
            Selector::Attribute(name) => attr(name).is_some(),
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
