//! Browser DOM backend built on `web-sys`

use super::{NodeKind, UiTree};
use crate::error::DomError;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Node};

/// [`UiTree`] over the live browser document
#[derive(Clone, Debug)]
pub struct WebTree {
    document: Document,
}

impl WebTree {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Tree over `window.document`
    pub fn from_window() -> Result<Self, DomError> {
        web_sys::window()
            .and_then(|w| w.document())
            .map(Self::new)
            .ok_or_else(|| DomError::Operation("no global document".to_string()))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn element<'a>(&self, node: &'a Node) -> Result<&'a Element, DomError> {
        node.dyn_ref::<Element>().ok_or(DomError::NotAnElement)
    }

    fn fragment(&self, nodes: &[Node]) -> Result<web_sys::DocumentFragment, DomError> {
        let fragment = self.document.create_document_fragment();
        for node in nodes {
            fragment.append_child(node).map_err(js_error)?;
        }
        Ok(fragment)
    }
}

impl UiTree for WebTree {
    type Node = Node;

    fn kind(&self, node: &Node) -> NodeKind {
        match node.node_type() {
            Node::ELEMENT_NODE => NodeKind::Element,
            Node::TEXT_NODE | Node::CDATA_SECTION_NODE => NodeKind::Text,
            _ => NodeKind::Other,
        }
    }

    fn tag_name(&self, node: &Node) -> Option<String> {
        node.dyn_ref::<Element>()
            .map(|el| el.tag_name().to_ascii_lowercase())
    }

    fn children(&self, node: &Node) -> Vec<Node> {
        let list = node.child_nodes();
        (0..list.length()).filter_map(|i| list.item(i)).collect()
    }

    fn parent(&self, node: &Node) -> Option<Node> {
        node.parent_node()
    }

    fn text_content(&self, node: &Node) -> String {
        node.text_content().unwrap_or_default()
    }

    fn attribute(&self, node: &Node, name: &str) -> Option<String> {
        node.dyn_ref::<Element>()?.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Node, name: &str, value: &str) -> Result<(), DomError> {
        self.element(node)?
            .set_attribute(name, value)
            .map_err(js_error)
    }

    fn remove_attribute(&mut self, node: &Node, name: &str) -> Result<(), DomError> {
        self.element(node)?.remove_attribute(name).map_err(js_error)
    }

    fn create_element(&mut self, tag: &str) -> Result<Node, DomError> {
        self.document
            .create_element(tag)
            .map(Node::from)
            .map_err(js_error)
    }

    fn create_text(&mut self, text: &str) -> Node {
        self.document.create_text_node(text).into()
    }

    fn append_child(&mut self, parent: &Node, child: &Node) -> Result<(), DomError> {
        parent.append_child(child).map(|_| ()).map_err(js_error)
    }

    fn replace_with(&mut self, node: &Node, replacements: &[Node]) -> Result<(), DomError> {
        let parent = node.parent_node().ok_or(DomError::NoParent)?;
        let fragment = self.fragment(replacements)?;
        parent
            .replace_child(&fragment, node)
            .map(|_| ())
            .map_err(js_error)
    }

    fn replace_children(&mut self, parent: &Node, children: &[Node]) -> Result<(), DomError> {
        // Build the fragment first so the container is never left half filled
        let fragment = self.fragment(children)?;
        parent.set_text_content(None);
        parent.append_child(&fragment).map(|_| ()).map_err(js_error)
    }

    fn deep_clone(&mut self, node: &Node) -> Node {
        node.clone_node_with_deep(true).unwrap_or_else(|_| node.clone())
    }

    fn is_connected(&self, node: &Node) -> bool {
        node.is_connected()
    }

    fn query(&self, selector: &str) -> Result<Option<Node>, DomError> {
        self.document
            .query_selector(selector)
            .map(|found| found.map(Node::from))
            .map_err(|_| DomError::InvalidSelector(selector.to_string()))
    }
}

fn js_error(value: JsValue) -> DomError {
    DomError::Operation(
        value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value)),
    )
}
