//! UI tree abstraction
//!
//! Every component of the splitter talks to the document through [`UiTree`].
//! The browser backend lives in [`web`], the arena-backed [`memory`] tree is
//! used headless and in tests.

pub mod memory;
pub mod web;

pub use memory::{MemoryTree, NodeId};
pub use web::WebTree;

use crate::error::DomError;

/// Coarse node classification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    /// Comments, processing instructions, doctypes...
    Other,
}

/// Minimal mutable tree interface needed to split and patch text
///
/// Node handles are cheap to clone and compare by identity.
pub trait UiTree {
    type Node: Clone + PartialEq + std::fmt::Debug;

    fn kind(&self, node: &Self::Node) -> NodeKind;

    /// Lowercase tag name for elements, `None` otherwise
    fn tag_name(&self, node: &Self::Node) -> Option<String>;

    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Concatenated text of the node and its descendants
    fn text_content(&self, node: &Self::Node) -> String;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str) -> Result<(), DomError>;

    fn remove_attribute(&mut self, node: &Self::Node, name: &str) -> Result<(), DomError>;

    fn create_element(&mut self, tag: &str) -> Result<Self::Node, DomError>;

    fn create_text(&mut self, text: &str) -> Self::Node;

    /// Append `child`, detaching it from its current parent first
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), DomError>;

    /// Swap `node` for `replacements` in a single operation
    fn replace_with(&mut self, node: &Self::Node, replacements: &[Self::Node]) -> Result<(), DomError>;

    /// Replace every child of `parent` with `children` in a single operation
    fn replace_children(&mut self, parent: &Self::Node, children: &[Self::Node]) -> Result<(), DomError>;

    fn deep_clone(&mut self, node: &Self::Node) -> Self::Node;

    /// Whether the node is attached to its document
    fn is_connected(&self, node: &Self::Node) -> bool;

    /// First element matching a simple selector
    fn query(&self, selector: &str) -> Result<Option<Self::Node>, DomError>;

    // ------------------------------------------------------------------
    // Class helpers, implemented on top of the `class` attribute
    // ------------------------------------------------------------------

    fn classes(&self, node: &Self::Node) -> Vec<String> {
        self.attribute(node, "class")
            .map(|value| value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn set_classes(&mut self, node: &Self::Node, classes: &[String]) -> Result<(), DomError> {
        if classes.is_empty() {
            self.remove_attribute(node, "class")
        } else {
            self.set_attribute(node, "class", &classes.join(" "))
        }
    }

    fn has_class(&self, node: &Self::Node, class: &str) -> bool {
        self.classes(node).iter().any(|c| c == class)
    }

    fn add_class(&mut self, node: &Self::Node, class: &str) -> Result<(), DomError> {
        let mut classes = self.classes(node);
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
            self.set_classes(node, &classes)?;
        }
        Ok(())
    }
}
