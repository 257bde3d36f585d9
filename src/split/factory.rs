//! Element factory
//!
//! Turns characters and words into element descriptors. The factory owns the
//! positional counters; callers invoke [`ElementFactory::reset`] at the start
//! of every wrap cycle and every transition.
//!
//! Classes are emitted in a fixed order: base char class, then space,
//! special and regular classes (whichever apply), then the positional class.

use super::CharKind;
use crate::config::SplitConfig;
use crate::dom::UiTree;
use crate::error::DomError;

/// Everything needed to create one element
#[derive(Clone, Debug, PartialEq)]
pub struct ElementDescriptor {
    pub tag: String,
    /// Text content; `None` for containers filled later (words)
    pub text: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
}

impl ElementDescriptor {
    /// Create the element in `tree` (detached)
    pub fn materialize<T: UiTree>(&self, tree: &mut T) -> Result<T::Node, DomError> {
        let node = tree.create_element(&self.tag)?;
        if !self.classes.is_empty() {
            tree.set_classes(&node, &self.classes)?;
        }
        for (name, value) in &self.attributes {
            tree.set_attribute(&node, name, value)?;
        }
        if let Some(text) = &self.text {
            let text_node = tree.create_text(text);
            tree.append_child(&node, &text_node)?;
        }
        Ok(node)
    }
}

/// Builds wrapped char and word elements
#[derive(Clone, Debug)]
pub struct ElementFactory {
    config: SplitConfig,
    char_counter: usize,
    word_counter: usize,
    char_order: usize,
    word_order: usize,
}

impl ElementFactory {
    pub fn new(config: &SplitConfig) -> Self {
        Self {
            config: config.clone(),
            char_counter: 0,
            word_counter: 0,
            char_order: 0,
            word_order: 0,
        }
    }

    /// Restart numbering for a new wrap cycle or transition
    pub fn reset(&mut self) {
        self.char_counter = 0;
        self.word_counter = 0;
        self.char_order = 0;
        self.word_order = 0;
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// `{base}-{index}` zero-padded to the configured width
    pub fn positional_class(&self, base: &str, index: usize) -> String {
        format!("{}-{:0width$}", base, index, width = self.config.enumerate.pad_width)
    }

    /// Whether `class` is a positional class derived from `base`
    pub fn is_positional_class(base: &str, class: &str) -> bool {
        class
            .strip_prefix(base)
            .and_then(|rest| rest.strip_prefix('-'))
            .map(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false)
    }

    /// Consume the next positional index for a char of `kind`, if it is enumerated
    fn next_char_number(&mut self, kind: CharKind) -> Option<usize> {
        let enumerate = &self.config.enumerate;
        if !enumerate.chars {
            return None;
        }
        if kind.contains(CharKind::SPACE) && !enumerate.include_spaces {
            return None;
        }
        let special_only = kind.contains(CharKind::SPECIAL) && !kind.contains(CharKind::REGULAR);
        if special_only && !enumerate.include_special_chars {
            return None;
        }
        let number = self.char_counter;
        self.char_counter += 1;
        Some(number)
    }

    fn kind_classes(&self, kind: CharKind) -> Vec<String> {
        let classes = &self.config.classes;
        let mut out = vec![classes.char.clone()];
        if kind.contains(CharKind::SPACE) {
            out.push(classes.space.clone());
        }
        if kind.contains(CharKind::SPECIAL) {
            out.push(classes.special.clone());
        }
        if kind.contains(CharKind::REGULAR) {
            out.push(classes.regular.clone());
        }
        out
    }

    /// Text shown for `ch` (spaces use the configured replacement)
    pub fn display_text(&self, ch: char) -> String {
        if ch.is_whitespace() {
            self.config.replace_space_with.clone()
        } else {
            ch.to_string()
        }
    }

    fn next_order(counter: &mut usize) -> usize {
        let order = *counter;
        *counter += 1;
        order
    }

    /// Descriptor for one character element
    pub fn make_char(&mut self, ch: char) -> (ElementDescriptor, CharKind) {
        let kind = CharKind::classify(ch);
        let mut classes = self.kind_classes(kind);
        if let Some(number) = self.next_char_number(kind) {
            classes.push(self.positional_class(&self.config.classes.char, number));
        }

        let mut attributes = Vec::new();
        if self.config.accessibility.hides_elements() {
            attributes.push(("aria-hidden".to_string(), "true".to_string()));
        }
        let order = Self::next_order(&mut self.char_order);
        if let Some(name) = &self.config.data_attributes.custom_order {
            attributes.push((name.clone(), order.to_string()));
        }

        let descriptor = ElementDescriptor {
            tag: self.config.tags.char.to_ascii_lowercase(),
            text: Some(self.display_text(ch)),
            classes,
            attributes,
        };
        (descriptor, kind)
    }

    /// Descriptor for a word container (children appended by the caller)
    pub fn make_word(&mut self) -> ElementDescriptor {
        let mut classes = vec![self.config.classes.word.clone()];
        if self.config.enumerate.words {
            classes.push(self.positional_class(&self.config.classes.word, self.word_counter));
            self.word_counter += 1;
        }

        let mut attributes = Vec::new();
        if self.config.accessibility.hides_elements() {
            attributes.push(("aria-hidden".to_string(), "true".to_string()));
        }
        let order = Self::next_order(&mut self.word_order);
        if let Some(name) = &self.config.data_attributes.custom_order {
            attributes.push((name.clone(), order.to_string()));
        }

        ElementDescriptor {
            tag: self.config.tags.word.to_ascii_lowercase(),
            text: None,
            classes,
            attributes,
        }
    }

    /// Create a char element in `tree`
    pub fn create_char<T: UiTree>(&mut self, tree: &mut T, ch: char) -> Result<(T::Node, CharKind), DomError> {
        let (descriptor, kind) = self.make_char(ch);
        Ok((descriptor.materialize(tree)?, kind))
    }

    /// Give a reused char element the positional class of its new slot
    ///
    /// Classes not produced by the factory are preserved.
    pub fn retag_char<T: UiTree>(&mut self, tree: &mut T, node: &T::Node, ch: char) -> Result<CharKind, DomError> {
        let kind = CharKind::classify(ch);
        let base = self.config.classes.char.clone();

        let mut classes: Vec<String> = tree
            .classes(node)
            .into_iter()
            .filter(|class| !Self::is_positional_class(&base, class))
            .collect();
        if let Some(number) = self.next_char_number(kind) {
            classes.push(self.positional_class(&base, number));
        }
        tree.set_classes(node, &classes)?;

        let order = Self::next_order(&mut self.char_order);
        if let Some(name) = &self.config.data_attributes.custom_order {
            tree.set_attribute(node, name, &order.to_string())?;
        }
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryTree;

    fn positional(descriptor: &ElementDescriptor) -> Option<&str> {
        descriptor
            .classes
            .iter()
            .find(|c| ElementFactory::is_positional_class("split-char", c))
            .map(String::as_str)
    }

    #[test]
    fn test_enumeration_is_zero_padded() {
        let mut factory = ElementFactory::new(&SplitConfig::default());
        let classes: Vec<String> = "abc"
            .chars()
            .map(|ch| positional(&factory.make_char(ch).0).unwrap().to_string())
            .collect();
        assert_eq!(classes, vec!["split-char-000", "split-char-001", "split-char-002"]);
    }

    #[test]
    fn test_enumeration_grows_past_padding() {
        let mut factory = ElementFactory::new(&SplitConfig::default());
        for _ in 0..1000 {
            factory.make_char('x');
        }
        let (descriptor, _) = factory.make_char('x');
        assert_eq!(positional(&descriptor), Some("split-char-1000"));
    }

    #[test]
    fn test_spaces_skip_numbering_by_default() {
        let mut factory = ElementFactory::new(&SplitConfig::default());
        let (a, _) = factory.make_char('a');
        let (space, kind) = factory.make_char(' ');
        let (b, _) = factory.make_char('b');

        assert_eq!(kind, CharKind::SPACE);
        assert_eq!(positional(&a), Some("split-char-000"));
        assert_eq!(positional(&space), None);
        assert_eq!(positional(&b), Some("split-char-001"));
        assert_eq!(space.text.as_deref(), Some("\u{00A0}"));
    }

    #[test]
    fn test_include_spaces_numbers_spaces() {
        let mut config = SplitConfig::default();
        config.enumerate.include_spaces = true;
        let mut factory = ElementFactory::new(&config);
        factory.make_char('a');
        let (space, _) = factory.make_char(' ');
        assert_eq!(positional(&space), Some("split-char-001"));
    }

    #[test]
    fn test_class_order_is_fixed() {
        let mut factory = ElementFactory::new(&SplitConfig::default());
        let (descriptor, _) = factory.make_char('_');
        assert_eq!(
            descriptor.classes,
            vec!["split-char", "split-special", "split-regular", "split-char-000"]
        );
    }

    #[test]
    fn test_reset_restarts_numbering() {
        let mut factory = ElementFactory::new(&SplitConfig::default());
        factory.make_char('a');
        factory.make_char('b');
        factory.reset();
        let (descriptor, _) = factory.make_char('c');
        assert_eq!(positional(&descriptor), Some("split-char-000"));
    }

    #[test]
    fn test_accessibility_and_custom_order_attributes() {
        let mut config = SplitConfig::default();
        config.data_attributes.custom_order = Some("data-order".to_string());
        let mut factory = ElementFactory::new(&config);
        factory.make_char('a');
        let (descriptor, _) = factory.make_char('b');

        assert!(descriptor
            .attributes
            .contains(&("aria-hidden".to_string(), "true".to_string())));
        assert!(descriptor
            .attributes
            .contains(&("data-order".to_string(), "1".to_string())));

        config.accessibility.aria_hidden = false;
        let mut factory = ElementFactory::new(&config);
        let (descriptor, _) = factory.make_char('a');
        assert!(!descriptor.attributes.iter().any(|(k, _)| k == "aria-hidden"));
    }

    #[test]
    fn test_word_enumeration() {
        let mut config = SplitConfig::default();
        config.enumerate.words = true;
        let mut factory = ElementFactory::new(&config);
        factory.make_word();
        let word = factory.make_word();
        assert_eq!(word.classes, vec!["split-word", "split-word-001"]);
        assert_eq!(word.text, None);
    }

    #[test]
    fn test_retag_replaces_positional_class_only() {
        let mut tree = MemoryTree::new();
        let mut factory = ElementFactory::new(&SplitConfig::default());
        factory.make_char('x');
        factory.make_char('y');
        let (node, _) = factory.create_char(&mut tree, 'z').unwrap();
        tree.add_class(&node, "custom").unwrap();
        assert!(tree.has_class(&node, "split-char-002"));

        factory.reset();
        factory.retag_char(&mut tree, &node, 'z').unwrap();

        assert!(tree.has_class(&node, "split-char-000"));
        assert!(!tree.has_class(&node, "split-char-002"));
        assert!(tree.has_class(&node, "custom"));
        assert!(tree.has_class(&node, "split-regular"));
    }

    #[test]
    fn test_materialize_builds_element() {
        let mut tree = MemoryTree::new();
        let mut factory = ElementFactory::new(&SplitConfig::default());
        let (node, _) = factory.create_char(&mut tree, 'Q').unwrap();
        assert_eq!(
            tree.outer_html(node),
            "<span class=\"split-char split-regular split-char-000\" aria-hidden=\"true\">Q</span>"
        );
    }

    #[test]
    fn test_positional_class_detection() {
        assert!(ElementFactory::is_positional_class("split-char", "split-char-001"));
        assert!(!ElementFactory::is_positional_class("split-char", "split-char"));
        assert!(!ElementFactory::is_positional_class("split-char", "split-char-x"));
        assert!(!ElementFactory::is_positional_class("split-char", "split-word-001"));
    }
}
