//! Tree processing
//!
//! Collects the text segments under a root and replaces each text node, in
//! one operation, with its fully built sequence of wrapped elements.

use super::{word_indices, CharEntry, CharKind, ElementFactory, WordEntry};
use crate::config::SplitConfig;
use crate::dom::{NodeKind, UiTree};
use crate::error::DomError;

/// Elements whose text is never split
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "template", "noscript", "textarea", "svg"];

/// A run of renderable text and the text node it came from
#[derive(Clone, Debug, PartialEq)]
pub struct TextSegment<N> {
    pub node: N,
    pub text: String,
}

/// Result of wrapping a subtree
#[derive(Clone, Debug)]
pub struct WrapOutput<N> {
    /// Normalized source text, including chars that were not wrapped
    pub text: Vec<char>,
    pub chars: Vec<CharEntry<N>>,
    pub words: Vec<WordEntry<N>>,
}

/// Walks a subtree and swaps its text for wrapped elements
pub struct TreeProcessor<'a> {
    config: &'a SplitConfig,
}

impl<'a> TreeProcessor<'a> {
    pub fn new(config: &'a SplitConfig) -> Self {
        Self { config }
    }

    /// Depth-first list of the text segments under `root`
    pub fn extract_segments<T: UiTree>(&self, tree: &T, root: &T::Node) -> Vec<TextSegment<T::Node>> {
        let mut segments = Vec::new();
        self.walk(tree, root, &mut segments);

        if self.config.normalize_whitespace {
            if let Some(first) = segments.first_mut() {
                first.text = first.text.trim_start().to_string();
            }
            if let Some(last) = segments.last_mut() {
                last.text = last.text.trim_end().to_string();
            }
            segments.retain(|segment| !segment.text.is_empty());
        }
        segments
    }

    fn walk<T: UiTree>(&self, tree: &T, node: &T::Node, segments: &mut Vec<TextSegment<T::Node>>) {
        for child in tree.children(node) {
            match tree.kind(&child) {
                NodeKind::Element => {
                    let skipped = tree
                        .tag_name(&child)
                        .map(|tag| NON_CONTENT_TAGS.contains(&tag.as_str()))
                        .unwrap_or(false)
                        || tree.attribute(&child, &self.config.exclude_attribute).is_some();
                    if !skipped {
                        self.walk(tree, &child, segments);
                    }
                }
                NodeKind::Text => {
                    let raw = tree.text_content(&child);
                    let text = if self.config.normalize_whitespace {
                        // Indentation between block elements is markup, not text
                        if raw.trim().is_empty() && raw.contains('\n') {
                            continue;
                        }
                        collapse_whitespace(&raw)
                    } else {
                        raw
                    };
                    if !text.is_empty() {
                        segments.push(TextSegment { node: child, text });
                    }
                }
                NodeKind::Other => {}
            }
        }
    }

    /// Replace every segment with wrapped elements
    pub fn process<T: UiTree>(
        &self,
        tree: &mut T,
        segments: &[TextSegment<T::Node>],
        factory: &mut ElementFactory,
    ) -> Result<WrapOutput<T::Node>, DomError> {
        let text: Vec<char> = segments.iter().flat_map(|s| s.text.chars()).collect();
        let words_of = word_indices(&text);

        let mut output = WrapOutput {
            text: Vec::with_capacity(text.len()),
            chars: Vec::new(),
            words: Vec::new(),
        };

        let mut offset = 0;
        for segment in segments {
            let chars: Vec<char> = segment.text.chars().collect();
            let mut top = NodeSink::default();

            for run in runs(&chars) {
                let run_start = offset + run.start;
                let run_chars = &chars[run.clone()];

                if run_chars[0].is_whitespace() || !self.config.wrap.words {
                    for (i, &ch) in run_chars.iter().enumerate() {
                        let index = run_start + i;
                        self.emit_char(tree, factory, &mut top, &mut output, ch, index, words_of[index])?;
                    }
                    continue;
                }

                let word = factory.make_word().materialize(tree)?;
                let mut inner = NodeSink::default();
                for (i, &ch) in run_chars.iter().enumerate() {
                    let index = run_start + i;
                    self.emit_char(tree, factory, &mut inner, &mut output, ch, index, words_of[index])?;
                }
                for child in inner.finish(tree) {
                    tree.append_child(&word, &child)?;
                }
                top.push_node(tree, word.clone());
                output.words.push(WordEntry {
                    node: word,
                    text: run_chars.iter().collect(),
                });
            }

            let nodes = top.finish(tree);
            tree.replace_with(&segment.node, &nodes)?;
            offset += chars.len();
        }

        output.text = text;
        log::debug!(
            "Wrapped {} segments: {} chars, {} words",
            segments.len(),
            output.chars.len(),
            output.words.len()
        );
        Ok(output)
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_char<T: UiTree>(
        &self,
        tree: &mut T,
        factory: &mut ElementFactory,
        sink: &mut NodeSink<T::Node>,
        output: &mut WrapOutput<T::Node>,
        ch: char,
        source_index: usize,
        word_index: Option<usize>,
    ) -> Result<(), DomError> {
        let kind = CharKind::classify(ch);
        if !self.config.wraps_kind(kind) {
            sink.push_text(ch);
            return Ok(());
        }

        let (node, kind) = factory.create_char(tree, ch)?;
        sink.push_node(tree, node.clone());
        output.chars.push(CharEntry {
            node,
            ch,
            kind,
            word_index,
            source_index,
        });
        Ok(())
    }
}

/// Accumulates output nodes, coalescing unwrapped chars into text nodes
struct NodeSink<N> {
    nodes: Vec<N>,
    pending: String,
}

impl<N> Default for NodeSink<N> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            pending: String::new(),
        }
    }
}

impl<N> NodeSink<N> {
    fn push_text(&mut self, ch: char) {
        self.pending.push(ch);
    }

    fn flush<T: UiTree<Node = N>>(&mut self, tree: &mut T) {
        if !self.pending.is_empty() {
            let text = std::mem::take(&mut self.pending);
            self.nodes.push(tree.create_text(&text));
        }
    }

    fn push_node<T: UiTree<Node = N>>(&mut self, tree: &mut T, node: N) {
        self.flush(tree);
        self.nodes.push(node);
    }

    fn finish<T: UiTree<Node = N>>(mut self, tree: &mut T) -> Vec<N> {
        self.flush(tree);
        self.nodes
    }
}

/// Split into maximal runs of whitespace / non-whitespace
fn runs(chars: &[char]) -> Vec<std::ops::Range<usize>> {
    let mut result = Vec::new();
    let mut start = 0;
    for i in 1..=chars.len() {
        if i == chars.len() || chars[i].is_whitespace() != chars[start].is_whitespace() {
            if start < i {
                result.push(start..i);
            }
            start = i;
        }
    }
    result
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() && ch != '\u{00A0}' {
            if !last_space {
                out.push(' ');
            }
            last_space = true;
        } else {
            out.push(ch);
            last_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryTree;

    fn wrap(tree: &mut MemoryTree, root: crate::dom::NodeId, config: &SplitConfig) -> WrapOutput<crate::dom::NodeId> {
        let processor = TreeProcessor::new(config);
        let segments = processor.extract_segments(tree, &root);
        let mut factory = ElementFactory::new(config);
        processor.process(tree, &segments, &mut factory).unwrap()
    }

    #[test]
    fn test_runs() {
        let chars: Vec<char> = "ab  c".chars().collect();
        assert_eq!(runs(&chars), vec![0..2, 2..4, 4..5]);
        assert!(runs(&[]).is_empty());
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a \n\t b"), "a b");
        assert_eq!(collapse_whitespace("a\u{00A0}\u{00A0}b"), "a\u{00A0}\u{00A0}b");
    }

    #[test]
    fn test_extract_skips_excluded_and_non_content() {
        let mut tree = MemoryTree::new();
        let body = tree.body();
        let root = tree.el(body, "div", &[]);
        tree.text(root, "  Hello  ");
        let skip = tree.el(root, "span", &[("data-split-exclude", "")]);
        tree.text(skip, "ignored");
        let script = tree.el(root, "script", &[]);
        tree.text(script, "var x;");
        tree.comment(root, "note");
        let b = tree.el(root, "b", &[]);
        tree.text(b, "world ");

        let config = SplitConfig::default();
        let segments = TreeProcessor::new(&config).extract_segments(&tree, &root);
        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello ", "world"]);
    }

    #[test]
    fn test_extract_skips_indentation_segments() {
        let mut tree = MemoryTree::new();
        let body = tree.body();
        let root = tree.el(body, "div", &[]);
        tree.text(root, "\n  ");
        let p = tree.el(root, "p", &[]);
        tree.text(p, "Text");
        tree.text(root, "\n");

        let config = SplitConfig::default();
        let segments = TreeProcessor::new(&config).extract_segments(&tree, &root);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "Text");
    }

    #[test]
    fn test_wrap_words_and_chars() {
        let mut tree = MemoryTree::new();
        let body = tree.body();
        let root = tree.el(body, "p", &[]);
        tree.text(root, "Hi yo");

        let output = wrap(&mut tree, root, &SplitConfig::default());

        assert_eq!(output.chars.len(), 5);
        assert_eq!(output.words.len(), 2);
        assert_eq!(output.words[1].text, "yo");
        assert_eq!(output.chars[2].kind, CharKind::SPACE);
        assert_eq!(output.chars[2].word_index, None);
        assert_eq!(output.chars[3].word_index, Some(1));
        assert_eq!(tree.text_content(&root), "Hi\u{00A0}yo");

        let top = tree.children(&root);
        assert_eq!(top.len(), 3);
        assert!(tree.has_class(&top[0], "split-word"));
        assert!(tree.has_class(&top[1], "split-space"));
        assert_eq!(tree.children(&top[0]).len(), 2);
    }

    #[test]
    fn test_unwrapped_spaces_stay_text() {
        let mut tree = MemoryTree::new();
        let body = tree.body();
        let root = tree.el(body, "p", &[]);
        tree.text(root, "a b");

        let mut config = SplitConfig::default();
        config.wrap.spaces = false;
        let output = wrap(&mut tree, root, &config);

        assert_eq!(output.chars.len(), 2);
        assert_eq!(output.text, vec!['a', ' ', 'b']);
        assert_eq!(output.chars[1].source_index, 2);
        assert_eq!(tree.text_content(&root), "a b");
        assert_eq!(tree.kind(&tree.children(&root)[1]), NodeKind::Text);
    }

    #[test]
    fn test_unwrapped_special_chars_coalesce_inside_word() {
        let mut tree = MemoryTree::new();
        let body = tree.body();
        let root = tree.el(body, "p", &[]);
        tree.text(root, "a!?");

        let mut config = SplitConfig::default();
        config.wrap.special_chars = false;
        let output = wrap(&mut tree, root, &config);

        assert_eq!(output.chars.len(), 1);
        let word = &output.words[0].node;
        let children = tree.children(word);
        assert_eq!(children.len(), 2);
        assert_eq!(tree.text_content(&children[1]), "!?");
    }

    #[test]
    fn test_chars_only_is_flat() {
        let mut tree = MemoryTree::new();
        let body = tree.body();
        let root = tree.el(body, "p", &[]);
        tree.text(root, "ab");

        let mut config = SplitConfig::default();
        config.wrap.words = false;
        let output = wrap(&mut tree, root, &config);

        assert!(output.words.is_empty());
        assert_eq!(tree.children(&root).len(), 2);
        assert_eq!(
            tree.inner_html(root),
            "<span class=\"split-char split-regular split-char-000\" aria-hidden=\"true\">a</span>\
             <span class=\"split-char split-regular split-char-001\" aria-hidden=\"true\">b</span>"
        );
    }

    #[test]
    fn test_nested_markup_is_preserved() {
        let mut tree = MemoryTree::new();
        let body = tree.body();
        let root = tree.el(body, "p", &[]);
        tree.text(root, "Hel");
        let em = tree.el(root, "em", &[]);
        tree.text(em, "lo");

        let output = wrap(&mut tree, root, &SplitConfig::default());

        // One logical word spread over two segments
        assert_eq!(output.chars.len(), 5);
        assert!(output.chars.iter().all(|c| c.word_index == Some(0)));
        assert_eq!(output.words.len(), 2);
        assert_eq!(tree.parent(&output.words[1].node), Some(em));
        assert_eq!(tree.text_content(&root), "Hello");
    }
}
