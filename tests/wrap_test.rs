//! Wrapping, enumeration, grouping and unwrap round trips on the in-memory tree

use text_split_wasm::config::GroupFilter;
use text_split_wasm::{CharKind, GroupDef, MemoryTree, NodeId, RecordingDriver, SplitConfig, Splitter, UiTree};

type TestSplitter = Splitter<MemoryTree, RecordingDriver<NodeId>>;

fn splitter_for(text: &str, config: SplitConfig) -> TestSplitter {
    let mut tree = MemoryTree::new();
    let body = tree.body();
    let root = tree.el(body, "p", &[("id", "target")]);
    tree.text(root, text);
    Splitter::new(tree, RecordingDriver::new(), root, config).unwrap()
}

fn positional_classes(s: &TestSplitter, node: &NodeId) -> Vec<String> {
    s.tree()
        .classes(node)
        .into_iter()
        .filter(|c| c.starts_with("split-char-"))
        .collect()
}

#[test]
fn test_wrap_unwrap_round_trip_restores_markup() {
    let mut tree = MemoryTree::new();
    let body = tree.body();
    let root = tree.el(body, "p", &[("class", "lead")]);
    tree.text(root, "Hello ");
    let em = tree.el(root, "em", &[]);
    tree.text(em, "brave");
    tree.text(root, " world!");
    tree.comment(root, "end");
    let before = tree.inner_html(root);

    let mut s = Splitter::new(tree, RecordingDriver::new(), root, SplitConfig::default()).unwrap();
    for _ in 0..2 {
        s.wrap(None).unwrap();
        assert_ne!(s.tree().inner_html(root), before);
        assert_eq!(s.tree().text_content(&root).replace('\u{00A0}', " "), "Hello brave world!");

        s.unwrap().unwrap();
        assert_eq!(s.tree().inner_html(root), before);
    }
}

#[test]
fn test_unwrap_when_not_wrapped_is_noop() {
    let mut s = splitter_for("text", SplitConfig::default());
    let before = s.tree().inner_html(*s.root());
    s.unwrap().unwrap();
    assert_eq!(s.tree().inner_html(*s.root()), before);
}

#[test]
fn test_chars_are_enumerated() {
    let mut s = splitter_for("abc", SplitConfig::default());
    let output = s.wrap(None).unwrap();

    assert_eq!(output.chars.len(), 3);
    for (i, entry) in output.chars.iter().enumerate() {
        assert_eq!(positional_classes(&s, &entry.node), vec![format!("split-char-{:03}", i)]);
    }
}

#[test]
fn test_spaces_and_specials_skip_enumeration_by_default() {
    let mut s = splitter_for("a, b", SplitConfig::default());
    s.wrap(None).unwrap();

    let chars = s.chars();
    assert_eq!(chars.len(), 4);
    assert_eq!(positional_classes(&s, &chars[0].node), vec!["split-char-000"]);
    assert!(positional_classes(&s, &chars[1].node).is_empty());
    assert!(positional_classes(&s, &chars[2].node).is_empty());
    assert_eq!(positional_classes(&s, &chars[3].node), vec!["split-char-001"]);
    assert!(s.tree().has_class(&chars[1].node, "split-special"));
    assert!(s.tree().has_class(&chars[2].node, "split-space"));
}

#[test]
fn test_include_spaces_in_enumeration() {
    let mut config = SplitConfig::default();
    config.enumerate.include_spaces = true;
    config.enumerate.pad_width = 2;
    let mut s = splitter_for("a b", config);
    s.wrap(None).unwrap();

    let numbered: Vec<Vec<String>> = s.chars().iter().map(|c| positional_classes(&s, &c.node)).collect();
    assert_eq!(numbered, vec![vec!["split-char-00"], vec!["split-char-01"], vec!["split-char-02"]]);
}

#[test]
fn test_chars_by_type() {
    let mut s = splitter_for("Hi, you", SplitConfig::default());
    s.wrap(None).unwrap();

    let special: String = s.chars_by_type(CharKind::SPECIAL).iter().map(|c| c.ch).collect();
    let spaces = s.chars_by_type(CharKind::SPACE);
    let regular = s.chars_by_type(CharKind::REGULAR);

    assert_eq!(special, ",");
    assert_eq!(spaces.len(), 1);
    assert_eq!(regular.len(), 5);
}

#[test]
fn test_words_hold_their_chars() {
    let mut s = splitter_for("one two", SplitConfig::default());
    let output = s.wrap(None).unwrap();

    assert_eq!(output.words.len(), 2);
    assert_eq!(output.words[0].text, "one");
    assert_eq!(s.tree().text_content(&output.words[1].node), "two");
    assert_eq!(s.word_at(1).map(|w| w.text.as_str()), Some("two"));
    assert!(s.word_at(2).is_none());
    assert_eq!(s.char_at(4).map(|c| c.ch), Some('t'));
}

#[test]
fn test_numbers_group() {
    let mut config = SplitConfig::default();
    config
        .groups
        .insert("numbers".to_string(), GroupDef::Pattern("[0-9]".to_string()));
    let mut s = splitter_for("Hello 123", config);
    let output = s.wrap(None).unwrap();

    let expected: Vec<NodeId> = output.chars[6..9].iter().map(|c| c.node).collect();
    assert_eq!(output.groups["numbers"], expected);
    assert_eq!(s.groups()["numbers"], expected);
}

#[test]
fn test_group_markers_written_on_chars() {
    let mut config = SplitConfig::default();
    config.data_attributes.sub_set_name = Some("data-group".to_string());
    config.data_attributes.sub_set_class = Some("in".to_string());
    config
        .groups
        .insert("vowels".to_string(), GroupDef::Pattern("[aeiou]".to_string()));
    let mut s = splitter_for("Hey", config);
    s.wrap(None).unwrap();

    let e = s.chars()[1].node;
    let y = s.chars()[2].node;
    assert_eq!(s.tree().attribute(&e, "data-group").as_deref(), Some("vowels"));
    assert!(s.tree().has_class(&e, "in-vowels"));
    assert_eq!(s.tree().attribute(&y, "data-group"), None);
    assert!(!s.tree().has_class(&y, "in-vowels"));
}

#[test]
fn test_group_class_prefix_shared_with_generated_classes() {
    let mut config = SplitConfig::default();
    config.data_attributes.sub_set_class = Some("split".to_string());
    config
        .groups
        .insert("numbers".to_string(), GroupDef::Pattern("[0-9]".to_string()));
    let mut s = splitter_for("a1", config);
    s.wrap(None).unwrap();

    let a = s.chars()[0].node;
    let one = s.chars()[1].node;
    assert_eq!(s.tree().classes(&a), vec!["split-char", "split-regular", "split-char-000"]);
    assert_eq!(
        s.tree().classes(&one),
        vec!["split-char", "split-regular", "split-char-001", "split-numbers"]
    );
}

#[test]
fn test_groups_from_json_config() {
    let config = SplitConfig::from_json(
        r#"{
            "groups": {
                "second": { "words": [1] },
                "odd": { "every": 2, "offset": 1 }
            }
        }"#,
    )
    .unwrap();
    let mut s = splitter_for("ab cd", config);
    let output = s.wrap(None).unwrap();

    let nodes = |range: &[usize]| range.iter().map(|&i| output.chars[i].node).collect::<Vec<_>>();
    assert_eq!(output.groups["second"], nodes(&[3, 4]));
    assert_eq!(output.groups["odd"], nodes(&[1, 3]));
}

#[test]
fn test_filter_with_two_selectors_is_rejected() {
    let mut config = SplitConfig::default();
    config.groups.insert(
        "broken".to_string(),
        GroupDef::Filter(GroupFilter {
            pattern: Some("a".to_string()),
            every: Some(2),
            ..Default::default()
        }),
    );
    let mut tree = MemoryTree::new();
    let root = tree.body();
    assert!(Splitter::new(tree, RecordingDriver::new(), root, config).is_err());
}

#[test]
fn test_excluded_subtree_is_untouched() {
    let mut tree = MemoryTree::new();
    let body = tree.body();
    let root = tree.el(body, "p", &[]);
    tree.text(root, "Hi ");
    let skip = tree.el(root, "span", &[("data-split-exclude", "")]);
    tree.text(skip, "skip me");

    let mut s = Splitter::new(tree, RecordingDriver::new(), root, SplitConfig::default()).unwrap();
    s.wrap(None).unwrap();

    assert_eq!(s.text(), "Hi");
    assert_eq!(s.chars().len(), 2);
    assert_eq!(s.tree().inner_html(skip), "skip me");
}

#[test]
fn test_rewrap_applies_new_options() {
    let mut s = splitter_for("one two", SplitConfig::default());
    s.wrap(None).unwrap();
    assert_eq!(s.words().len(), 2);

    let mut flat = SplitConfig::default();
    flat.wrap.words = false;
    let output = s.rewrap(Some(flat)).unwrap();

    assert!(output.words.is_empty());
    assert_eq!(output.chars.len(), 7);
    assert_eq!(s.tree().children(s.root()).len(), 7);
}

#[test]
fn test_accessibility_attributes() {
    let mut config = SplitConfig::default();
    config.accessibility.add_title = true;
    config.data_attributes.custom_order = Some("data-order".to_string());
    let mut s = splitter_for("ab", config);
    s.wrap(None).unwrap();

    let root = *s.root();
    assert_eq!(s.tree().attribute(&root, "aria-label").as_deref(), Some("ab"));
    assert_eq!(s.tree().attribute(&root, "title").as_deref(), Some("ab"));

    let b = s.chars()[1].node;
    assert_eq!(s.tree().attribute(&b, "aria-hidden").as_deref(), Some("true"));
    assert_eq!(s.tree().attribute(&b, "data-order").as_deref(), Some("1"));

    s.unwrap().unwrap();
    assert_eq!(s.tree().attribute(&root, "title"), None);
}

#[test]
fn test_from_selector() {
    let mut tree = MemoryTree::new();
    let body = tree.body();
    let root = tree.el(body, "h2", &[("class", "headline")]);
    tree.text(root, "Go");

    let mut s = Splitter::from_selector(tree, RecordingDriver::new(), ".headline", SplitConfig::default()).unwrap();
    assert_eq!(*s.root(), root);
    assert_eq!(s.wrap(None).unwrap().chars.len(), 2);
}
