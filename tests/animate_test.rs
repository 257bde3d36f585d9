//! Preset animations driven through the splitter

use std::cell::Cell;
use std::rc::Rc;
use text_split_wasm::animation::{DriverCall, Preset};
use text_split_wasm::{
    AnimateOptions, GroupDef, MemoryTree, NodeId, PresetRegistry, RecordingDriver, SplitConfig, Splitter,
};

type TestSplitter = Splitter<MemoryTree, RecordingDriver<NodeId>>;

fn splitter_for(text: &str, config: SplitConfig) -> TestSplitter {
    let mut tree = MemoryTree::new();
    let body = tree.body();
    let root = tree.el(body, "div", &[]);
    tree.text(root, text);
    Splitter::new(tree, RecordingDriver::new(), root, config).unwrap()
}

fn animated_targets(s: &TestSplitter) -> Vec<Vec<NodeId>> {
    s.driver()
        .calls
        .iter()
        .filter_map(|c| match c {
            DriverCall::Animate { targets, .. } => Some(targets.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_fade_in_sets_start_state_then_animates() {
    let registry = PresetRegistry::with_builtins();
    let mut s = splitter_for("Hi", SplitConfig::default());
    s.wrap(None).unwrap();
    let fired = Rc::new(Cell::new(false));
    let flag = Rc::clone(&fired);

    let handle = s
        .animate(&registry, "fadeIn", &AnimateOptions::default(), Some(Box::new(move || flag.set(true))))
        .unwrap()
        .unwrap();

    let h = s.chars()[0].node;
    assert_eq!(s.driver().values(&h)["opacity"], 0.0);
    assert_eq!(animated_targets(&s), vec![vec![s.chars()[0].node, s.chars()[1].node]]);
    assert!(!handle.is_finished());

    s.driver_mut().finish_all();
    assert!(handle.is_finished());
    assert!(fired.get());
    assert_eq!(s.driver().values(&h)["opacity"], 1.0);
}

#[test]
fn test_word_preset_targets_words() {
    let registry = PresetRegistry::with_builtins();
    let mut s = splitter_for("one two", SplitConfig::default());
    s.wrap(None).unwrap();

    s.animate(&registry, "wordsFadeIn", &AnimateOptions::default(), None)
        .unwrap()
        .unwrap();

    let words: Vec<NodeId> = s.words().iter().map(|w| w.node).collect();
    assert_eq!(animated_targets(&s), vec![words]);
}

#[test]
fn test_group_option_restricts_targets() {
    let registry = PresetRegistry::with_builtins();
    let mut config = SplitConfig::default();
    config
        .groups
        .insert("numbers".to_string(), GroupDef::Pattern("[0-9]".to_string()));
    let mut s = splitter_for("Room 42", config);
    s.wrap(None).unwrap();

    let options = AnimateOptions {
        group: Some("numbers".to_string()),
        stagger: Some(0.2),
        ..Default::default()
    };
    s.animate(&registry, "fadeUp", &options, None).unwrap().unwrap();

    let digits: Vec<NodeId> = s.chars()[5..].iter().map(|c| c.node).collect();
    assert_eq!(animated_targets(&s), vec![digits]);
    match s.driver().calls.last() {
        Some(DriverCall::Animate { tween, .. }) => assert_eq!(tween.stagger, 0.2),
        other => panic!("expected an animate call, got {:?}", other),
    }
}

#[test]
fn test_unknown_group_does_nothing() {
    let registry = PresetRegistry::with_builtins();
    let mut s = splitter_for("abc", SplitConfig::default());
    s.wrap(None).unwrap();

    let options = AnimateOptions {
        group: Some("missing".to_string()),
        ..Default::default()
    };
    assert!(s.animate(&registry, "fadeIn", &options, None).unwrap().is_none());
    assert!(s.driver().calls.is_empty());
}

#[test]
fn test_unknown_preset_does_nothing() {
    let registry = PresetRegistry::with_builtins();
    let mut s = splitter_for("abc", SplitConfig::default());
    s.wrap(None).unwrap();

    let result = s.animate(&registry, "explode", &AnimateOptions::default(), None).unwrap();
    assert!(result.is_none());
    assert!(s.driver().calls.is_empty());
}

#[test]
fn test_animate_before_wrap_does_nothing() {
    let registry = PresetRegistry::with_builtins();
    let mut s = splitter_for("abc", SplitConfig::default());
    assert!(s
        .animate(&registry, "fadeIn", &AnimateOptions::default(), None)
        .unwrap()
        .is_none());
}

#[test]
fn test_custom_preset() {
    let mut registry = PresetRegistry::new();
    let preset: Preset = serde_json::from_str(r#"{ "to": { "rotation": 360 }, "duration": 2 }"#).unwrap();
    registry.register("spin", preset);

    let mut s = splitter_for("ab", SplitConfig::default());
    s.wrap(None).unwrap();
    s.animate(&registry, "spin", &AnimateOptions::default(), None)
        .unwrap()
        .unwrap();
    s.driver_mut().finish_all();

    let a = s.chars()[0].node;
    assert_eq!(s.driver().values(&a)["rotation"], 360.0);
    // No start state for presets without `from`
    assert!(!s
        .driver()
        .calls
        .iter()
        .any(|c| matches!(c, DriverCall::Set { .. })));
}

#[test]
fn test_empty_target_list_completes_immediately() {
    let registry = PresetRegistry::with_builtins();
    let mut config = SplitConfig::default();
    config.wrap.words = false;
    let mut s = splitter_for("abc", config);
    s.wrap(None).unwrap();

    let handle = s
        .animate(&registry, "wordsFadeIn", &AnimateOptions::default(), None)
        .unwrap()
        .unwrap();
    assert!(handle.is_finished());
}
