//! Character grouping
//!
//! Assigns wrapped chars to the configured groups. Groups are derived data:
//! they are recomputed after every wrap and every transition.

use super::{word_indices, CharEntry};
use crate::config::{CompiledGroup, DataAttributes};
use crate::dom::UiTree;
use crate::error::DomError;
use serde::Serialize;
use std::collections::BTreeMap;

/// Group name → member elements, in char order
pub type GroupResult<N> = BTreeMap<String, Vec<N>>;

/// What a group predicate sees for one char position
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CharContext {
    #[serde(rename = "char")]
    pub ch: char,
    /// Position in the wrapped char sequence
    pub index: usize,
    pub word_index: Option<usize>,
    pub is_first_in_word: bool,
    pub is_last_in_word: bool,
    pub is_space: bool,
}

/// Groups plus, for every char, the names of the groups it belongs to
#[derive(Clone, Debug)]
pub struct GroupAssignment<N> {
    pub groups: GroupResult<N>,
    pub memberships: Vec<Vec<String>>,
}

impl<N> Default for GroupAssignment<N> {
    fn default() -> Self {
        Self {
            groups: BTreeMap::new(),
            memberships: Vec::new(),
        }
    }
}

pub struct CharacterGrouper<'a> {
    groups: &'a [CompiledGroup],
}

impl<'a> CharacterGrouper<'a> {
    pub fn new(groups: &'a [CompiledGroup]) -> Self {
        Self { groups }
    }

    /// Build the predicate context of every entry
    ///
    /// Word boundaries come from the whitespace-delimited words of `text`,
    /// which each entry indexes through `source_index`.
    pub fn contexts<N>(entries: &[CharEntry<N>], text: &[char]) -> Vec<CharContext> {
        let words = word_indices(text);
        let word_at = |i: usize| words.get(i).copied().flatten();

        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let source = entry.source_index;
                let word_index = word_at(source);
                let is_first_in_word =
                    word_index.is_some() && (source == 0 || word_at(source - 1) != word_index);
                let is_last_in_word = word_index.is_some() && word_at(source + 1) != word_index;
                CharContext {
                    ch: entry.ch,
                    index,
                    word_index,
                    is_first_in_word,
                    is_last_in_word,
                    is_space: entry.ch.is_whitespace(),
                }
            })
            .collect()
    }

    pub fn classify<N: Clone>(&self, entries: &[CharEntry<N>], text: &[char]) -> GroupAssignment<N> {
        let contexts = Self::contexts(entries, text);
        let mut assignment = GroupAssignment {
            groups: self
                .groups
                .iter()
                .map(|g| (g.name.clone(), Vec::new()))
                .collect(),
            memberships: vec![Vec::new(); entries.len()],
        };

        for (entry, context) in entries.iter().zip(&contexts) {
            for group in self.groups {
                if group.matcher.matches(context) {
                    if let Some(members) = assignment.groups.get_mut(&group.name) {
                        members.push(entry.node.clone());
                    }
                    assignment.memberships[context.index].push(group.name.clone());
                }
            }
        }
        assignment
    }
}

/// Write group markers (`subSetName` attribute, `subSetClass` classes) on chars
///
/// Only the `{prefix}-{group}` classes of configured groups are replaced, so a
/// prefix shared with the factory classes leaves those untouched.
pub fn apply_group_markers<T: UiTree>(
    tree: &mut T,
    entries: &[CharEntry<T::Node>],
    assignment: &GroupAssignment<T::Node>,
    data: &DataAttributes,
) -> Result<(), DomError> {
    if data.sub_set_name.is_none() && data.sub_set_class.is_none() {
        return Ok(());
    }

    let markers: BTreeMap<&str, String> = match &data.sub_set_class {
        Some(prefix) => assignment
            .groups
            .keys()
            .map(|name| (name.as_str(), format!("{}-{}", prefix, name)))
            .collect(),
        None => BTreeMap::new(),
    };

    for (entry, groups) in entries.iter().zip(&assignment.memberships) {
        if let Some(attr) = &data.sub_set_name {
            if groups.is_empty() {
                tree.remove_attribute(&entry.node, attr)?;
            } else {
                tree.set_attribute(&entry.node, attr, &groups.join(" "))?;
            }
        }

        if data.sub_set_class.is_some() {
            let mut classes: Vec<String> = tree
                .classes(&entry.node)
                .into_iter()
                .filter(|c| !markers.values().any(|m| m == c))
                .collect();
            for group in groups {
                if let Some(marker) = markers.get(group.as_str()) {
                    if !classes.contains(marker) {
                        classes.push(marker.clone());
                    }
                }
            }
            tree.set_classes(&entry.node, &classes)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroupDef;
    use crate::split::CharKind;

    fn entries(text: &str) -> (Vec<CharEntry<usize>>, Vec<char>) {
        let chars: Vec<char> = text.chars().collect();
        let entries = chars
            .iter()
            .enumerate()
            .map(|(i, &ch)| CharEntry {
                node: i,
                ch,
                kind: CharKind::classify(ch),
                word_index: None,
                source_index: i,
            })
            .collect();
        (entries, chars)
    }

    fn compile(defs: &[(&str, GroupDef)]) -> Vec<CompiledGroup> {
        defs.iter().map(|(name, def)| def.compile(name).unwrap()).collect()
    }

    #[test]
    fn test_numbers_group() {
        let (entries, text) = entries("Hello 123");
        let groups = compile(&[("numbers", GroupDef::Pattern("[0-9]".to_string()))]);
        let result = CharacterGrouper::new(&groups).classify(&entries, &text);
        assert_eq!(result.groups["numbers"], vec![6, 7, 8]);
    }

    #[test]
    fn test_overlapping_groups_and_memberships() {
        let (entries, text) = entries("ab1");
        let groups = compile(&[
            ("letters", GroupDef::Pattern("[a-z]".to_string())),
            ("alnum", GroupDef::Pattern("[a-z0-9]".to_string())),
            ("empty", GroupDef::Pattern("[X]".to_string())),
        ]);
        let result = CharacterGrouper::new(&groups).classify(&entries, &text);

        assert_eq!(result.groups["letters"], vec![0, 1]);
        assert_eq!(result.groups["alnum"], vec![0, 1, 2]);
        assert!(result.groups["empty"].is_empty());
        assert_eq!(result.memberships[0], vec!["letters", "alnum"]);
        assert_eq!(result.memberships[2], vec!["alnum"]);
    }

    #[test]
    fn test_word_boundary_context() {
        let (entries, text) = entries("ab c");
        let contexts = CharacterGrouper::contexts(&entries, &text);

        assert!(contexts[0].is_first_in_word);
        assert!(!contexts[0].is_last_in_word);
        assert!(contexts[1].is_last_in_word);
        assert_eq!(contexts[2].word_index, None);
        assert!(contexts[2].is_space);
        assert!(!contexts[2].is_first_in_word);
        assert!(contexts[3].is_first_in_word && contexts[3].is_last_in_word);
        assert_eq!(contexts[3].word_index, Some(1));
    }

    #[test]
    fn test_context_uses_source_positions() {
        // Spaces are not wrapped: entries skip source index 1
        let text: Vec<char> = "a b".chars().collect();
        let entries = vec![
            CharEntry { node: 0, ch: 'a', kind: CharKind::REGULAR, word_index: Some(0), source_index: 0 },
            CharEntry { node: 1, ch: 'b', kind: CharKind::REGULAR, word_index: Some(1), source_index: 2 },
        ];
        let contexts = CharacterGrouper::contexts(&entries, &text);
        assert_eq!(contexts[1].index, 1);
        assert_eq!(contexts[1].word_index, Some(1));
        assert!(contexts[1].is_first_in_word);
    }

    #[test]
    fn test_predicate_on_word_start() {
        let (entries, text) = entries("hi there");
        let groups = compile(&[("initials", GroupDef::predicate(|ctx| ctx.is_first_in_word))]);
        let result = CharacterGrouper::new(&groups).classify(&entries, &text);
        assert_eq!(result.groups["initials"], vec![0, 3]);
    }

    #[test]
    fn test_context_serializes_camel_case() {
        let (entries, text) = entries("a");
        let contexts = CharacterGrouper::contexts(&entries, &text);
        let json = serde_json::to_value(&contexts[0]).unwrap();
        assert_eq!(json["char"], "a");
        assert_eq!(json["isFirstInWord"], true);
        assert_eq!(json["wordIndex"], 0);
    }
}
