//! Character group definitions
//!
//! A group is either a regex string (`"numbers": "[0-9]"`), a structured
//! filter naming exactly one selector, or a predicate supplied from code.

use crate::error::ConfigError;
use crate::split::CharContext;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

/// Predicate over a char position
#[derive(Clone)]
pub struct GroupPredicate(Rc<dyn Fn(&CharContext) -> bool>);

impl GroupPredicate {
    pub fn new(predicate: impl Fn(&CharContext) -> bool + 'static) -> Self {
        Self(Rc::new(predicate))
    }

    pub fn test(&self, context: &CharContext) -> bool {
        (self.0)(context)
    }
}

impl fmt::Debug for GroupPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GroupPredicate(..)")
    }
}

/// Structured group filter; exactly one selector field must be set
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct GroupFilter {
    pub pattern: Option<String>,
    /// Every nth char position
    pub every: Option<usize>,
    /// Offset for `every` (position % every == offset)
    pub offset: Option<usize>,
    pub indices: Option<Vec<usize>>,
    /// Word indices whose chars belong to the group
    pub words: Option<Vec<usize>>,
}

/// Group definition as written in the configuration
#[derive(Deserialize, Clone, Debug)]
#[serde(untagged)]
pub enum GroupDef {
    Pattern(String),
    Filter(GroupFilter),
    #[serde(skip)]
    Predicate(GroupPredicate),
}

impl GroupDef {
    pub fn predicate(predicate: impl Fn(&CharContext) -> bool + 'static) -> Self {
        GroupDef::Predicate(GroupPredicate::new(predicate))
    }

    /// Validate the definition and turn it into a matcher
    pub fn compile(&self, name: &str) -> Result<CompiledGroup, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidGroup {
            group: name.to_string(),
            reason,
        };

        if name.is_empty() {
            return Err(invalid("group name is empty".to_string()));
        }

        let matcher = match self {
            GroupDef::Pattern(pattern) => compile_pattern(pattern).map_err(invalid)?,
            GroupDef::Predicate(predicate) => GroupMatcher::Predicate(predicate.clone()),
            GroupDef::Filter(filter) => {
                let selectors = [
                    filter.pattern.is_some(),
                    filter.every.is_some(),
                    filter.indices.is_some(),
                    filter.words.is_some(),
                ];
                let count = selectors.iter().filter(|set| **set).count();
                if count != 1 {
                    return Err(invalid(format!(
                        "expected exactly one of pattern/every/indices/words, found {}",
                        count
                    )));
                }
                if filter.offset.is_some() && filter.every.is_none() {
                    return Err(invalid("offset requires every".to_string()));
                }

                if let Some(pattern) = &filter.pattern {
                    compile_pattern(pattern).map_err(invalid)?
                } else if let Some(every) = filter.every {
                    let offset = filter.offset.unwrap_or(0);
                    if every == 0 {
                        return Err(invalid("every must be at least 1".to_string()));
                    }
                    if offset >= every {
                        return Err(invalid(format!("offset {} must be below every {}", offset, every)));
                    }
                    GroupMatcher::Every { every, offset }
                } else if let Some(indices) = &filter.indices {
                    GroupMatcher::Indices(indices.iter().copied().collect())
                } else {
                    let words = filter.words.as_deref().unwrap_or_default();
                    GroupMatcher::Words(words.iter().copied().collect())
                }
            }
        };

        Ok(CompiledGroup {
            name: name.to_string(),
            matcher,
        })
    }
}

fn compile_pattern(pattern: &str) -> Result<GroupMatcher, String> {
    if pattern.is_empty() {
        return Err("pattern is empty".to_string());
    }
    Regex::new(pattern)
        .map(GroupMatcher::Pattern)
        .map_err(|e| e.to_string())
}

/// Compiled selector of a group
#[derive(Clone, Debug)]
pub enum GroupMatcher {
    Pattern(Regex),
    Every { every: usize, offset: usize },
    Indices(BTreeSet<usize>),
    Words(BTreeSet<usize>),
    Predicate(GroupPredicate),
}

impl GroupMatcher {
    pub fn matches(&self, context: &CharContext) -> bool {
        match self {
            GroupMatcher::Pattern(regex) => {
                let mut buf = [0u8; 4];
                regex.is_match(context.ch.encode_utf8(&mut buf))
            }
            GroupMatcher::Every { every, offset } => context.index % every == *offset,
            GroupMatcher::Indices(indices) => indices.contains(&context.index),
            GroupMatcher::Words(words) => context
                .word_index
                .map(|w| words.contains(&w))
                .unwrap_or(false),
            GroupMatcher::Predicate(predicate) => predicate.test(context),
        }
    }
}

/// Named, validated group
#[derive(Clone, Debug)]
pub struct CompiledGroup {
    pub name: String,
    pub matcher: GroupMatcher,
}
