//! Splitter configuration
//!
//! Options are deserialized from a camelCase JS object or JSON document.
//! Every field has a default, so `{}` is a valid configuration. Validation
//! runs once, when a [`crate::Splitter`] is built or re-wrapped with new
//! options.

pub mod groups;

pub use groups::{CompiledGroup, GroupDef, GroupFilter, GroupMatcher, GroupPredicate};

use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Tags that may be used for generated char/word elements
pub const ALLOWED_TAGS: &[&str] = &["span", "div", "em", "strong", "b", "i", "mark", "small", "u", "s"];

/// Which pieces of text get their own element
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct WrapOptions {
    pub chars: bool,
    pub words: bool,
    pub spaces: bool,
    pub special_chars: bool,
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self {
            chars: true,
            words: true,
            spaces: true,
            special_chars: true,
        }
    }
}

/// Positional class numbering
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EnumerateOptions {
    pub chars: bool,
    pub words: bool,
    pub include_spaces: bool,
    pub include_special_chars: bool,
    /// Zero padding of the positional index (3 → `-007`)
    pub pad_width: usize,
}

impl Default for EnumerateOptions {
    fn default() -> Self {
        Self {
            chars: true,
            words: false,
            include_spaces: false,
            include_special_chars: false,
            pad_width: 3,
        }
    }
}

/// CSS class names applied to generated elements
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ClassNames {
    pub char: String,
    pub word: String,
    pub space: String,
    pub special: String,
    pub regular: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            char: "split-char".to_string(),
            word: "split-word".to_string(),
            space: "split-space".to_string(),
            special: "split-special".to_string(),
            regular: "split-regular".to_string(),
        }
    }
}

/// Element tags for generated elements
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TagNames {
    pub char: String,
    pub word: String,
}

impl Default for TagNames {
    fn default() -> Self {
        Self {
            char: "span".to_string(),
            word: "span".to_string(),
        }
    }
}

/// Optional data attributes written on generated elements
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DataAttributes {
    /// Attribute receiving the space-separated group names of a char
    pub sub_set_name: Option<String>,
    /// Class prefix producing `{prefix}-{group}` classes
    pub sub_set_class: Option<String>,
    /// Attribute receiving the running index of each element
    pub custom_order: Option<String>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AccessibilityOptions {
    pub enabled: bool,
    /// Put the full text on the container as `aria-label`
    pub aria_label: bool,
    /// Hide generated elements from assistive tech
    pub aria_hidden: bool,
    /// Put the full text on the container as `title`
    pub add_title: bool,
}

impl Default for AccessibilityOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            aria_label: true,
            aria_hidden: true,
            add_title: false,
        }
    }
}

impl AccessibilityOptions {
    pub fn labels_container(&self) -> bool {
        self.enabled && self.aria_label
    }

    pub fn hides_elements(&self) -> bool {
        self.enabled && self.aria_hidden
    }

    pub fn titles_container(&self) -> bool {
        self.enabled && self.add_title
    }
}

/// Complete splitter configuration
#[derive(Deserialize, Clone, Debug)]
#[serde(default, rename_all = "camelCase")]
pub struct SplitConfig {
    pub wrap: WrapOptions,
    pub enumerate: EnumerateOptions,
    pub classes: ClassNames,
    pub tags: TagNames,
    pub data_attributes: DataAttributes,
    /// Displayed text of wrapped space elements
    pub replace_space_with: String,
    pub accessibility: AccessibilityOptions,
    pub groups: BTreeMap<String, GroupDef>,
    /// Elements carrying this attribute are left untouched
    pub exclude_attribute: String,
    pub normalize_whitespace: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            wrap: WrapOptions::default(),
            enumerate: EnumerateOptions::default(),
            classes: ClassNames::default(),
            tags: TagNames::default(),
            data_attributes: DataAttributes::default(),
            replace_space_with: "\u{00A0}".to_string(),
            accessibility: AccessibilityOptions::default(),
            groups: BTreeMap::new(),
            exclude_attribute: "data-split-exclude".to_string(),
            normalize_whitespace: true,
        }
    }
}

impl SplitConfig {
    /// Parse a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check every option and compile the group definitions
    pub fn validate(&self) -> Result<Vec<CompiledGroup>, ConfigError> {
        validate_tag("char", &self.tags.char)?;
        validate_tag("word", &self.tags.word)?;

        validate_class("char", &self.classes.char)?;
        validate_class("word", &self.classes.word)?;
        validate_class("space", &self.classes.space)?;
        validate_class("special", &self.classes.special)?;
        validate_class("regular", &self.classes.regular)?;

        if self.enumerate.pad_width == 0 {
            return Err(ConfigError::InvalidPadWidth);
        }

        validate_attribute("excludeAttribute", &self.exclude_attribute)?;
        if let Some(name) = &self.data_attributes.sub_set_name {
            validate_attribute("dataAttributes.subSetName", name)?;
        }
        if let Some(name) = &self.data_attributes.custom_order {
            validate_attribute("dataAttributes.customOrder", name)?;
        }
        if let Some(prefix) = &self.data_attributes.sub_set_class {
            validate_class("subSetClass", prefix)?;
        }

        if let Some(prefix) = &self.data_attributes.sub_set_class {
            for name in self.groups.keys() {
                self.check_group_marker(prefix, name)?;
            }
        }

        self.groups
            .iter()
            .map(|(name, def)| def.compile(name))
            .collect()
    }

    /// `{prefix}-{group}` must not coincide with a class the factory writes
    fn check_group_marker(&self, prefix: &str, group: &str) -> Result<(), ConfigError> {
        use crate::split::ElementFactory;

        let marker = format!("{}-{}", prefix, group);
        let classes = &self.classes;
        let generated = [&classes.char, &classes.word, &classes.space, &classes.special, &classes.regular];
        let collides = generated.iter().any(|c| **c == marker)
            || ElementFactory::is_positional_class(&classes.char, &marker)
            || ElementFactory::is_positional_class(&classes.word, &marker);
        if collides {
            return Err(ConfigError::InvalidGroup {
                group: group.to_string(),
                reason: format!("marker class '{}' collides with a generated class", marker),
            });
        }
        Ok(())
    }

    /// Whether a char classified as `kind` gets its own element
    pub fn wraps_kind(&self, kind: crate::split::CharKind) -> bool {
        use crate::split::CharKind;

        if !self.wrap.chars {
            return false;
        }
        if kind.contains(CharKind::SPACE) {
            return self.wrap.spaces;
        }
        if kind.contains(CharKind::SPECIAL) && !kind.contains(CharKind::REGULAR) {
            return self.wrap.special_chars;
        }
        true
    }
}

fn validate_tag(field: &'static str, tag: &str) -> Result<(), ConfigError> {
    let normalized = tag.to_ascii_lowercase();
    if ALLOWED_TAGS.contains(&normalized.as_str()) {
        Ok(())
    } else {
        Err(ConfigError::InvalidTag {
            field,
            tag: tag.to_string(),
            allowed: ALLOWED_TAGS.join(", "),
        })
    }
}

fn validate_class(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidClassName {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn validate_attribute(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidAttribute {
            field,
            value: value.to_string(),
        })
    }
}
