//! Splitting text into wrapped char and word elements
//!
//! - `factory`: builds char/word elements and owns the positional counters
//! - `tree`: finds text segments under a root and swaps them for elements
//! - `grouper`: assigns wrapped chars to named groups

pub mod factory;
pub mod grouper;
pub mod tree;

pub use factory::{ElementDescriptor, ElementFactory};
pub use grouper::{apply_group_markers, CharContext, CharacterGrouper, GroupAssignment, GroupResult};
pub use tree::{TextSegment, TreeProcessor, WrapOutput};

use bitflags::bitflags;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SPECIAL_CHAR: Regex = Regex::new(r"^[\p{P}\p{S}]$").expect("special char pattern");
    static ref REGULAR_CHAR: Regex = Regex::new(r"^[\p{L}\p{M}\p{N}_]$").expect("regular char pattern");
}

bitflags! {
    /// Classification of a single character
    ///
    /// Checks are independent, so one char may carry several flags
    /// (`_` is both punctuation and a word character).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CharKind: u8 {
        const SPACE = 1;
        const SPECIAL = 1 << 1;
        const REGULAR = 1 << 2;
    }
}

impl CharKind {
    /// Classify in fixed order: whitespace, punctuation/symbol, word char
    pub fn classify(ch: char) -> Self {
        let mut buf = [0u8; 4];
        let s = ch.encode_utf8(&mut buf);

        let mut kind = CharKind::empty();
        if ch.is_whitespace() {
            kind |= CharKind::SPACE;
        }
        if SPECIAL_CHAR.is_match(s) {
            kind |= CharKind::SPECIAL;
        }
        if REGULAR_CHAR.is_match(s) {
            kind |= CharKind::REGULAR;
        }
        kind
    }

    /// Parse the public type names `regular`, `space` and `special`
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "regular" => Some(CharKind::REGULAR),
            "space" => Some(CharKind::SPACE),
            "special" => Some(CharKind::SPECIAL),
            _ => None,
        }
    }
}

/// A wrapped character
#[derive(Clone, Debug, PartialEq)]
pub struct CharEntry<N> {
    pub node: N,
    /// Logical character (spaces stay spaces even when displayed as nbsp)
    pub ch: char,
    pub kind: CharKind,
    /// Whitespace-delimited word the char belongs to
    pub word_index: Option<usize>,
    /// Position of the char in the source text
    pub source_index: usize,
}

/// A wrapped word
#[derive(Clone, Debug, PartialEq)]
pub struct WordEntry<N> {
    pub node: N,
    pub text: String,
}

/// Word index of every position of `text`, `None` on whitespace
pub fn word_indices(text: &[char]) -> Vec<Option<usize>> {
    let mut result = Vec::with_capacity(text.len());
    let mut current: Option<usize> = None;
    let mut in_word = false;

    for ch in text {
        if ch.is_whitespace() {
            in_word = false;
            result.push(None);
        } else {
            if !in_word {
                current = Some(current.map_or(0, |w| w + 1));
                in_word = true;
            }
            result.push(current);
        }
    }
    result
}
