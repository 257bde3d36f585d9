//! Error types for the text splitter
//!
//! Configuration and selection errors are fatal and surface at construction.
//! Alignment errors indicate corrupted caller state. Operational misuse
//! (transition while unwrapped, wrap while wrapped) is not an error: it is
//! logged and a safe default is returned instead.

use thiserror::Error;

/// Invalid configuration, detected once when options are validated
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Tag name outside the allow-list of container-like tags
    #[error("Invalid tag '{tag}' for tags.{field} (allowed: {allowed})")]
    InvalidTag {
        field: &'static str,
        tag: String,
        allowed: String,
    },

    /// A class name option was empty or contained whitespace
    #[error("Invalid class name for classes.{field}: '{value}'")]
    InvalidClassName { field: &'static str, value: String },

    /// Positional class padding must be at least one digit
    #[error("enumerate.padWidth must be at least 1")]
    InvalidPadWidth,

    /// Group definition could not be compiled
    #[error("Invalid group '{group}': {reason}")]
    InvalidGroup { group: String, reason: String },

    /// Attribute name option is not usable as an attribute
    #[error("Invalid attribute name for {field}: '{value}'")]
    InvalidAttribute { field: &'static str, value: String },

    /// Config could not be deserialized
    #[error("Failed to parse config: {0}")]
    Parse(String),
}

/// Tree backend failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomError {
    #[error("Node is not an element")]
    NotAnElement,

    #[error("Node has no parent")]
    NoParent,

    #[error("Invalid selector '{0}'")]
    InvalidSelector(String),

    #[error("DOM operation failed: {0}")]
    Operation(String),
}

/// Broken precondition when computing an alignment plan
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlignmentError {
    /// Every character of the old text must have exactly one element
    #[error("Alignment precondition violated: {text_len} characters but {element_len} elements")]
    LengthMismatch { text_len: usize, element_len: usize },
}

/// Failure reported by the external animation engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnimationError {
    #[error("Animation engine error: {0}")]
    Engine(String),
}

/// Top-level splitter error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Target element could not be selected
    #[error("Target not found: {0}")]
    Selection(String),

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Alignment(#[from] AlignmentError),

    #[error(transparent)]
    Animation(#[from] AnimationError),

    /// The splitter was destroyed and holds no target anymore
    #[error("Splitter has been destroyed")]
    Destroyed,
}

pub type SplitResult<T> = Result<T, SplitError>;
