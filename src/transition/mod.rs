//! Animated text transitions
//!
//! A transition runs in two steps:
//! 1. [`compute_alignment`] decides which old elements survive (pure)
//! 2. [`Patcher::apply`] swaps the container contents for the complete new
//!    sequence, then animates removed and added elements
//!
//! The container text equals the new text as soon as `apply` returns; the
//! animations only affect how the delta looks while it settles.

pub mod alignment;
pub mod patch;

pub use alignment::{compute_alignment, Add, AlignmentPlan, Keep, Remove, Strategy};
pub use patch::{PatchOutcome, Patcher};

use crate::animation::{props, PropertyMap};
use serde::Deserialize;

/// Values every reused element is reset to before the swap
pub fn visible_state() -> PropertyMap {
    props(&[("opacity", 1.0), ("scale", 1.0), ("x", 0.0), ("y", 0.0), ("rotation", 0.0)])
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TransitionOptions {
    pub strategy: Strategy,
    /// Seconds per element
    pub duration: f64,
    /// Seconds between consecutive elements
    pub stagger: f64,
    pub ease: String,
    /// Initial state of added elements
    pub hidden: PropertyMap,
    /// Final state of added elements
    pub enter: PropertyMap,
    /// Final state of removed elements
    pub exit: PropertyMap,
}

impl Default for TransitionOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::Smart,
            duration: 0.5,
            stagger: 0.03,
            ease: "power2.out".to_string(),
            hidden: props(&[("opacity", 0.0), ("scale", 0.0)]),
            enter: props(&[("opacity", 1.0), ("scale", 1.0)]),
            exit: props(&[("opacity", 0.0), ("scale", 0.0)]),
        }
    }
}
