//! Animation driver interface
//!
//! The splitter never tweens anything itself. It hands elements and target
//! property values to an [`AnimationDriver`] (a GSAP-like engine in the
//! browser, [`RecordingDriver`] headless) and tracks completion through
//! [`AnimationHandle`].

pub mod js_driver;
pub mod presets;
pub mod recording;

pub use js_driver::{InlineStyleDriver, JsAnimationDriver, JsAnimationEngine};
pub use presets::{AnimateOptions, Preset, PresetRegistry, PresetTarget};
pub use recording::{DriverCall, RecordingDriver};

use crate::error::AnimationError;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Numeric style properties (`opacity`, `scale`, `y`...)
pub type PropertyMap = BTreeMap<String, f64>;

/// Callback fired once an animation finishes
pub type Completion = Box<dyn FnOnce()>;

/// Identifier assigned by a driver to one started animation
pub type AnimationId = u64;

/// Build a [`PropertyMap`] from literal pairs
pub fn props(pairs: &[(&str, f64)]) -> PropertyMap {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// Target values and timing of one staggered animation
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tween {
    pub props: PropertyMap,
    /// Seconds
    pub duration: f64,
    /// Seconds between consecutive targets
    pub stagger: f64,
    pub ease: String,
    /// Seconds before the first target starts
    #[serde(default)]
    pub delay: f64,
}

/// External animation engine
pub trait AnimationDriver<N> {
    /// Animate `targets` to `tween.props`, staggered in slice order
    fn animate(&mut self, targets: &[N], tween: &Tween, on_complete: Completion) -> Result<AnimationId, AnimationError>;

    /// Set property values instantly
    fn set_immediate(&mut self, targets: &[N], values: &PropertyMap) -> Result<(), AnimationError>;

    /// Stop every running animation on `targets`; their completions never fire
    fn cancel_animations_on(&mut self, targets: &[N]);
}

impl<N, D: AnimationDriver<N> + ?Sized> AnimationDriver<N> for Box<D> {
    fn animate(&mut self, targets: &[N], tween: &Tween, on_complete: Completion) -> Result<AnimationId, AnimationError> {
        (**self).animate(targets, tween, on_complete)
    }

    fn set_immediate(&mut self, targets: &[N], values: &PropertyMap) -> Result<(), AnimationError> {
        (**self).set_immediate(targets, values)
    }

    fn cancel_animations_on(&mut self, targets: &[N]) {
        (**self).cancel_animations_on(targets)
    }
}

/// Tracks one logical animation made of one or more driver animations
#[derive(Clone, Debug, Default)]
pub struct AnimationHandle {
    pub ids: Vec<AnimationId>,
    finished: Rc<Cell<bool>>,
}

impl AnimationHandle {
    /// Handle that is already complete (nothing to animate)
    pub fn finished() -> Self {
        let handle = Self::default();
        handle.finished.set(true);
        handle
    }

    pub fn is_finished(&self) -> bool {
        self.finished.get()
    }
}

/// Fires one callback after `parts` completions
///
/// ```ignore
/// let (handle, mut parts) = CompletionLatch::start(2, Some(done));
/// driver.animate(&out, &exit, parts.remove(0))?;
/// driver.animate(&new, &enter, parts.remove(0))?;
/// ```
pub struct CompletionLatch;

impl CompletionLatch {
    pub fn start(parts: usize, on_complete: Option<Completion>) -> (AnimationHandle, Vec<Completion>) {
        let handle = AnimationHandle::default();
        let callback = Rc::new(RefCell::new(on_complete));

        if parts == 0 {
            handle.finished.set(true);
            if let Some(callback) = callback.borrow_mut().take() {
                callback();
            }
            return (handle, Vec::new());
        }

        let remaining = Rc::new(Cell::new(parts));
        let completions = (0..parts)
            .map(|_| {
                let remaining = Rc::clone(&remaining);
                let finished = Rc::clone(&handle.finished);
                let callback = Rc::clone(&callback);
                Box::new(move || {
                    let left = remaining.get().saturating_sub(1);
                    remaining.set(left);
                    if left == 0 {
                        finished.set(true);
                        // Release the borrow before running user code
                        let callback = callback.borrow_mut().take();
                        if let Some(callback) = callback {
                            callback();
                        }
                    }
                }) as Completion
            })
            .collect();
        (handle, completions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latch_fires_after_all_parts() {
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        let (handle, mut parts) = CompletionLatch::start(2, Some(Box::new(move || counter.set(counter.get() + 1))));

        let first = parts.remove(0);
        let second = parts.remove(0);
        first();
        assert!(!handle.is_finished());
        assert_eq!(fired.get(), 0);

        second();
        assert!(handle.is_finished());
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_latch_with_no_parts_completes_immediately() {
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        let (handle, parts) = CompletionLatch::start(0, Some(Box::new(move || flag.set(true))));
        assert!(parts.is_empty());
        assert!(handle.is_finished());
        assert!(fired.get());
    }

    #[test]
    fn test_props_helper() {
        let map = props(&[("opacity", 0.0), ("scale", 1.0)]);
        assert_eq!(map.len(), 2);
        assert_eq!(map["scale"], 1.0);
    }
}
