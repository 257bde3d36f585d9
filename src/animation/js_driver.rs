//! Driver backed by a JavaScript animation engine
//!
//! Any JS object with this shape works (a thin GSAP wrapper is typical):
//!
//! ```js
//! const engine = {
//!   animate(targets, props, options, onComplete) {
//!     return gsap.to(targets, { ...props, ...options, onComplete });
//!   },
//!   set(targets, props) { gsap.set(targets, props); },
//!   cancel(targets) { gsap.killTweensOf(targets); },
//! };
//! ```

use super::{AnimationDriver, AnimationId, Completion, PropertyMap, Tween};
use crate::error::AnimationError;
use js_sys::Array;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// Engine object supplied from JavaScript
    pub type JsAnimationEngine;

    #[wasm_bindgen(method, catch)]
    fn animate(
        this: &JsAnimationEngine,
        targets: &Array,
        props: &JsValue,
        options: &JsValue,
        on_complete: &JsValue,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn set(this: &JsAnimationEngine, targets: &Array, props: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn cancel(this: &JsAnimationEngine, targets: &Array) -> Result<JsValue, JsValue>;
}

/// Timing options passed as the third `animate` argument
#[derive(Serialize)]
struct TimingOptions<'a> {
    duration: f64,
    stagger: f64,
    ease: &'a str,
    delay: f64,
}

pub struct JsAnimationDriver {
    engine: JsAnimationEngine,
    next_id: AnimationId,
}

impl JsAnimationDriver {
    pub fn new(engine: JsAnimationEngine) -> Self {
        Self { engine, next_id: 1 }
    }

    fn targets<N: AsRef<JsValue>>(targets: &[N]) -> Array {
        targets.iter().map(|t| t.as_ref().clone()).collect()
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, AnimationError> {
    // Plain objects, not Maps, so engines can spread them
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    value
        .serialize(&serializer)
        .map_err(|e| AnimationError::Engine(e.to_string()))
}

fn engine_error(value: JsValue) -> AnimationError {
    AnimationError::Engine(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

impl<N: AsRef<JsValue>> AnimationDriver<N> for JsAnimationDriver {
    fn animate(&mut self, targets: &[N], tween: &Tween, on_complete: Completion) -> Result<AnimationId, AnimationError> {
        let props = to_js(&tween.props)?;
        let options = to_js(&TimingOptions {
            duration: tween.duration,
            stagger: tween.stagger,
            ease: &tween.ease,
            delay: tween.delay,
        })?;
        let callback = Closure::once_into_js(move || on_complete());

        self.engine
            .animate(&Self::targets(targets), &props, &options, &callback)
            .map_err(engine_error)?;

        let id = self.next_id;
        self.next_id += 1;
        Ok(id)
    }

    fn set_immediate(&mut self, targets: &[N], values: &PropertyMap) -> Result<(), AnimationError> {
        if targets.is_empty() {
            return Ok(());
        }
        let values = to_js(values)?;
        self.engine
            .set(&Self::targets(targets), &values)
            .map(|_| ())
            .map_err(engine_error)
    }

    fn cancel_animations_on(&mut self, targets: &[N]) {
        if targets.is_empty() {
            return;
        }
        if let Err(e) = self.engine.cancel(&Self::targets(targets)) {
            log::warn!("Animation engine failed to cancel tweens: {:?}", e);
        }
    }
}

/// Driver used when no engine was supplied: values are applied through
/// inline styles and animations complete immediately
pub struct InlineStyleDriver;

impl InlineStyleDriver {
    fn apply<N: AsRef<JsValue>>(targets: &[N], values: &PropertyMap) {
        let transform = css_transform(values);
        for target in targets {
            let Some(element) = target.as_ref().dyn_ref::<web_sys::HtmlElement>() else {
                continue;
            };
            let style = element.style();
            if let Some(opacity) = values.get("opacity") {
                if let Err(e) = style.set_property("opacity", &opacity.to_string()) {
                    log::warn!("Failed to set inline opacity: {:?}", e);
                }
            }
            if let Some(transform) = &transform {
                if let Err(e) = style.set_property("transform", transform) {
                    log::warn!("Failed to set inline transform: {:?}", e);
                }
            }
        }
    }
}

impl<N: AsRef<JsValue>> AnimationDriver<N> for InlineStyleDriver {
    fn animate(&mut self, targets: &[N], tween: &Tween, on_complete: Completion) -> Result<AnimationId, AnimationError> {
        Self::apply(targets, &tween.props);
        on_complete();
        Ok(0)
    }

    fn set_immediate(&mut self, targets: &[N], values: &PropertyMap) -> Result<(), AnimationError> {
        Self::apply(targets, values);
        Ok(())
    }

    fn cancel_animations_on(&mut self, _targets: &[N]) {}
}

/// CSS transform for the `x`, `y`, `scale` and `rotation` properties
fn css_transform(values: &PropertyMap) -> Option<String> {
    let mut parts = Vec::new();
    if values.contains_key("x") || values.contains_key("y") {
        let x = values.get("x").copied().unwrap_or(0.0);
        let y = values.get("y").copied().unwrap_or(0.0);
        parts.push(format!("translate({}px, {}px)", x, y));
    }
    if let Some(scale) = values.get("scale") {
        parts.push(format!("scale({})", scale));
    }
    if let Some(rotation) = values.get("rotation") {
        parts.push(format!("rotate({}deg)", rotation));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}
