//! Animation preset registry exposed to JavaScript
//!
//! The registry is filled with the built-in presets by the module start
//! function; JS may add or replace presets afterwards.

use super::helpers;
use crate::animation::{Preset, PresetRegistry};
use crate::{wasm_info, wasm_log};
use js_sys::Array;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

thread_local! {
    static PRESETS: RefCell<PresetRegistry> = RefCell::new(PresetRegistry::new());
}

/// Called once from the module start function
pub(crate) fn install_builtins() {
    PRESETS.with(|registry| registry.borrow_mut().register_builtins());
}

/// Snapshot of the registry, so engine callbacks may register presets
/// while an animation is being started
pub(crate) fn registry() -> PresetRegistry {
    PRESETS.with(|registry| registry.borrow().clone())
}

/// Add or replace a named preset
///
/// # Parameters
/// - `name`: Preset name used by `TextSplitter.animate`
/// - `preset`: `{ target?, from?, to, duration?, stagger?, ease? }`
#[wasm_bindgen(js_name = registerPreset)]
pub fn register_preset(name: &str, preset: JsValue) -> Result<(), JsValue> {
    let preset: Preset = helpers::deserialize(preset, "Invalid preset")?;
    wasm_log!("registerPreset '{}' ({:?}, {} props)", name, preset.target, preset.to.len());
    PRESETS.with(|registry| registry.borrow_mut().register(name, preset));
    wasm_info!("Preset '{}' registered", name);
    Ok(())
}

/// Names of every registered preset, sorted
#[wasm_bindgen(js_name = presetNames)]
pub fn preset_names() -> Array {
    PRESETS.with(|registry| {
        registry
            .borrow()
            .names()
            .into_iter()
            .map(|name| JsValue::from_str(&name))
            .collect()
    })
}
