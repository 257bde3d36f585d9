//! Named animation presets
//!
//! [`PresetRegistry`] is a plain object: create it explicitly (usually with
//! [`PresetRegistry::with_builtins`]) and hand it to `Splitter::animate`.

use super::{props, PropertyMap, Tween};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What a preset animates
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PresetTarget {
    #[default]
    Chars,
    Words,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    #[serde(default)]
    pub target: PresetTarget,
    /// Values set instantly before the animation starts
    #[serde(default)]
    pub from: Option<PropertyMap>,
    pub to: PropertyMap,
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default = "default_stagger")]
    pub stagger: f64,
    #[serde(default = "default_ease")]
    pub ease: String,
}

fn default_duration() -> f64 {
    0.6
}

fn default_stagger() -> f64 {
    0.03
}

fn default_ease() -> String {
    "power2.out".to_string()
}

/// Per-call overrides for [`Preset`] timing and targets
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimateOptions {
    pub duration: Option<f64>,
    pub stagger: Option<f64>,
    pub ease: Option<String>,
    pub delay: Option<f64>,
    /// Only animate the chars of this group
    pub group: Option<String>,
}

impl Preset {
    /// Tween for this preset with `options` applied on top
    pub fn tween(&self, options: &AnimateOptions) -> Tween {
        Tween {
            props: self.to.clone(),
            duration: options.duration.unwrap_or(self.duration),
            stagger: options.stagger.unwrap_or(self.stagger),
            ease: options.ease.clone().unwrap_or_else(|| self.ease.clone()),
            delay: options.delay.unwrap_or(0.0),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PresetRegistry {
    presets: BTreeMap<String, Preset>,
}

impl PresetRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in presets
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_builtins();
        registry
    }

    pub fn register_builtins(&mut self) {
        self.register(
            "fadeIn",
            Preset {
                target: PresetTarget::Chars,
                from: Some(props(&[("opacity", 0.0)])),
                to: props(&[("opacity", 1.0)]),
                duration: 0.6,
                stagger: 0.03,
                ease: "power2.out".to_string(),
            },
        );
        self.register(
            "fadeUp",
            Preset {
                target: PresetTarget::Chars,
                from: Some(props(&[("opacity", 0.0), ("y", 20.0)])),
                to: props(&[("opacity", 1.0), ("y", 0.0)]),
                duration: 0.6,
                stagger: 0.03,
                ease: "power3.out".to_string(),
            },
        );
        self.register(
            "scaleIn",
            Preset {
                target: PresetTarget::Chars,
                from: Some(props(&[("opacity", 0.0), ("scale", 0.0)])),
                to: props(&[("opacity", 1.0), ("scale", 1.0)]),
                duration: 0.5,
                stagger: 0.02,
                ease: "back.out(1.7)".to_string(),
            },
        );
        self.register(
            "typewriter",
            Preset {
                target: PresetTarget::Chars,
                from: Some(props(&[("opacity", 0.0)])),
                to: props(&[("opacity", 1.0)]),
                duration: 0.0,
                stagger: 0.06,
                ease: "none".to_string(),
            },
        );
        self.register(
            "wordsFadeIn",
            Preset {
                target: PresetTarget::Words,
                from: Some(props(&[("opacity", 0.0), ("y", 10.0)])),
                to: props(&[("opacity", 1.0), ("y", 0.0)]),
                duration: 0.8,
                stagger: 0.1,
                ease: "power2.out".to_string(),
            },
        );
    }

    /// Add or replace a preset
    pub fn register(&mut self, name: &str, preset: Preset) {
        self.presets.insert(name.to_string(), preset);
    }

    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.get(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.presets.keys().cloned().collect()
    }
}
