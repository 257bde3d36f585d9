//! Text splitter WASM API
//!
//! JavaScript-facing surface of the crate.
//!
//! # Module Structure
//!
//! - `helpers`: console logging macros, serde conversions, promise plumbing
//! - `presets`: the shared preset registry (`registerPreset`, `presetNames`)
//! - `text_splitter`: the `TextSplitter` class

pub mod helpers;
pub mod presets;
pub mod text_splitter;

pub use presets::{preset_names, register_preset};
pub use text_splitter::TextSplitter;
